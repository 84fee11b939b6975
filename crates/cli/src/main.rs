use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use splitledger_cli::{GroupSnapshot, SplitRequest, commands};
use splitledger_observability::{LogConfig, LogFormat};

#[derive(Parser, Debug)]
#[command(name = "splitledger")]
#[command(about = "Split shared expenses, compute group balances and settle them")]
struct Cli {
    /// Log output format: `pretty` or `json`.
    #[arg(long, env = "SPLITLEDGER_LOG_FORMAT", default_value = "pretty", global = true)]
    log_format: LogFormat,

    /// Log filter directives (e.g. `debug`, `splitledger_ledger=debug`); defaults to `RUST_LOG`.
    #[arg(long, env = "SPLITLEDGER_LOG", global = true)]
    log_filter: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split an amount between participants (reads a split request).
    Split { request: PathBuf },
    /// Net balance per participant.
    Balances(SnapshotArgs),
    /// Balances plus the payments that settle them.
    Settle(SnapshotArgs),
    /// Totals, category breakdown and contributions.
    Summary(SnapshotArgs),
}

#[derive(clap::Args, Debug)]
struct SnapshotArgs {
    /// Group snapshot (participants and expenses with splits) as JSON.
    snapshot: PathBuf,

    /// Reject snapshots with unknown participants or splits that miss their total.
    #[arg(long)]
    strict: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    splitledger_observability::init_with(&LogConfig {
        format: cli.log_format,
        filter: cli.log_filter.clone(),
    });

    match &cli.command {
        Command::Split { request } => {
            let request = SplitRequest::load(request)?;
            print_json(&commands::split(&request)?)
        }
        Command::Balances(args) => {
            let snapshot = load(args)?;
            print_json(&commands::balances(&snapshot, args.strict)?)
        }
        Command::Settle(args) => {
            let snapshot = load(args)?;
            print_json(&commands::settle(&snapshot, args.strict)?)
        }
        Command::Summary(args) => {
            let snapshot = load(args)?;
            print_json(&commands::summary(&snapshot, args.strict)?)
        }
    }
}

fn load(args: &SnapshotArgs) -> anyhow::Result<GroupSnapshot> {
    let snapshot = GroupSnapshot::load(&args.snapshot)?;
    tracing::debug!(
        participants = snapshot.participants.len(),
        expenses = snapshot.expenses.len(),
        "loaded group snapshot"
    );
    Ok(snapshot)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
