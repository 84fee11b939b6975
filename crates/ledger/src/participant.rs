use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};

use splitledger_core::{Entity, ParticipantId};

use crate::error::{LedgerError, LedgerResult};
use crate::expense::Expense;

/// A member of an expense-sharing group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    /// Display color (e.g. `#8B5CF6`); carried through, never interpreted.
    pub color: String,
    #[serde(default)]
    pub is_owner: bool,
}

impl Participant {
    pub fn new(id: ParticipantId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            is_owner: false,
        }
    }

    pub fn owner(mut self) -> Self {
        self.is_owner = true;
        self
    }
}

impl Entity for Participant {
    type Id = ParticipantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Participants of one group, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct Roster<'a> {
    by_id: BTreeMap<ParticipantId, &'a Participant>,
}

impl<'a> Roster<'a> {
    /// Builds a roster, rejecting duplicate ids.
    pub fn new(participants: &'a [Participant]) -> LedgerResult<Self> {
        let mut by_id = BTreeMap::new();
        for participant in participants {
            match by_id.entry(*participant.id()) {
                Entry::Vacant(slot) => {
                    slot.insert(participant);
                }
                Entry::Occupied(_) => {
                    return Err(LedgerError::DuplicateParticipant(participant.id));
                }
            }
        }
        Ok(Self { by_id })
    }

    /// Indexes participants without validation; the first occurrence of an id wins.
    pub(crate) fn index(participants: &'a [Participant]) -> Self {
        let mut by_id = BTreeMap::new();
        for participant in participants {
            by_id.entry(*participant.id()).or_insert(participant);
        }
        Self { by_id }
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&'a Participant> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Participants in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Participant> + '_ {
        self.by_id.values().copied()
    }

    /// Checks that the payer and every split of `expense` belong to this roster.
    pub fn check_expense(&self, expense: &Expense) -> LedgerResult<()> {
        let referenced = std::iter::once(&expense.payer_id)
            .chain(expense.splits.iter().map(|split| &split.participant_id));
        for id in referenced {
            if !self.contains(id) {
                return Err(LedgerError::UnknownParticipant(*id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn pid(n: u128) -> ParticipantId {
        ParticipantId::from_uuid(Uuid::from_u128(n))
    }

    #[test]
    fn roster_rejects_duplicate_ids() {
        let participants = vec![
            Participant::new(pid(1), "Ana", "#8B5CF6").owner(),
            Participant::new(pid(2), "Ben", "#EC4899"),
            Participant::new(pid(1), "Ana again", "#F59E0B"),
        ];

        let err = Roster::new(&participants).unwrap_err();
        assert_eq!(err, LedgerError::DuplicateParticipant(pid(1)));
    }

    #[test]
    fn index_keeps_first_occurrence() {
        let participants = vec![
            Participant::new(pid(1), "Ana", "#8B5CF6"),
            Participant::new(pid(1), "Ana again", "#F59E0B"),
        ];

        let roster = Roster::index(&participants);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get(&pid(1)).map(|p| p.name.as_str()), Some("Ana"));
    }

    #[test]
    fn participant_json_uses_camel_case() {
        let participant = Participant::new(pid(1), "Ana", "#8B5CF6").owner();
        let json = serde_json::to_value(&participant).unwrap();
        assert_eq!(json["isOwner"], true);
        assert_eq!(json["color"], "#8B5CF6");
    }
}
