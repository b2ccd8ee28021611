//! Working squad matrix.
//!
//! The matrix is the typed form the generation pipeline operates on:
//! one [`Squad`] per leader, each carrying its non-leader slots in display
//! order. Empty slots (`None`) pad squads when the roster does not divide
//! evenly; they are never rendered as members.

use serde::{Deserialize, Serialize};

use super::{Member, MemberId, DEFAULT_PRIORITY};

/// A member as placed in a squad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadMember {
    pub id: MemberId,
    pub name: String,
    pub priority: u32,
}

/// A non-leader position. `None` is an empty placeholder.
pub type Slot = Option<SquadMember>;

/// One squad: a leader plus ordered non-leader slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Squad {
    pub leader: SquadMember,
    pub members: Vec<Slot>,
}

/// All squads generated for one week, in squad order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadMatrix {
    pub squads: Vec<Squad>,
}

impl SquadMember {
    /// Creates a squad member.
    pub fn new(id: MemberId, name: impl Into<String>, priority: u32) -> Self {
        Self {
            id,
            name: name.into(),
            priority,
        }
    }
}

impl From<&Member> for SquadMember {
    fn from(m: &Member) -> Self {
        Self::new(m.id, m.name.clone(), m.priority)
    }
}

impl Squad {
    /// Creates a squad with only a leader.
    pub fn new(leader: SquadMember) -> Self {
        Self {
            leader,
            members: Vec::new(),
        }
    }

    /// Whether the member leads or belongs to this squad.
    pub fn contains(&self, id: MemberId) -> bool {
        self.leader.id == id || self.position_of(id).is_some()
    }

    /// Position of a non-leader member in `members`.
    pub fn position_of(&self, id: MemberId) -> Option<usize> {
        self.members
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|m| m.id == id))
    }

    /// Ids of everyone in the squad, leader first.
    pub fn member_ids(&self) -> impl Iterator<Item = MemberId> + '_ {
        std::iter::once(self.leader.id).chain(self.members.iter().flatten().map(|m| m.id))
    }

    /// Number of real (non-placeholder) people including the leader.
    pub fn headcount(&self) -> usize {
        1 + self.members.iter().flatten().count()
    }

    /// Stable sort of non-leader slots by priority; placeholders go last.
    pub fn sort_by_priority(&mut self) {
        self.members.sort_by_key(|slot| match slot {
            Some(m) => (false, m.priority),
            None => (true, DEFAULT_PRIORITY),
        });
    }

    /// Display strings with the leader re-inserted at `leader_row` (1-based).
    ///
    /// Squads shorter than the row get the leader appended at the end.
    pub fn display_slots(&self, leader_row: usize) -> Vec<Option<String>> {
        let mut out: Vec<Option<String>> = self
            .members
            .iter()
            .map(|slot| slot.as_ref().map(|m| m.name.clone()))
            .collect();
        let at = leader_row.saturating_sub(1).min(out.len());
        out.insert(at, Some(self.leader.name.clone()));
        out
    }
}

impl SquadMatrix {
    /// Creates a matrix from squads.
    pub fn new(squads: Vec<Squad>) -> Self {
        Self { squads }
    }

    /// Number of squads.
    pub fn len(&self) -> usize {
        self.squads.len()
    }

    /// Whether the matrix has no squads.
    pub fn is_empty(&self) -> bool {
        self.squads.is_empty()
    }

    /// Leader ids in squad order.
    pub fn leader_ids(&self) -> Vec<MemberId> {
        self.squads.iter().map(|s| s.leader.id).collect()
    }

    /// Index of the squad containing the member.
    pub fn squad_of(&self, id: MemberId) -> Option<usize> {
        self.squads.iter().position(|s| s.contains(id))
    }

    /// Total number of real people across all squads.
    pub fn headcount(&self) -> usize {
        self.squads.iter().map(Squad::headcount).sum()
    }

    /// Persisted display form: one list of optional names per squad.
    pub fn to_display(&self, leader_row: usize) -> Vec<Vec<Option<String>>> {
        self.squads
            .iter()
            .map(|s| s.display_slots(leader_row))
            .collect()
    }
}
