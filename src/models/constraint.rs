//! Squad placement constraints.
//!
//! A divide pair names two members who must never be placed in the same
//! squad. Pairs are pure data; [`crate::generation::ConstraintResolver`]
//! enforces them after partitioning.

use serde::{Deserialize, Serialize};

use super::{MemberId, Squad};

/// Two members that must never share a squad.
///
/// When a squad holds both, `second` is moved out if possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DividePair {
    pub first: MemberId,
    pub second: MemberId,
}

impl DividePair {
    /// Creates a divide pair.
    pub fn new(first: MemberId, second: MemberId) -> Self {
        Self { first, second }
    }

    /// Whether the pair names the member.
    pub fn involves(&self, id: MemberId) -> bool {
        self.first == id || self.second == id
    }

    /// The other half of the pair, if `id` is in it.
    pub fn partner_of(&self, id: MemberId) -> Option<MemberId> {
        if self.first == id {
            Some(self.second)
        } else if self.second == id {
            Some(self.first)
        } else {
            None
        }
    }

    /// Whether the squad holds both members.
    pub fn violated_by(&self, squad: &Squad) -> bool {
        squad.contains(self.first) && squad.contains(self.second)
    }

    /// Members that may be moved out of a violating squad, preferred first.
    ///
    /// `second` is preferred; leaders stay put and are never returned.
    pub fn movers_in(&self, squad: &Squad) -> Vec<MemberId> {
        [self.second, self.first]
            .into_iter()
            .filter(|&id| id != squad.leader.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SquadMember;

    fn squad(leader: MemberId, members: &[MemberId]) -> Squad {
        Squad {
            leader: SquadMember::new(leader, "l", 100),
            members: members
                .iter()
                .map(|&id| Some(SquadMember::new(id, "m", 100)))
                .collect(),
        }
    }

    #[test]
    fn test_partner_of() {
        let p = DividePair::new(1, 2);
        assert_eq!(p.partner_of(1), Some(2));
        assert_eq!(p.partner_of(2), Some(1));
        assert_eq!(p.partner_of(3), None);
        assert!(p.involves(2));
        assert!(!p.involves(3));
    }

    #[test]
    fn test_violated_by() {
        let p = DividePair::new(1, 2);
        assert!(p.violated_by(&squad(1, &[5, 2])));
        assert!(p.violated_by(&squad(9, &[1, 2])));
        assert!(!p.violated_by(&squad(9, &[1, 3])));
    }

    #[test]
    fn test_movers_prefer_second_and_skip_leader() {
        let p = DividePair::new(1, 2);
        assert_eq!(p.movers_in(&squad(9, &[1, 2])), vec![2, 1]);
        assert_eq!(p.movers_in(&squad(1, &[2])), vec![2]);
        assert_eq!(p.movers_in(&squad(2, &[1])), vec![1]);
    }
}
