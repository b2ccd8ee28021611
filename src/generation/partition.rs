//! Squad matrix construction.
//!
//! Leaders form rank 0. Ordered members are cut into ranks of
//! `team_count`, and ranks are transposed into squads:
//!
//! ```text
//! rank 0:  L0 L1 L2 L3        squad 0: L0 a e
//! rank 1:  a  b  c  d    →    squad 1: L1 b f
//! rank 2:  e  f               squad 2: L2 c -
//!                             squad 3: L3 d -
//! ```
//!
//! A short final rank leaves `None` placeholders in the trailing squads.

use crate::models::{Member, Slot, Squad, SquadMatrix, SquadMember};

/// Builds the squad matrix from leaders and ordered members.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquadPartitioner;

impl SquadPartitioner {
    /// Creates a partitioner.
    pub fn new() -> Self {
        Self
    }

    /// One squad per leader; members fill ranks left to right.
    pub fn partition(&self, leaders: &[&Member], members: &[&Member]) -> SquadMatrix {
        let team_count = leaders.len();
        if team_count == 0 {
            return SquadMatrix::default();
        }

        let mut squads: Vec<Squad> = leaders
            .iter()
            .map(|&l| Squad::new(SquadMember::from(l)))
            .collect();

        for rank in members.chunks(team_count) {
            for (i, squad) in squads.iter_mut().enumerate() {
                let slot: Slot = rank.get(i).map(|&m| SquadMember::from(m));
                squad.members.push(slot);
            }
        }

        SquadMatrix::new(squads)
    }
}
