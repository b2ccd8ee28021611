//! Leader sampling.
//!
//! Draws exactly `team_count` leaders uniformly without replacement from
//! the candidate set, then shuffles the draw to assign squad slots.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use tracing::debug;

use crate::error::{Result, SquadError};
use crate::models::Member;

/// Picks the week's leaders from the candidate set.
#[derive(Debug, Clone)]
pub struct LeaderSelector {
    team_count: usize,
}

impl LeaderSelector {
    /// Creates a selector for `team_count` squads.
    pub fn new(team_count: usize) -> Self {
        Self { team_count }
    }

    /// Returns leaders in squad order (index `i` leads squad `i`).
    pub fn select<'a, R: Rng + ?Sized>(
        &self,
        candidates: &[&'a Member],
        rng: &mut R,
    ) -> Result<Vec<&'a Member>> {
        if candidates.len() < self.team_count {
            return Err(SquadError::InsufficientCandidates {
                eligible: candidates.len(),
                required: self.team_count,
            });
        }

        let mut leaders: Vec<&'a Member> = candidates
            .choose_multiple(rng, self.team_count)
            .copied()
            .collect();
        leaders.shuffle(rng);

        debug!(
            leaders = ?leaders.iter().map(|m| m.id).collect::<Vec<_>>(),
            "selected leaders"
        );
        Ok(leaders)
    }
}
