//! Divide-pair resolution.
//!
//! # Algorithm
//!
//! The last squad is the overflow squad. Its non-leader slots are
//! snapshotted before any change and serve as donors, taken from the end.
//!
//! While some squad holds both members of a divide pair:
//! 1. Pick the mover: the pair's `second`, then `first`. Leaders never move.
//! 2. If the squad is not the overflow squad, exchange the mover with the
//!    last safe donor still in the overflow squad.
//! 3. If it is the overflow squad, exchange the mover with the last safe
//!    non-leader slot of the other squads, scanning backwards.
//! 4. Neither mover has a safe partner: fail with `ConstraintUnsatisfiable`.
//!
//! A swap is safe when neither side lands next to one of its own divide
//! partners. Every swap strictly reduces the number of violations, so the
//! loop terminates. Finally each squad's non-leader slots are re-sorted by
//! priority (placeholders last).

use tracing::debug;

use crate::config::SquadConfig;
use crate::error::{Result, SquadError};
use crate::models::{DividePair, MemberId, Slot, SquadMatrix};

/// Separates divide pairs that landed in the same squad.
#[derive(Debug, Clone, Default)]
pub struct ConstraintResolver {
    pairs: Vec<DividePair>,
}

fn slot_id(slot: &Slot) -> Option<MemberId> {
    slot.as_ref().map(|m| m.id)
}

impl ConstraintResolver {
    /// Creates a resolver for the given pairs.
    pub fn new(pairs: Vec<DividePair>) -> Self {
        Self { pairs }
    }

    /// Creates a resolver from settings.
    pub fn from_config(config: &SquadConfig) -> Self {
        Self::new(config.divide_pairs.clone())
    }

    /// Configured pairs.
    pub fn pairs(&self) -> &[DividePair] {
        &self.pairs
    }

    /// First squad (and pair) in violation, if any.
    pub fn first_violation(&self, matrix: &SquadMatrix) -> Option<(usize, DividePair)> {
        matrix.squads.iter().enumerate().find_map(|(i, squad)| {
            self.pairs
                .iter()
                .filter(|p| p.first != p.second)
                .find(|p| p.violated_by(squad))
                .map(|&p| (i, p))
        })
    }

    /// Resolves all violations in place and re-sorts every squad.
    ///
    /// Returns the number of swaps performed.
    pub fn resolve(&self, matrix: &mut SquadMatrix) -> Result<usize> {
        let mut swaps = 0;

        if !self.pairs.is_empty() && !matrix.is_empty() {
            let overflow = matrix.len() - 1;
            let mut donors: Vec<Option<MemberId>> = matrix.squads[overflow]
                .members
                .iter()
                .map(slot_id)
                .collect();

            while let Some((squad, pair)) = self.first_violation(matrix) {
                let movers = pair.movers_in(&matrix.squads[squad]);
                let swapped = movers.into_iter().any(|mover| {
                    if squad == overflow {
                        self.swap_with_other_squads(matrix, overflow, mover)
                    } else {
                        self.swap_with_overflow(matrix, squad, overflow, mover, &mut donors)
                    }
                });
                if !swapped {
                    return Err(SquadError::ConstraintUnsatisfiable {
                        squad,
                        first: pair.first,
                        second: pair.second,
                    });
                }
                swaps += 1;
            }
        }

        for squad in &mut matrix.squads {
            squad.sort_by_priority();
        }
        Ok(swaps)
    }

    /// Exchanges `mover` with the last safe snapshot donor.
    fn swap_with_overflow(
        &self,
        matrix: &mut SquadMatrix,
        from: usize,
        overflow: usize,
        mover: MemberId,
        donors: &mut Vec<Option<MemberId>>,
    ) -> bool {
        for k in (0..donors.len()).rev() {
            let donor = donors[k];
            let Some(pos) = matrix.squads[overflow]
                .members
                .iter()
                .position(|slot| slot_id(slot) == donor)
            else {
                continue;
            };
            if self.is_safe(matrix, from, mover, overflow, donor) {
                donors.remove(k);
                return exchange(matrix, from, mover, overflow, pos);
            }
        }
        false
    }

    /// Exchanges `mover` (in the overflow squad) with a slot elsewhere.
    fn swap_with_other_squads(
        &self,
        matrix: &mut SquadMatrix,
        overflow: usize,
        mover: MemberId,
    ) -> bool {
        for to in (0..overflow).rev() {
            for pos in (0..matrix.squads[to].members.len()).rev() {
                let donor = slot_id(&matrix.squads[to].members[pos]);
                if self.is_safe(matrix, overflow, mover, to, donor) {
                    return exchange(matrix, overflow, mover, to, pos);
                }
            }
        }
        false
    }

    /// Whether moving `mover` from `from` to `to`, and `donor` back, creates
    /// no new violation.
    fn is_safe(
        &self,
        matrix: &SquadMatrix,
        from: usize,
        mover: MemberId,
        to: usize,
        donor: Option<MemberId>,
    ) -> bool {
        let lands_clear = |who: MemberId, squad: usize, leaving: Option<MemberId>| {
            self.pairs.iter().filter_map(|p| p.partner_of(who)).all(|partner| {
                Some(partner) == leaving || !matrix.squads[squad].contains(partner)
            })
        };

        lands_clear(mover, to, donor)
            && match donor {
                Some(d) => lands_clear(d, from, Some(mover)),
                None => true,
            }
    }
}

/// Swaps `mover` out of `from` with the slot at `pos` in `to`.
fn exchange(matrix: &mut SquadMatrix, from: usize, mover: MemberId, to: usize, pos: usize) -> bool {
    let Some(mover_pos) = matrix.squads[from].position_of(mover) else {
        return false;
    };
    let moved = matrix.squads[from].members.remove(mover_pos);
    let donated = matrix.squads[to].members.remove(pos);
    debug!(
        mover,
        donor = ?slot_id(&donated),
        from,
        to,
        "separated divide pair"
    );
    matrix.squads[from].members.push(donated);
    matrix.squads[to].members.push(moved);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Squad, SquadMember};

    fn sm(id: MemberId, priority: u32) -> SquadMember {
        SquadMember::new(id, format!("m{id}"), priority)
    }

    fn squad(leader: MemberId, members: &[MemberId]) -> Squad {
        Squad {
            leader: sm(leader, 100),
            members: members.iter().map(|&id| Some(sm(id, 100))).collect(),
        }
    }

    fn ids(squad: &Squad) -> Vec<Option<MemberId>> {
        squad.members.iter().map(slot_id).collect()
    }

    #[test]
    fn test_no_pairs_leaves_matrix_alone() {
        let mut m = SquadMatrix::new(vec![squad(1, &[2, 3]), squad(4, &[5, 6])]);
        let before = m.clone();
        let swaps = ConstraintResolver::default().resolve(&mut m).unwrap();
        assert_eq!(swaps, 0);
        assert_eq!(m, before);
    }

    #[test]
    fn test_swaps_with_overflow_tail() {
        let mut m = SquadMatrix::new(vec![
            squad(1, &[2, 3]),
            squad(4, &[5, 6]),
            squad(7, &[8, 9]),
        ]);
        let swaps = ConstraintResolver::new(vec![DividePair::new(2, 3)])
            .resolve(&mut m)
            .unwrap();

        assert_eq!(swaps, 1);
        assert_eq!(ids(&m.squads[0]), vec![Some(2), Some(9)]);
        assert_eq!(ids(&m.squads[1]), vec![Some(5), Some(6)]);
        assert_eq!(ids(&m.squads[2]), vec![Some(8), Some(3)]);
    }

    #[test]
    fn test_leader_never_moves() {
        let mut m = SquadMatrix::new(vec![squad(3, &[2, 5]), squad(4, &[6, 7])]);
        ConstraintResolver::new(vec![DividePair::new(2, 3)])
            .resolve(&mut m)
            .unwrap();

        assert_eq!(m.leader_ids(), vec![3, 4]);
        assert_eq!(ids(&m.squads[0]), vec![Some(5), Some(7)]);
        assert_eq!(ids(&m.squads[1]), vec![Some(6), Some(2)]);
    }

    #[test]
    fn test_violation_in_overflow_squad() {
        let mut m = SquadMatrix::new(vec![squad(1, &[2, 3]), squad(4, &[5, 6])]);
        ConstraintResolver::new(vec![DividePair::new(5, 6)])
            .resolve(&mut m)
            .unwrap();

        assert_eq!(ids(&m.squads[0]), vec![Some(2), Some(6)]);
        assert_eq!(ids(&m.squads[1]), vec![Some(5), Some(3)]);
    }

    #[test]
    fn test_placeholder_donor_keeps_everyone() {
        let mut m = SquadMatrix::new(vec![
            squad(1, &[2, 3]),
            Squad {
                leader: sm(4, 100),
                members: vec![Some(sm(5, 100)), None],
            },
        ]);
        ConstraintResolver::new(vec![DividePair::new(2, 3)])
            .resolve(&mut m)
            .unwrap();

        assert_eq!(ids(&m.squads[0]), vec![Some(2), None]);
        assert_eq!(ids(&m.squads[1]), vec![Some(5), Some(3)]);
        assert_eq!(m.headcount(), 5);
    }

    #[test]
    fn test_skips_unsafe_donor() {
        let mut m = SquadMatrix::new(vec![squad(1, &[2, 3]), squad(4, &[8, 9])]);
        let pairs = vec![DividePair::new(2, 3), DividePair::new(2, 9)];
        ConstraintResolver::new(pairs).resolve(&mut m).unwrap();

        assert_eq!(ids(&m.squads[0]), vec![Some(2), Some(8)]);
        assert_eq!(ids(&m.squads[1]), vec![Some(9), Some(3)]);
    }

    #[test]
    fn test_exhausted_overflow_fails_closed() {
        let mut m = SquadMatrix::new(vec![squad(1, &[2, 3]), squad(4, &[])]);
        let err = ConstraintResolver::new(vec![DividePair::new(2, 3)])
            .resolve(&mut m)
            .unwrap_err();

        match err {
            SquadError::ConstraintUnsatisfiable {
                squad,
                first,
                second,
            } => {
                assert_eq!((squad, first, second), (0, 2, 3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_snapshot_donors_used_once() {
        // Two conflicted squads share one donor list of length 2.
        let mut m = SquadMatrix::new(vec![
            squad(1, &[2, 3]),
            squad(4, &[5, 6]),
            squad(7, &[8, 9]),
        ]);
        let pairs = vec![DividePair::new(2, 3), DividePair::new(5, 6)];
        let swaps = ConstraintResolver::new(pairs).resolve(&mut m).unwrap();

        assert_eq!(swaps, 2);
        assert_eq!(ids(&m.squads[0]), vec![Some(2), Some(9)]);
        assert_eq!(ids(&m.squads[1]), vec![Some(5), Some(8)]);
        assert_eq!(ids(&m.squads[2]), vec![Some(3), Some(6)]);
    }

    #[test]
    fn test_resorts_by_priority_after_swap() {
        let mut m = SquadMatrix::new(vec![
            Squad {
                leader: sm(1, 100),
                members: vec![Some(sm(2, 10)), Some(sm(3, 50))],
            },
            Squad {
                leader: sm(4, 100),
                members: vec![Some(sm(5, 20)), Some(sm(6, 5))],
            },
        ]);
        ConstraintResolver::new(vec![DividePair::new(2, 3)])
            .resolve(&mut m)
            .unwrap();

        assert_eq!(ids(&m.squads[0]), vec![Some(6), Some(2)]);
        assert_eq!(ids(&m.squads[1]), vec![Some(5), Some(3)]);
    }

    #[test]
    fn test_self_pair_ignored() {
        let mut m = SquadMatrix::new(vec![squad(1, &[2]), squad(3, &[4])]);
        let swaps = ConstraintResolver::new(vec![DividePair::new(1, 1)])
            .resolve(&mut m)
            .unwrap();
        assert_eq!(swaps, 0);
    }
}
