//! Non-leader member ordering.
//!
//! Members are grouped by priority, each group is shuffled, and groups
//! are concatenated from the lowest priority value up. Leaders are removed
//! by id, so duplicate names or priorities never hide a member.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, HashSet};

use crate::models::{Member, MemberId};

/// Orders the members who are not leading this week.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberOrderer;

impl MemberOrderer {
    /// Creates an orderer.
    pub fn new() -> Self {
        Self
    }

    /// Returns the roster minus `leaders`, bucketed by priority and
    /// shuffled within each bucket.
    pub fn order<'a, R: Rng + ?Sized>(
        &self,
        roster: &'a [Member],
        leaders: &[&Member],
        rng: &mut R,
    ) -> Vec<&'a Member> {
        let leader_ids: HashSet<MemberId> = leaders.iter().map(|m| m.id).collect();

        let mut buckets: BTreeMap<u32, Vec<&'a Member>> = BTreeMap::new();
        for m in roster.iter().filter(|m| !leader_ids.contains(&m.id)) {
            buckets.entry(m.priority).or_default().push(m);
        }

        let mut ordered = Vec::with_capacity(roster.len().saturating_sub(leader_ids.len()));
        for bucket in buckets.values_mut() {
            bucket.shuffle(rng);
            ordered.extend(bucket.iter().copied());
        }
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn roster() -> Vec<Member> {
        vec![
            Member::new(1, "a").with_priority(100),
            Member::new(2, "b").with_priority(10),
            Member::new(3, "c").with_priority(100),
            Member::new(4, "d").with_priority(50),
            Member::new(5, "e").with_priority(10),
            Member::new(6, "f").with_priority(100),
        ]
    }

    #[test]
    fn test_excludes_leaders_by_id() {
        let members = roster();
        let leaders = vec![&members[0], &members[3]];
        let mut rng = StdRng::seed_from_u64(1);

        let ordered = MemberOrderer::new().order(&members, &leaders, &mut rng);
        let ids: HashSet<MemberId> = ordered.iter().map(|m| m.id).collect();
        assert_eq!(ordered.len(), 4);
        assert!(!ids.contains(&1));
        assert!(!ids.contains(&4));
    }

    #[test]
    fn test_duplicate_name_and_priority_not_collapsed() {
        let members = vec![
            Member::new(1, "Kim").with_priority(100),
            Member::new(2, "Kim").with_priority(100),
            Member::new(3, "Lee").with_priority(100),
        ];
        let leaders = vec![&members[0]];
        let mut rng = StdRng::seed_from_u64(2);

        let ordered = MemberOrderer::new().order(&members, &leaders, &mut rng);
        let mut ids: Vec<MemberId> = ordered.iter().map(|m| m.id).collect();
        ids.sort();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_priority_buckets_ascending() {
        let members = roster();
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..20 {
            let ordered = MemberOrderer::new().order(&members, &[], &mut rng);
            let priorities: Vec<u32> = ordered.iter().map(|m| m.priority).collect();
            assert_eq!(priorities, vec![10, 10, 50, 100, 100, 100]);
        }
    }

    #[test]
    fn test_bucket_contents_shuffled() {
        let members = roster();
        let mut rng = StdRng::seed_from_u64(4);
        let mut heads = HashSet::new();

        for _ in 0..100 {
            let ordered = MemberOrderer::new().order(&members, &[], &mut rng);
            heads.insert(ordered[0].id);
        }
        // Both priority-10 members show up first at some point.
        assert_eq!(heads, HashSet::from([2, 5]));
    }

    #[test]
    fn test_empty_after_leaders() {
        let members = vec![Member::new(1, "a")];
        let leaders = vec![&members[0]];
        let mut rng = StdRng::seed_from_u64(0);
        assert!(MemberOrderer::new()
            .order(&members, &leaders, &mut rng)
            .is_empty());
    }
}
