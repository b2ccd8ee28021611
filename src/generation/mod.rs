//! Weekly squad generation pipeline.
//!
//! # Pipeline
//!
//! 1. [`CooldownClassifier`]: leader candidates by cooldown recency.
//! 2. [`LeaderSelector`]: sample `team_count` leaders, shuffle squad slots.
//! 3. [`MemberOrderer`]: everyone else, priority buckets shuffled inside.
//! 4. [`SquadPartitioner`]: ranks transposed into squads.
//! 5. [`ConstraintResolver`]: separate divide pairs, re-sort by priority.
//!
//! A single RNG is threaded through every step, so a fixed seed
//! reproduces a run exactly.
//!
//! # Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use u_squad::config::SquadConfig;
//! use u_squad::generation::generate;
//! use u_squad::models::Member;
//!
//! let roster: Vec<Member> = (1..=12).map(|i| Member::new(i, format!("m{i}"))).collect();
//! let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! let matrix = generate(&roster, monday, &SquadConfig::default(), &mut rng).unwrap();
//! assert_eq!(matrix.len(), 4);
//! assert_eq!(matrix.headcount(), 12);
//! ```

mod cooldown;
mod leader;
mod ordering;
mod partition;
mod resolver;

pub use cooldown::{CandidatePools, CooldownClassifier, RELAXED_COOLDOWN_WEEKS};
pub use leader::LeaderSelector;
pub use ordering::MemberOrderer;
pub use partition::SquadPartitioner;
pub use resolver::ConstraintResolver;

use chrono::NaiveDate;
use rand::Rng;

use crate::config::SquadConfig;
use crate::error::Result;
use crate::models::{Member, SquadMatrix};

/// Runs the full pipeline for the week containing `date`.
///
/// # Errors
/// - `InvalidConfig`: settings out of range (e.g. `team_count` of 0).
/// - `InsufficientCandidates`: fewer eligible leaders than `team_count`.
/// - `ConstraintUnsatisfiable`: a divide pair cannot be separated.
pub fn generate<R: Rng + ?Sized>(
    roster: &[Member],
    date: NaiveDate,
    config: &SquadConfig,
    rng: &mut R,
) -> Result<SquadMatrix> {
    config.validate()?;
    let candidates = CooldownClassifier::from_config(config)
        .classify(roster, date, rng)?
        .into_candidates();
    let leaders = LeaderSelector::new(config.team_count).select(&candidates, rng)?;
    let members = MemberOrderer::new().order(roster, &leaders, rng);

    let mut matrix = SquadPartitioner::new().partition(&leaders, &members);
    ConstraintResolver::from_config(config).resolve(&mut matrix)?;
    Ok(matrix)
}
