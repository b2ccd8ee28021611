//! Leader candidate pools by cooldown recency.
//!
//! # Algorithm
//!
//! Only members with `enable_date < week_monday` are eligible.
//!
//! 1. **Strict**: never led, or last led at least `cooldown_weeks` ago.
//!    Shuffled, capped at `team_count`.
//! 2. **Relaxed**: not strict, never led or last led at least two weeks ago.
//!    Shuffled, fills up to `team_count`.
//! 3. **Fallback**: every other eligible member. Shuffled, fills the rest.
//!
//! The concatenation always holds exactly `team_count` distinct members.

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use tracing::debug;

use crate::config::SquadConfig;
use crate::error::{Result, SquadError};
use crate::models::{Member, MemberId};
use crate::week::monday_of;

/// Weeks of rest required by the relaxed pool.
pub const RELAXED_COOLDOWN_WEEKS: i64 = 2;

/// Leader candidates split by how they qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePools<'a> {
    pub strict: Vec<&'a Member>,
    pub relaxed: Vec<&'a Member>,
    pub fallback: Vec<&'a Member>,
}

impl<'a> CandidatePools<'a> {
    /// Total number of candidates.
    pub fn len(&self) -> usize {
        self.strict.len() + self.relaxed.len() + self.fallback.len()
    }

    /// Whether no candidate was found.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All candidates, strict pool first.
    pub fn into_candidates(self) -> Vec<&'a Member> {
        let mut all = self.strict;
        all.extend(self.relaxed);
        all.extend(self.fallback);
        all
    }
}

/// Splits an eligible roster into leader-candidate pools.
#[derive(Debug, Clone)]
pub struct CooldownClassifier {
    team_count: usize,
    cooldown_weeks: u32,
}

impl CooldownClassifier {
    /// Creates a classifier.
    pub fn new(team_count: usize, cooldown_weeks: u32) -> Self {
        Self {
            team_count,
            cooldown_weeks,
        }
    }

    /// Creates a classifier from settings.
    pub fn from_config(config: &SquadConfig) -> Self {
        Self::new(config.team_count, config.leader_cooldown_weeks)
    }

    /// Classifies the roster for the week containing `date`.
    ///
    /// # Errors
    /// `InsufficientCandidates` if fewer than `team_count` members are
    /// eligible to lead that week.
    pub fn classify<'a, R: Rng + ?Sized>(
        &self,
        roster: &'a [Member],
        date: NaiveDate,
        rng: &mut R,
    ) -> Result<CandidatePools<'a>> {
        let week_monday = monday_of(date);
        let eligible: Vec<&Member> = roster
            .iter()
            .filter(|m| m.can_lead_on(week_monday))
            .collect();

        if eligible.len() < self.team_count {
            return Err(SquadError::InsufficientCandidates {
                eligible: eligible.len(),
                required: self.team_count,
            });
        }

        let strict_cutoff = week_monday - Duration::weeks(self.cooldown_weeks as i64);
        let relaxed_cutoff = week_monday - Duration::weeks(RELAXED_COOLDOWN_WEEKS);
        let mut chosen: HashSet<MemberId> = HashSet::new();

        let strict = draw(&eligible, &chosen, self.team_count, rng, |m| {
            m.rested_since(strict_cutoff)
        });
        chosen.extend(strict.iter().map(|m| m.id));

        let relaxed = draw(&eligible, &chosen, self.team_count - chosen.len(), rng, |m| {
            m.rested_since(relaxed_cutoff)
        });
        chosen.extend(relaxed.iter().map(|m| m.id));

        let fallback = draw(&eligible, &chosen, self.team_count - chosen.len(), rng, |_| true);

        debug!(
            week = %week_monday,
            eligible = eligible.len(),
            strict = strict.len(),
            relaxed = relaxed.len(),
            fallback = fallback.len(),
            "classified leader candidates"
        );

        Ok(CandidatePools {
            strict,
            relaxed,
            fallback,
        })
    }
}

/// Shuffles the unchosen members passing `keep` and takes up to `limit`.
fn draw<'a, R, F>(
    eligible: &[&'a Member],
    chosen: &HashSet<MemberId>,
    limit: usize,
    rng: &mut R,
    keep: F,
) -> Vec<&'a Member>
where
    R: Rng + ?Sized,
    F: Fn(&Member) -> bool,
{
    let mut pool: Vec<&'a Member> = eligible
        .iter()
        .copied()
        .filter(|m| !chosen.contains(&m.id) && keep(m))
        .collect();
    pool.shuffle(rng);
    pool.truncate(limit);
    pool
}
