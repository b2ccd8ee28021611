//! Week-level orchestration with per-label idempotency.
//!
//! [`GenerationService`] checks the history store before doing any work:
//! a label that already exists is returned as stored, with no randomness
//! and no leadership update. Only a fresh generation yields a
//! [`LeaderUpdate`], which the caller applies through
//! [`GenerationService::record`] (or lets [`GenerationService::generate_for_week`]
//! apply).
//!
//! # Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use u_squad::config::SquadConfig;
//! use u_squad::models::Member;
//! use u_squad::service::GenerationService;
//! use u_squad::store::memory::{InMemoryHistory, InMemoryRoster};
//!
//! let roster = InMemoryRoster::from_members((1..=12).map(|i| Member::new(i, format!("m{i}"))));
//! let config = SquadConfig::default().with_seed(7);
//! let mut service = GenerationService::new(config, roster, InMemoryHistory::new());
//!
//! let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let first = service.generate_for_week(monday).unwrap();
//! let again = service.generate_for_week(monday).unwrap();
//! assert!(first.is_fresh());
//! assert!(!again.is_fresh());
//! assert_eq!(first.history, again.history);
//! ```

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::SquadConfig;
use crate::error::{Result, SquadError};
use crate::generation::generate;
use crate::models::{MemberId, TeamHistory};
use crate::store::{HistoryStore, RosterProvider, RosterStore};
use crate::validation::validate_roster;
use crate::week::{monday_of, previous_week, WeekLabel};

/// Leaders to stamp with `date` after a fresh generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderUpdate {
    pub leader_ids: Vec<MemberId>,
    pub date: NaiveDate,
}

/// Result of a generate or clone request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub history: TeamHistory,
    /// `Some` only when new squads were generated.
    pub leader_update: Option<LeaderUpdate>,
}

impl GenerationOutcome {
    fn stored(history: TeamHistory) -> Self {
        Self {
            history,
            leader_update: None,
        }
    }

    /// Whether this outcome produced new squads.
    pub fn is_fresh(&self) -> bool {
        self.leader_update.is_some()
    }
}

/// Generates, fetches and clones weekly squads.
#[derive(Debug)]
pub struct GenerationService<R, H> {
    config: SquadConfig,
    roster: R,
    history: H,
}

impl<R, H> GenerationService<R, H>
where
    R: RosterProvider,
    H: HistoryStore,
{
    /// Creates a service.
    pub fn new(config: SquadConfig, roster: R, history: H) -> Self {
        Self {
            config,
            roster,
            history,
        }
    }

    pub fn config(&self) -> &SquadConfig {
        &self.config
    }

    pub fn roster(&self) -> &R {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut R {
        &mut self.roster
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Returns the squads stored under `label`, generating them first if
    /// the label is new.
    ///
    /// With `seed` configured, the RNG is seeded from it and the week's
    /// Monday, so reruns of the same week reproduce the same squads.
    pub fn generate_or_fetch(&mut self, label: &str, date: NaiveDate) -> Result<GenerationOutcome> {
        let mut rng = match self.config.seed {
            Some(seed) => {
                let day = monday_of(date).num_days_from_ce() as u64;
                StdRng::seed_from_u64(seed.wrapping_add(day))
            }
            None => StdRng::from_os_rng(),
        };
        self.generate_or_fetch_with_rng(label, date, &mut rng)
    }

    /// [`generate_or_fetch`](Self::generate_or_fetch) with a caller RNG.
    ///
    /// # Errors
    /// - `InvalidConfig`, `InvalidRoster` before any generation.
    /// - `InsufficientCandidates`, `ConstraintUnsatisfiable` from the pipeline.
    /// - Store errors. Nothing is persisted when generation fails.
    pub fn generate_or_fetch_with_rng<G: Rng + ?Sized>(
        &mut self,
        label: &str,
        date: NaiveDate,
        rng: &mut G,
    ) -> Result<GenerationOutcome> {
        if let Some(existing) = self.history.get_by_label(label)? {
            debug!(label, "label exists, returning stored squads");
            return Ok(GenerationOutcome::stored(existing));
        }

        self.config.validate()?;
        let monday = monday_of(date);
        let roster = self.roster.query(monday)?;
        validate_roster(&roster, &self.config).map_err(SquadError::InvalidRoster)?;

        let matrix = generate(&roster, monday, &self.config, rng)?;
        let history =
            TeamHistory::from_matrix(label, monday, &matrix, self.config.leader_display_row);
        self.history.insert(&history)?;
        info!(label, %monday, leaders = ?history.leader_ids, "generated squads");

        Ok(GenerationOutcome {
            leader_update: Some(LeaderUpdate {
                leader_ids: history.leader_ids.clone(),
                date: monday,
            }),
            history,
        })
    }

    /// Copies the squads stored for `source_date` under `label`.
    ///
    /// An existing `label` is returned as stored. Clones never update
    /// leadership.
    pub fn clone_from(
        &mut self,
        label: &str,
        date: NaiveDate,
        source_date: NaiveDate,
    ) -> Result<GenerationOutcome> {
        if let Some(existing) = self.history.get_by_label(label)? {
            warn!(label, "label exists, returning stored squads instead of cloning");
            return Ok(GenerationOutcome::stored(existing));
        }

        let source = monday_of(source_date);
        let copy = self
            .history
            .clone_entry(label, monday_of(date), source)?
            .ok_or_else(|| SquadError::HistoryNotFound(source.to_string()))?;
        info!(label, %source, "cloned squads");
        Ok(GenerationOutcome::stored(copy))
    }

    /// Clones the previous week's squads into the week containing `date`.
    pub fn clone_previous_week(&mut self, date: NaiveDate) -> Result<GenerationOutcome> {
        let label = WeekLabel::for_date(monday_of(date)).to_string();
        self.clone_from(&label, date, previous_week(date))
    }
}

impl<R, H> GenerationService<R, H>
where
    R: RosterStore,
    H: HistoryStore,
{
    /// Applies the outcome's leader update, if any.
    pub fn record(&mut self, outcome: &GenerationOutcome) -> Result<()> {
        if let Some(update) = &outcome.leader_update {
            self.roster
                .record_leadership(&update.leader_ids, update.date)?;
        }
        Ok(())
    }

    /// Generates (or fetches) squads under `label` and records leadership.
    ///
    /// If recording fails after a fresh generation, the new entry is removed
    /// again so the week can be regenerated.
    pub fn generate_and_record(&mut self, label: &str, date: NaiveDate) -> Result<GenerationOutcome> {
        let outcome = self.generate_or_fetch(label, date)?;
        if let Err(err) = self.record(&outcome) {
            if outcome.is_fresh() {
                if let Err(undo) = self.history.delete(label) {
                    warn!(label, error = %undo, "failed to remove entry after leadership update failed");
                }
            }
            return Err(err);
        }
        Ok(outcome)
    }

    /// Generates (or fetches) the week containing `date` under its
    /// [`WeekLabel`] and records leadership.
    pub fn generate_for_week(&mut self, date: NaiveDate) -> Result<GenerationOutcome> {
        let label = WeekLabel::for_date(monday_of(date)).to_string();
        self.generate_and_record(&label, date)
    }

    /// Deletes the entry stored under `label`.
    ///
    /// Leaders whose `last_leader_date` came from that entry fall back to
    /// the latest remaining generated week they led, or to never having led.
    /// Members removed from the roster since are skipped.
    pub fn delete_week(&mut self, label: &str) -> Result<()> {
        let entry = self
            .history
            .get_by_label(label)?
            .ok_or_else(|| SquadError::HistoryNotFound(label.to_string()))?;
        self.history.delete(label)?;
        if entry.cloned_from.is_some() {
            info!(label, "deleted cloned squads");
            return Ok(());
        }

        let remaining = self.history.list()?;
        let mut restored = Vec::new();
        for &id in &entry.leader_ids {
            let mut member = match self.roster.member(id) {
                Ok(member) => member,
                Err(SquadError::MemberNotFound(_)) => continue,
                Err(e) => return Err(e),
            };
            if member.last_leader_date != Some(entry.date) {
                continue;
            }
            member.last_leader_date = remaining
                .iter()
                .filter(|s| s.led_by(id))
                .map(|s| s.date)
                .max();
            self.roster.update_member(&member)?;
            restored.push(id);
        }
        info!(label, ?restored, "deleted squads");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Member, MemberDraft};
    use crate::store::memory::{InMemoryHistory, InMemoryRoster};
    use std::collections::HashSet;

    type Service = GenerationService<InMemoryRoster, InMemoryHistory>;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn service(members: Vec<Member>, config: SquadConfig) -> Service {
        GenerationService::new(
            config,
            InMemoryRoster::from_members(members),
            InMemoryHistory::new(),
        )
    }

    fn twelve() -> Vec<Member> {
        (1..=12).map(|i| Member::new(i, format!("m{i}"))).collect()
    }

    #[test]
    fn test_scenario_fresh_roster() {
        let mut svc = service(twelve(), SquadConfig::default().with_seed(1));
        let outcome = svc.generate_or_fetch("2024-01 week 1", monday()).unwrap();

        let h = &outcome.history;
        assert_eq!(h.leader_ids.len(), 4);
        assert_eq!(h.leader_ids.iter().collect::<HashSet<_>>().len(), 4);
        for squad in &h.squad_matrix {
            assert_eq!(squad.len(), 3);
            assert!(squad.iter().all(Option::is_some));
        }
        assert_eq!(
            outcome.leader_update,
            Some(LeaderUpdate {
                leader_ids: h.leader_ids.clone(),
                date: monday(),
            })
        );
    }

    #[test]
    fn test_sentinel_member_never_leads() {
        let mut members = twelve();
        members[0] = members[0].clone().never_leads();
        let mut svc = service(members, SquadConfig::default().with_seed(3));

        for week in 0..26 {
            let date = monday() + chrono::Duration::weeks(week);
            let outcome = svc.generate_for_week(date).unwrap();
            assert!(!outcome.history.leader_ids.contains(&1));
        }
    }

    #[test]
    fn test_existing_label_is_not_regenerated() {
        let mut svc = service(twelve(), SquadConfig::default());
        let first = svc.generate_for_week(monday()).unwrap();
        let before: Vec<Member> = svc.roster().query(monday()).unwrap();

        let again = svc.generate_for_week(monday()).unwrap();
        assert_eq!(again.history, first.history);
        assert!(again.leader_update.is_none());

        let after: Vec<Member> = svc.roster().query(monday()).unwrap();
        assert_eq!(before, after);
        assert_eq!(svc.history().len(), 1);
    }

    #[test]
    fn test_record_stamps_leaders() {
        let mut svc = service(twelve(), SquadConfig::default());
        let outcome = svc.generate_or_fetch("w1", monday()).unwrap();
        for id in &outcome.history.leader_ids {
            assert!(svc.roster().member(*id).unwrap().last_leader_date.is_none());
        }

        svc.record(&outcome).unwrap();
        for id in &outcome.history.leader_ids {
            assert_eq!(
                svc.roster().member(*id).unwrap().last_leader_date,
                Some(monday())
            );
        }
    }

    #[test]
    fn test_date_normalized_to_monday() {
        let mut svc = service(twelve(), SquadConfig::default());
        let thursday = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
        let outcome = svc.generate_for_week(thursday).unwrap();
        assert_eq!(outcome.history.date, monday());
        assert_eq!(outcome.history.date_label, "2024-01 week 1");
    }

    #[test]
    fn test_seeded_config_reproduces_week() {
        let config = SquadConfig::default().with_seed(99);
        let a = service(twelve(), config.clone())
            .generate_or_fetch("w", monday())
            .unwrap();
        let b = service(twelve(), config)
            .generate_or_fetch("w", monday())
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_clone_previous_week() {
        let mut svc = service(twelve(), SquadConfig::default());
        let first = svc.generate_for_week(monday()).unwrap();
        let stamped: Vec<Member> = svc.roster().query(monday()).unwrap();

        let next = monday() + chrono::Duration::weeks(1);
        let cloned = svc.clone_previous_week(next).unwrap();
        assert_eq!(cloned.history.date_label, "2024-01 week 2");
        assert_eq!(cloned.history.date, next);
        assert_eq!(cloned.history.squad_matrix, first.history.squad_matrix);
        assert_eq!(cloned.history.leader_ids, first.history.leader_ids);
        assert!(cloned.leader_update.is_none());

        svc.record(&cloned).unwrap();
        assert_eq!(svc.roster().query(next).unwrap(), stamped);
    }

    #[test]
    fn test_clone_missing_source() {
        let mut svc = service(twelve(), SquadConfig::default());
        let err = svc.clone_previous_week(monday()).unwrap_err();
        assert!(matches!(err, SquadError::HistoryNotFound(ref key) if key == "2023-12-25"));
    }

    #[test]
    fn test_clone_onto_existing_label_returns_stored() {
        let mut svc = service(twelve(), SquadConfig::default());
        let week1 = svc.generate_or_fetch("w1", monday()).unwrap();
        let next = monday() + chrono::Duration::weeks(1);
        svc.generate_or_fetch("w2", next).unwrap();

        let outcome = svc.clone_from("w1", monday(), next).unwrap();
        assert_eq!(outcome.history, week1.history);
    }

    #[test]
    fn test_insufficient_roster_persists_nothing() {
        let members: Vec<Member> = (1..=3).map(|i| Member::new(i, format!("m{i}"))).collect();
        let mut svc = service(members, SquadConfig::default());
        let err = svc.generate_or_fetch("w1", monday()).unwrap_err();
        assert!(matches!(
            err,
            SquadError::InsufficientCandidates {
                eligible: 3,
                required: 4
            }
        ));
        assert!(svc.history().is_empty());
    }

    #[test]
    fn test_invalid_roster_rejected() {
        let mut members = twelve();
        members[5].priority = 0;
        let mut svc = service(members, SquadConfig::default());
        let err = svc.generate_or_fetch("w1", monday()).unwrap_err();
        assert!(matches!(err, SquadError::InvalidRoster(ref errors) if errors.len() == 1));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut svc = service(twelve(), SquadConfig::default().with_team_count(0));
        assert!(matches!(
            svc.generate_or_fetch("w1", monday()),
            Err(SquadError::InvalidConfig(_))
        ));
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn four() -> Vec<Member> {
        (1..=4).map(|i| Member::new(i, format!("m{i}"))).collect()
    }

    #[test]
    fn test_earlier_week_keeps_later_leader_date() {
        let mut svc = service(four(), SquadConfig::default());
        let feb = date(2024, 2, 5);
        svc.generate_for_week(feb).unwrap();
        let jan = svc.generate_for_week(monday()).unwrap();
        assert!(jan.is_fresh());

        for id in 1..=4 {
            assert_eq!(svc.roster().member(id).unwrap().last_leader_date, Some(feb));
        }
    }

    #[test]
    fn test_delete_week_restores_leader_dates() {
        let mut svc = service(four(), SquadConfig::default());
        let first = svc.generate_for_week(monday()).unwrap();
        let label = first.history.date_label.clone();

        svc.delete_week(&label).unwrap();
        assert!(svc.history().is_empty());
        for id in 1..=4 {
            assert!(svc.roster().member(id).unwrap().last_leader_date.is_none());
        }

        let again = svc.generate_for_week(monday()).unwrap();
        assert!(again.is_fresh());
        assert_eq!(again.history.date_label, label);
    }

    #[test]
    fn test_delete_week_falls_back_to_earlier_week() {
        let mut svc = service(four(), SquadConfig::default());
        let next = monday() + chrono::Duration::weeks(1);
        svc.generate_for_week(monday()).unwrap();
        let second = svc.generate_for_week(next).unwrap();

        svc.delete_week(&second.history.date_label).unwrap();
        for id in 1..=4 {
            assert_eq!(svc.roster().member(id).unwrap().last_leader_date, Some(monday()));
        }
    }

    #[test]
    fn test_delete_cloned_week_leaves_leaders() {
        let mut svc = service(four(), SquadConfig::default());
        svc.generate_for_week(monday()).unwrap();
        let next = monday() + chrono::Duration::weeks(1);
        let cloned = svc.clone_previous_week(next).unwrap();

        svc.delete_week(&cloned.history.date_label).unwrap();
        assert_eq!(svc.history().len(), 1);
        for id in 1..=4 {
            assert_eq!(svc.roster().member(id).unwrap().last_leader_date, Some(monday()));
        }
    }

    #[test]
    fn test_delete_unknown_week() {
        let mut svc = service(four(), SquadConfig::default());
        assert!(matches!(
            svc.delete_week("nope"),
            Err(SquadError::HistoryNotFound(ref l)) if l == "nope"
        ));
    }

    /// Roster whose leadership updates always fail.
    struct StuckRoster(InMemoryRoster);

    impl RosterProvider for StuckRoster {
        fn query(&self, target: NaiveDate) -> Result<Vec<Member>> {
            self.0.query(target)
        }
    }

    impl RosterStore for StuckRoster {
        fn member(&self, id: MemberId) -> Result<Member> {
            self.0.member(id)
        }

        fn add_member(&mut self, draft: MemberDraft) -> Result<Member> {
            self.0.add_member(draft)
        }

        fn update_member(&mut self, member: &Member) -> Result<()> {
            self.0.update_member(member)
        }

        fn delete_member(&mut self, id: MemberId) -> Result<()> {
            self.0.delete_member(id)
        }

        fn record_leadership(&mut self, ids: &[MemberId], _date: NaiveDate) -> Result<()> {
            Err(SquadError::MemberNotFound(ids[0]))
        }
    }

    #[test]
    fn test_failed_record_removes_fresh_entry() {
        let mut svc = GenerationService::new(
            SquadConfig::default(),
            StuckRoster(InMemoryRoster::from_members(twelve())),
            InMemoryHistory::new(),
        );
        let err = svc.generate_for_week(monday()).unwrap_err();
        assert!(matches!(err, SquadError::MemberNotFound(_)));
        assert!(svc.history().is_empty());
    }
}
