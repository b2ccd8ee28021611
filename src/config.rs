//! Squad generation settings (`squad.toml`).
//!
//! Loaded once per run and passed by reference into every component. A
//! missing file yields the defaults:
//!
//! ```toml
//! team_count = 4
//! leader_display_row = 3
//! leader_cooldown_weeks = 3
//!
//! [[divide_pairs]]
//! first = 3
//! second = 9
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SquadError};
use crate::models::DividePair;

const DEFAULT_TEAM_COUNT: usize = 4;
const DEFAULT_LEADER_DISPLAY_ROW: usize = 3;
const DEFAULT_LEADER_COOLDOWN_WEEKS: u32 = 3;

/// Immutable generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadConfig {
    /// Number of squads (and leaders) per week.
    #[serde(default = "default_team_count")]
    pub team_count: usize,
    /// Row (1-based) where the leader is shown within a squad.
    #[serde(default = "default_leader_display_row")]
    pub leader_display_row: usize,
    /// Weeks a leader rests before re-entering the strict candidate pool.
    #[serde(default = "default_leader_cooldown_weeks")]
    pub leader_cooldown_weeks: u32,
    /// Members that must never share a squad.
    #[serde(default)]
    pub divide_pairs: Vec<DividePair>,
    /// Fixed RNG seed for reproducible runs. `None` = seeded from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_team_count() -> usize {
    DEFAULT_TEAM_COUNT
}

fn default_leader_display_row() -> usize {
    DEFAULT_LEADER_DISPLAY_ROW
}

fn default_leader_cooldown_weeks() -> u32 {
    DEFAULT_LEADER_COOLDOWN_WEEKS
}

impl Default for SquadConfig {
    fn default() -> Self {
        Self {
            team_count: DEFAULT_TEAM_COUNT,
            leader_display_row: DEFAULT_LEADER_DISPLAY_ROW,
            leader_cooldown_weeks: DEFAULT_LEADER_COOLDOWN_WEEKS,
            divide_pairs: Vec::new(),
            seed: None,
        }
    }
}

impl SquadConfig {
    /// Loads settings from a TOML file.
    ///
    /// Returns the defaults if the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file missing, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses and validates settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the squad count.
    pub fn with_team_count(mut self, team_count: usize) -> Self {
        self.team_count = team_count;
        self
    }

    /// Sets the leader display row (1-based).
    pub fn with_leader_display_row(mut self, row: usize) -> Self {
        self.leader_display_row = row;
        self
    }

    /// Sets the strict cooldown length.
    pub fn with_cooldown_weeks(mut self, weeks: u32) -> Self {
        self.leader_cooldown_weeks = weeks;
        self
    }

    /// Adds a divide pair.
    pub fn with_divide_pair(mut self, first: i64, second: i64) -> Self {
        self.divide_pairs.push(DividePair::new(first, second));
        self
    }

    /// Fixes the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.team_count == 0 {
            return Err(SquadError::InvalidConfig(
                "team_count must be at least 1".into(),
            ));
        }
        if self.leader_display_row == 0 {
            return Err(SquadError::InvalidConfig(
                "leader_display_row is 1-based and must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
