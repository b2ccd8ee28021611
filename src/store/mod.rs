//! Roster and history collaborators.
//!
//! The generation service talks to storage only through the traits in this
//! module. Two implementations ship with the crate:
//!
//! - [`memory`]: `BTreeMap`/`Vec` backed, for tests and embedding.
//! - [`sqlite`]: a single SQLite file holding members, history and an
//!   audit log.
//!
//! Rows are mapped to typed values here, at the boundary. A row that does
//! not map cleanly is reported as `MalformedHistory` / `MalformedMember`
//! and never repaired silently.

pub mod memory;
pub mod sqlite;

use chrono::NaiveDate;

use crate::error::{Result, SquadError};
use crate::models::{HistorySummary, Member, MemberDraft, MemberId, TeamHistory, NEVER_LEADS};

/// Source of roster data for a generation run.
pub trait RosterProvider {
    /// Roster for the week of `target`.
    fn query(&self, target: NaiveDate) -> Result<Vec<Member>>;
}

/// Editable roster.
///
/// Calls naming an unknown id fail with `MemberNotFound`.
pub trait RosterStore: RosterProvider {
    /// Looks up one member.
    fn member(&self, id: MemberId) -> Result<Member>;

    /// Adds a member and returns it with its assigned id.
    fn add_member(&mut self, draft: MemberDraft) -> Result<Member>;

    /// Replaces a member's fields.
    fn update_member(&mut self, member: &Member) -> Result<()>;

    /// Removes a member.
    fn delete_member(&mut self, id: MemberId) -> Result<()>;

    /// Moves `last_leader_date` forward to `date` for every listed member.
    ///
    /// A later date already recorded is kept. Fails without changes if any
    /// id is unknown.
    fn record_leadership(&mut self, ids: &[MemberId], date: NaiveDate) -> Result<()>;
}

/// Persistence for generated weeks, keyed by date label.
pub trait HistoryStore {
    /// Entry stored under `label`.
    fn get_by_label(&self, label: &str) -> Result<Option<TeamHistory>>;

    /// Most recently stored entry for `date`.
    fn get_by_date(&self, date: NaiveDate) -> Result<Option<TeamHistory>>;

    /// Stores a new entry. Fails with `DuplicateLabel` if the label exists.
    fn insert(&mut self, history: &TeamHistory) -> Result<()>;

    /// Removes the entry under `label`. Fails with `HistoryNotFound`.
    fn delete(&mut self, label: &str) -> Result<()>;

    /// All entries, newest date first.
    fn list(&self) -> Result<Vec<HistorySummary>>;

    /// Copies the entry stored for `source_date` under a new label and date.
    ///
    /// Returns `None` when nothing is stored for `source_date`.
    fn clone_entry(
        &mut self,
        new_label: &str,
        new_date: NaiveDate,
        source_date: NaiveDate,
    ) -> Result<Option<TeamHistory>> {
        let Some(source) = self.get_by_date(source_date)? else {
            return Ok(None);
        };
        let copy = source.relabeled(new_label, new_date);
        self.insert(&copy)?;
        Ok(Some(copy))
    }
}

/// `team_history` row as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    pub date_label: String,
    /// ISO `YYYY-MM-DD`.
    pub date_text: String,
    /// JSON array of squads, each an array of names or `null`.
    pub team_data: String,
    /// Comma separated ids, e.g. `"1, 2, 3"`.
    pub leader_ids: String,
    /// ISO source date for copies, `None` for generated entries.
    pub cloned_from: Option<String>,
}

impl TryFrom<&TeamHistory> for HistoryRecord {
    type Error = SquadError;

    fn try_from(history: &TeamHistory) -> Result<Self> {
        Ok(Self {
            date_label: history.date_label.clone(),
            date_text: history.date.format("%Y-%m-%d").to_string(),
            team_data: serde_json::to_string(&history.squad_matrix)?,
            leader_ids: history
                .leader_ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            cloned_from: history
                .cloned_from
                .map(|d| d.format("%Y-%m-%d").to_string()),
        })
    }
}

impl TryFrom<HistoryRecord> for TeamHistory {
    type Error = SquadError;

    fn try_from(record: HistoryRecord) -> Result<Self> {
        let malformed = |reason: String| SquadError::MalformedHistory {
            label: record.date_label.clone(),
            reason,
        };

        let parse_date = |text: &str| {
            text.parse::<NaiveDate>()
                .map_err(|e| malformed(format!("bad date '{text}': {e}")))
        };
        let date = parse_date(&record.date_text)?;
        let cloned_from = record.cloned_from.as_deref().map(parse_date).transpose()?;

        let squad_matrix: Vec<Vec<Option<String>>> = serde_json::from_str(&record.team_data)
            .map_err(|e| malformed(format!("bad team data: {e}")))?;

        let leader_ids = record
            .leader_ids
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<MemberId>()
                    .map_err(|_| malformed(format!("bad leader id '{s}'")))
            })
            .collect::<Result<Vec<_>>>()?;

        if leader_ids.len() != squad_matrix.len() {
            return Err(malformed(format!(
                "{} squads but {} leaders",
                squad_matrix.len(),
                leader_ids.len()
            )));
        }

        Ok(TeamHistory {
            date_label: record.date_label,
            date,
            squad_matrix,
            leader_ids,
            cloned_from,
        })
    }
}

/// Stored form of `NEVER_LEADS`.
const NEVER: &str = "never";

/// `members` row as stored.
///
/// `enable_date` is `NULL` for members who may lead from the start and
/// `"never"` for members who never lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    pub id: MemberId,
    pub name: String,
    pub enable_date: Option<String>,
    pub last_leader_date: Option<String>,
    pub priority: i64,
}

impl From<&Member> for MemberRecord {
    fn from(member: &Member) -> Self {
        let enable_date = if member.enable_date == NEVER_LEADS {
            Some(NEVER.to_string())
        } else if member.enable_date == NaiveDate::MIN {
            None
        } else {
            Some(member.enable_date.format("%Y-%m-%d").to_string())
        };
        Self {
            id: member.id,
            name: member.name.clone(),
            enable_date,
            last_leader_date: member
                .last_leader_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
            priority: i64::from(member.priority),
        }
    }
}

impl TryFrom<MemberRecord> for Member {
    type Error = SquadError;

    fn try_from(record: MemberRecord) -> Result<Self> {
        let id = record.id;
        let parse = |text: &str| {
            text.parse::<NaiveDate>()
                .map_err(|e| SquadError::MalformedMember {
                    id,
                    reason: format!("bad date '{text}': {e}"),
                })
        };

        let enable_date = match record.enable_date.as_deref() {
            None => NaiveDate::MIN,
            Some(NEVER) => NEVER_LEADS,
            Some(text) => parse(text)?,
        };
        let last_leader_date = record.last_leader_date.as_deref().map(parse).transpose()?;
        let priority = u32::try_from(record.priority).map_err(|_| SquadError::MalformedMember {
            id,
            reason: format!("priority {} out of range", record.priority),
        })?;

        Ok(Member {
            id,
            name: record.name,
            enable_date,
            last_leader_date,
            priority,
        })
    }
}
