//! Generated squad history.
//!
//! A [`TeamHistory`] is the persisted result of one generation: display
//! names per squad with the leader already placed on its display row, plus
//! the leader ids in squad order. Entries are keyed by their date label.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{MemberId, SquadMatrix};

/// One week's stored squads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamHistory {
    /// Human week identifier. Unique across the store.
    pub date_label: String,
    /// Monday anchoring the week.
    pub date: NaiveDate,
    /// Per-squad display names; `None` is an empty slot.
    pub squad_matrix: Vec<Vec<Option<String>>>,
    /// Leader ids, one per squad, in squad order.
    pub leader_ids: Vec<MemberId>,
    /// Source week when this entry is a copy. Copies never count as
    /// leadership.
    #[serde(default)]
    pub cloned_from: Option<NaiveDate>,
}

/// Listing row for stored histories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub date_label: String,
    pub date: NaiveDate,
    pub leader_ids: Vec<MemberId>,
    pub cloned_from: Option<NaiveDate>,
}

impl HistorySummary {
    /// Whether `id` led in this entry. Copies do not count.
    pub fn led_by(&self, id: MemberId) -> bool {
        self.cloned_from.is_none() && self.leader_ids.contains(&id)
    }
}

impl TeamHistory {
    /// Creates a history entry.
    pub fn new(
        date_label: impl Into<String>,
        date: NaiveDate,
        squad_matrix: Vec<Vec<Option<String>>>,
        leader_ids: Vec<MemberId>,
    ) -> Self {
        Self {
            date_label: date_label.into(),
            date,
            squad_matrix,
            leader_ids,
            cloned_from: None,
        }
    }

    /// Builds an entry from a resolved matrix.
    pub fn from_matrix(
        date_label: impl Into<String>,
        date: NaiveDate,
        matrix: &SquadMatrix,
        leader_display_row: usize,
    ) -> Self {
        Self::new(
            date_label,
            date,
            matrix.to_display(leader_display_row),
            matrix.leader_ids(),
        )
    }

    /// Copies squads and leaders under a new label and date, marked as
    /// cloned from this entry's date.
    pub fn relabeled(&self, date_label: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            date_label: date_label.into(),
            date,
            squad_matrix: self.squad_matrix.clone(),
            leader_ids: self.leader_ids.clone(),
            cloned_from: Some(self.date),
        }
    }

    /// Number of squads.
    pub fn squad_count(&self) -> usize {
        self.squad_matrix.len()
    }

    /// Listing row for this entry.
    pub fn summary(&self) -> HistorySummary {
        HistorySummary {
            date_label: self.date_label.clone(),
            date: self.date,
            leader_ids: self.leader_ids.clone(),
            cloned_from: self.cloned_from,
        }
    }
}
