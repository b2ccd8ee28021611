//! Roster member model.
//!
//! A member is one person in the rotation. Every member is placed in a
//! squad each week; only members whose enable date has passed may lead.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Member identifier (store-assigned).
pub type MemberId = i64;

/// Priority assigned when none is recorded.
pub const DEFAULT_PRIORITY: u32 = 100;

/// Enable date that excludes a member from leadership permanently.
pub const NEVER_LEADS: NaiveDate = NaiveDate::MAX;

/// A person in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique member identifier.
    pub id: MemberId,
    /// Display name. Not guaranteed unique.
    pub name: String,
    /// The member may lead in weeks whose Monday is strictly after this date.
    pub enable_date: NaiveDate,
    /// Monday of the most recent week this member led.
    pub last_leader_date: Option<NaiveDate>,
    /// Display group (lower = shown earlier).
    pub priority: u32,
}

/// Member fields before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDraft {
    pub name: String,
    pub enable_date: NaiveDate,
    pub last_leader_date: Option<NaiveDate>,
    pub priority: u32,
}

impl Member {
    /// Creates a member who may lead immediately, with default priority.
    pub fn new(id: MemberId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            enable_date: NaiveDate::MIN,
            last_leader_date: None,
            priority: DEFAULT_PRIORITY,
        }
    }

    /// Sets the enable date.
    pub fn with_enable_date(mut self, date: NaiveDate) -> Self {
        self.enable_date = date;
        self
    }

    /// Marks the member as never eligible to lead.
    pub fn never_leads(self) -> Self {
        self.with_enable_date(NEVER_LEADS)
    }

    /// Sets the last week this member led.
    pub fn with_last_leader_date(mut self, date: NaiveDate) -> Self {
        self.last_leader_date = Some(date);
        self
    }

    /// Sets the display priority.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Whether this member may lead in the week starting `week_monday`.
    #[inline]
    pub fn can_lead_on(&self, week_monday: NaiveDate) -> bool {
        self.enable_date < week_monday
    }

    /// Whether the member never led, or last led on or before `cutoff`.
    #[inline]
    pub fn rested_since(&self, cutoff: NaiveDate) -> bool {
        match self.last_leader_date {
            None => true,
            Some(last) => last <= cutoff,
        }
    }
}

impl MemberDraft {
    /// Creates a draft with no leadership history and default priority.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enable_date: NaiveDate::MIN,
            last_leader_date: None,
            priority: DEFAULT_PRIORITY,
        }
    }

    /// Sets the enable date.
    pub fn with_enable_date(mut self, date: NaiveDate) -> Self {
        self.enable_date = date;
        self
    }

    /// Sets the display priority.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the last week this member led.
    pub fn with_last_leader_date(mut self, date: NaiveDate) -> Self {
        self.last_leader_date = Some(date);
        self
    }

    /// Attaches a store-assigned id.
    pub fn into_member(self, id: MemberId) -> Member {
        Member {
            id,
            name: self.name,
            enable_date: self.enable_date,
            last_leader_date: self.last_leader_date,
            priority: self.priority,
        }
    }
}
