//! In-memory stores.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::{HistoryStore, RosterProvider, RosterStore};
use crate::error::{Result, SquadError};
use crate::models::{HistorySummary, Member, MemberDraft, MemberId, TeamHistory};

/// Roster held in a map ordered by id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoster {
    members: BTreeMap<MemberId, Member>,
    next_id: MemberId,
}

impl InMemoryRoster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a roster from existing members. Later duplicates replace
    /// earlier ones.
    pub fn from_members(members: impl IntoIterator<Item = Member>) -> Self {
        let members: BTreeMap<MemberId, Member> =
            members.into_iter().map(|m| (m.id, m)).collect();
        let next_id = members.keys().next_back().map_or(0, |&id| id);
        Self { members, next_id }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl RosterProvider for InMemoryRoster {
    fn query(&self, _target: NaiveDate) -> Result<Vec<Member>> {
        Ok(self.members.values().cloned().collect())
    }
}

impl RosterStore for InMemoryRoster {
    fn member(&self, id: MemberId) -> Result<Member> {
        self.members
            .get(&id)
            .cloned()
            .ok_or(SquadError::MemberNotFound(id))
    }

    fn add_member(&mut self, draft: MemberDraft) -> Result<Member> {
        self.next_id += 1;
        let member = draft.into_member(self.next_id);
        self.members.insert(member.id, member.clone());
        Ok(member)
    }

    fn update_member(&mut self, member: &Member) -> Result<()> {
        let slot = self
            .members
            .get_mut(&member.id)
            .ok_or(SquadError::MemberNotFound(member.id))?;
        *slot = member.clone();
        Ok(())
    }

    fn delete_member(&mut self, id: MemberId) -> Result<()> {
        self.members
            .remove(&id)
            .map(|_| ())
            .ok_or(SquadError::MemberNotFound(id))
    }

    fn record_leadership(&mut self, ids: &[MemberId], date: NaiveDate) -> Result<()> {
        if let Some(&missing) = ids.iter().find(|id| !self.members.contains_key(id)) {
            return Err(SquadError::MemberNotFound(missing));
        }
        for id in ids {
            if let Some(m) = self.members.get_mut(id) {
                m.last_leader_date = m.last_leader_date.max(Some(date));
            }
        }
        Ok(())
    }
}

/// History kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistory {
    entries: Vec<TeamHistory>,
}

impl InMemoryHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HistoryStore for InMemoryHistory {
    fn get_by_label(&self, label: &str) -> Result<Option<TeamHistory>> {
        Ok(self.entries.iter().find(|h| h.date_label == label).cloned())
    }

    fn get_by_date(&self, date: NaiveDate) -> Result<Option<TeamHistory>> {
        Ok(self.entries.iter().rev().find(|h| h.date == date).cloned())
    }

    fn insert(&mut self, history: &TeamHistory) -> Result<()> {
        if self.entries.iter().any(|h| h.date_label == history.date_label) {
            return Err(SquadError::DuplicateLabel(history.date_label.clone()));
        }
        self.entries.push(history.clone());
        Ok(())
    }

    fn delete(&mut self, label: &str) -> Result<()> {
        let pos = self
            .entries
            .iter()
            .position(|h| h.date_label == label)
            .ok_or_else(|| SquadError::HistoryNotFound(label.to_string()))?;
        self.entries.remove(pos);
        Ok(())
    }

    fn list(&self) -> Result<Vec<HistorySummary>> {
        let mut out: Vec<HistorySummary> = self.entries.iter().rev().map(TeamHistory::summary).collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(out)
    }
}
