//! SQLite-backed roster and history.
//!
//! One database file holds three tables:
//!
//! ```sql
//! members(id, name, enable_date, last_leader_date, priority)
//! team_history(id, date_label UNIQUE, date_text, team_data, leader_ids, cloned_from)
//! log(id, text, created_at)
//! ```
//!
//! [`SqliteStore`] implements both [`RosterStore`] and [`HistoryStore`].
//! Clones share one connection, so a single store can be handed to the
//! generation service as both roster and history.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, info};

use super::{HistoryRecord, HistoryStore, MemberRecord, RosterProvider, RosterStore};
use crate::error::{Result, SquadError};
use crate::models::{HistorySummary, Member, MemberDraft, MemberId, TeamHistory};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS members (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    enable_date TEXT,
    last_leader_date TEXT,
    priority INTEGER NOT NULL DEFAULT 100
);
CREATE TABLE IF NOT EXISTS team_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date_label TEXT NOT NULL UNIQUE,
    date_text TEXT NOT NULL,
    team_data TEXT NOT NULL,
    leader_ids TEXT NOT NULL,
    cloned_from TEXT
);
CREATE INDEX IF NOT EXISTS idx_team_history_date ON team_history(date_text);
CREATE TABLE IF NOT EXISTS log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;

/// Roster and history in one SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    conn: Rc<Connection>,
}

fn member_record(row: &Row<'_>) -> rusqlite::Result<MemberRecord> {
    Ok(MemberRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        enable_date: row.get(2)?,
        last_leader_date: row.get(3)?,
        priority: row.get(4)?,
    })
}

fn history_record(row: &Row<'_>) -> rusqlite::Result<HistoryRecord> {
    Ok(HistoryRecord {
        date_label: row.get(0)?,
        date_text: row.get(1)?,
        team_data: row.get(2)?,
        leader_ids: row.get(3)?,
        cloned_from: row.get(4)?,
    })
}

const HISTORY_COLUMNS: &str = "date_label, date_text, team_data, leader_ids, cloned_from";

fn write_log(conn: &Connection, text: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (text, created_at) VALUES (?1, ?2)",
        params![text, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl SqliteStore {
    /// Opens (or creates) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "opened squad database");
        Self::with_connection(conn)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Rc::new(conn),
        })
    }

    /// Appends an audit line.
    pub fn log(&self, text: &str) -> Result<()> {
        write_log(&self.conn, text)
    }

    /// Most recent audit lines, newest first.
    pub fn recent_log(&self, limit: usize) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT created_at, text FROM log ORDER BY id DESC LIMIT ?1")?;
        let rows = stmt
            .query_map(params![limit as i64], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn history_where(&self, clause: &str, key: &str) -> Result<Option<TeamHistory>> {
        let sql = format!(
            "SELECT {HISTORY_COLUMNS} FROM team_history \
             WHERE {clause} ORDER BY id DESC LIMIT 1"
        );
        let record = self
            .conn
            .query_row(&sql, params![key], history_record)
            .optional()?;
        record.map(TeamHistory::try_from).transpose()
    }
}

impl RosterProvider for SqliteStore {
    fn query(&self, _target: NaiveDate) -> Result<Vec<Member>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, enable_date, last_leader_date, priority FROM members ORDER BY id",
        )?;
        let records = stmt
            .query_map([], member_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        records.into_iter().map(Member::try_from).collect()
    }
}

impl RosterStore for SqliteStore {
    fn member(&self, id: MemberId) -> Result<Member> {
        let record = self
            .conn
            .query_row(
                "SELECT id, name, enable_date, last_leader_date, priority FROM members WHERE id = ?1",
                params![id],
                member_record,
            )
            .optional()?
            .ok_or(SquadError::MemberNotFound(id))?;
        Member::try_from(record)
    }

    fn add_member(&mut self, draft: MemberDraft) -> Result<Member> {
        // Id is assigned by SQLite; 0 is a placeholder for the row mapping.
        let record = MemberRecord::from(&draft.into_member(0));
        self.conn.execute(
            "INSERT INTO members (name, enable_date, last_leader_date, priority) VALUES (?1, ?2, ?3, ?4)",
            params![
                record.name,
                record.enable_date,
                record.last_leader_date,
                record.priority
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.log(&format!("member {id} added: {}", record.name))?;
        Member::try_from(MemberRecord { id, ..record })
    }

    fn update_member(&mut self, member: &Member) -> Result<()> {
        let record = MemberRecord::from(member);
        let changed = self.conn.execute(
            "UPDATE members SET name = ?1, enable_date = ?2, last_leader_date = ?3, priority = ?4 WHERE id = ?5",
            params![
                record.name,
                record.enable_date,
                record.last_leader_date,
                record.priority,
                record.id
            ],
        )?;
        if changed == 0 {
            return Err(SquadError::MemberNotFound(member.id));
        }
        self.log(&format!("member {} updated", member.id))
    }

    fn delete_member(&mut self, id: MemberId) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM members WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(SquadError::MemberNotFound(id));
        }
        self.log(&format!("member {id} deleted"))
    }

    fn record_leadership(&mut self, ids: &[MemberId], date: NaiveDate) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for &id in ids {
            // ISO dates order as text; a later recorded date is kept.
            let changed = tx.execute(
                "UPDATE members SET last_leader_date = CASE \
                     WHEN last_leader_date IS NULL OR last_leader_date < ?1 THEN ?1 \
                     ELSE last_leader_date END \
                 WHERE id = ?2",
                params![iso(date), id],
            )?;
            if changed == 0 {
                // Dropping the transaction rolls back earlier updates.
                return Err(SquadError::MemberNotFound(id));
            }
        }
        write_log(&tx, &format!("leaders {ids:?} recorded for {date}"))?;
        tx.commit()?;
        info!(?ids, %date, "recorded leadership");
        Ok(())
    }
}

impl HistoryStore for SqliteStore {
    fn get_by_label(&self, label: &str) -> Result<Option<TeamHistory>> {
        self.history_where("date_label = ?1", label)
    }

    fn get_by_date(&self, date: NaiveDate) -> Result<Option<TeamHistory>> {
        self.history_where("date_text = ?1", &iso(date))
    }

    fn insert(&mut self, history: &TeamHistory) -> Result<()> {
        if self.get_by_label(&history.date_label)?.is_some() {
            return Err(SquadError::DuplicateLabel(history.date_label.clone()));
        }
        let record = HistoryRecord::try_from(history)?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO team_history (date_label, date_text, team_data, leader_ids, cloned_from) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.date_label,
                record.date_text,
                record.team_data,
                record.leader_ids,
                record.cloned_from
            ],
        )?;
        write_log(&tx, &format!("history '{}' stored", record.date_label))?;
        tx.commit()?;
        Ok(())
    }

    fn delete(&mut self, label: &str) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute("DELETE FROM team_history WHERE date_label = ?1", params![label])?;
        if changed == 0 {
            return Err(SquadError::HistoryNotFound(label.to_string()));
        }
        write_log(&tx, &format!("history '{label}' deleted"))?;
        tx.commit()?;
        info!(label, "deleted history");
        Ok(())
    }

    fn list(&self) -> Result<Vec<HistorySummary>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {HISTORY_COLUMNS} FROM team_history ORDER BY date_text DESC, id DESC"
        ))?;
        let records = stmt
            .query_map([], history_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        records
            .into_iter()
            .map(|r| TeamHistory::try_from(r).map(|h| h.summary()))
            .collect()
    }
}
