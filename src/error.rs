//! Error type shared by generation, stores and configuration.

use crate::models::MemberId;
use crate::validation::ValidationError;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SquadError>;

/// Errors reported by squad generation and its collaborators.
#[derive(thiserror::Error, Debug)]
pub enum SquadError {
    #[error("Not enough leader candidates: {eligible} eligible, {required} required")]
    InsufficientCandidates { eligible: usize, required: usize },

    #[error("History label '{0}' already exists")]
    DuplicateLabel(String),

    #[error("Cannot separate members {first} and {second} in squad {squad}: no safe swap left")]
    ConstraintUnsatisfiable {
        squad: usize,
        first: MemberId,
        second: MemberId,
    },

    #[error("Malformed history '{label}': {reason}")]
    MalformedHistory { label: String, reason: String },

    #[error("Malformed member record {id}: {reason}")]
    MalformedMember { id: MemberId, reason: String },

    #[error("Member {0} not found")]
    MemberNotFound(MemberId),

    #[error("History '{0}' not found")]
    HistoryNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid roster: {}", summarize(.0))]
    InvalidRoster(Vec<ValidationError>),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to encode squad data: {0}")]
    Encoding(#[from] serde_json::Error),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
