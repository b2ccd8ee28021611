//! Squad rotation domain models.
//!
//! Provides the data types shared by the generation pipeline and the
//! stores: roster members, the working squad matrix, divide-pair
//! constraints and persisted history entries.
//!
//! # Lifecycle
//!
//! | Type | Created by | Mutated by |
//! |------|-----------|------------|
//! | Member | roster maintenance | roster maintenance, fresh generation (`last_leader_date`) |
//! | SquadMatrix | generation pipeline | constraint resolution |
//! | TeamHistory | generation or clone | never (delete only) |

mod constraint;
mod history;
mod member;
mod squad;

pub use constraint::DividePair;
pub use history::{HistorySummary, TeamHistory};
pub use member::{Member, MemberDraft, MemberId, DEFAULT_PRIORITY, NEVER_LEADS};
pub use squad::{Slot, Squad, SquadMatrix, SquadMember};
