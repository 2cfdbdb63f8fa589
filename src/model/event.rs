use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Address, CandidateId};

/// A state change that was applied to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum EventKind {
    VotingStarted,
    VotingEnded,
    #[serde(rename_all = "camelCase")]
    CandidateAdded { candidate_id: CandidateId, name: String },
    VoterAdded { voter: Address },
    #[serde(rename_all = "camelCase")]
    VoteCast { voter: Address, candidate_id: CandidateId },
}

/// A journal entry: what happened, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl Event {
    /// Stamp an event with the current time.
    pub fn now(kind: EventKind) -> Self {
        Self { at: Utc::now(), kind }
    }
}
