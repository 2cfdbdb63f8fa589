use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// 1-based candidate identifier, assigned in registration order.
pub type CandidateId = u64;

/// A named option with an accumulating vote count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub vote_count: u64,
}

impl Candidate {
    /// Create a new candidate with no votes.
    pub fn new(id: CandidateId, name: String) -> Self {
        Self {
            id,
            name,
            vote_count: 0,
        }
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {}: {} vote{}",
            self.id,
            self.name,
            self.vote_count,
            if self.vote_count != 1 { "s" } else { "" }
        )
    }
}
