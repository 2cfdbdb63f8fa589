use std::fmt::Display;

use thiserror::Error;

use crate::model::{Address, CandidateId};

pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a registry operation can be rejected.
/// A rejected operation never has any effect on the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Unauthorized: {caller} is not the owner")]
    Unauthorized { caller: Address },
    #[error("Voting is not active")]
    VotingNotActive,
    #[error("Not registered voter: {caller} {reason}")]
    NotRegisteredVoter {
        caller: Address,
        reason: Ineligibility,
    },
    #[error("Invalid candidate: no candidate with ID {0}")]
    InvalidCandidate(CandidateId),
    #[error("Candidate name is empty")]
    CandidateNameEmpty,
    #[error("Candidate already added: {0}")]
    CandidateAlreadyAdded(String),
    #[error("No candidates")]
    NoCandidates,
}

/// Why a caller may not vote.
///
/// Both cases surface as [`Error::NotRegisteredVoter`]; the reason is kept
/// for logs and diagnostics only.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ineligibility {
    /// The admin never registered this identity.
    NotRegistered,
    /// The voter has already cast their vote.
    AlreadyVoted,
}

impl Display for Ineligibility {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                Self::NotRegistered => "was never registered",
                Self::AlreadyVoted => "has already voted",
            }
        )
    }
}
