use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Address, Candidate, CandidateId, Voter};
use crate::registry::VotingRegistry;

/// Every operation a caller can submit to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "camelCase")]
pub enum Call {
    Owner,
    IsVotingAllowed,
    StartVoting,
    EndVoting,
    AddCandidate {
        name: String,
    },
    CandidatesCount,
    #[serde(rename_all = "camelCase")]
    Candidate {
        candidate_id: CandidateId,
    },
    Candidates,
    AddVoter {
        voter: Address,
    },
    Voter {
        voter: Address,
    },
    IsRegistered {
        voter: Address,
    },
    HasVoted {
        voter: Address,
    },
    #[serde(rename_all = "camelCase")]
    Vote {
        candidate_id: CandidateId,
    },
    Winner,
    TotalVotes,
}

impl Call {
    /// Does this call change registry state when it succeeds?
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::StartVoting
                | Self::EndVoting
                | Self::AddCandidate { .. }
                | Self::AddVoter { .. }
                | Self::Vote { .. }
        )
    }
}

impl Display for Call {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => write!(f, "owner()"),
            Self::IsVotingAllowed => write!(f, "isVotingAllowed()"),
            Self::StartVoting => write!(f, "startVoting()"),
            Self::EndVoting => write!(f, "endVoting()"),
            Self::AddCandidate { name } => write!(f, "addCandidate({name:?})"),
            Self::CandidatesCount => write!(f, "candidatesCount()"),
            Self::Candidate { candidate_id } => write!(f, "candidate({candidate_id})"),
            Self::Candidates => write!(f, "candidates()"),
            Self::AddVoter { voter } => write!(f, "addVoter({voter})"),
            Self::Voter { voter } => write!(f, "voter({voter})"),
            Self::IsRegistered { voter } => write!(f, "isRegistered({voter})"),
            Self::HasVoted { voter } => write!(f, "hasVoted({voter})"),
            Self::Vote { candidate_id } => write!(f, "vote({candidate_id})"),
            Self::Winner => write!(f, "winner()"),
            Self::TotalVotes => write!(f, "totalVotes()"),
        }
    }
}

/// The value returned by a successful call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "value", rename_all = "camelCase")]
pub enum Response {
    /// The call changed state and has nothing to return.
    Done,
    Owner(Address),
    VotingAllowed(bool),
    CandidateAdded(CandidateId),
    CandidatesCount(u64),
    Candidate(Candidate),
    Candidates(Vec<Candidate>),
    /// The voter's record, or `None` if the identity was never registered.
    Voter(Option<Voter>),
    Registered(bool),
    HasVoted(bool),
    Winner(Candidate),
    TotalVotes(u64),
}

impl Display for Response {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Done => write!(f, "ok"),
            Self::Owner(owner) => write!(f, "{owner}"),
            Self::VotingAllowed(allowed) => write!(f, "{allowed}"),
            Self::CandidateAdded(id) => write!(f, "{id}"),
            Self::CandidatesCount(count) | Self::TotalVotes(count) => write!(f, "{count}"),
            Self::Candidate(candidate) | Self::Winner(candidate) => write!(f, "{candidate}"),
            Self::Candidates(candidates) => {
                let lines = candidates.iter().map(ToString::to_string);
                write!(f, "{}", lines.collect::<Vec<_>>().join("\n"))
            }
            Self::Voter(None) => write!(f, "not registered"),
            Self::Voter(Some(voter)) if voter.has_voted => write!(f, "registered, has voted"),
            Self::Voter(Some(_)) => write!(f, "registered, has not voted"),
            Self::Registered(flag) | Self::HasVoted(flag) => write!(f, "{flag}"),
        }
    }
}

/// A call together with the identity that submitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: Address,
    #[serde(flatten)]
    pub call: Call,
}

/// Route `call` to the matching registry operation on behalf of `caller`.
pub fn dispatch(registry: &mut VotingRegistry, caller: Address, call: Call) -> Result<Response> {
    Ok(match call {
        Call::Owner => Response::Owner(registry.owner()),
        Call::IsVotingAllowed => Response::VotingAllowed(registry.is_voting_allowed()),
        Call::StartVoting => {
            registry.start_voting(caller)?;
            Response::Done
        }
        Call::EndVoting => {
            registry.end_voting(caller)?;
            Response::Done
        }
        Call::AddCandidate { name } => {
            Response::CandidateAdded(registry.add_candidate(caller, name)?)
        }
        Call::CandidatesCount => Response::CandidatesCount(registry.candidates_count()),
        Call::Candidate { candidate_id } => {
            Response::Candidate(registry.candidate(candidate_id)?.clone())
        }
        Call::Candidates => Response::Candidates(registry.candidates().to_vec()),
        Call::AddVoter { voter } => {
            registry.add_voter(caller, voter)?;
            Response::Done
        }
        Call::Voter { voter } => Response::Voter(registry.voter(voter).copied()),
        Call::IsRegistered { voter } => Response::Registered(registry.is_registered(voter)),
        Call::HasVoted { voter } => Response::HasVoted(registry.has_voted(voter)),
        Call::Vote { candidate_id } => {
            registry.vote(caller, candidate_id)?;
            Response::Done
        }
        Call::Winner => Response::Winner(registry.winner()?.clone()),
        Call::TotalVotes => Response::TotalVotes(registry.total_votes()),
    })
}
