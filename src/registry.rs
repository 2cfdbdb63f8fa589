use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Ineligibility, Result};
use crate::model::{Address, Candidate, CandidateId, Event, EventKind, SessionState, Voter};

/// The whole voting registry: session state, candidates, voters, and the
/// journal of applied changes.
///
/// Every mutating operation takes the caller identity supplied by the host,
/// validates completely, and only then writes. A returned error therefore
/// always means the registry is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RegistryState")]
pub struct VotingRegistry {
    /// Set once at creation, never changed.
    owner: Address,
    session: SessionState,
    /// Candidate `id` lives at index `id - 1`.
    candidates: Vec<Candidate>,
    candidate_names: BTreeSet<String>,
    voters: BTreeMap<Address, Voter>,
    events: Vec<Event>,
}

impl VotingRegistry {
    /// Create an empty registry administered by `owner`.
    pub fn new(owner: Address) -> Self {
        info!("Registry created with owner {owner}");
        Self {
            owner,
            session: SessionState::Inactive,
            candidates: Vec::new(),
            candidate_names: BTreeSet::new(),
            voters: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn is_voting_allowed(&self) -> bool {
        self.session.is_active()
    }

    /// Open the session. Starting an already active session is a no-op.
    pub fn start_voting(&mut self, caller: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        if self.session.is_active() {
            debug!("Voting already active");
            return Ok(());
        }
        self.session = SessionState::Active;
        self.record(EventKind::VotingStarted);
        info!("Voting started");
        Ok(())
    }

    /// Close the session. Tallies and registrations are kept, and voting can
    /// be started again later.
    pub fn end_voting(&mut self, caller: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        if !self.session.is_active() {
            debug!("Voting already inactive");
            return Ok(());
        }
        self.session = SessionState::Inactive;
        self.record(EventKind::VotingEnded);
        info!("Voting ended");
        Ok(())
    }

    /// Register a new candidate, returning its ID.
    /// Names are compared exactly: no trimming or case folding.
    pub fn add_candidate(
        &mut self,
        caller: Address,
        name: impl Into<String>,
    ) -> Result<CandidateId> {
        self.ensure_owner(caller)?;
        let name = name.into();
        if name.is_empty() {
            return Err(Error::CandidateNameEmpty);
        }
        if self.candidate_names.contains(&name) {
            return Err(Error::CandidateAlreadyAdded(name));
        }

        let id = self.candidates_count() + 1;
        self.candidate_names.insert(name.clone());
        self.candidates.push(Candidate::new(id, name.clone()));
        info!("Candidate {id} added: {name}");
        self.record(EventKind::CandidateAdded {
            candidate_id: id,
            name,
        });
        Ok(id)
    }

    pub fn candidates_count(&self) -> u64 {
        self.candidates.len() as u64
    }

    /// Look up a candidate by its 1-based ID.
    pub fn candidate(&self, id: CandidateId) -> Result<&Candidate> {
        self.candidate_index(id)
            .map(|index| &self.candidates[index])
            .ok_or(Error::InvalidCandidate(id))
    }

    /// All candidates in ID order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Register `voter` as eligible. Registering an existing voter again
    /// succeeds without touching their record, so a cast vote is never reset.
    pub fn add_voter(&mut self, caller: Address, voter: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        if self.voters.contains_key(&voter) {
            debug!("Voter {voter} already registered");
            return Ok(());
        }
        self.voters.insert(voter, Voter::registered());
        info!("Voter {voter} registered");
        self.record(EventKind::VoterAdded { voter });
        Ok(())
    }

    pub fn voter(&self, voter: Address) -> Option<&Voter> {
        self.voters.get(&voter)
    }

    pub fn is_registered(&self, voter: Address) -> bool {
        self.voters.get(&voter).is_some_and(|v| v.registered)
    }

    pub fn has_voted(&self, voter: Address) -> bool {
        self.voters.get(&voter).is_some_and(|v| v.has_voted)
    }

    /// Cast the caller's single vote for `candidate_id`.
    pub fn vote(&mut self, caller: Address, candidate_id: CandidateId) -> Result<()> {
        if !self.session.is_active() {
            return Err(Error::VotingNotActive);
        }
        let voter = match self.voters.get(&caller) {
            Some(voter) if voter.can_vote() => *voter,
            Some(_) => {
                return Err(Error::NotRegisteredVoter {
                    caller,
                    reason: Ineligibility::AlreadyVoted,
                })
            }
            None => {
                return Err(Error::NotRegisteredVoter {
                    caller,
                    reason: Ineligibility::NotRegistered,
                })
            }
        };
        let index = self
            .candidate_index(candidate_id)
            .ok_or(Error::InvalidCandidate(candidate_id))?;

        // All checks passed; apply both halves together.
        self.voters.insert(
            caller,
            Voter {
                has_voted: true,
                ..voter
            },
        );
        self.candidates[index].vote_count += 1;
        info!("Vote cast by {caller} for candidate {candidate_id}");
        self.record(EventKind::VoteCast {
            voter: caller,
            candidate_id,
        });
        Ok(())
    }

    /// The candidate with the strictly highest vote count. Ties go to the
    /// lowest ID.
    pub fn winner(&self) -> Result<&Candidate> {
        // `Iterator::max_by_key` keeps the *last* maximum, so scan by hand.
        let mut candidates = self.candidates.iter();
        let mut winner = candidates.next().ok_or(Error::NoCandidates)?;
        for candidate in candidates {
            if candidate.vote_count > winner.vote_count {
                winner = candidate;
            }
        }
        Ok(winner)
    }

    /// Sum of all candidates' vote counts.
    pub fn total_votes(&self) -> u64 {
        self.candidates.iter().map(|c| c.vote_count).sum()
    }

    /// Journal of applied changes, oldest first.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Check every structural invariant of the registry.
    pub fn check_invariants(&self) -> std::result::Result<(), InvariantViolation> {
        let mut seen = BTreeSet::new();
        for (index, candidate) in self.candidates.iter().enumerate() {
            let expected = index as u64 + 1;
            if candidate.id != expected {
                return Err(InvariantViolation::CandidateId {
                    expected,
                    found: candidate.id,
                });
            }
            if candidate.name.is_empty() {
                return Err(InvariantViolation::EmptyCandidateName(candidate.id));
            }
            if !seen.insert(candidate.name.as_str()) {
                return Err(InvariantViolation::DuplicateCandidateName(
                    candidate.name.clone(),
                ));
            }
        }
        if seen.len() != self.candidate_names.len()
            || !seen.iter().all(|name| self.candidate_names.contains(*name))
        {
            return Err(InvariantViolation::NameIndex);
        }

        let mut voted = 0;
        for (address, voter) in &self.voters {
            if !voter.registered {
                return Err(InvariantViolation::UnregisteredVoter(*address));
            }
            if voter.has_voted {
                voted += 1;
            }
        }
        let votes = self.total_votes();
        if votes != voted {
            return Err(InvariantViolation::Tally { votes, voted });
        }
        self.check_journal()
    }

    /// Replay the journal and compare what it says happened with the state.
    fn check_journal(&self) -> std::result::Result<(), InvariantViolation> {
        let mut session = SessionState::Inactive;
        let mut added = Vec::new();
        let mut registered = BTreeSet::new();
        let mut voted = BTreeSet::new();
        let mut tallies = vec![0_u64; self.candidates.len()];
        for event in &self.events {
            match &event.kind {
                EventKind::VotingStarted => session = SessionState::Active,
                EventKind::VotingEnded => session = SessionState::Inactive,
                EventKind::CandidateAdded { candidate_id, name } => {
                    added.push((*candidate_id, name.as_str()));
                }
                EventKind::VoterAdded { voter } => {
                    registered.insert(*voter);
                }
                EventKind::VoteCast {
                    voter,
                    candidate_id,
                } => {
                    let index = self
                        .candidate_index(*candidate_id)
                        .ok_or(InvariantViolation::JournalTally(*candidate_id))?;
                    if !voted.insert(*voter) {
                        return Err(InvariantViolation::JournalVoters);
                    }
                    tallies[index] += 1;
                }
            }
        }

        if session != self.session {
            return Err(InvariantViolation::JournalSession);
        }
        if !added
            .iter()
            .copied()
            .eq(self.candidates.iter().map(|c| (c.id, c.name.as_str())))
        {
            return Err(InvariantViolation::JournalCandidates);
        }
        let has_voted = self
            .voters
            .iter()
            .filter(|(_, voter)| voter.has_voted)
            .map(|(address, _)| *address);
        if !registered.iter().copied().eq(self.voters.keys().copied())
            || !voted.iter().copied().eq(has_voted)
        {
            return Err(InvariantViolation::JournalVoters);
        }
        for (candidate, tally) in self.candidates.iter().zip(tallies) {
            if candidate.vote_count != tally {
                return Err(InvariantViolation::JournalTally(candidate.id));
            }
        }
        Ok(())
    }

    fn ensure_owner(&self, caller: Address) -> Result<()> {
        if caller == self.owner {
            Ok(())
        } else {
            Err(Error::Unauthorized { caller })
        }
    }

    fn candidate_index(&self, id: CandidateId) -> Option<usize> {
        usize::try_from(id)
            .ok()?
            .checked_sub(1)
            .filter(|index| *index < self.candidates.len())
    }

    fn record(&mut self, kind: EventKind) {
        self.events.push(Event::now(kind));
    }
}

/// A way in which registry state can be internally inconsistent.
/// Only reachable through deserializing a tampered snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("candidate IDs are not sequential: expected {expected}, found {found}")]
    CandidateId { expected: u64, found: u64 },
    #[error("candidate {0} has an empty name")]
    EmptyCandidateName(CandidateId),
    #[error("candidate name appears twice: {0}")]
    DuplicateCandidateName(String),
    #[error("candidate name index does not match the candidate list")]
    NameIndex,
    #[error("voter record for {0} is not registered")]
    UnregisteredVoter(Address),
    #[error("{votes} votes counted but {voted} voters have voted")]
    Tally { votes: u64, voted: u64 },
    #[error("session state does not match the journal")]
    JournalSession,
    #[error("candidate list does not match the journal")]
    JournalCandidates,
    #[error("voter registry does not match the journal")]
    JournalVoters,
    #[error("journalled votes for candidate {0} do not match its tally")]
    JournalTally(CandidateId),
}

/// Unchecked wire form of [`VotingRegistry`]. Converting it with
/// `VotingRegistry::try_from` runs [`VotingRegistry::check_invariants`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryState {
    owner: Address,
    session: SessionState,
    candidates: Vec<Candidate>,
    candidate_names: BTreeSet<String>,
    voters: BTreeMap<Address, Voter>,
    events: Vec<Event>,
}

impl TryFrom<RegistryState> for VotingRegistry {
    type Error = InvariantViolation;

    fn try_from(state: RegistryState) -> std::result::Result<Self, Self::Error> {
        let registry = Self {
            owner: state.owner,
            session: state.session,
            candidates: state.candidates,
            candidate_names: state.candidate_names,
            voters: state.voters,
            events: state.events,
        };
        registry.check_invariants()?;
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::testing::{Signers, CANDIDATE_NAMES};

    use super::{Address, Error, EventKind, Ineligibility, SessionState, VotingRegistry};

    #[registry_test]
    fn owner_is_deployer(registry: VotingRegistry, signers: Signers) {
        assert_eq!(registry.owner(), signers.owner);
        assert!(!registry.is_voting_allowed());
        assert_eq!(registry.candidates_count(), 0);
        assert!(registry.events().is_empty());
    }

    #[registry_test]
    fn start_and_end_voting(mut registry: VotingRegistry, signers: Signers) {
        assert!(!registry.is_voting_allowed());
        registry.start_voting(signers.owner).unwrap();
        assert!(registry.is_voting_allowed());
        registry.end_voting(signers.owner).unwrap();
        assert!(!registry.is_voting_allowed());

        // Voting can be reopened.
        registry.start_voting(signers.owner).unwrap();
        assert_eq!(registry.session(), SessionState::Active);
    }

    #[registry_test]
    fn redundant_transitions_are_noops(mut registry: VotingRegistry, signers: Signers) {
        registry.end_voting(signers.owner).unwrap();
        assert!(registry.events().is_empty());

        registry.start_voting(signers.owner).unwrap();
        registry.start_voting(signers.owner).unwrap();
        assert!(registry.is_voting_allowed());
        assert_eq!(registry.events().len(), 1);
        assert_eq!(registry.events()[0].kind, EventKind::VotingStarted);
    }

    #[registry_test(seeded)]
    fn only_owner_may_administer(mut registry: VotingRegistry, signers: Signers) {
        let before = registry.clone();
        let intruder = signers.acc1;
        let unauthorized = Error::Unauthorized { caller: intruder };

        assert_eq!(registry.start_voting(intruder), Err(unauthorized.clone()));
        assert_eq!(registry.end_voting(intruder), Err(unauthorized.clone()));
        assert_eq!(
            registry.add_candidate(intruder, "Usurper"),
            Err(unauthorized.clone())
        );
        assert_eq!(registry.add_voter(intruder, signers.acc5), Err(unauthorized));
        assert_eq!(registry, before);
    }

    #[registry_test]
    fn candidates_get_sequential_ids(mut registry: VotingRegistry, signers: Signers) {
        for (index, name) in CANDIDATE_NAMES.iter().enumerate() {
            let id = registry.add_candidate(signers.owner, *name).unwrap();
            assert_eq!(id, index as u64 + 1);
        }
        assert_eq!(registry.candidates_count(), CANDIDATE_NAMES.len() as u64);
        for candidate in registry.candidates() {
            assert_eq!(registry.candidate(candidate.id).unwrap(), candidate);
            assert_eq!(candidate.vote_count, 0);
        }
        assert_eq!(registry.candidate(0), Err(Error::InvalidCandidate(0)));
        assert_eq!(registry.candidate(5), Err(Error::InvalidCandidate(5)));
    }

    #[registry_test]
    fn empty_candidate_name_rejected(mut registry: VotingRegistry, signers: Signers) {
        assert_eq!(
            registry.add_candidate(signers.owner, ""),
            Err(Error::CandidateNameEmpty)
        );
        assert_eq!(registry.candidates_count(), 0);

        // Whitespace is not trimmed, so this is a legitimate (if odd) name.
        assert_eq!(registry.add_candidate(signers.owner, " "), Ok(1));
    }

    #[registry_test]
    fn duplicate_candidate_rejected(mut registry: VotingRegistry, signers: Signers) {
        registry.add_candidate(signers.owner, "Chris Riches").unwrap();
        assert_eq!(
            registry.add_candidate(signers.owner, "Chris Riches"),
            Err(Error::CandidateAlreadyAdded("Chris Riches".to_string()))
        );
        assert_eq!(registry.candidates_count(), 1);

        // Names are case-sensitive.
        assert_eq!(registry.add_candidate(signers.owner, "chris riches"), Ok(2));
    }

    #[registry_test(seeded)]
    fn voter_votes_exactly_once(mut registry: VotingRegistry, signers: Signers) {
        registry.start_voting(signers.owner).unwrap();
        registry.vote(signers.acc1, 2).unwrap();
        assert!(registry.has_voted(signers.acc1));
        assert_eq!(registry.candidate(2).unwrap().vote_count, 1);

        assert_eq!(
            registry.vote(signers.acc1, 3),
            Err(Error::NotRegisteredVoter {
                caller: signers.acc1,
                reason: Ineligibility::AlreadyVoted,
            })
        );
        assert_eq!(registry.candidate(3).unwrap().vote_count, 0);
        assert_eq!(registry.total_votes(), 1);
    }

    #[registry_test(seeded)]
    fn vote_requires_active_session(mut registry: VotingRegistry, signers: Signers) {
        assert_eq!(registry.vote(signers.acc1, 1), Err(Error::VotingNotActive));

        registry.start_voting(signers.owner).unwrap();
        registry.end_voting(signers.owner).unwrap();
        assert_eq!(registry.vote(signers.acc1, 1), Err(Error::VotingNotActive));
        assert!(!registry.has_voted(signers.acc1));
    }

    #[registry_test(seeded)]
    fn vote_for_unknown_candidate(mut registry: VotingRegistry, signers: Signers) {
        registry.start_voting(signers.owner).unwrap();
        let before = registry.clone();
        assert_eq!(registry.vote(signers.acc1, 0), Err(Error::InvalidCandidate(0)));
        assert_eq!(registry.vote(signers.acc1, 5), Err(Error::InvalidCandidate(5)));
        assert_eq!(registry, before);

        // The failed attempts did not use up the vote.
        registry.vote(signers.acc1, 4).unwrap();
    }

    #[registry_test(seeded)]
    fn re_adding_voter_keeps_vote(mut registry: VotingRegistry, signers: Signers) {
        registry.start_voting(signers.owner).unwrap();
        registry.vote(signers.acc2, 1).unwrap();
        let events = registry.events().len();

        registry.add_voter(signers.owner, signers.acc2).unwrap();
        assert!(registry.has_voted(signers.acc2));
        assert_eq!(registry.events().len(), events);
        assert!(matches!(
            registry.vote(signers.acc2, 1),
            Err(Error::NotRegisteredVoter { .. })
        ));
    }

    #[registry_test]
    fn election_scenario(mut registry: VotingRegistry, signers: Signers) {
        for name in CANDIDATE_NAMES {
            registry.add_candidate(signers.owner, name).unwrap();
        }
        for voter in [signers.acc1, signers.acc2, signers.acc3, signers.acc4] {
            registry.add_voter(signers.owner, voter).unwrap();
        }
        registry.start_voting(signers.owner).unwrap();
        registry.vote(signers.acc1, 1).unwrap();
        registry.vote(signers.acc2, 1).unwrap();
        registry.vote(signers.acc3, 2).unwrap();
        registry.vote(signers.acc4, 3).unwrap();
        registry.end_voting(signers.owner).unwrap();

        let winner = registry.winner().unwrap();
        assert_eq!(winner.id, 1);
        assert_eq!(winner.vote_count, 2);
        assert_eq!(registry.candidates_count(), 4);
        registry.check_invariants().unwrap();

        // 4 candidates, 4 voters, start, 4 votes, end.
        assert_eq!(registry.events().len(), 14);
        assert_eq!(
            registry.events()[9].kind,
            EventKind::VoteCast {
                voter: signers.acc1,
                candidate_id: 1
            }
        );
    }

    #[registry_test]
    fn unregistered_voter_rejected(mut registry: VotingRegistry, signers: Signers) {
        registry.start_voting(signers.owner).unwrap();
        assert_eq!(
            registry.vote(signers.acc6, 1),
            Err(Error::NotRegisteredVoter {
                caller: signers.acc6,
                reason: Ineligibility::NotRegistered,
            })
        );
    }

    #[registry_test(seeded)]
    fn winner_tie_goes_to_lowest_id(mut registry: VotingRegistry, signers: Signers) {
        // No votes at all: everyone is tied on zero.
        assert_eq!(registry.winner().unwrap().id, 1);

        registry.start_voting(signers.owner).unwrap();
        registry.vote(signers.acc1, 3).unwrap();
        registry.vote(signers.acc2, 2).unwrap();
        assert_eq!(registry.winner().unwrap().id, 2);

        registry.vote(signers.acc3, 3).unwrap();
        assert_eq!(registry.winner().unwrap().id, 3);
    }

    #[registry_test]
    fn winner_without_candidates(registry: VotingRegistry) {
        assert_eq!(registry.winner(), Err(Error::NoCandidates));
    }

    #[registry_test(seeded)]
    fn snapshot_round_trip(mut registry: VotingRegistry, signers: Signers) {
        registry.start_voting(signers.owner).unwrap();
        registry.vote(signers.acc4, 4).unwrap();

        let json = serde_json::to_string(&registry).unwrap();
        let restored: VotingRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, registry);
    }

    #[registry_test(seeded)]
    fn tampered_snapshot_rejected(mut registry: VotingRegistry, signers: Signers) {
        registry.start_voting(signers.owner).unwrap();
        registry.vote(signers.acc1, 1).unwrap();

        // Inflate a tally.
        let mut json = serde_json::to_value(&registry).unwrap();
        json["candidates"][1]["voteCount"] = 7.into();
        let err = serde_json::from_value::<VotingRegistry>(json).unwrap_err();
        assert!(err.to_string().contains("8 votes counted but 1 voters"));

        // Break the ID sequence.
        let mut json = serde_json::to_value(&registry).unwrap();
        json["candidates"][2]["id"] = 9.into();
        serde_json::from_value::<VotingRegistry>(json).unwrap_err();

        // Duplicate a name.
        let mut json = serde_json::to_value(&registry).unwrap();
        json["candidates"][3]["name"] = CANDIDATE_NAMES[0].into();
        serde_json::from_value::<VotingRegistry>(json).unwrap_err();
    }

    #[registry_test(seeded)]
    fn tampered_journal_rejected(mut registry: VotingRegistry, signers: Signers) {
        registry.start_voting(signers.owner).unwrap();
        registry.vote(signers.acc1, 1).unwrap();
        registry.vote(signers.acc2, 2).unwrap();
        registry.check_invariants().unwrap();

        let rejection = |json: serde_json::Value| {
            serde_json::from_value::<VotingRegistry>(json)
                .unwrap_err()
                .to_string()
        };

        // Drop the last vote from the journal.
        let mut json = serde_json::to_value(&registry).unwrap();
        json["events"].as_array_mut().unwrap().pop();
        assert!(rejection(json).contains("voter registry does not match the journal"));

        // Point a journalled vote at another candidate.
        let mut json = serde_json::to_value(&registry).unwrap();
        let last = json["events"].as_array().unwrap().len() - 1;
        json["events"][last]["candidateId"] = 3.into();
        assert!(rejection(json).contains("votes for candidate 2 do not match"));

        // Rename a journalled candidate.
        let mut json = serde_json::to_value(&registry).unwrap();
        json["events"][0]["name"] = "Someone Else".into();
        assert!(rejection(json).contains("candidate list does not match the journal"));

        // Close the session without journalling it.
        let mut json = serde_json::to_value(&registry).unwrap();
        json["session"] = 0.into();
        assert!(rejection(json).contains("session state does not match the journal"));

        // The journal is not optional.
        let mut json = serde_json::to_value(&registry).unwrap();
        json.as_object_mut().unwrap().remove("events");
        rejection(json);
    }

    /// Operations for the property test, with small indices into a fixed
    /// identity pool so that collisions are common.
    #[derive(Debug, Clone)]
    enum Op {
        Start(usize),
        End(usize),
        AddCandidate(usize, String),
        AddVoter(usize, usize),
        Vote(usize, u64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..4_usize).prop_map(Op::Start),
            (0..4_usize).prop_map(Op::End),
            (0..4_usize, "[ab]{0,2}").prop_map(|(c, n)| Op::AddCandidate(c, n)),
            (0..4_usize, 0..8_usize).prop_map(|(c, v)| Op::AddVoter(c, v)),
            (0..8_usize, 0..6_u64).prop_map(|(c, id)| Op::Vote(c, id)),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_under_any_sequence(ops in proptest::collection::vec(op(), 0..64)) {
            let signers = Signers::new();
            // Index 0 is the owner; the rest are ordinary accounts.
            let mut pool = vec![signers.owner];
            pool.extend(signers.accounts());
            pool.push(Address::derive("stranger"));

            let mut registry = VotingRegistry::new(signers.owner);
            let mut successful_candidates = 0;
            for op in ops {
                let before = registry.clone();
                let result = match op {
                    Op::Start(c) => registry.start_voting(pool[c]),
                    Op::End(c) => registry.end_voting(pool[c]),
                    Op::AddCandidate(c, name) => registry.add_candidate(pool[c], name).map(|id| {
                        successful_candidates += 1;
                        assert_eq!(id, successful_candidates);
                    }),
                    Op::AddVoter(c, v) => registry.add_voter(pool[c], pool[v]),
                    Op::Vote(c, id) => registry.vote(pool[c], id),
                };
                if result.is_err() {
                    prop_assert_eq!(&registry, &before);
                }
                for (address, voter) in &before.voters {
                    if voter.has_voted {
                        prop_assert!(registry.has_voted(*address));
                    }
                }
                prop_assert_eq!(registry.owner(), signers.owner);
                prop_assert_eq!(registry.candidates_count(), successful_candidates);
                prop_assert!(registry.check_invariants().is_ok());
            }
        }
    }
}
