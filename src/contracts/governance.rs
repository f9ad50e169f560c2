//! Proposal and voting governance contract.
//!
//! Tracks free-text proposals, per-voter ballots, and a strict-majority
//! execution gate. Proposal identifiers are the decimal string of the
//! insertion index; proposals are never deleted, so identifiers are never
//! reused.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CallOutcome, Contract, ContractError, ContractMeta, ContractResult};
use crate::types::{ContractId, ProposalId};

/// A governance proposal and its recorded ballots
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    /// Decimal string of the insertion index
    pub id: ProposalId,
    /// Free-text description
    pub description: String,
    /// Tally of approving ballots
    pub votes_for: u64,
    /// Tally of rejecting ballots
    pub votes_against: u64,
    /// One-way execution flag: set by a successful execution, never cleared
    pub executed: bool,
    /// Ballots by voter, kept to reject duplicates
    ballots: HashMap<String, bool>,
}

impl Proposal {
    fn new(id: ProposalId, description: String) -> Self {
        Self {
            id,
            description,
            votes_for: 0,
            votes_against: 0,
            executed: false,
            ballots: HashMap::new(),
        }
    }

    /// Whether `voter` has already cast a ballot
    #[must_use]
    pub fn has_voted(&self, voter: &str) -> bool {
        self.ballots.contains_key(voter)
    }

    /// The ballot `voter` cast, if any
    #[must_use]
    pub fn ballot(&self, voter: &str) -> Option<bool> {
        self.ballots.get(voter).copied()
    }
}

/// Proposal/vote governance contract
pub struct GovernanceContract {
    meta: ContractMeta,
    proposals: HashMap<ProposalId, Proposal>,
}

impl GovernanceContract {
    /// Create a governance contract with empty proposal state
    #[must_use]
    pub fn new(owner: impl Into<String>) -> Self {
        let owner = owner.into();
        let source =
            bincode::serialize(&("governance", &owner)).expect("governance source encoding");

        Self {
            meta: ContractMeta::new(source, owner),
            proposals: HashMap::new(),
        }
    }

    /// Record a new proposal and return its assigned identifier.
    ///
    /// Always succeeds. Identifiers count up from `"0"`; because
    /// proposals are never removed, the current map size is the next
    /// index.
    pub fn propose(&mut self, description: impl Into<String>) -> ProposalId {
        let id = self.proposals.len().to_string();
        self.proposals
            .insert(id.clone(), Proposal::new(id.clone(), description.into()));
        id
    }

    /// Cast `voter`'s ballot on `proposal_id`.
    ///
    /// A ballot on an already-executed proposal is still recorded; it
    /// cannot revert the executed outcome.
    ///
    /// # Errors
    /// Returns an error if the proposal is unknown or the voter already
    /// cast a ballot on it; the first ballot stands in that case.
    pub fn vote(&mut self, voter: &str, proposal_id: &str, approve: bool) -> ContractResult<()> {
        let proposal = self
            .proposals
            .get_mut(proposal_id)
            .ok_or_else(|| ContractError::UnknownProposal(proposal_id.to_string()))?;

        if proposal.has_voted(voter) {
            return Err(ContractError::AlreadyVoted {
                proposal: proposal_id.to_string(),
                voter: voter.to_string(),
            });
        }

        proposal.ballots.insert(voter.to_string(), approve);
        if approve {
            proposal.votes_for += 1;
        } else {
            proposal.votes_against += 1;
        }
        Ok(())
    }

    /// Execute `proposal_id` under the strict-majority rule.
    ///
    /// Succeeds only while `votes_for > votes_against` (ties fail). A
    /// failed majority check leaves `executed` false, so the call may be
    /// retried once further ballots shift the tally.
    ///
    /// # Errors
    /// Returns an error if the proposal is unknown, already executed, or
    /// lacks a strict majority.
    pub fn execute_proposal(&mut self, proposal_id: &str) -> ContractResult<()> {
        let proposal = self
            .proposals
            .get_mut(proposal_id)
            .ok_or_else(|| ContractError::UnknownProposal(proposal_id.to_string()))?;

        if proposal.executed {
            return Err(ContractError::AlreadyExecuted(proposal_id.to_string()));
        }
        if proposal.votes_for <= proposal.votes_against {
            return Err(ContractError::MajorityNotReached(proposal_id.to_string()));
        }

        proposal.executed = true;
        Ok(())
    }

    /// Look up a proposal
    #[must_use]
    pub fn proposal(&self, proposal_id: &str) -> Option<&Proposal> {
        self.proposals.get(proposal_id)
    }

    /// Number of proposals ever created
    #[must_use]
    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    fn dispatch(&mut self, inputs: &[String]) -> ContractResult<Vec<String>> {
        let action = inputs.first().map(String::as_str).unwrap_or_default();

        match action {
            "propose" => {
                if inputs.len() < 2 {
                    return Err(ContractError::MissingArguments {
                        action: "propose",
                        expected: 1,
                        got: inputs.len() - 1,
                    });
                }

                let id = self.propose(inputs[1].clone());
                Ok(vec![id])
            }
            "vote" => {
                if inputs.len() < 4 {
                    return Err(ContractError::MissingArguments {
                        action: "vote",
                        expected: 3,
                        got: inputs.len() - 1,
                    });
                }

                // Only the literal "true" counts as approval.
                let approve = inputs[3] == "true";
                self.vote(&inputs[1], &inputs[2], approve)?;
                Ok(Vec::new())
            }
            "execute" => {
                if inputs.len() < 2 {
                    return Err(ContractError::MissingArguments {
                        action: "execute",
                        expected: 1,
                        got: inputs.len() - 1,
                    });
                }

                self.execute_proposal(&inputs[1])?;
                Ok(Vec::new())
            }
            other => Err(ContractError::UnknownAction(other.to_string())),
        }
    }
}

impl Contract for GovernanceContract {
    fn id(&self) -> ContractId {
        self.meta.id()
    }

    fn owner(&self) -> &str {
        self.meta.owner()
    }

    fn source(&self) -> &[u8] {
        self.meta.source()
    }

    fn execute(&mut self, inputs: &[String]) -> CallOutcome {
        match self.dispatch(inputs) {
            Ok(outputs) => CallOutcome::success(outputs),
            Err(err) => {
                debug!(contract = %self.meta.id(), error = %err, "governance call rejected");
                CallOutcome::rejected()
            }
        }
    }

    fn state_snapshot(&self) -> String {
        use std::fmt::Write as _;

        let mut proposals: Vec<_> = self.proposals.values().collect();
        proposals.sort_by_key(|p| p.id.parse::<usize>().unwrap_or(usize::MAX));

        let mut out = String::new();
        for proposal in proposals {
            let _ = writeln!(
                out,
                "Proposal {}: {} (For: {}, Against: {}, Executed: {})",
                proposal.id,
                proposal.description,
                proposal.votes_for,
                proposal.votes_against,
                if proposal.executed { "Yes" } else { "No" },
            );
        }
        out
    }

    fn update_state(&mut self, _snapshot: &str) -> ContractResult<()> {
        Err(ContractError::StateUpdateUnsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_proposal_ids_are_sequential() {
        let mut gov = GovernanceContract::new("alice");
        assert_eq!(gov.propose("Raise fee"), "0");
        assert_eq!(gov.propose("Lower fee"), "1");
        assert_eq!(gov.propose("Freeze fee"), "2");
        assert_eq!(gov.proposal_count(), 3);
    }

    #[test]
    fn test_propose_dispatch_emits_id() {
        let mut gov = GovernanceContract::new("alice");

        let outcome = gov.execute(&args(&["propose", "Raise fee"]));
        assert!(outcome.success);
        assert_eq!(outcome.outputs, vec!["0".to_string()]);

        let proposal = gov.proposal("0").unwrap();
        assert_eq!(proposal.description, "Raise fee");
        assert_eq!(proposal.votes_for, 0);
        assert_eq!(proposal.votes_against, 0);
        assert!(!proposal.executed);
    }

    #[test]
    fn test_vote_tallies() {
        let mut gov = GovernanceContract::new("alice");
        gov.propose("Raise fee");

        gov.vote("bob", "0", true).unwrap();
        gov.vote("carol", "0", false).unwrap();
        gov.vote("dave", "0", true).unwrap();

        let proposal = gov.proposal("0").unwrap();
        assert_eq!(proposal.votes_for, 2);
        assert_eq!(proposal.votes_against, 1);
    }

    #[test]
    fn test_duplicate_vote_keeps_first_ballot() {
        let mut gov = GovernanceContract::new("alice");
        gov.propose("Raise fee");
        gov.vote("bob", "0", true).unwrap();

        let result = gov.vote("bob", "0", false);
        assert!(matches!(result, Err(ContractError::AlreadyVoted { .. })));

        let proposal = gov.proposal("0").unwrap();
        assert_eq!(proposal.votes_for, 1);
        assert_eq!(proposal.votes_against, 0);
        assert_eq!(proposal.ballot("bob"), Some(true));
    }

    #[test]
    fn test_vote_on_unknown_proposal_creates_nothing() {
        let mut gov = GovernanceContract::new("alice");
        gov.propose("Raise fee");
        let before = gov.state_snapshot();

        let outcome = gov.execute(&args(&["vote", "carol", "99", "true"]));
        assert!(!outcome.success);
        assert_eq!(gov.state_snapshot(), before);
        assert!(gov.proposal("99").is_none());
    }

    #[test]
    fn test_majority_gate_is_strict() {
        let mut gov = GovernanceContract::new("alice");
        gov.propose("Raise fee");

        // No votes: 0 > 0 is false.
        assert!(matches!(
            gov.execute_proposal("0"),
            Err(ContractError::MajorityNotReached(_))
        ));

        // Tie: 1 > 1 is false.
        gov.vote("bob", "0", true).unwrap();
        gov.vote("carol", "0", false).unwrap();
        assert!(matches!(
            gov.execute_proposal("0"),
            Err(ContractError::MajorityNotReached(_))
        ));
        assert!(!gov.proposal("0").unwrap().executed);

        // A later vote shifts the tally and the retry succeeds.
        gov.vote("dave", "0", true).unwrap();
        gov.execute_proposal("0").unwrap();
        assert!(gov.proposal("0").unwrap().executed);
    }

    #[test]
    fn test_execution_is_one_way() {
        let mut gov = GovernanceContract::new("alice");
        gov.propose("Raise fee");
        gov.vote("bob", "0", true).unwrap();
        gov.execute_proposal("0").unwrap();

        let result = gov.execute_proposal("0");
        assert!(matches!(result, Err(ContractError::AlreadyExecuted(_))));
        assert!(gov.proposal("0").unwrap().executed);
    }

    #[test]
    fn test_vote_after_execution_is_recorded() {
        let mut gov = GovernanceContract::new("alice");
        gov.propose("Raise fee");
        gov.vote("bob", "0", true).unwrap();
        gov.execute_proposal("0").unwrap();

        gov.vote("carol", "0", false).unwrap();

        let proposal = gov.proposal("0").unwrap();
        assert_eq!(proposal.votes_against, 1);
        assert_eq!(proposal.ballot("carol"), Some(false));
        assert!(proposal.executed);
    }

    #[test]
    fn test_vote_dispatch_coerces_approval_token() {
        let mut gov = GovernanceContract::new("alice");
        gov.propose("Raise fee");

        assert!(gov.execute(&args(&["vote", "bob", "0", "true"])).success);
        assert!(gov.execute(&args(&["vote", "carol", "0", "false"])).success);
        assert!(gov.execute(&args(&["vote", "dave", "0", "yes"])).success);

        let proposal = gov.proposal("0").unwrap();
        assert_eq!(proposal.votes_for, 1);
        assert_eq!(proposal.votes_against, 2);
    }

    #[test]
    fn test_malformed_dispatch_mutates_nothing() {
        let mut gov = GovernanceContract::new("alice");
        gov.propose("Raise fee");
        let before = gov.state_snapshot();

        for inputs in [
            vec![],
            args(&["propose"]),
            args(&["vote", "bob", "0"]),
            args(&["execute"]),
            args(&["veto", "0"]),
        ] {
            let outcome = gov.execute(&inputs);
            assert!(!outcome.success);
            assert_eq!(outcome.outputs, vec!["error".to_string()]);
            assert_eq!(gov.state_snapshot(), before);
        }
    }

    #[test]
    fn test_snapshot_lines_ordered_by_id() {
        let mut gov = GovernanceContract::new("alice");
        for i in 0..11 {
            gov.propose(format!("Proposal number {i}"));
        }
        gov.vote("bob", "10", true).unwrap();
        gov.execute_proposal("10").unwrap();

        let snapshot = gov.state_snapshot();
        let lines: Vec<_> = snapshot.lines().collect();
        assert_eq!(lines.len(), 11);
        assert!(lines[0].starts_with("Proposal 0:"));
        // "10" sorts after "9" numerically even though it is lexicographically smaller.
        assert_eq!(
            lines[10],
            "Proposal 10: Proposal number 10 (For: 1, Against: 0, Executed: Yes)"
        );
    }

    #[test]
    fn test_update_state_is_unsupported() {
        let mut gov = GovernanceContract::new("alice");
        let result = gov.update_state("Proposal 0: x (For: 0, Against: 0, Executed: No)\n");
        assert!(matches!(result, Err(ContractError::StateUpdateUnsupported)));
    }
}
