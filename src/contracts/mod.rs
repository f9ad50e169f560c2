//! Contract execution framework.
//!
//! This module provides the core infrastructure for deploying and calling
//! contracts. Contracts are stateful values that:
//! - Own their state exclusively (no shared or external state)
//! - Expose a uniform string-token call interface
//! - Are identified by a digest of their source bytes
//!
//! ## Architecture
//!
//! 1. **[`Contract`]**: the capability every contract kind implements
//! 2. **Built-in kinds**: [`TokenContract`] and [`GovernanceContract`]
//! 3. **[`ContractManager`]**: owns deployed contracts and routes calls
//!
//! ## Failure policy
//!
//! Everything that goes wrong inside a contract call — unknown action,
//! missing arguments, a business rule violation — is recovered into a
//! rejected [`CallOutcome`]; nothing escapes as a panic, and a rejected
//! call leaves the contract's observable state untouched. The one failure
//! surfaced as an `Err` at the call boundary is a lookup miss on the
//! manager, which indicates caller misuse rather than contract logic.

pub mod governance;
pub mod manager;
pub mod token;

pub use self::governance::{GovernanceContract, Proposal};
pub use self::manager::ContractManager;
pub use self::token::TokenContract;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::hash_data;
use crate::types::{Balance, ContractId};

/// Result type for contract operations
pub type ContractResult<T> = Result<T, ContractError>;

/// A deployable contract with isolated, in-memory state
pub trait Contract: Send + Sync {
    /// Content-derived identifier, fixed at construction
    fn id(&self) -> ContractId;

    /// Identity that deployed the contract
    fn owner(&self) -> &str;

    /// Source bytes the identifier was derived from
    fn source(&self) -> &[u8];

    /// Interpret `inputs[0]` as an action tag and run the matching
    /// operation.
    ///
    /// Never panics. A successful call may mutate state and append
    /// kind-specific output tokens; a failed call mutates nothing and
    /// yields a rejected outcome carrying the literal `"error"` token.
    fn execute(&mut self, inputs: &[String]) -> CallOutcome;

    /// Deterministic, human-readable dump of current state.
    ///
    /// Intended for inspection, not persistence: the format is lossy and
    /// does not round-trip through [`Contract::update_state`].
    fn state_snapshot(&self) -> String;

    /// Replace internal state from a serialized snapshot.
    ///
    /// No built-in kind defines a snapshot grammar, so the built-ins
    /// return [`ContractError::StateUpdateUnsupported`] rather than
    /// claiming success for a blob they ignored.
    fn update_state(&mut self, snapshot: &str) -> ContractResult<()>;
}

/// Attributes shared by every contract kind: the deploying owner, the
/// source bytes, and the identifier derived from those bytes.
///
/// The identifier is computed exactly once, here, at construction; it
/// never changes afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContractMeta {
    owner: String,
    source: Vec<u8>,
    id: ContractId,
}

impl ContractMeta {
    /// Derive the identifier from `source` and bind owner, source, and
    /// identifier together for the contract's lifetime.
    #[must_use]
    pub fn new(source: Vec<u8>, owner: impl Into<String>) -> Self {
        let id = hash_data(&source);
        Self {
            owner: owner.into(),
            source,
            id,
        }
    }

    /// The derived identifier
    pub fn id(&self) -> ContractId {
        self.id
    }

    /// The deploying identity
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The source bytes the identifier was derived from
    pub fn source(&self) -> &[u8] {
        &self.source
    }
}

/// Outcome of a contract call
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CallOutcome {
    /// Whether the action ran (and, where applicable, mutated state)
    pub success: bool,
    /// Human-readable output tokens
    pub outputs: Vec<String>,
}

impl CallOutcome {
    /// Successful outcome with the given output tokens
    #[must_use]
    pub fn success(outputs: Vec<String>) -> Self {
        Self {
            success: true,
            outputs,
        }
    }

    /// Rejected outcome carrying the literal `"error"` token
    #[must_use]
    pub fn rejected() -> Self {
        Self {
            success: false,
            outputs: vec!["error".to_string()],
        }
    }
}

/// Contract execution errors
#[derive(Debug, Clone, Error)]
pub enum ContractError {
    /// No contract deployed under the given identifier
    #[error("contract not found: {0}")]
    NotFound(ContractId),

    /// A contract with the same identifier is already deployed
    #[error("contract already deployed: {0}")]
    AlreadyDeployed(ContractId),

    /// Action tag not understood by the contract
    #[error("unknown action: {0:?}")]
    UnknownAction(String),

    /// Too few input tokens for the action
    #[error("{action} expects {expected} arguments, got {got}")]
    MissingArguments {
        /// Action tag being dispatched
        action: &'static str,
        /// Arguments the action requires
        expected: usize,
        /// Arguments actually supplied
        got: usize,
    },

    /// Amount token did not parse as an unsigned integer
    #[error("malformed amount: {0:?}")]
    MalformedAmount(String),

    /// Transfer exceeds the sender's balance
    #[error("insufficient balance: need {need}, have {have}")]
    InsufficientBalance {
        /// Amount the transfer requires
        need: Balance,
        /// Amount available to the sender
        have: Balance,
    },

    /// No proposal under the given identifier
    #[error("unknown proposal: {0}")]
    UnknownProposal(String),

    /// The voter already cast a ballot on this proposal
    #[error("{voter} already voted on proposal {proposal}")]
    AlreadyVoted {
        /// Proposal the duplicate ballot targeted
        proposal: String,
        /// Voter identity
        voter: String,
    },

    /// The proposal was already executed
    #[error("proposal {0} already executed")]
    AlreadyExecuted(String),

    /// Strictly more for-votes than against-votes are required
    #[error("proposal {0} lacks a majority")]
    MajorityNotReached(String),

    /// Built-in kinds do not support snapshot-based state replacement
    #[error("state updates are not supported")]
    StateUpdateUnsupported,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_id_deterministic() {
        let a = ContractMeta::new(b"same bytes".to_vec(), "alice");
        let b = ContractMeta::new(b"same bytes".to_vec(), "bob");
        assert_eq!(a.id(), b.id());

        let c = ContractMeta::new(b"other bytes".to_vec(), "alice");
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn test_meta_accessors() {
        let meta = ContractMeta::new(b"payload".to_vec(), "alice");
        assert_eq!(meta.owner(), "alice");
        assert_eq!(meta.source(), b"payload");
    }

    #[test]
    fn test_rejected_outcome_shape() {
        let outcome = CallOutcome::rejected();
        assert!(!outcome.success);
        assert_eq!(outcome.outputs, vec!["error".to_string()]);
    }
}
