//! Core type aliases shared across the execution core.
//!
//! Account and voter identities are free-form strings supplied by the
//! host; the core never interprets them beyond equality.

use crate::crypto::Hash;

/// Content-derived contract identifier.
///
/// The BLAKE3 digest of a contract's source bytes, computed once at
/// construction and immutable for the contract's lifetime.
pub type ContractId = Hash;

/// Unsigned token balance (u128 leaves headroom for any realistic supply)
pub type Balance = u128;

/// Proposal identifier: the decimal string of the proposal's insertion index
pub type ProposalId = String;
