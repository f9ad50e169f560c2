//! # Covenant
//!
//! A minimal deterministic contract execution core.
//!
//! ## Architecture
//!
//! - **Contracts** implement the [`Contract`] capability: a uniform
//!   string-token call interface over isolated, in-memory state
//! - **Built-in kinds**: [`TokenContract`] (fixed-supply balance ledger)
//!   and [`GovernanceContract`] (proposals, ballots, strict-majority
//!   execution)
//! - **[`ContractManager`]** owns deployed contracts exclusively, keyed
//!   by the content-derived [`ContractId`]
//!
//! Calls arrive already sequenced: execution is single-threaded and
//! synchronous, and every call runs to completion before returning.
//! Ordering, transport, and durable persistence belong to the host.

#![forbid(unsafe_code)]
#![deny(clippy::all, rust_2018_idioms)]
#![warn(clippy::pedantic, missing_docs)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Const fn not always beneficial for complex types
    clippy::missing_const_for_fn,
    // must_use on every fn is excessive
    clippy::must_use_candidate
)]

pub mod contracts;
pub mod crypto;
pub mod types;

pub use contracts::{
    CallOutcome, Contract, ContractError, ContractManager, ContractMeta, ContractResult,
    GovernanceContract, Proposal, TokenContract,
};
pub use crypto::{hash_data, Hash};
pub use types::{Balance, ContractId, ProposalId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
