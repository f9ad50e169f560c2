//! Contract registry and call dispatch.
//!
//! `ContractManager` owns every deployed contract exclusively and is the
//! sole index from identifier to instance. It is an explicitly
//! constructed value: hosts create one and pass it where needed, and
//! separate managers never share state. The registry only grows —
//! contracts are never undeployed.

use std::collections::HashMap;

use tracing::{debug, info};

use super::{CallOutcome, Contract, ContractError, ContractResult};
use crate::types::ContractId;

/// Registry of deployed contracts
///
/// Note: no Clone or Debug — the registry holds trait objects.
#[derive(Default)]
pub struct ContractManager {
    contracts: HashMap<ContractId, Box<dyn Contract>>,
}

impl ContractManager {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            contracts: HashMap::new(),
        }
    }

    /// Deploy `contract`, taking exclusive ownership, and return its
    /// identifier.
    ///
    /// The identifier was fixed at the contract's construction. Deploying
    /// a second contract under an identifier already in use is rejected
    /// rather than silently replacing the incumbent.
    ///
    /// # Errors
    /// Returns [`ContractError::AlreadyDeployed`] on an identifier
    /// collision.
    pub fn deploy(&mut self, contract: Box<dyn Contract>) -> ContractResult<ContractId> {
        let id = contract.id();
        if self.contracts.contains_key(&id) {
            return Err(ContractError::AlreadyDeployed(id));
        }

        self.contracts.insert(id, contract);
        info!(contract = %id, total = self.contracts.len(), "deployed contract");
        Ok(id)
    }

    /// Look up a contract
    #[must_use]
    pub fn get(&self, id: &ContractId) -> Option<&dyn Contract> {
        self.contracts.get(id).map(std::convert::AsRef::as_ref)
    }

    /// Look up a contract for mutation
    pub fn get_mut(&mut self, id: &ContractId) -> Option<&mut (dyn Contract + 'static)> {
        self.contracts.get_mut(id).map(|c| c.as_mut())
    }

    /// Forward `inputs` to the contract deployed under `id` and return
    /// its outcome verbatim.
    ///
    /// # Errors
    /// Returns [`ContractError::NotFound`] for an unknown identifier —
    /// caller misuse, distinct from a rejected outcome produced by the
    /// contract itself.
    pub fn call(&mut self, id: &ContractId, inputs: &[String]) -> ContractResult<CallOutcome> {
        let contract = self
            .contracts
            .get_mut(id)
            .ok_or(ContractError::NotFound(*id))?;

        let outcome = contract.execute(inputs);
        debug!(contract = %id, success = outcome.success, "contract call");
        Ok(outcome)
    }

    /// Render the state snapshot of the contract deployed under `id`
    ///
    /// # Errors
    /// Returns [`ContractError::NotFound`] for an unknown identifier.
    pub fn inspect(&self, id: &ContractId) -> ContractResult<String> {
        let contract = self.get(id).ok_or(ContractError::NotFound(*id))?;
        Ok(contract.state_snapshot())
    }

    /// Whether a contract is deployed under `id`
    #[must_use]
    pub fn contains(&self, id: &ContractId) -> bool {
        self.contracts.contains_key(id)
    }

    /// Number of deployed contracts
    #[must_use]
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Identifiers of every deployed contract
    #[must_use]
    pub fn ids(&self) -> Vec<ContractId> {
        self.contracts.keys().copied().collect()
    }
}
