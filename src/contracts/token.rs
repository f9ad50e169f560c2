//! Fungible token ledger contract.
//!
//! A fixed-supply balance ledger: the deploying owner starts with the
//! entire supply and `transfer` moves units between accounts. No mint or
//! burn operations exist, so the sum of all balances equals the supply at
//! every point in time.

use std::collections::HashMap;

use tracing::debug;

use super::{CallOutcome, Contract, ContractError, ContractMeta, ContractResult};
use crate::types::{Balance, ContractId};

/// Fixed-supply fungible token ledger
pub struct TokenContract {
    meta: ContractMeta,
    name: String,
    symbol: String,
    total_supply: Balance,
    balances: HashMap<String, Balance>,
}

impl TokenContract {
    /// Create a ledger crediting `owner` with the entire supply.
    ///
    /// The contract's source bytes are the canonical encoding of the
    /// constructor arguments, so identical arguments yield the same
    /// identifier.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        total_supply: Balance,
        owner: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let symbol = symbol.into();
        let owner = owner.into();

        let source = bincode::serialize(&("token", &name, &symbol, total_supply, &owner))
            .expect("token source encoding");
        let meta = ContractMeta::new(source, owner.clone());

        let mut balances = HashMap::new();
        balances.insert(owner, total_supply);

        Self {
            meta,
            name,
            symbol,
            total_supply,
            balances,
        }
    }

    /// Token name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ticker symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Fixed total supply
    pub fn total_supply(&self) -> Balance {
        self.total_supply
    }

    /// Balance of `account`, zero if the account has never been seen.
    ///
    /// Read-only: querying never creates an entry.
    #[must_use]
    pub fn balance_of(&self, account: &str) -> Balance {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Move `amount` units from `from` to `to`.
    ///
    /// `from == to` is permitted and is a net no-op on balances. A
    /// rejected transfer mutates nothing.
    ///
    /// # Errors
    /// Returns [`ContractError::InsufficientBalance`] if `from` holds
    /// fewer than `amount` units.
    pub fn transfer(&mut self, from: &str, to: &str, amount: Balance) -> ContractResult<()> {
        let have = self.balance_of(from);
        if have < amount {
            return Err(ContractError::InsufficientBalance { need: amount, have });
        }

        *self.balances.entry(from.to_string()).or_insert(0) -= amount;
        *self.balances.entry(to.to_string()).or_insert(0) += amount;
        Ok(())
    }

    /// String-token dispatch behind [`Contract::execute`].
    ///
    /// The amount token is validated before any balance is touched: a
    /// malformed amount rejects the whole transfer instead of degrading
    /// to a zero-amount one.
    fn dispatch(&mut self, inputs: &[String]) -> ContractResult<Vec<String>> {
        let action = inputs.first().map(String::as_str).unwrap_or_default();

        match action {
            "transfer" => {
                if inputs.len() < 4 {
                    return Err(ContractError::MissingArguments {
                        action: "transfer",
                        expected: 3,
                        got: inputs.len() - 1,
                    });
                }

                let amount: Balance = inputs[3]
                    .parse()
                    .map_err(|_| ContractError::MalformedAmount(inputs[3].clone()))?;
                self.transfer(&inputs[1], &inputs[2], amount)?;
                Ok(vec!["success".to_string()])
            }
            "balance" => {
                if inputs.len() < 2 {
                    return Err(ContractError::MissingArguments {
                        action: "balance",
                        expected: 1,
                        got: inputs.len() - 1,
                    });
                }

                Ok(vec![self.balance_of(&inputs[1]).to_string()])
            }
            other => Err(ContractError::UnknownAction(other.to_string())),
        }
    }
}

impl Contract for TokenContract {
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
                debug!(contract = %self.meta.id(), error = %err, "token call rejected");
                CallOutcome::rejected()
            }
        }
    }

    fn state_snapshot(&self) -> String {
        use std::fmt::Write as _;

        let mut out = String::new();
        let _ = writeln!(out, "Name: {}", self.name);
        let _ = writeln!(out, "Symbol: {}", self.symbol);
        let _ = writeln!(out, "Total Supply: {}", self.total_supply);

        let mut accounts: Vec<_> = self.balances.iter().collect();
        accounts.sort_by(|a, b| a.0.cmp(b.0));
        for (account, balance) in accounts {
            let _ = writeln!(out, "Balance {account}: {balance}");
        }
        out
    }

    fn update_state(&mut self, _snapshot: &str) -> ContractResult<()> {
        Err(ContractError::StateUpdateUnsupported)
    }
}
