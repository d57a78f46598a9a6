//! External fungible-token boundary.
//!
//! The ledger holds custody of external tokens through this trait. A
//! depositor approves the ledger's custody address on the token contract,
//! the ledger pulls with [`TokenContract::transfer_from`] and pays out
//! with [`TokenContract::transfer`].

use crate::address::Address;
use crate::amount::Amount;
use crate::error::{Result, TokenError};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Shared handle to an external token contract.
pub type SharedContract = Arc<Mutex<dyn TokenContract + Send>>;

/// Fungible-token operations the ledger depends on.
///
/// Modeled on the transfer/approval interface common to token contracts:
/// a holder may move their own value, or pre-approve a spender to pull a
/// bounded amount on their behalf.
pub trait TokenContract {
    /// Token symbol, for logs and errors.
    fn symbol(&self) -> &str;

    /// Balance of `owner`.
    fn balance_of(&self, owner: &Address) -> Amount;

    /// Remaining amount `spender` may pull from `owner`.
    fn allowance(&self, owner: &Address, spender: &Address) -> Amount;

    /// Move value owned by `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns error if `from` lacks balance or `to` refuses the value.
    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<()>;

    /// Pull value from `owner` to `to`, consuming `spender`'s approval.
    ///
    /// # Errors
    ///
    /// Returns error if the approval or balance is insufficient, or `to`
    /// refuses the value.
    fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<()>;

    /// Whether `recipient` can currently accept incoming value.
    fn can_receive(&self, _recipient: &Address) -> bool {
        true
    }
}

/// In-memory token contract used for local development and tests.
#[derive(Debug)]
pub struct InMemoryToken {
    symbol: String,
    balances: HashMap<Address, Amount>,
    approvals: HashMap<(Address, Address), Amount>,
    refusing: HashSet<Address>,
}

impl InMemoryToken {
    /// Create an empty token with the given symbol.
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            balances: HashMap::new(),
            approvals: HashMap::new(),
            refusing: HashSet::new(),
        }
    }

    /// Wrap this token into a shared handle.
    #[must_use]
    pub fn into_shared(self) -> SharedContract {
        Arc::new(Mutex::new(self))
    }

    /// Mint new supply to `owner`.
    pub fn mint(&mut self, owner: &Address, amount: Amount) {
        let balance = self.balances.entry(owner.clone()).or_default();
        *balance = balance.saturating_add(amount);
        debug!(symbol = %self.symbol, owner = %owner, amount = %amount, "minted");
    }

    /// Record an approval from `owner` allowing `spender` to pull `amount`.
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount) {
        self.approvals
            .insert((owner.clone(), spender.clone()), amount);
    }

    /// Make `recipient` refuse all incoming transfers.
    ///
    /// Simulates an account that cannot accept value, for failure-path
    /// tests.
    pub fn refuse_incoming(&mut self, recipient: &Address) {
        self.refusing.insert(recipient.clone());
    }

    /// Total supply across all holders.
    #[must_use]
    pub fn total_supply(&self) -> Amount {
        self.balances
            .values()
            .fold(Amount::ZERO, |acc, b| acc.saturating_add(*b))
    }

    fn move_value(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<()> {
        if self.refusing.contains(to) {
            return Err(TokenError::transfer_rejected(to.as_str()));
        }
        let have = self.balance_of(from);
        let new_from = have
            .checked_sub(amount)
            .ok_or_else(|| TokenError::insufficient_balance(have, amount))?;
        let new_to = self.balance_of(to).saturating_add(amount);
        self.balances.insert(from.clone(), new_from);
        self.balances.insert(to.clone(), new_to);
        debug!(symbol = %self.symbol, from = %from, to = %to, amount = %amount, "transfer");
        Ok(())
    }
}

impl TokenContract for InMemoryToken {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn balance_of(&self, owner: &Address) -> Amount {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.approvals
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<()> {
        self.move_value(from, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<()> {
        let approved = self.allowance(owner, spender);
        let remaining = approved
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientApproval {
                approved,
                need: amount,
            })?;
        self.move_value(owner, to, amount)?;
        self.approvals
            .insert((owner.clone(), spender.clone()), remaining);
        Ok(())
    }

    fn can_receive(&self, recipient: &Address) -> bool {
        !self.refusing.contains(recipient)
    }
}
