//! The chain's native currency, simulated in process.
//!
//! Native value moves by direct balance transfer; there is no approval
//! step. Deposits into the ledger arrive as value attached to the call,
//! which the caller's chain runtime has already debited.

use crate::address::Address;
use crate::amount::Amount;
use crate::error::{Result, TokenError};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Shared handle to the native currency.
pub type SharedNative = Arc<Mutex<NativeCoin>>;

/// In-process balance map for the chain's native currency.
#[derive(Debug, Default)]
pub struct NativeCoin {
    balances: HashMap<Address, Amount>,
    refusing: HashSet<Address>,
}

impl NativeCoin {
    /// Create an empty native currency state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap this state into a shared handle.
    #[must_use]
    pub fn into_shared(self) -> SharedNative {
        Arc::new(Mutex::new(self))
    }

    /// Mint native units to `owner`.
    pub fn mint(&mut self, owner: &Address, amount: Amount) {
        let balance = self.balances.entry(owner.clone()).or_default();
        *balance = balance.saturating_add(amount);
        debug!(owner = %owner, amount = %amount, "native mint");
    }

    /// Make `recipient` refuse all incoming transfers.
    ///
    /// Simulates an account that cannot accept native value, for
    /// failure-path tests.
    pub fn refuse_incoming(&mut self, recipient: &Address) {
        self.refusing.insert(recipient.clone());
    }

    /// Balance of `owner`.
    #[must_use]
    pub fn balance_of(&self, owner: &Address) -> Amount {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    /// Whether `recipient` can currently accept incoming value.
    #[must_use]
    pub fn can_receive(&self, recipient: &Address) -> bool {
        !self.refusing.contains(recipient)
    }

    /// Move native value from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns error if `from` lacks balance or `to` refuses the value.
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<()> {
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
        debug!(from = %from, to = %to, amount = %amount, "native transfer");
        Ok(())
    }
}
