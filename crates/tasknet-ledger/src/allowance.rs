//! Per-depositor allowance bookkeeping.
//!
//! Every depositor holds, per token, a free balance (spendable) and a
//! locked balance (reserved against an in-flight task). Records are
//! created on first use and never deleted, only driven back toward zero.
//! All arithmetic is checked; an operation that would underflow fails
//! and changes nothing.

use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tasknet_token::{Address, Amount};

/// Free and locked balances for one `(depositor, token)` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowance {
    /// Spendable balance.
    pub free: Amount,
    /// Balance reserved against in-flight tasks.
    pub locked: Amount,
}

/// The authoritative record of who owns what.
#[derive(Debug, Default)]
pub struct AllowanceLedger {
    // depositor -> symbol -> allowance
    entries: HashMap<Address, HashMap<String, Allowance>>,
}

impl AllowanceLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Balances for `(depositor, symbol)`, zero if absent.
    #[must_use]
    pub fn allowance(&self, depositor: &Address, symbol: &str) -> Allowance {
        self.entries
            .get(depositor)
            .and_then(|tokens| tokens.get(symbol))
            .copied()
            .unwrap_or_default()
    }

    /// Check that crediting `amount` to `free` would not overflow.
    ///
    /// Used to validate a deposit before any value is pulled in.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AmountOverflow`] if the credit would not fit.
    pub fn can_credit_free(&self, depositor: &Address, symbol: &str, amount: Amount) -> Result<()> {
        let current = self.allowance(depositor, symbol);
        current
            .free
            .checked_add(amount)
            .map(|_| ())
            .ok_or_else(|| LedgerError::overflow("free balance credit"))
    }

    /// Credit `amount` to the free balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AmountOverflow`] if the credit would not fit.
    pub fn credit_free(&mut self, depositor: &Address, symbol: &str, amount: Amount) -> Result<()> {
        let entry = self.entry_mut(depositor, symbol);
        entry.free = entry
            .free
            .checked_add(amount)
            .ok_or_else(|| LedgerError::overflow("free balance credit"))?;
        Ok(())
    }

    /// Reserve `amount` by moving it from `free` to `locked`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientFreeBalance`] if `free` is too
    /// small, [`LedgerError::AmountOverflow`] if `locked` would not fit.
    pub fn move_free_to_locked(
        &mut self,
        depositor: &Address,
        symbol: &str,
        amount: Amount,
    ) -> Result<()> {
        let entry = self.entry_mut(depositor, symbol);
        let new_free = entry
            .free
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFreeBalance {
                have: entry.free,
                need: amount,
            })?;
        let new_locked = entry
            .locked
            .checked_add(amount)
            .ok_or_else(|| LedgerError::overflow("locked balance credit"))?;
        entry.free = new_free;
        entry.locked = new_locked;
        Ok(())
    }

    /// Release `amount` by moving it from `locked` back to `free`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientLockedBalance`] if `locked` is
    /// too small, [`LedgerError::AmountOverflow`] if `free` would not fit.
    pub fn move_locked_to_free(
        &mut self,
        depositor: &Address,
        symbol: &str,
        amount: Amount,
    ) -> Result<()> {
        let entry = self.entry_mut(depositor, symbol);
        let new_locked =
            entry
                .locked
                .checked_sub(amount)
                .ok_or(LedgerError::InsufficientLockedBalance {
                    have: entry.locked,
                    need: amount,
                })?;
        let new_free = entry
            .free
            .checked_add(amount)
            .ok_or_else(|| LedgerError::overflow("free balance credit"))?;
        entry.locked = new_locked;
        entry.free = new_free;
        Ok(())
    }

    /// Remove `amount` from `locked` without crediting it anywhere.
    ///
    /// The matching value leaves custody through the transfer gateway.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientLockedBalance`] if `locked` is
    /// too small.
    pub fn consume_locked(
        &mut self,
        depositor: &Address,
        symbol: &str,
        amount: Amount,
    ) -> Result<()> {
        let entry = self.entry_mut(depositor, symbol);
        entry.locked =
            entry
                .locked
                .checked_sub(amount)
                .ok_or(LedgerError::InsufficientLockedBalance {
                    have: entry.locked,
                    need: amount,
                })?;
        Ok(())
    }

    /// Put `amount` back into `locked`, undoing a consume.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AmountOverflow`] if `locked` would not fit.
    pub(crate) fn restore_locked(
        &mut self,
        depositor: &Address,
        symbol: &str,
        amount: Amount,
    ) -> Result<()> {
        let entry = self.entry_mut(depositor, symbol);
        entry.locked = entry
            .locked
            .checked_add(amount)
            .ok_or_else(|| LedgerError::overflow("locked balance restore"))?;
        Ok(())
    }

    /// Sum of `free + locked` across all depositors for `symbol`.
    ///
    /// Compared against custody for conservation audits.
    #[must_use]
    pub fn booked_total(&self, symbol: &str) -> Amount {
        self.entries
            .values()
            .filter_map(|tokens| tokens.get(symbol))
            .fold(Amount::ZERO, |acc, a| {
                acc.saturating_add(a.free).saturating_add(a.locked)
            })
    }

    fn entry_mut(&mut self, depositor: &Address, symbol: &str) -> &mut Allowance {
        self.entries
            .entry(depositor.clone())
            .or_default()
            .entry(symbol.to_string())
            .or_default()
    }
}
