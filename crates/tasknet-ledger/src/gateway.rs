//! Uniform transfer capability over native and external tokens.
//!
//! The gateway is the only place value crosses the custody boundary:
//! `pull_in` brings a payer's value under custody, `push_out` releases
//! custody value to a recipient. Which backend applies is decided by the
//! token's [`TransferHandle`], fixed at registration.

use crate::error::{LedgerError, Result};
use crate::registry::{FeeToken, TransferHandle};
use tasknet_token::{Address, Amount, TokenError};
use tracing::debug;

/// Moves value between external owners and the ledger's custody address.
#[derive(Debug, Clone)]
pub struct TransferGateway {
    custody: Address,
}

impl TransferGateway {
    /// Create a gateway holding custody at `custody`.
    #[must_use]
    pub fn new(custody: Address) -> Self {
        Self { custody }
    }

    /// The ledger's custody address.
    #[must_use]
    pub fn custody(&self) -> &Address {
        &self.custody
    }

    /// Pull `amount` from `payer` into custody.
    ///
    /// For the native currency the call must carry exactly `amount` as
    /// attached value. For external tokens no value may be attached and
    /// the payer must have approved the custody address for at least
    /// `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ValueMismatch`],
    /// [`LedgerError::InsufficientApproval`] or
    /// [`LedgerError::TransferFailed`].
    pub fn pull_in(
        &self,
        token: &FeeToken,
        payer: &Address,
        amount: Amount,
        attached: Amount,
    ) -> Result<()> {
        match &token.handle {
            TransferHandle::Native(native) => {
                if attached != amount {
                    return Err(LedgerError::ValueMismatch {
                        expected: amount,
                        attached,
                    });
                }
                native
                    .lock()
                    .transfer(payer, &self.custody, amount)
                    .map_err(map_token_error)?;
            }
            TransferHandle::External(contract) => {
                if !attached.is_zero() {
                    return Err(LedgerError::ValueMismatch {
                        expected: Amount::ZERO,
                        attached,
                    });
                }
                contract
                    .lock()
                    .transfer_from(&self.custody, payer, &self.custody, amount)
                    .map_err(map_token_error)?;
            }
        }
        debug!(symbol = %token.symbol, payer = %payer, amount = %amount, "pulled into custody");
        Ok(())
    }

    /// Push `amount` from custody to `recipient`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::TransferFailed`] if the backend rejects.
    pub fn push_out(&self, token: &FeeToken, recipient: &Address, amount: Amount) -> Result<()> {
        match &token.handle {
            TransferHandle::Native(native) => native
                .lock()
                .transfer(&self.custody, recipient, amount)
                .map_err(map_token_error)?,
            TransferHandle::External(contract) => contract
                .lock()
                .transfer(&self.custody, recipient, amount)
                .map_err(map_token_error)?,
        }
        debug!(symbol = %token.symbol, recipient = %recipient, amount = %amount, "pushed out of custody");
        Ok(())
    }

    /// Pull `amount` back from `recipient` into custody.
    ///
    /// Compensating action for a settlement that failed after some
    /// recipients were already paid.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::TransferFailed`] if the backend rejects.
    pub(crate) fn reclaim(
        &self,
        token: &FeeToken,
        recipient: &Address,
        amount: Amount,
    ) -> Result<()> {
        match &token.handle {
            TransferHandle::Native(native) => native
                .lock()
                .transfer(recipient, &self.custody, amount)
                .map_err(map_token_error)?,
            TransferHandle::External(contract) => contract
                .lock()
                .transfer(recipient, &self.custody, amount)
                .map_err(map_token_error)?,
        }
        debug!(symbol = %token.symbol, recipient = %recipient, amount = %amount, "reclaimed into custody");
        Ok(())
    }

    /// Whether `recipient` can currently accept this token.
    #[must_use]
    pub fn can_push(&self, token: &FeeToken, recipient: &Address) -> bool {
        match &token.handle {
            TransferHandle::Native(native) => native.lock().can_receive(recipient),
            TransferHandle::External(contract) => contract.lock().can_receive(recipient),
        }
    }

    /// Backend-reported balance held at the custody address.
    #[must_use]
    pub fn custody_balance(&self, token: &FeeToken) -> Amount {
        match &token.handle {
            TransferHandle::Native(native) => native.lock().balance_of(&self.custody),
            TransferHandle::External(contract) => contract.lock().balance_of(&self.custody),
        }
    }
}

fn map_token_error(err: TokenError) -> LedgerError {
    match err {
        TokenError::InsufficientApproval { approved, need } => {
            LedgerError::InsufficientApproval { approved, need }
        }
        other => LedgerError::transfer_failed(other.to_string()),
    }
}
