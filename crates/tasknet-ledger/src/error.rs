//! Error types for ledger operations.
//!
//! Every error is synchronous and leaves the ledger in the state it was
//! in before the failing call. Nothing is retried internally.

use crate::escrow::TaskId;
use tasknet_token::Amount;
use thiserror::Error;

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur in fee ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Symbol is not registered or not enabled.
    #[error("unknown token: {symbol}")]
    UnknownToken {
        /// The unrecognized symbol.
        symbol: String,
    },

    /// Symbol is already registered.
    #[error("duplicate token symbol: {symbol}")]
    DuplicateSymbol {
        /// The conflicting symbol.
        symbol: String,
    },

    /// Computing price must be non-zero.
    #[error("invalid computing price: price per recipient must be non-zero")]
    InvalidPrice,

    /// Attached value does not match the declared amount.
    #[error("attached value mismatch: expected {expected}, attached {attached}")]
    ValueMismatch {
        /// Value the call was expected to carry.
        expected: Amount,
        /// Value the call actually carried.
        attached: Amount,
    },

    /// The payer has not approved enough value to the custody address.
    #[error("insufficient approval: approved {approved}, need {need}")]
    InsufficientApproval {
        /// Amount currently approved.
        approved: Amount,
        /// Amount required.
        need: Amount,
    },

    /// The underlying transfer was rejected.
    #[error("transfer failed: {reason}")]
    TransferFailed {
        /// Reason reported by the token backend.
        reason: String,
    },

    /// Free balance is too small for the requested lock or payout.
    #[error("insufficient free balance: have {have}, need {need}")]
    InsufficientFreeBalance {
        /// Current free balance.
        have: Amount,
        /// Amount required.
        need: Amount,
    },

    /// Locked balance is too small for the requested release.
    #[error("insufficient locked balance: have {have}, need {need}")]
    InsufficientLockedBalance {
        /// Current locked balance.
        have: Amount,
        /// Amount required.
        need: Amount,
    },

    /// The task already holds an escrow.
    #[error("task {task_id} already holds an escrow")]
    EscrowExists {
        /// The task in question.
        task_id: TaskId,
    },

    /// No escrow is held for the task.
    #[error("no escrow held for task {task_id}")]
    EscrowNotFound {
        /// The task in question.
        task_id: TaskId,
    },

    /// Settlement arguments disagree with the stored escrow record.
    #[error("escrow mismatch for task {task_id}: {reason}")]
    EscrowMismatch {
        /// The task in question.
        task_id: TaskId,
        /// What disagreed.
        reason: String,
    },

    /// An amount computation exceeded the representable range.
    #[error("amount overflow: {context}")]
    AmountOverflow {
        /// Where the overflow happened.
        context: String,
    },
}

impl LedgerError {
    /// Create an unknown token error.
    #[must_use]
    pub fn unknown_token(symbol: impl Into<String>) -> Self {
        Self::UnknownToken {
            symbol: symbol.into(),
        }
    }

    /// Create a transfer failed error.
    #[must_use]
    pub fn transfer_failed(reason: impl Into<String>) -> Self {
        Self::TransferFailed {
            reason: reason.into(),
        }
    }

    /// Create an amount overflow error.
    #[must_use]
    pub fn overflow(context: impl Into<String>) -> Self {
        Self::AmountOverflow {
            context: context.into(),
        }
    }
}
