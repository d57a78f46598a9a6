//! Error types for token backend operations.

use crate::amount::Amount;
use thiserror::Error;

/// Result type alias for token operations.
pub type Result<T> = std::result::Result<T, TokenError>;

/// Errors that can occur in token backend operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Invalid address format.
    #[error("invalid address: {message}")]
    InvalidAddress {
        /// Description of the address error.
        message: String,
    },

    /// Insufficient balance for a transfer.
    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance {
        /// Current balance.
        have: Amount,
        /// Required balance.
        need: Amount,
    },

    /// Insufficient approval for a delegated transfer.
    #[error("insufficient approval: approved {approved}, need {need}")]
    InsufficientApproval {
        /// Amount currently approved.
        approved: Amount,
        /// Amount required.
        need: Amount,
    },

    /// The recipient refuses incoming value.
    #[error("transfer rejected: {recipient} refuses incoming value")]
    TransferRejected {
        /// The refusing recipient.
        recipient: String,
    },

    /// Invalid amount.
    #[error("invalid amount: {message}")]
    InvalidAmount {
        /// Description of the amount error.
        message: String,
    },
}

impl TokenError {
    /// Create an invalid address error.
    #[must_use]
    pub fn invalid_address(message: impl Into<String>) -> Self {
        Self::InvalidAddress {
            message: message.into(),
        }
    }

    /// Create an insufficient balance error.
    #[must_use]
    pub fn insufficient_balance(have: Amount, need: Amount) -> Self {
        Self::InsufficientBalance { have, need }
    }

    /// Create a transfer rejected error.
    #[must_use]
    pub fn transfer_rejected(recipient: impl Into<String>) -> Self {
        Self::TransferRejected {
            recipient: recipient.into(),
        }
    }
}
