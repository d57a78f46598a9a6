//! # tasknet-token
//!
//! Fungible token primitives for the tasknet compute marketplace.
//!
//! This crate provides:
//! - Exact integer token amounts (no floating point anywhere)
//! - Base58 participant addresses
//! - The [`TokenContract`] boundary for external fungible tokens, with an
//!   in-memory implementation for local development and tests
//! - The chain's native currency as an in-process balance map
//!
//! ## Example
//!
//! ```rust
//! use tasknet_token::{Address, Amount, InMemoryToken, TokenContract};
//!
//! # fn example() -> tasknet_token::Result<()> {
//! let alice = Address::random();
//! let bob = Address::random();
//!
//! let mut token = InMemoryToken::new("WRK");
//! token.mint(&alice, Amount::from_units(100));
//! token.transfer(&alice, &bob, Amount::from_units(40))?;
//!
//! assert_eq!(token.balance_of(&bob), Amount::from_units(40));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod address;
pub mod amount;
pub mod contract;
pub mod error;
pub mod native;

pub use address::Address;
pub use amount::Amount;
pub use contract::{InMemoryToken, SharedContract, TokenContract};
pub use error::{Result, TokenError};
pub use native::{NativeCoin, SharedNative};

/// Symbol of the chain's native currency.
pub const NATIVE_SYMBOL: &str = "TASK";
