//! # tasknet-ledger
//!
//! Fee and escrow accounting for the tasknet compute marketplace.
//!
//! Participants deposit value in the chain's native currency or in
//! registered external tokens. The ledger tracks, per depositor and per
//! token, how much is freely spendable versus locked as collateral
//! against an in-flight task, and moves value between those buckets and
//! out to recipients with exact integer arithmetic.
//!
//! The flow:
//!
//! 1. A depositor tops up their free balance with [`FeeLedger::deposit`].
//! 2. At task submission the lifecycle manager calls [`FeeLedger::lock`],
//!    which reserves `computing_price × workers + data_price × providers`
//!    and stores an [`EscrowRecord`] for the task.
//! 3. At terminal resolution it calls [`FeeLedger::settle`], which
//!    consumes the record exactly once and either pays the recipients or
//!    refunds the submitter, depending on the [`SettlementPolicy`].
//!
//! Custody always equals the sum of all booked balances per token; every
//! operation either completes fully or fails leaving all state unchanged.
//!
//! ## Example
//!
//! ```rust
//! use tasknet_ledger::{FeeLedger, TaskId, TaskStatus};
//! use tasknet_token::{Address, Amount, NATIVE_SYMBOL, NativeCoin};
//!
//! # fn main() -> tasknet_ledger::Result<()> {
//! let chain = NativeCoin::new().into_shared();
//! let submitter = Address::random();
//! let worker = Address::random();
//! chain.lock().mint(&submitter, Amount::from_units(10));
//!
//! let mut ledger = FeeLedger::new(Address::random(), chain, Amount::from_units(1))?;
//! ledger.deposit(&submitter, NATIVE_SYMBOL, Amount::from_units(5), Amount::from_units(5))?;
//!
//! let task = TaskId::new();
//! let workers = vec![worker];
//! ledger.lock(task.clone(), &submitter, NATIVE_SYMBOL, &workers, Amount::ZERO, &[])?;
//! ledger.settle(&task, TaskStatus::Completed, &submitter, NATIVE_SYMBOL, &workers, Amount::ZERO, &[])?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod allowance;
pub mod error;
pub mod escrow;
pub mod events;
pub mod gateway;
pub mod ledger;
pub mod registry;

pub use allowance::{Allowance, AllowanceLedger};
pub use error::{LedgerError, Result};
pub use escrow::{
    EscrowRecord, Settlement, SettlementAction, SettlementPolicy, TaskId, TaskStatus,
};
pub use events::{EventLog, EventRecord, LedgerEvent};
pub use gateway::TransferGateway;
pub use ledger::FeeLedger;
pub use registry::{FeeToken, TokenRegistry, TransferHandle};
