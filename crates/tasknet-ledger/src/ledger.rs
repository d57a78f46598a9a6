//! The fee ledger: deposits, escrow locks, and settlement.
//!
//! [`FeeLedger`] owns the token registry, the allowance ledger, the
//! transfer gateway, the per-task escrow records and the audit log, and
//! is the only writer to any of them. All mutating operations take
//! `&mut self`, so calls are strictly sequential and nothing can
//! re-enter the ledger while a balance is half-moved.

use crate::allowance::{Allowance, AllowanceLedger};
use crate::error::{LedgerError, Result};
use crate::escrow::{
    EscrowRecord, Settlement, SettlementAction, SettlementPolicy, TaskId, TaskStatus,
};
use crate::events::{EventLog, EventRecord, LedgerEvent};
use crate::gateway::TransferGateway;
use crate::registry::{FeeToken, TokenRegistry};
use chrono::Utc;
use std::collections::HashMap;
use tasknet_token::{Address, Amount, SharedContract, SharedNative};
use tracing::{info, warn};

/// The fee/escrow accounting core of the marketplace.
pub struct FeeLedger {
    registry: TokenRegistry,
    allowances: AllowanceLedger,
    gateway: TransferGateway,
    escrows: HashMap<TaskId, EscrowRecord>,
    policy: SettlementPolicy,
    events: EventLog,
}

impl FeeLedger {
    /// Create a ledger with custody at `custody` and the native currency
    /// priced at `native_computing_price` per worker recipient.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidPrice`] if the price is zero.
    pub fn new(
        custody: Address,
        native: SharedNative,
        native_computing_price: Amount,
    ) -> Result<Self> {
        Ok(Self {
            registry: TokenRegistry::new(native, native_computing_price)?,
            allowances: AllowanceLedger::new(),
            gateway: TransferGateway::new(custody),
            escrows: HashMap::new(),
            policy: SettlementPolicy::new(),
            events: EventLog::new(),
        })
    }

    /// Replace the settlement policy.
    #[must_use]
    pub fn with_policy(mut self, policy: SettlementPolicy) -> Self {
        self.policy = policy;
        self
    }

    // ------------------------------------------------------------------
    // Admin boundary
    // ------------------------------------------------------------------

    /// Register an external token at a fixed per-recipient price.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateSymbol`] or
    /// [`LedgerError::InvalidPrice`].
    pub fn register_token(
        &mut self,
        symbol: impl Into<String>,
        contract: SharedContract,
        computing_price: Amount,
    ) -> Result<()> {
        let symbol = symbol.into();
        self.registry
            .register(symbol.clone(), contract, computing_price)?;
        info!(symbol, price = %computing_price, "token registered");
        self.events.record(LedgerEvent::TokenRegistered {
            symbol,
            computing_price,
        });
        Ok(())
    }

    /// Enable or disable an external token for new deposits and locks.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownToken`] for the native symbol or an
    /// unregistered one.
    pub fn set_token_enabled(&mut self, symbol: &str, enabled: bool) -> Result<()> {
        self.registry.set_enabled(symbol, enabled)?;
        info!(symbol, enabled, "token enablement changed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Depositor boundary
    // ------------------------------------------------------------------

    /// Top up `depositor`'s free balance.
    ///
    /// For the native currency the call must carry exactly `amount` as
    /// `attached` value; for external tokens `attached` must be zero and
    /// the depositor must have approved the custody address for at least
    /// `amount` beforehand. The credit is overflow-checked before any
    /// value moves, so a failure here leaves custody untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownToken`],
    /// [`LedgerError::ValueMismatch`],
    /// [`LedgerError::InsufficientApproval`],
    /// [`LedgerError::TransferFailed`] or
    /// [`LedgerError::AmountOverflow`].
    pub fn deposit(
        &mut self,
        depositor: &Address,
        symbol: &str,
        amount: Amount,
        attached: Amount,
    ) -> Result<()> {
        let token = self.registry.lookup(symbol)?;
        self.allowances.can_credit_free(depositor, symbol, amount)?;
        self.gateway.pull_in(token, depositor, amount, attached)?;
        self.allowances.credit_free(depositor, symbol, amount)?;
        info!(depositor = %depositor, symbol, amount = %amount, "deposit credited");
        self.events.record(LedgerEvent::Deposited {
            depositor: depositor.clone(),
            symbol: symbol.to_string(),
            amount,
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Task-lifecycle boundary
    // ------------------------------------------------------------------

    /// Reserve the task's fee out of the submitter's free balance.
    ///
    /// The required amount is `computing_price × |worker_owners| +
    /// data_price × |data_providers|`. No transfer happens here; the
    /// value is already under custody from prior deposits. Returns the
    /// amount locked.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownToken`],
    /// [`LedgerError::EscrowExists`],
    /// [`LedgerError::InsufficientFreeBalance`] or
    /// [`LedgerError::AmountOverflow`].
    pub fn lock(
        &mut self,
        task_id: TaskId,
        submitter: &Address,
        symbol: &str,
        worker_owners: &[Address],
        data_price: Amount,
        data_providers: &[Address],
    ) -> Result<Amount> {
        let token = self.registry.lookup(symbol)?;
        let required =
            required_amount(token.computing_price, worker_owners, data_price, data_providers)?;
        if self.escrows.contains_key(&task_id) {
            return Err(LedgerError::EscrowExists { task_id });
        }
        self.allowances
            .move_free_to_locked(submitter, symbol, required)?;
        self.escrows.insert(
            task_id.clone(),
            EscrowRecord {
                task_id: task_id.clone(),
                submitter: submitter.clone(),
                symbol: symbol.to_string(),
                amount: required,
                locked_at: Utc::now(),
            },
        );
        info!(task_id = %task_id, submitter = %submitter, symbol, amount = %required, "escrow locked");
        self.events.record(LedgerEvent::Locked {
            task_id,
            submitter: submitter.clone(),
            symbol: symbol.to_string(),
            amount: required,
        });
        Ok(required)
    }

    /// Release the task's escrow according to its terminal status.
    ///
    /// Recomputes the required amount from the same arguments `lock`
    /// received and checks it against the stored escrow record; the
    /// record is consumed exactly once, so a second settlement of the
    /// same task fails with [`LedgerError::EscrowNotFound`]. Depending on
    /// the settlement policy the value is either paid out to the
    /// recipients (`computing_price` per worker owner, `data_price` per
    /// data provider) or returned to the submitter's free balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::EscrowNotFound`],
    /// [`LedgerError::EscrowMismatch`],
    /// [`LedgerError::InsufficientLockedBalance`],
    /// [`LedgerError::TransferFailed`] or
    /// [`LedgerError::AmountOverflow`]. On any error every balance, the
    /// escrow record and custody are left as they were.
    #[allow(clippy::too_many_arguments)]
    pub fn settle(
        &mut self,
        task_id: &TaskId,
        status: TaskStatus,
        submitter: &Address,
        symbol: &str,
        worker_owners: &[Address],
        data_price: Amount,
        data_providers: &[Address],
    ) -> Result<Settlement> {
        // Enabled-blind resolution: delisting a token gates new value in,
        // never value out.
        let token = self.registry.get_any(symbol)?.clone();
        let record = self
            .escrows
            .get(task_id)
            .cloned()
            .ok_or_else(|| LedgerError::EscrowNotFound {
                task_id: task_id.clone(),
            })?;
        let required =
            required_amount(token.computing_price, worker_owners, data_price, data_providers)?;

        if record.symbol != symbol {
            return Err(LedgerError::EscrowMismatch {
                task_id: task_id.clone(),
                reason: format!("locked in {}, settling in {}", record.symbol, symbol),
            });
        }
        if record.submitter != *submitter {
            return Err(LedgerError::EscrowMismatch {
                task_id: task_id.clone(),
                reason: format!(
                    "locked by {}, settling for {}",
                    record.submitter, submitter
                ),
            });
        }
        if record.amount != required {
            return Err(LedgerError::EscrowMismatch {
                task_id: task_id.clone(),
                reason: format!("reserved {}, recomputed {}", record.amount, required),
            });
        }

        let action = self.policy.action_for(status);
        match action {
            SettlementAction::RefundSubmitter => {
                self.allowances
                    .move_locked_to_free(submitter, symbol, required)?;
                self.escrows.remove(task_id);
            }
            SettlementAction::PayRecipients => {
                self.pay_recipients(
                    &token,
                    &record,
                    required,
                    worker_owners,
                    data_price,
                    data_providers,
                )?;
            }
        }

        info!(
            task_id = %task_id,
            status = %status,
            amount = %required,
            "escrow settled"
        );
        self.events.record(LedgerEvent::Settled {
            task_id: task_id.clone(),
            status,
            action,
            symbol: symbol.to_string(),
            amount: required,
        });
        Ok(Settlement {
            action,
            amount: required,
        })
    }

    /// Pay out a settled escrow: every precondition is validated before
    /// the first transfer, the locked balance is debited before transfers
    /// begin, and a transfer failure after that point is compensated by
    /// reclaiming the recipients already paid and restoring the locked
    /// balance and the record.
    fn pay_recipients(
        &mut self,
        token: &FeeToken,
        record: &EscrowRecord,
        required: Amount,
        worker_owners: &[Address],
        data_price: Amount,
        data_providers: &[Address],
    ) -> Result<()> {
        let payouts: Vec<(&Address, Amount)> = worker_owners
            .iter()
            .map(|w| (w, token.computing_price))
            .chain(data_providers.iter().map(|p| (p, data_price)))
            .filter(|(_, amount)| !amount.is_zero())
            .collect();

        for (recipient, _) in &payouts {
            if !self.gateway.can_push(token, recipient) {
                return Err(LedgerError::transfer_failed(format!(
                    "recipient {recipient} refuses {}",
                    token.symbol
                )));
            }
        }
        let custody = self.gateway.custody_balance(token);
        if custody < required {
            return Err(LedgerError::transfer_failed(format!(
                "custody shortfall: holding {custody}, releasing {required}"
            )));
        }

        self.allowances
            .consume_locked(&record.submitter, &record.symbol, required)?;
        self.escrows.remove(&record.task_id);

        let mut paid: Vec<(Address, Amount)> = Vec::with_capacity(payouts.len());
        for (recipient, amount) in payouts {
            if let Err(err) = self.gateway.push_out(token, recipient, amount) {
                warn!(
                    task_id = %record.task_id,
                    recipient = %recipient,
                    error = %err,
                    "payout failed, compensating"
                );
                for (r, a) in &paid {
                    self.gateway.reclaim(token, r, *a)?;
                }
                self.allowances
                    .restore_locked(&record.submitter, &record.symbol, required)?;
                self.escrows
                    .insert(record.task_id.clone(), record.clone());
                return Err(err);
            }
            paid.push((recipient.clone(), amount));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read boundary
    // ------------------------------------------------------------------

    /// Balances for `(depositor, symbol)`, zero if absent.
    #[must_use]
    pub fn allowance_of(&self, depositor: &Address, symbol: &str) -> Allowance {
        self.allowances.allowance(depositor, symbol)
    }

    /// Whether `symbol` can accept new deposits and locks.
    #[must_use]
    pub fn is_supported(&self, symbol: &str) -> bool {
        self.registry.is_supported(symbol)
    }

    /// All accepted tokens, registration order, native first.
    #[must_use]
    pub fn list_tokens(&self) -> &[FeeToken] {
        self.registry.list()
    }

    /// Look up an enabled token.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownToken`] if absent or disabled.
    pub fn token(&self, symbol: &str) -> Result<&FeeToken> {
        self.registry.lookup(symbol)
    }

    /// The escrow record held for `task_id`, if any.
    #[must_use]
    pub fn escrow(&self, task_id: &TaskId) -> Option<&EscrowRecord> {
        self.escrows.get(task_id)
    }

    /// The ledger's custody address.
    #[must_use]
    pub fn custody(&self) -> &Address {
        self.gateway.custody()
    }

    /// Backend-reported custody balance for `symbol`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownToken`] if the symbol is absent.
    pub fn custody_balance(&self, symbol: &str) -> Result<Amount> {
        let token = self.registry.get_any(symbol)?;
        Ok(self.gateway.custody_balance(token))
    }

    /// Sum of `free + locked` across all depositors for `symbol`.
    ///
    /// Equal to [`FeeLedger::custody_balance`] at all times; comparing
    /// the two is the conservation audit.
    #[must_use]
    pub fn booked_total(&self, symbol: &str) -> Amount {
        self.allowances.booked_total(symbol)
    }

    /// All recorded audit events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[EventRecord] {
        self.events.all()
    }

    /// Audit events concerning `task_id`, oldest first.
    #[must_use]
    pub fn events_for_task(&self, task_id: &TaskId) -> Vec<&EventRecord> {
        self.events.for_task(task_id)
    }
}

impl std::fmt::Debug for FeeLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeeLedger")
            .field("custody", self.gateway.custody())
            .field("tokens", &self.registry.list().len())
            .field("open_escrows", &self.escrows.len())
            .finish_non_exhaustive()
    }
}

/// The exact fee a task shape requires, identical at lock and settle
/// time: `computing_price × |worker_owners| + data_price ×
/// |data_providers|`, computed in `u128` so the multiplication cannot
/// wrap.
fn required_amount(
    computing_price: Amount,
    worker_owners: &[Address],
    data_price: Amount,
    data_providers: &[Address],
) -> Result<Amount> {
    let compute = u128::from(computing_price.units()) * worker_owners.len() as u128;
    let data = u128::from(data_price.units()) * data_providers.len() as u128;
    u64::try_from(compute + data)
        .map(Amount::from_units)
        .map_err(|_| LedgerError::overflow("escrow requirement"))
}
