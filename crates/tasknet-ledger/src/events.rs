//! Ledger audit events.
//!
//! Every mutating operation appends one event. The log is append-only
//! and queryable by task, so an external auditor can correlate a task
//! with the exact amounts locked and released for it.

use crate::escrow::{SettlementAction, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasknet_token::{Address, Amount};
use uuid::Uuid;

/// A ledger event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// An external token became accepted.
    TokenRegistered {
        /// The new token's symbol.
        symbol: String,
        /// Fixed price per worker recipient.
        computing_price: Amount,
    },
    /// A depositor topped up their free balance.
    Deposited {
        /// Who deposited.
        depositor: Address,
        /// Token deposited.
        symbol: String,
        /// Amount credited to `free`.
        amount: Amount,
    },
    /// Value was reserved against a task.
    Locked {
        /// The task the value is reserved for.
        task_id: TaskId,
        /// Whose balance was locked.
        submitter: Address,
        /// Token locked.
        symbol: String,
        /// Exact amount locked.
        amount: Amount,
    },
    /// A task's escrow was released.
    Settled {
        /// The settled task.
        task_id: TaskId,
        /// Terminal status reported by the lifecycle manager.
        status: TaskStatus,
        /// What was done with the value.
        action: SettlementAction,
        /// Token settled.
        symbol: String,
        /// Exact amount released.
        amount: Amount,
    },
}

impl LedgerEvent {
    /// The task this event concerns, if any.
    #[must_use]
    pub fn task_id(&self) -> Option<&TaskId> {
        match self {
            Self::Locked { task_id, .. } | Self::Settled { task_id, .. } => Some(task_id),
            Self::TokenRegistered { .. } | Self::Deposited { .. } => None,
        }
    }
}

/// A timestamped entry in the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event was recorded.
    pub at: DateTime<Utc>,
    /// The event itself.
    pub event: LedgerEvent,
}

/// Append-only ledger event log.
#[derive(Debug, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub(crate) fn record(&mut self, event: LedgerEvent) {
        self.records.push(EventRecord {
            id: Uuid::new_v4(),
            at: Utc::now(),
            event,
        });
    }

    /// All recorded events, oldest first.
    #[must_use]
    pub fn all(&self) -> &[EventRecord] {
        &self.records
    }

    /// Events concerning `task_id`, oldest first.
    #[must_use]
    pub fn for_task(&self, task_id: &TaskId) -> Vec<&EventRecord> {
        self.records
            .iter()
            .filter(|r| r.event.task_id() == Some(task_id))
            .collect()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
