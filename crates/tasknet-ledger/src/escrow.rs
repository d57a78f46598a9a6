//! Task escrow records and settlement policy.
//!
//! An [`EscrowRecord`] is the authoritative fact about what a lock
//! reserved: settlement must reproduce the amount from its own arguments
//! before any value moves, and the record is consumed exactly once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tasknet_token::{Address, Amount};
use uuid::Uuid;

/// Unique task identifier, issued by the task lifecycle manager.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(String);

impl TaskId {
    /// Create a new random task ID.
    #[must_use]
    pub fn new() -> Self {
        Self(format!("task-{}", Uuid::new_v4()))
    }

    /// Create from a string.
    #[must_use]
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the ID as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Value reserved against one in-flight task.
///
/// Created by `lock`, consumed exactly once by `settle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowRecord {
    /// The task the value is reserved for.
    pub task_id: TaskId,
    /// Who submitted the task and funded the escrow.
    pub submitter: Address,
    /// Token the escrow is denominated in.
    pub symbol: String,
    /// Exact amount reserved.
    pub amount: Amount,
    /// When the lock was taken.
    pub locked_at: DateTime<Utc>,
}

/// Terminal task status reported by the lifecycle manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// The task finished and its results were accepted.
    Completed,
    /// The task ran and failed.
    Failed,
    /// The task was cancelled before completion.
    Cancelled,
    /// The task timed out.
    Expired,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// What settlement does with the locked value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementAction {
    /// Pay the task's recipients out of custody.
    PayRecipients,
    /// Return the value to the submitter's free balance.
    RefundSubmitter,
}

/// Maps terminal statuses to settlement actions.
///
/// Defaults: completed work pays its recipients, every other terminal
/// status refunds the submitter. Individual statuses can be remapped
/// without touching settlement call sites.
#[derive(Debug, Clone, Default)]
pub struct SettlementPolicy {
    overrides: HashMap<TaskStatus, SettlementAction>,
}

impl SettlementPolicy {
    /// Create the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remap one status to a different action.
    #[must_use]
    pub fn with_action(mut self, status: TaskStatus, action: SettlementAction) -> Self {
        self.overrides.insert(status, action);
        self
    }

    /// The action settlement takes for `status`.
    #[must_use]
    pub fn action_for(&self, status: TaskStatus) -> SettlementAction {
        self.overrides
            .get(&status)
            .copied()
            .unwrap_or(match status {
                TaskStatus::Completed => SettlementAction::PayRecipients,
                TaskStatus::Failed | TaskStatus::Cancelled | TaskStatus::Expired => {
                    SettlementAction::RefundSubmitter
                }
            })
    }
}

/// Outcome summary of a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// The action that was taken.
    pub action: SettlementAction,
    /// The exact amount released from escrow.
    pub amount: Amount,
}
