//! Domain-level results returned by the ledger RPC service.

use poll_types::{AccountAddress, TxHash};
use serde::{Deserialize, Serialize};

use crate::scval::ScVal;

/// An on-ledger account, as needed to build a transaction from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountAddress,
    pub sequence: u64,
}

impl Account {
    pub fn new(id: AccountAddress, sequence: u64) -> Self {
        Self { id, sequence }
    }

    /// Sequence number the next transaction from this account must carry.
    pub fn next_sequence(&self) -> u64 {
        self.sequence.saturating_add(1)
    }
}

/// Outcome of a dry run of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationResult {
    /// Host error reported by the simulation, if it failed.
    pub error: Option<String>,
    /// Return value of the invoked contract function.
    pub retval: Option<ScVal>,
    /// Resource fee the transaction needs on top of the base fee.
    pub min_resource_fee: u64,
    /// Opaque resource footprint to attach before signing.
    pub transaction_data: Option<String>,
    pub latest_ledger: u64,
}

impl SimulationResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Status of a submission as reported by `sendTransaction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendStatus {
    Pending,
    Duplicate,
    TryAgainLater,
    Error,
}

/// Response to a submission. The hash is known even when the status is `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResponse {
    pub hash: TxHash,
    pub status: SendStatus,
    pub error_result: Option<String>,
}

/// Finality status of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxStatus {
    Pending,
    NotFound,
    Success,
    Failed,
    #[serde(other)]
    Other,
}

impl TxStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionStatus {
    pub status: TxStatus,
    /// Ledger the transaction was applied in, once terminal.
    pub ledger: Option<u64>,
}

impl TransactionStatus {
    pub fn new(status: TxStatus) -> Self {
        Self {
            status,
            ledger: None,
        }
    }
}
