//! Lifecycle state of a vote transaction.

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::hash::TxHash;

/// Phase of the current vote attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxPhase {
    /// No attempt in progress. Initial state, and the state after a
    /// disconnect or a successful connect.
    #[default]
    Idle,
    /// An attempt is building, signing, submitting or awaiting confirmation.
    Pending,
    /// The vote was confirmed on-chain.
    Success,
    /// The attempt was refused or failed.
    Error,
}

impl TxPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

/// The lifecycle record of one vote attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionState {
    pub phase: TxPhase,
    /// Human-readable status line.
    pub message: Option<String>,
    /// Set as soon as the network accepts the submission; survives later failures.
    pub hash: Option<TxHash>,
    /// Classified failure, for `Error` states produced by the classifier or
    /// the already-voted guard.
    pub error: Option<ErrorKind>,
    /// Unclassified failure text, kept for diagnostics.
    pub detail: Option<String>,
}

impl TransactionState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn pending(message: impl Into<String>) -> Self {
        Self {
            phase: TxPhase::Pending,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Update the status line of a pending attempt.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn succeed(&mut self, message: impl Into<String>) {
        self.phase = TxPhase::Success;
        self.message = Some(message.into());
        self.error = None;
        self.detail = None;
    }

    /// Move to `Error` with a classified kind. The hash is left untouched.
    pub fn fail(&mut self, kind: ErrorKind, detail: impl Into<String>) {
        self.phase = TxPhase::Error;
        self.message = Some(kind.message().to_string());
        self.error = Some(kind);
        self.detail = Some(detail.into());
    }

    /// An `Error` state carrying a fixed message and no classification.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            phase: TxPhase::Error,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_pending(&self) -> bool {
        self.phase == TxPhase::Pending
    }
}
