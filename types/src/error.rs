//! The closed error taxonomy surfaced to users, and its classifier.
//!
//! Wallet providers and the RPC service fail in many shapes. Everything that
//! reaches the user goes through [`classify`], which looks only at the
//! lowercased text of the failure and maps it to one [`ErrorKind`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::provider::ProviderKind;

/// Errors produced while parsing the types in this crate.
#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid transaction hash: {0}")]
    InvalidHash(String),
}

/// User-facing failure categories. This set is closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    WalletNotFound,
    WalletRejected,
    InsufficientBalance,
    AlreadyVoted,
    NetworkError,
    Unknown,
}

impl ErrorKind {
    /// The fixed message shown for this kind.
    pub fn message(&self) -> &'static str {
        match self {
            Self::WalletNotFound => "Wallet not found. Please install Freighter or xBull.",
            Self::WalletRejected => "Transaction was rejected by the user.",
            Self::InsufficientBalance => "Insufficient balance to complete this transaction.",
            Self::AlreadyVoted => "You have already voted in this poll.",
            Self::NetworkError => "Network error. Please check your connection.",
            Self::Unknown => "An unexpected error occurred.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

const NOT_FOUND_TOKENS: &[&str] = &["not found", "no wallet", "install"];
const REJECTED_TOKENS: &[&str] = &["reject", "declined", "cancel", "user denied"];
const BALANCE_TOKENS: &[&str] = &["insufficient", "balance"];
// "already" alone also matches unrelated text such as "already connected".
const ALREADY_VOTED_TOKENS: &[&str] = &["already voted", "already"];
const NETWORK_TOKENS: &[&str] = &["network", "fetch", "connect"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Classify a free-form failure message. Rules are tried in order and the
/// first match wins.
pub fn classify_message(message: &str) -> ErrorKind {
    let msg = message.to_lowercase();

    if contains_any(&msg, NOT_FOUND_TOKENS)
        || ProviderKind::ALL.iter().any(|p| msg.contains(p.token()))
    {
        ErrorKind::WalletNotFound
    } else if contains_any(&msg, REJECTED_TOKENS) {
        ErrorKind::WalletRejected
    } else if contains_any(&msg, BALANCE_TOKENS) {
        ErrorKind::InsufficientBalance
    } else if contains_any(&msg, ALREADY_VOTED_TOKENS) {
        ErrorKind::AlreadyVoted
    } else if contains_any(&msg, NETWORK_TOKENS) {
        ErrorKind::NetworkError
    } else {
        ErrorKind::Unknown
    }
}

/// Classify any displayable failure by its rendered text.
pub fn classify<E: fmt::Display + ?Sized>(error: &E) -> ErrorKind {
    classify_message(&error.to_string())
}
