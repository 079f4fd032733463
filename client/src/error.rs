//! Client error types.

use poll_rpc::RpcError;
use poll_types::{classify, ErrorKind};
use poll_wallet::WalletError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

/// Why a vote attempt that passed the guards did not confirm.
#[derive(Debug, Error)]
pub enum VoteError {
    #[error("insufficient balance or account not funded on the network")]
    AccountNotFunded(#[source] RpcError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// The RPC service refused the submission outright.
    #[error("transaction submission error")]
    SubmissionRejected { error_result: Option<String> },

    #[error("transaction failed on chain")]
    FailedOnChain,

    #[error("transaction timed out after {attempts} status checks")]
    TimedOut { attempts: u32 },

    /// A newer attempt, connect or disconnect took over the session.
    #[error("vote attempt superseded")]
    Superseded,
}

impl VoteError {
    /// The user-facing category for this failure.
    ///
    /// A failed account lookup is always an unfunded account, whatever the
    /// underlying RPC error said.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AccountNotFunded(_) => ErrorKind::InsufficientBalance,
            other => classify(other),
        }
    }
}
