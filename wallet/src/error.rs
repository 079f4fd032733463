use poll_types::ProviderKind;
use thiserror::Error;

/// Wallet failures. Display texts are what the error classifier sees, so
/// they name the provider only where the provider itself is missing.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("{provider} not installed. Please install from {}", provider.install_url())]
    NotInstalled { provider: ProviderKind },

    #[error("{0}")]
    Rejected(String),

    #[error("wallet declined to share an address")]
    NoAddress,

    /// Carries the parse failure for logs; the raw address stays out of the
    /// message so it cannot trip the classifier.
    #[error("wallet request rejected: unusable address returned")]
    InvalidAddress(String),

    #[error("No wallet connected")]
    NotConnected,

    #[error("signing rejected by user")]
    SigningRejected,

    #[error("{0}")]
    Provider(String),
}
