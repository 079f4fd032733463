//! The capability interface every wallet provider implements.

use async_trait::async_trait;
use poll_types::{AccountAddress, ProviderKind};

use crate::error::WalletError;

/// Connect, address lookup and signing for one wallet provider.
///
/// Adapters never retry and never perform network I/O beyond what their
/// native bridge does.
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    /// Which provider this adapter drives.
    fn kind(&self) -> ProviderKind;

    /// Whether the provider's runtime hook is present.
    fn is_installed(&self) -> bool;

    /// Ask the provider for access and return the account it exposes.
    async fn connect(&self) -> Result<AccountAddress, WalletError>;

    /// The account currently exposed by the provider.
    async fn address(&self) -> Result<AccountAddress, WalletError>;

    /// Have the provider sign an envelope for the given network.
    async fn sign(&self, envelope: &str, network_passphrase: &str) -> Result<String, WalletError>;
}

/// Parse an address handed back by a provider.
pub(crate) fn parse_address(raw: &str) -> Result<AccountAddress, WalletError> {
    if raw.is_empty() {
        return Err(WalletError::NoAddress);
    }
    AccountAddress::parse(raw).map_err(|e| {
        tracing::warn!(error = %e, "provider returned an unusable address");
        WalletError::InvalidAddress(e.to_string())
    })
}
