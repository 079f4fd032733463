//! Freighter browser-extension wallet.
//!
//! Freighter reports failures in-band: every call returns a result object
//! whose `error` field is set instead of failing.

use async_trait::async_trait;
use poll_types::{AccountAddress, ProviderKind};
use std::sync::Arc;

use crate::adapter::{parse_address, WalletAdapter};
use crate::error::WalletError;

/// Result of `requestAccess`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessResult {
    pub address: String,
    pub error: Option<String>,
}

/// Result of `getAddress`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressResult {
    pub address: String,
    pub error: Option<String>,
}

/// Result of `signTransaction`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignResult {
    pub signed_tx_xdr: String,
    pub error: Option<String>,
}

/// The Freighter native bridge.
#[async_trait]
pub trait FreighterApi: Send + Sync {
    async fn is_connected(&self) -> bool;
    async fn request_access(&self) -> AccessResult;
    async fn get_address(&self) -> AddressResult;
    async fn sign_transaction(&self, xdr: &str, network_passphrase: &str) -> SignResult;
}

/// [`WalletAdapter`] over Freighter. `api` is `None` when the extension is
/// not present.
pub struct FreighterAdapter {
    api: Option<Arc<dyn FreighterApi>>,
}

impl FreighterAdapter {
    pub fn new(api: Option<Arc<dyn FreighterApi>>) -> Self {
        Self { api }
    }

    fn api(&self) -> Result<&Arc<dyn FreighterApi>, WalletError> {
        self.api.as_ref().ok_or(WalletError::NotInstalled {
            provider: ProviderKind::Freighter,
        })
    }
}

#[async_trait]
impl WalletAdapter for FreighterAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Freighter
    }

    fn is_installed(&self) -> bool {
        self.api.is_some()
    }

    async fn connect(&self) -> Result<AccountAddress, WalletError> {
        let api = self.api()?;
        if !api.is_connected().await {
            return Err(WalletError::NotInstalled {
                provider: ProviderKind::Freighter,
            });
        }

        let access = api.request_access().await;
        if let Some(err) = access.error {
            tracing::debug!(error = %err, "freighter access denied");
            return Err(WalletError::Rejected(err));
        }

        self.address().await
    }

    async fn address(&self) -> Result<AccountAddress, WalletError> {
        let result = self.api()?.get_address().await;
        if let Some(err) = result.error {
            return Err(WalletError::Provider(err));
        }
        parse_address(&result.address)
    }

    async fn sign(&self, envelope: &str, network_passphrase: &str) -> Result<String, WalletError> {
        let result = self
            .api()?
            .sign_transaction(envelope, network_passphrase)
            .await;
        if let Some(err) = result.error {
            return Err(WalletError::Rejected(err));
        }
        if result.signed_tx_xdr.is_empty() {
            return Err(WalletError::SigningRejected);
        }
        Ok(result.signed_tx_xdr)
    }
}
