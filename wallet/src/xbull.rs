//! xBull wallet.
//!
//! The xBull SDK signals refusal by returning nothing rather than an error.

use async_trait::async_trait;
use poll_types::{AccountAddress, ProviderKind};
use std::sync::Arc;

use crate::adapter::{parse_address, WalletAdapter};
use crate::error::WalletError;

/// Permissions requested on connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XBullPermissions {
    pub can_request_public_key: bool,
    pub can_request_sign: bool,
}

impl XBullPermissions {
    /// Everything the poll client needs: the public key and signing.
    pub const FULL: Self = Self {
        can_request_public_key: true,
        can_request_sign: true,
    };
}

/// Response to a successful `connect`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XBullConnectResponse {
    pub public_key: Option<String>,
}

/// The xBull native bridge.
#[async_trait]
pub trait XBullSdk: Send + Sync {
    async fn connect(&self, permissions: XBullPermissions) -> Option<XBullConnectResponse>;
    async fn get_public_key(&self) -> Option<String>;
    async fn sign_xdr(&self, xdr: &str, network_passphrase: &str) -> Option<String>;
}

/// [`WalletAdapter`] over xBull. `sdk` is `None` when xBull is not present.
pub struct XBullAdapter {
    sdk: Option<Arc<dyn XBullSdk>>,
}

impl XBullAdapter {
    pub fn new(sdk: Option<Arc<dyn XBullSdk>>) -> Self {
        Self { sdk }
    }

    fn sdk(&self) -> Result<&Arc<dyn XBullSdk>, WalletError> {
        self.sdk.as_ref().ok_or(WalletError::NotInstalled {
            provider: ProviderKind::XBull,
        })
    }
}

#[async_trait]
impl WalletAdapter for XBullAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::XBull
    }

    fn is_installed(&self) -> bool {
        self.sdk.is_some()
    }

    async fn connect(&self) -> Result<AccountAddress, WalletError> {
        let sdk = self.sdk()?;
        let response = sdk
            .connect(XBullPermissions::FULL)
            .await
            .ok_or_else(|| WalletError::Rejected("connection rejected by user".into()))?;

        // Older SDKs omit the key from the connect response.
        match response.public_key.filter(|k| !k.is_empty()) {
            Some(key) => parse_address(&key),
            None => {
                tracing::debug!("xbull connect returned no key, asking for it");
                self.address().await
            }
        }
    }

    async fn address(&self) -> Result<AccountAddress, WalletError> {
        let key = self.sdk()?.get_public_key().await.unwrap_or_default();
        parse_address(&key)
    }

    async fn sign(&self, envelope: &str, network_passphrase: &str) -> Result<String, WalletError> {
        match self.sdk()?.sign_xdr(envelope, network_passphrase).await {
            Some(signed) if !signed.is_empty() => Ok(signed),
            _ => Err(WalletError::SigningRejected),
        }
    }
}
