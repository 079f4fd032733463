//! Nullable wallet bridges: scripted providers that sign without keys.

use async_trait::async_trait;
use poll_wallet::{
    AccessResult, AddressResult, FreighterApi, SignResult, XBullConnectResponse,
    XBullPermissions, XBullSdk,
};
use std::sync::Mutex;

/// Marks an envelope as signed by a null bridge.
fn null_signature(provider: &str, envelope: &str) -> String {
    format!("{envelope}#signed-by-{provider}")
}

/// A scripted Freighter bridge.
///
/// By default the extension is connected, grants access, exposes `address`
/// and signs everything.
pub struct NullFreighter {
    connected: Mutex<bool>,
    access_error: Mutex<Option<String>>,
    address: Mutex<String>,
    sign_error: Mutex<Option<String>>,
    sign_empty: Mutex<bool>,
    signed: Mutex<Vec<String>>,
}

impl NullFreighter {
    pub fn new(address: &str) -> Self {
        Self {
            connected: Mutex::new(true),
            access_error: Mutex::new(None),
            address: Mutex::new(address.to_string()),
            sign_error: Mutex::new(None),
            sign_empty: Mutex::new(false),
            signed: Mutex::new(Vec::new()),
        }
    }

    /// Report the extension as not connected.
    pub fn set_connected(&self, connected: bool) {
        *self.connected.lock().unwrap() = connected;
    }

    pub fn deny_access(&self, error: &str) {
        *self.access_error.lock().unwrap() = Some(error.to_string());
    }

    pub fn set_address(&self, address: &str) {
        *self.address.lock().unwrap() = address.to_string();
    }

    pub fn reject_signing(&self, error: &str) {
        *self.sign_error.lock().unwrap() = Some(error.to_string());
    }

    /// Return an empty signed envelope without an error.
    pub fn sign_empty(&self) {
        *self.sign_empty.lock().unwrap() = true;
    }

    /// Envelopes this bridge was asked to sign.
    pub fn signed(&self) -> Vec<String> {
        self.signed.lock().unwrap().clone()
    }
}

#[async_trait]
impl FreighterApi for NullFreighter {
    async fn is_connected(&self) -> bool {
        *self.connected.lock().unwrap()
    }

    async fn request_access(&self) -> AccessResult {
        match self.access_error.lock().unwrap().clone() {
            Some(error) => AccessResult {
                address: String::new(),
                error: Some(error),
            },
            None => AccessResult {
                address: self.address.lock().unwrap().clone(),
                error: None,
            },
        }
    }

    async fn get_address(&self) -> AddressResult {
        AddressResult {
            address: self.address.lock().unwrap().clone(),
            error: None,
        }
    }

    async fn sign_transaction(&self, xdr: &str, _network_passphrase: &str) -> SignResult {
        self.signed.lock().unwrap().push(xdr.to_string());
        if let Some(error) = self.sign_error.lock().unwrap().clone() {
            return SignResult {
                signed_tx_xdr: String::new(),
                error: Some(error),
            };
        }
        if *self.sign_empty.lock().unwrap() {
            return SignResult::default();
        }
        SignResult {
            signed_tx_xdr: null_signature("freighter", xdr),
            error: None,
        }
    }
}

/// A scripted xBull bridge.
///
/// By default connect returns the public key directly and signing succeeds.
pub struct NullXBull {
    reject_connect: Mutex<bool>,
    key_in_connect: Mutex<bool>,
    public_key: Mutex<Option<String>>,
    reject_sign: Mutex<bool>,
    permissions: Mutex<Vec<XBullPermissions>>,
    signed: Mutex<Vec<String>>,
}

impl NullXBull {
    pub fn new(public_key: &str) -> Self {
        Self {
            reject_connect: Mutex::new(false),
            key_in_connect: Mutex::new(true),
            public_key: Mutex::new(Some(public_key.to_string())),
            reject_sign: Mutex::new(false),
            permissions: Mutex::new(Vec::new()),
            signed: Mutex::new(Vec::new()),
        }
    }

    /// Return nothing from `connect`.
    pub fn reject_connect(&self) {
        *self.reject_connect.lock().unwrap() = true;
    }

    /// Leave the key out of the connect response, as older SDKs do.
    pub fn omit_key_on_connect(&self) {
        *self.key_in_connect.lock().unwrap() = false;
    }

    pub fn set_public_key(&self, key: Option<&str>) {
        *self.public_key.lock().unwrap() = key.map(str::to_string);
    }

    pub fn reject_signing(&self) {
        *self.reject_sign.lock().unwrap() = true;
    }

    /// Permissions requested by each connect call.
    pub fn requested_permissions(&self) -> Vec<XBullPermissions> {
        self.permissions.lock().unwrap().clone()
    }

    pub fn signed(&self) -> Vec<String> {
        self.signed.lock().unwrap().clone()
    }
}

#[async_trait]
impl XBullSdk for NullXBull {
    async fn connect(&self, permissions: XBullPermissions) -> Option<XBullConnectResponse> {
        self.permissions.lock().unwrap().push(permissions);
        if *self.reject_connect.lock().unwrap() {
            return None;
        }
        let public_key = if *self.key_in_connect.lock().unwrap() {
            self.public_key.lock().unwrap().clone()
        } else {
            None
        };
        Some(XBullConnectResponse { public_key })
    }

    async fn get_public_key(&self) -> Option<String> {
        self.public_key.lock().unwrap().clone()
    }

    async fn sign_xdr(&self, xdr: &str, _network_passphrase: &str) -> Option<String> {
        self.signed.lock().unwrap().push(xdr.to_string());
        if *self.reject_sign.lock().unwrap() {
            return None;
        }
        Some(null_signature("xbull", xdr))
    }
}
