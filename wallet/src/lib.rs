//! Wallet provider adapters.
//!
//! Every provider exposes a different native bridge. This crate hides those
//! shapes behind [`WalletAdapter`]:
//! - [`FreighterAdapter`] over a [`FreighterApi`] bridge
//! - [`XBullAdapter`] over an [`XBullSdk`] bridge
//! - [`WalletProviders`] for detection and adapter lookup
//!
//! Signing is delegated entirely to the provider; no key material passes
//! through this crate.

pub mod adapter;
pub mod error;
pub mod freighter;
pub mod providers;
pub mod xbull;

pub use adapter::WalletAdapter;
pub use error::WalletError;
pub use freighter::{AccessResult, AddressResult, FreighterAdapter, FreighterApi, SignResult};
pub use providers::WalletProviders;
pub use xbull::{XBullAdapter, XBullConnectResponse, XBullPermissions, XBullSdk};
