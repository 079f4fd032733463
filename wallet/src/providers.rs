//! Provider detection and adapter lookup.

use poll_types::ProviderKind;
use std::sync::Arc;

use crate::adapter::WalletAdapter;
use crate::freighter::{FreighterAdapter, FreighterApi};
use crate::xbull::{XBullAdapter, XBullSdk};

/// The runtime hooks available in this process, one per provider.
///
/// A provider counts as installed when its hook is present.
#[derive(Clone, Default)]
pub struct WalletProviders {
    freighter: Option<Arc<dyn FreighterApi>>,
    xbull: Option<Arc<dyn XBullSdk>>,
}

impl WalletProviders {
    /// No providers installed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_freighter(mut self, api: Arc<dyn FreighterApi>) -> Self {
        self.freighter = Some(api);
        self
    }

    pub fn with_xbull(mut self, sdk: Arc<dyn XBullSdk>) -> Self {
        self.xbull = Some(sdk);
        self
    }

    /// The adapter for `kind`. Adapters for missing providers still exist;
    /// they fail on use with a not-installed error.
    pub fn adapter(&self, kind: ProviderKind) -> Arc<dyn WalletAdapter> {
        match kind {
            ProviderKind::Freighter => Arc::new(FreighterAdapter::new(self.freighter.clone())),
            ProviderKind::XBull => Arc::new(XBullAdapter::new(self.xbull.clone())),
        }
    }

    /// Providers whose hook is present.
    pub fn detected(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.adapter(*kind).is_installed())
            .collect()
    }
}
