//! Wallet provider identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The wallet providers a user can connect through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Freighter,
    XBull,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Freighter, ProviderKind::XBull];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Freighter => "Freighter",
            Self::XBull => "xBull",
        }
    }

    /// Lowercase token identifying the provider in free-form error text.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Freighter => "freighter",
            Self::XBull => "xbull",
        }
    }

    /// Where users can get the provider.
    pub fn install_url(&self) -> &'static str {
        match self {
            Self::Freighter => "freighter.app",
            Self::XBull => "xbull.app",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
