//! Client configuration with TOML file support.

use poll_types::{AccountAddress, ContractId, TxHash};
use poll_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_CONTRACT_ID: &str = "CC7IYQYSM76SN7EP3QYPYPKZZ4MST6G6CP4AIIM6TNNMUIZRKIHOQX3I";
const DEFAULT_FALLBACK_ACCOUNT: &str = "GBYCOYFAW76NBYB5OPKNUUBZY6LHRI7Z43SBMKXJKHVK35Y6QA2CPMAM";

/// Configuration for a poll client.
///
/// Can be loaded from a TOML file via [`ClientConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every key is optional.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// JSON-RPC endpoint of the ledger RPC service.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Passphrase of the network transactions are signed for.
    #[serde(default = "default_network_passphrase")]
    pub network_passphrase: String,

    /// The poll contract.
    #[serde(default = "default_contract_id")]
    pub contract_id: ContractId,

    /// Funded account used as the source of read-only calls when no wallet
    /// is connected.
    #[serde(default = "default_fallback_account")]
    pub fallback_account: AccountAddress,

    /// Base fee in stroops, before any resource fee.
    #[serde(default = "default_base_fee")]
    pub base_fee: u64,

    /// Validity window of built transactions.
    #[serde(default = "default_tx_timeout_secs")]
    pub tx_timeout_secs: u64,

    /// Status checks before a submitted vote is declared timed out.
    #[serde(default = "default_confirmation_attempts")]
    pub confirmation_attempts: u32,

    /// Delay before each status check.
    #[serde(default = "default_confirmation_delay_ms")]
    pub confirmation_delay_ms: u64,

    /// Period of the results polling scheduler.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    /// Upper bound on a single HTTP request to the RPC service.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Block explorer base URL for transaction and contract links.
    #[serde(default = "default_explorer_url")]
    pub explorer_url: String,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_rpc_url() -> String {
    "https://soroban-testnet.stellar.org".to_string()
}

fn default_network_passphrase() -> String {
    "Test SDF Network ; September 2015".to_string()
}

fn default_contract_id() -> ContractId {
    ContractId::parse(DEFAULT_CONTRACT_ID).expect("default contract id is valid")
}

fn default_fallback_account() -> AccountAddress {
    AccountAddress::parse(DEFAULT_FALLBACK_ACCOUNT).expect("default fallback account is valid")
}

fn default_base_fee() -> u64 {
    100
}

fn default_tx_timeout_secs() -> u64 {
    30
}

fn default_confirmation_attempts() -> u32 {
    20
}

fn default_confirmation_delay_ms() -> u64 {
    1_500
}

fn default_refresh_interval_ms() -> u64 {
    5_000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_explorer_url() -> String {
    "https://stellar.expert/explorer/testnet".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values that would make the client spin or never confirm.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc_url.trim().is_empty() {
            return Err(ConfigError::Invalid("rpc_url must not be empty".into()));
        }
        if self.tx_timeout_secs == 0 {
            return Err(ConfigError::Invalid("tx_timeout_secs must be positive".into()));
        }
        if self.confirmation_attempts == 0 {
            return Err(ConfigError::Invalid(
                "confirmation_attempts must be positive".into(),
            ));
        }
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "refresh_interval_ms must be positive".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn tx_timeout(&self) -> Duration {
        Duration::from_secs(self.tx_timeout_secs)
    }

    pub fn confirmation_delay(&self) -> Duration {
        Duration::from_millis(self.confirmation_delay_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Explorer page for a transaction.
    pub fn explorer_tx_url(&self, hash: &TxHash) -> String {
        format!("{}/tx/{hash}", self.explorer_url.trim_end_matches('/'))
    }

    /// Explorer page for the poll contract.
    pub fn explorer_contract_url(&self) -> String {
        format!(
            "{}/contract/{}",
            self.explorer_url.trim_end_matches('/'),
            self.contract_id
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            network_passphrase: default_network_passphrase(),
            contract_id: default_contract_id(),
            fallback_account: default_fallback_account(),
            base_fee: default_base_fee(),
            tx_timeout_secs: default_tx_timeout_secs(),
            confirmation_attempts: default_confirmation_attempts(),
            confirmation_delay_ms: default_confirmation_delay_ms(),
            refresh_interval_ms: default_refresh_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            explorer_url: default_explorer_url(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
