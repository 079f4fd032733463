//! Single-operation contract-call transactions.

use poll_types::{AccountAddress, ContractId};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::RpcError;
use crate::scval::ScVal;
use crate::types::{Account, SimulationResult};

/// An `invoke_contract` operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeContract {
    pub contract_id: ContractId,
    pub function: String,
    #[serde(default)]
    pub args: Vec<ScVal>,
}

impl InvokeContract {
    /// A call with no arguments.
    pub fn call(contract_id: ContractId, function: impl Into<String>) -> Self {
        Self {
            contract_id,
            function: function.into(),
            args: Vec::new(),
        }
    }
}

/// An unsigned transaction carrying one contract call.
///
/// Envelopes are exchanged with wallets and the RPC service as JSON
/// documents of this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub source: AccountAddress,
    pub sequence: u64,
    /// Total fee in stroops (base fee plus any resource fee).
    pub fee: u64,
    pub network_passphrase: String,
    /// Unix time after which the network refuses the transaction.
    pub max_time: u64,
    pub operation: InvokeContract,
    /// Resource footprint from simulation; present once prepared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soroban_data: Option<String>,
}

impl Transaction {
    /// Encode as an envelope string for wallets and the RPC service.
    pub fn to_envelope(&self) -> Result<String, RpcError> {
        serde_json::to_string(self).map_err(|e| RpcError::Envelope(e.to_string()))
    }

    /// Decode an envelope string.
    pub fn from_envelope(envelope: &str) -> Result<Self, RpcError> {
        serde_json::from_str(envelope).map_err(|e| RpcError::Envelope(e.to_string()))
    }

    pub fn is_prepared(&self) -> bool {
        self.soroban_data.is_some()
    }

    /// Apply a successful simulation: add the resource fee and attach the
    /// resource footprint.
    pub fn assemble(&self, simulation: &SimulationResult) -> Result<Transaction, RpcError> {
        if let Some(err) = &simulation.error {
            return Err(RpcError::Simulation(err.clone()));
        }
        let mut prepared = self.clone();
        prepared.fee = self.fee.saturating_add(simulation.min_resource_fee);
        prepared.soroban_data = simulation.transaction_data.clone();
        Ok(prepared)
    }
}

/// Builds a [`Transaction`] from a source account.
///
/// A timeout must be set; transactions without an upper time bound are refused.
pub struct TransactionBuilder<'a> {
    account: &'a Account,
    fee: u64,
    network_passphrase: String,
    operation: Option<InvokeContract>,
    timeout: Option<Duration>,
}

impl<'a> TransactionBuilder<'a> {
    pub fn new(account: &'a Account, fee: u64, network_passphrase: impl Into<String>) -> Self {
        Self {
            account,
            fee,
            network_passphrase: network_passphrase.into(),
            operation: None,
            timeout: None,
        }
    }

    pub fn add_operation(mut self, operation: InvokeContract) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn set_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Transaction, RpcError> {
        let operation = self
            .operation
            .ok_or_else(|| RpcError::Build("transaction has no operation".into()))?;
        let timeout = self
            .timeout
            .ok_or_else(|| RpcError::Build("transaction timeout not set".into()))?;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();

        Ok(Transaction {
            source: self.account.id.clone(),
            sequence: self.account.next_sequence(),
            fee: self.fee,
            network_passphrase: self.network_passphrase,
            max_time: (now + timeout).as_secs(),
            operation,
            soroban_data: None,
        })
    }
}
