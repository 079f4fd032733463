//! The ledger RPC service as seen by the poll client.

use async_trait::async_trait;
use poll_types::{AccountAddress, TxHash};

use crate::error::RpcError;
use crate::transaction::Transaction;
use crate::types::{Account, SendResponse, SimulationResult, TransactionStatus};

/// Operations the client needs from the ledger network.
///
/// Implemented over HTTP by [`SorobanRpcClient`](crate::SorobanRpcClient) and
/// in memory by the nullables used in tests.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Look up an account. Fails with [`RpcError::AccountNotFound`] when the
    /// account does not exist (e.g. it was never funded).
    async fn get_account(&self, address: &AccountAddress) -> Result<Account, RpcError>;

    /// Dry-run a transaction without submitting it.
    async fn simulate(&self, tx: &Transaction) -> Result<SimulationResult, RpcError>;

    /// Simulate and assemble: returns the transaction with its resource fee
    /// and footprint applied, ready to sign.
    async fn prepare(&self, tx: &Transaction) -> Result<Transaction, RpcError> {
        let simulation = self.simulate(tx).await?;
        tx.assemble(&simulation)
    }

    /// Submit a signed envelope.
    async fn submit(&self, signed_envelope: &str) -> Result<SendResponse, RpcError>;

    /// Fetch the finality status of a submitted transaction.
    async fn transaction_status(&self, hash: &TxHash) -> Result<TransactionStatus, RpcError>;

    /// Sequence number of the latest closed ledger.
    async fn latest_ledger(&self) -> Result<u64, RpcError>;
}
