//! Nullable ledger RPC: a scripted in-memory network.

use async_trait::async_trait;
use poll_rpc::{
    Account, LedgerRpc, RpcError, ScVal, SendResponse, SendStatus, SimulationResult,
    Transaction, TransactionStatus, TxStatus,
};
use poll_types::{AccountAddress, TxHash};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// One recorded call against the null network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcCall {
    GetAccount(String),
    /// Contract function that was simulated.
    Simulate(String),
    /// Contract function that was prepared.
    Prepare(String),
    Submit,
    TransactionStatus(TxHash),
    LatestLedger,
}

/// Methods that can be made to fail with [`NullLedgerRpc::fail`].
pub mod method {
    pub const GET_ACCOUNT: &str = "get_account";
    pub const SIMULATE: &str = "simulate";
    pub const PREPARE: &str = "prepare";
    pub const SUBMIT: &str = "submit";
    pub const TRANSACTION_STATUS: &str = "transaction_status";
    pub const LATEST_LEDGER: &str = "latest_ledger";
}

/// An in-memory ledger RPC service for tests.
///
/// Defaults: no accounts, simulations succeed returning `(0, 0)`, submissions
/// are accepted as `PENDING` with hash `0xab…`, every status query answers
/// `NOT_FOUND`, and the latest ledger is 1000.
pub struct NullLedgerRpc {
    accounts: Mutex<HashMap<String, u64>>,
    simulation: Mutex<SimulationResult>,
    failures: Mutex<HashMap<&'static str, String>>,
    submit_status: Mutex<SendStatus>,
    statuses: Mutex<VecDeque<TxStatus>>,
    default_status: Mutex<TxStatus>,
    latest_ledger: Mutex<u64>,
    calls: Mutex<Vec<RpcCall>>,
    submitted: Mutex<Vec<String>>,
}

impl NullLedgerRpc {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            simulation: Mutex::new(SimulationResult {
                retval: Some(ScVal::Vec(vec![ScVal::U32(0), ScVal::U32(0)])),
                min_resource_fee: 1_000,
                transaction_data: Some("null-footprint".to_string()),
                latest_ledger: 1000,
                ..Default::default()
            }),
            failures: Mutex::new(HashMap::new()),
            submit_status: Mutex::new(SendStatus::Pending),
            statuses: Mutex::new(VecDeque::new()),
            default_status: Mutex::new(TxStatus::NotFound),
            latest_ledger: Mutex::new(1000),
            calls: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }

    // ── Scripting ───────────────────────────────────────────────────────

    /// Make `address` exist with the given sequence number.
    pub fn with_account(self, address: &str, sequence: u64) -> Self {
        self.add_account(address, sequence);
        self
    }

    pub fn add_account(&self, address: &str, sequence: u64) {
        self.accounts
            .lock()
            .unwrap()
            .insert(address.to_string(), sequence);
    }

    pub fn remove_account(&self, address: &str) {
        self.accounts.lock().unwrap().remove(address);
    }

    /// Have simulations of the results call return these counts.
    pub fn set_results(&self, a: u32, b: u32) {
        self.simulation.lock().unwrap().retval =
            Some(ScVal::Vec(vec![ScVal::U32(a), ScVal::U32(b)]));
    }

    /// Replace the simulation outcome wholesale.
    pub fn set_simulation(&self, simulation: SimulationResult) {
        *self.simulation.lock().unwrap() = simulation;
    }

    /// Make every call to `method` fail with a transport error carrying `message`.
    pub fn fail(&self, method: &'static str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(method, message.to_string());
    }

    pub fn clear_failure(&self, method: &'static str) {
        self.failures.lock().unwrap().remove(method);
    }

    pub fn set_submit_status(&self, status: SendStatus) {
        *self.submit_status.lock().unwrap() = status;
    }

    /// Queue statuses returned by successive status queries, before falling
    /// back to the default status.
    pub fn push_statuses(&self, statuses: impl IntoIterator<Item = TxStatus>) {
        self.statuses.lock().unwrap().extend(statuses);
    }

    pub fn set_default_status(&self, status: TxStatus) {
        *self.default_status.lock().unwrap() = status;
    }

    pub fn set_latest_ledger(&self, ledger: u64) {
        *self.latest_ledger.lock().unwrap() = ledger;
    }

    // ── Inspection ──────────────────────────────────────────────────────

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<RpcCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of status queries made so far.
    pub fn status_queries(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, RpcCall::TransactionStatus(_)))
            .count()
    }

    /// Signed envelopes received by `submit`.
    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: RpcCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_failure(&self, method: &'static str) -> Result<(), RpcError> {
        match self.failures.lock().unwrap().get(method) {
            Some(message) => Err(RpcError::Transport(message.clone())),
            None => Ok(()),
        }
    }
}

impl Default for NullLedgerRpc {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerRpc for NullLedgerRpc {
    async fn get_account(&self, address: &AccountAddress) -> Result<Account, RpcError> {
        self.record(RpcCall::GetAccount(address.to_string()));
        self.check_failure(method::GET_ACCOUNT)?;
        let sequence = self
            .accounts
            .lock()
            .unwrap()
            .get(address.as_str())
            .copied()
            .ok_or_else(|| RpcError::AccountNotFound(address.to_string()))?;
        Ok(Account::new(address.clone(), sequence))
    }

    async fn simulate(&self, tx: &Transaction) -> Result<SimulationResult, RpcError> {
        self.record(RpcCall::Simulate(tx.operation.function.clone()));
        self.check_failure(method::SIMULATE)?;
        Ok(self.simulation.lock().unwrap().clone())
    }

    async fn prepare(&self, tx: &Transaction) -> Result<Transaction, RpcError> {
        self.record(RpcCall::Prepare(tx.operation.function.clone()));
        self.check_failure(method::PREPARE)?;
        let simulation = self.simulation.lock().unwrap().clone();
        tx.assemble(&simulation)
    }

    async fn submit(&self, signed_envelope: &str) -> Result<SendResponse, RpcError> {
        self.record(RpcCall::Submit);
        self.check_failure(method::SUBMIT)?;
        self.submitted
            .lock()
            .unwrap()
            .push(signed_envelope.to_string());
        Ok(SendResponse {
            hash: TxHash::new([0xab; 32]),
            status: *self.submit_status.lock().unwrap(),
            error_result: None,
        })
    }

    async fn transaction_status(&self, hash: &TxHash) -> Result<TransactionStatus, RpcError> {
        self.record(RpcCall::TransactionStatus(*hash));
        self.check_failure(method::TRANSACTION_STATUS)?;
        let status = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(*self.default_status.lock().unwrap());
        Ok(TransactionStatus::new(status))
    }

    async fn latest_ledger(&self) -> Result<u64, RpcError> {
        self.record(RpcCall::LatestLedger);
        self.check_failure(method::LATEST_LEDGER)?;
        Ok(*self.latest_ledger.lock().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TEST_ACCOUNT, TEST_CONTRACT};
    use poll_rpc::{InvokeContract, TransactionBuilder};
    use poll_types::ContractId;
    use std::time::Duration;

    fn address() -> AccountAddress {
        AccountAddress::parse(TEST_ACCOUNT).unwrap()
    }

    fn tx(account: &Account, function: &str) -> Transaction {
        TransactionBuilder::new(account, 100, "net")
            .add_operation(InvokeContract::call(
                ContractId::parse(TEST_CONTRACT).unwrap(),
                function,
            ))
            .set_timeout(Duration::from_secs(30))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_account() {
        let rpc = NullLedgerRpc::new();
        let err = rpc.get_account(&address()).await.unwrap_err();
        assert!(matches!(err, RpcError::AccountNotFound(_)));
        assert_eq!(rpc.calls(), vec![RpcCall::GetAccount(TEST_ACCOUNT.to_string())]);
    }

    #[tokio::test]
    async fn test_scripted_results_and_prepare() {
        let rpc = NullLedgerRpc::new().with_account(TEST_ACCOUNT, 7);
        rpc.set_results(3, 5);
        let account = rpc.get_account(&address()).await.unwrap();
        assert_eq!(account.sequence, 7);

        let sim = rpc.simulate(&tx(&account, "get_results")).await.unwrap();
        assert_eq!(sim.retval.unwrap().as_count_pair().unwrap(), (3, 5));

        let prepared = rpc.prepare(&tx(&account, "vote_a")).await.unwrap();
        assert_eq!(prepared.fee, 1_100);
        assert!(prepared.is_prepared());
    }

    #[tokio::test]
    async fn test_status_queue_then_default() {
        let rpc = NullLedgerRpc::new();
        rpc.push_statuses([TxStatus::Pending, TxStatus::Success]);
        let hash = TxHash::new([1; 32]);
        assert_eq!(rpc.transaction_status(&hash).await.unwrap().status, TxStatus::Pending);
        assert_eq!(rpc.transaction_status(&hash).await.unwrap().status, TxStatus::Success);
        assert_eq!(rpc.transaction_status(&hash).await.unwrap().status, TxStatus::NotFound);
        assert_eq!(rpc.status_queries(), 3);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let rpc = NullLedgerRpc::new();
        rpc.fail(method::LATEST_LEDGER, "connection reset");
        assert!(matches!(rpc.latest_ledger().await, Err(RpcError::Transport(_))));
        rpc.clear_failure(method::LATEST_LEDGER);
        assert_eq!(rpc.latest_ledger().await.unwrap(), 1000);
    }

    #[tokio::test]
    async fn test_injected_lookup_failure_beats_existing_account() {
        let rpc = NullLedgerRpc::new().with_account(TEST_ACCOUNT, 7);
        rpc.fail(method::GET_ACCOUNT, "connection refused");
        let err = rpc.get_account(&address()).await.unwrap_err();
        assert!(matches!(err, RpcError::Transport(ref m) if m == "connection refused"));
        assert_eq!(rpc.calls(), vec![RpcCall::GetAccount(TEST_ACCOUNT.to_string())]);
    }
}
