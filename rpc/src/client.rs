//! JSON-RPC over HTTP client for the ledger RPC service.

use async_trait::async_trait;
use poll_types::{AccountAddress, TxHash};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::RpcError;
use crate::ledger::LedgerRpc;
use crate::scval::ScVal;
use crate::transaction::Transaction;
use crate::types::{
    Account, SendResponse, SendStatus, SimulationResult, TransactionStatus, TxStatus,
};

/// Connection timeout, independent of the per-request timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// ── Wire types ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Ledger entries for the requested keys; absent entries are omitted.
#[derive(Debug, Deserialize)]
struct GetLedgerEntriesResult {
    #[serde(default)]
    entries: Vec<LedgerEntry>,
}

#[derive(Debug, Deserialize)]
struct LedgerEntry {
    account: AccountEntry,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountEntry {
    account_id: String,
    seq_num: String,
}

/// Pick the entry for `address` out of a ledger-entry lookup.
///
/// An empty answer is the only "account missing" signal; RPC errors are
/// passed through untouched.
fn account_from_entries(
    address: &AccountAddress,
    result: GetLedgerEntriesResult,
) -> Result<Account, RpcError> {
    let entry = result
        .entries
        .into_iter()
        .map(|e| e.account)
        .find(|a| a.account_id == address.as_str())
        .ok_or_else(|| RpcError::AccountNotFound(address.to_string()))?;

    let sequence = entry
        .seq_num
        .parse::<u64>()
        .map_err(|e| RpcError::InvalidResponse(format!("invalid seqNum: {e}")))?;
    Ok(Account::new(address.clone(), sequence))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimulateTransactionResult {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    results: Vec<HostFunctionResult>,
    #[serde(default)]
    min_resource_fee: Option<String>,
    #[serde(default)]
    transaction_data: Option<String>,
    #[serde(default)]
    latest_ledger: u64,
}

#[derive(Debug, Deserialize)]
struct HostFunctionResult {
    #[serde(default)]
    retval: Option<ScVal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendTransactionResult {
    hash: String,
    status: SendStatus,
    #[serde(default)]
    error_result_xdr: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GetTransactionResult {
    status: TxStatus,
    #[serde(default)]
    ledger: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct GetLatestLedgerResult {
    sequence: u64,
}

/// Unwrap a JSON-RPC response body into its typed `result`.
fn parse_response<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, RpcError> {
    let envelope: RpcEnvelope = serde_json::from_value(body)
        .map_err(|e| RpcError::InvalidResponse(format!("malformed envelope: {e}")))?;

    if let Some(err) = envelope.error {
        return Err(RpcError::Rpc {
            code: err.code,
            message: err.message,
        });
    }

    let result = envelope
        .result
        .ok_or_else(|| RpcError::InvalidResponse("response has no result".into()))?;
    serde_json::from_value(result).map_err(|e| RpcError::InvalidResponse(e.to_string()))
}

impl TryFrom<SimulateTransactionResult> for SimulationResult {
    type Error = RpcError;

    fn try_from(raw: SimulateTransactionResult) -> Result<Self, Self::Error> {
        let min_resource_fee = match raw.min_resource_fee.as_deref() {
            Some(fee) => fee
                .parse::<u64>()
                .map_err(|e| RpcError::InvalidResponse(format!("invalid minResourceFee: {e}")))?,
            None => 0,
        };
        Ok(SimulationResult {
            error: raw.error,
            retval: raw.results.into_iter().next().and_then(|r| r.retval),
            min_resource_fee,
            transaction_data: raw.transaction_data,
            latest_ledger: raw.latest_ledger,
        })
    }
}

// ── SorobanRpcClient ────────────────────────────────────────────────────

/// HTTP client for a Soroban-style JSON-RPC endpoint.
///
/// Wraps `reqwest::Client` with the endpoint URL and provides typed methods
/// for each RPC call the poll client needs.
pub struct SorobanRpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl SorobanRpcClient {
    /// Create a client targeting `url`; every request is bounded by `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| RpcError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    /// The configured endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn request_body(&self, method: &str, params: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        })
    }

    /// Send a JSON-RPC request and decode the `result` field.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, RpcError> {
        let body = self.request_body(method, params);
        tracing::trace!(method, "rpc request");

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RpcError::Http(response.status().as_u16()));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(format!("invalid JSON response: {e}")))?;

        parse_response(json)
    }
}

#[async_trait]
impl LedgerRpc for SorobanRpcClient {
    async fn get_account(&self, address: &AccountAddress) -> Result<Account, RpcError> {
        let raw: GetLedgerEntriesResult = self
            .call(
                "getLedgerEntries",
                serde_json::json!({ "keys": [{ "account": { "accountId": address.as_str() } }] }),
            )
            .await?;
        account_from_entries(address, raw)
    }

    async fn simulate(&self, tx: &Transaction) -> Result<SimulationResult, RpcError> {
        let raw: SimulateTransactionResult = self
            .call(
                "simulateTransaction",
                serde_json::json!({ "transaction": tx.to_envelope()? }),
            )
            .await?;
        raw.try_into()
    }

    async fn submit(&self, signed_envelope: &str) -> Result<SendResponse, RpcError> {
        let raw: SendTransactionResult = self
            .call(
                "sendTransaction",
                serde_json::json!({ "transaction": signed_envelope }),
            )
            .await?;
        let hash = TxHash::from_hex(&raw.hash)
            .map_err(|e| RpcError::InvalidResponse(e.to_string()))?;
        Ok(SendResponse {
            hash,
            status: raw.status,
            error_result: raw.error_result_xdr,
        })
    }

    async fn transaction_status(&self, hash: &TxHash) -> Result<TransactionStatus, RpcError> {
        let raw: GetTransactionResult = self
            .call("getTransaction", serde_json::json!({ "hash": hash.to_string() }))
            .await?;
        Ok(TransactionStatus {
            status: raw.status,
            ledger: raw.ledger,
        })
    }

    async fn latest_ledger(&self) -> Result<u64, RpcError> {
        let raw: GetLatestLedgerResult = self
            .call("getLatestLedger", serde_json::json!({}))
            .await?;
        Ok(raw.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const ADDRESS: &str = "GBYCOYFAW76NBYB5OPKNUUBZY6LHRI7Z43SBMKXJKHVK35Y6QA2CPMAM";

    fn address() -> AccountAddress {
        AccountAddress::parse(ADDRESS).unwrap()
    }

    /// Whether `request` holds the full headers and `Content-Length` body.
    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= end + 4 + content_length
    }

    /// Serve one HTTP request on a local port with a fixed JSON body.
    async fn serve_once(body: serde_json::Value) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while !request_complete(&request) {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let body = body.to_string();
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        });
        url
    }

    fn client(url: String) -> SorobanRpcClient {
        SorobanRpcClient::new(url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_request_ids_increase() {
        let client = SorobanRpcClient::new("http://127.0.0.1:8000", Duration::from_secs(5)).unwrap();
        let first = client.request_body("getLatestLedger", json!({}));
        let second = client.request_body("getLatestLedger", json!({}));
        assert_eq!(first["jsonrpc"], "2.0");
        assert_eq!(first["method"], "getLatestLedger");
        assert_eq!(first["id"], 1);
        assert_eq!(second["id"], 2);
        assert_eq!(client.url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_parse_error_object() {
        let body = json!({ "jsonrpc": "2.0", "id": 1, "error": { "code": -32600, "message": "bad" } });
        let err = parse_response::<GetLatestLedgerResult>(body).unwrap_err();
        assert!(matches!(err, RpcError::Rpc { code: -32600, .. }));
    }

    #[test]
    fn test_parse_missing_result() {
        let body = json!({ "jsonrpc": "2.0", "id": 1 });
        let err = parse_response::<GetLatestLedgerResult>(body).unwrap_err();
        assert!(matches!(err, RpcError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_simulation() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 3,
            "result": {
                "results": [{ "retval": { "vec": [{ "u32": 3 }, { "u32": 5 }] } }],
                "minResourceFee": "12345",
                "transactionData": "AAAA",
                "latestLedger": 900
            }
        });
        let raw: SimulateTransactionResult = parse_response(body).unwrap();
        let sim = SimulationResult::try_from(raw).unwrap();
        assert!(sim.is_success());
        assert_eq!(sim.min_resource_fee, 12345);
        assert_eq!(sim.latest_ledger, 900);
        assert_eq!(sim.retval.unwrap().as_count_pair().unwrap(), (3, 5));
    }

    #[test]
    fn test_parse_failed_simulation() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 4,
            "result": { "error": "HostError: Error(Contract, #1)", "latestLedger": 900 }
        });
        let raw: SimulateTransactionResult = parse_response(body).unwrap();
        let sim = SimulationResult::try_from(raw).unwrap();
        assert!(!sim.is_success());
        assert!(sim.retval.is_none());
    }

    #[test]
    fn test_parse_statuses() {
        let send: SendTransactionResult = parse_response(json!({
            "result": { "hash": "ab".repeat(32), "status": "TRY_AGAIN_LATER" }
        }))
        .unwrap();
        assert_eq!(send.status, SendStatus::TryAgainLater);

        let get: GetTransactionResult =
            parse_response(json!({ "result": { "status": "NOT_FOUND" } })).unwrap();
        assert_eq!(get.status, TxStatus::NotFound);

        let odd: GetTransactionResult =
            parse_response(json!({ "result": { "status": "SOMETHING_NEW" } })).unwrap();
        assert_eq!(odd.status, TxStatus::Other);
        assert!(!odd.status.is_terminal());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let client =
            SorobanRpcClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = client.latest_ledger().await.unwrap_err();
        assert!(matches!(err, RpcError::Transport(_)));
        assert!(err.to_string().starts_with("network request failed"));
    }

    #[tokio::test]
    async fn test_method_not_found_is_not_a_missing_account() {
        let url = serve_once(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32601, "message": "method not found" }
        }))
        .await;
        let err = client(url).get_account(&address()).await.unwrap_err();
        assert!(matches!(err, RpcError::Rpc { code: -32601, .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_empty_entries_is_missing_account() {
        let url = serve_once(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": { "entries": [], "latestLedger": 900 }
        }))
        .await;
        let err = client(url).get_account(&address()).await.unwrap_err();
        assert!(matches!(err, RpcError::AccountNotFound(ref a) if a == ADDRESS));
    }

    #[tokio::test]
    async fn test_account_entry_sequence() {
        let url = serve_once(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "entries": [{ "account": { "accountId": ADDRESS, "seqNum": "4242" } }],
                "latestLedger": 900
            }
        }))
        .await;
        let account = client(url).get_account(&address()).await.unwrap();
        assert_eq!(account.id, address());
        assert_eq!(account.sequence, 4242);
        assert_eq!(account.next_sequence(), 4243);
    }

    #[test]
    fn test_entry_for_other_account_is_missing() {
        let raw: GetLedgerEntriesResult = parse_response(json!({
            "result": { "entries": [{ "account": { "accountId": "GOTHER", "seqNum": "1" } }] }
        }))
        .unwrap();
        let err = account_from_entries(&address(), raw).unwrap_err();
        assert!(matches!(err, RpcError::AccountNotFound(_)));
    }

    #[test]
    fn test_bad_sequence_is_invalid_response() {
        let raw: GetLedgerEntriesResult = parse_response(json!({
            "result": { "entries": [{ "account": { "accountId": ADDRESS, "seqNum": "many" } }] }
        }))
        .unwrap();
        let err = account_from_entries(&address(), raw).unwrap_err();
        assert!(matches!(err, RpcError::InvalidResponse(_)));
    }
}
