//! End-to-end vote flows against the null ledger and null wallets.

use poll_client::{ClientConfig, PollClient, RefreshOutcome, CONNECT_FIRST};
use poll_nullables::ledger::method;
use poll_nullables::{
    NullFreighter, NullLedgerRpc, NullXBull, RpcCall, FALLBACK_ACCOUNT, OTHER_ACCOUNT,
    TEST_ACCOUNT, TEST_CONTRACT,
};
use poll_rpc::{SendStatus, Transaction, TxStatus};
use poll_types::{ContractId, ErrorKind, ProviderKind, TxHash, TxPhase, VoteOption};
use poll_wallet::WalletProviders;
use std::sync::Arc;
use std::time::Duration;

const SUBMIT_HASH: [u8; 32] = [0xab; 32];

struct Harness {
    client: PollClient,
    rpc: Arc<NullLedgerRpc>,
    freighter: Arc<NullFreighter>,
}

fn config() -> ClientConfig {
    ClientConfig {
        contract_id: ContractId::parse(TEST_CONTRACT).unwrap(),
        ..ClientConfig::default()
    }
}

fn harness() -> Harness {
    let rpc = Arc::new(
        NullLedgerRpc::new()
            .with_account(TEST_ACCOUNT, 10)
            .with_account(FALLBACK_ACCOUNT, 1),
    );
    let freighter = Arc::new(NullFreighter::new(TEST_ACCOUNT));
    let providers = WalletProviders::new().with_freighter(freighter.clone());
    let client = PollClient::new(config(), rpc.clone(), providers);
    Harness {
        client,
        rpc,
        freighter,
    }
}

async fn connected() -> Harness {
    let h = harness();
    h.client.connect(ProviderKind::Freighter).await.unwrap();
    h.rpc.reset_calls();
    h
}

// ── Guards ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn vote_without_wallet_is_refused_without_network_calls() {
    let h = harness();
    let state = h.client.vote(VoteOption::A).await;

    assert_eq!(state.phase, TxPhase::Error);
    assert_eq!(state.message.as_deref(), Some(CONNECT_FIRST));
    assert!(state.error.is_none());
    assert_eq!(h.rpc.call_count(), 0);
    assert!(!h.client.can_vote().await);
}

#[tokio::test(start_paused = true)]
async fn second_vote_after_success_is_already_voted() {
    let h = connected().await;
    h.rpc.push_statuses([TxStatus::Success]);
    assert_eq!(h.client.vote(VoteOption::A).await.phase, TxPhase::Success);
    h.rpc.reset_calls();

    let state = h.client.vote(VoteOption::B).await;
    assert_eq!(state.phase, TxPhase::Error);
    assert_eq!(state.error, Some(ErrorKind::AlreadyVoted));
    assert_eq!(
        state.message.as_deref(),
        Some("You have already voted in this poll.")
    );
    assert_eq!(h.rpc.call_count(), 0);
    assert_eq!(h.client.voted_for().await, Some(VoteOption::A));
    assert!(!h.client.can_vote().await);
}

#[tokio::test(start_paused = true)]
async fn vote_while_pending_leaves_attempt_untouched() {
    let h = connected().await;
    let client = h.client.clone();
    let first = tokio::spawn(async move { client.vote(VoteOption::A).await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    let pending = h.client.transaction().await;
    assert_eq!(pending.phase, TxPhase::Pending);
    assert_eq!(pending.message.as_deref(), Some("Waiting for confirmation..."));
    assert!(!h.client.can_vote().await);

    let calls_before = h.rpc.call_count();
    let refused = h.client.vote(VoteOption::B).await;
    assert_eq!(refused, pending);
    assert_eq!(h.rpc.call_count(), calls_before);

    h.rpc.set_default_status(TxStatus::Success);
    let state = first.await.unwrap();
    assert_eq!(state.phase, TxPhase::Success);
    assert_eq!(h.client.voted_for().await, Some(VoteOption::A));
}

// ── Success ─────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn successful_vote_confirms_and_refreshes() {
    let h = connected().await;
    h.rpc.set_results(1, 0);
    h.rpc.push_statuses([TxStatus::Pending, TxStatus::NotFound, TxStatus::Success]);

    let state = h.client.vote(VoteOption::A).await;

    assert_eq!(state.phase, TxPhase::Success);
    assert_eq!(state.message.as_deref(), Some("Vote for Option A confirmed!"));
    assert_eq!(state.hash, Some(TxHash::new(SUBMIT_HASH)));
    assert_eq!(h.client.voted_for().await, Some(VoteOption::A));

    let hash = TxHash::new(SUBMIT_HASH);
    assert_eq!(
        h.rpc.calls(),
        vec![
            RpcCall::GetAccount(TEST_ACCOUNT.to_string()),
            RpcCall::Prepare("vote_a".to_string()),
            RpcCall::Submit,
            RpcCall::TransactionStatus(hash),
            RpcCall::TransactionStatus(hash),
            RpcCall::TransactionStatus(hash),
            RpcCall::GetAccount(TEST_ACCOUNT.to_string()),
            RpcCall::Simulate("get_results".to_string()),
            RpcCall::LatestLedger,
        ]
    );
    assert_eq!(h.client.snapshot().a, 1);

    // The wallet signed the prepared envelope and that is what was submitted.
    let signed = h.freighter.signed();
    assert_eq!(signed.len(), 1);
    let tx = Transaction::from_envelope(&signed[0]).unwrap();
    assert_eq!(tx.operation.function, "vote_a");
    assert_eq!(tx.sequence, 11);
    assert_eq!(tx.fee, 1_100);
    assert!(tx.is_prepared());
    assert_eq!(h.rpc.submitted(), vec![format!("{}#signed-by-freighter", signed[0])]);

    assert_eq!(
        h.client.explorer_tx_url().await,
        Some(format!(
            "https://stellar.expert/explorer/testnet/tx/{}",
            "ab".repeat(32)
        ))
    );
}

#[tokio::test(start_paused = true)]
async fn xbull_vote_for_option_b() {
    let rpc = Arc::new(NullLedgerRpc::new().with_account(OTHER_ACCOUNT, 3));
    let xbull = Arc::new(NullXBull::new(OTHER_ACCOUNT));
    let providers = WalletProviders::new().with_xbull(xbull.clone());
    let client = PollClient::new(config(), rpc.clone(), providers);

    let identity = client.connect(ProviderKind::XBull).await.unwrap();
    assert_eq!(identity.provider, ProviderKind::XBull);
    assert_eq!(client.short_address().await.as_deref(), Some("GASE...X72I"));

    rpc.push_statuses([TxStatus::Success]);
    let state = client.vote(VoteOption::B).await;
    assert_eq!(state.phase, TxPhase::Success);
    assert_eq!(state.message.as_deref(), Some("Vote for Option B confirmed!"));
    assert!(rpc.calls().contains(&RpcCall::Prepare("vote_b".to_string())));
    assert!(rpc.submitted()[0].ends_with("#signed-by-xbull"));
    assert_eq!(xbull.signed().len(), 1);
}

// ── Failures ────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn failed_on_chain_keeps_hash() {
    let h = connected().await;
    h.rpc.push_statuses([TxStatus::Pending, TxStatus::Failed]);

    let state = h.client.vote(VoteOption::A).await;

    assert_eq!(state.phase, TxPhase::Error);
    assert_eq!(state.error, Some(ErrorKind::Unknown));
    assert_eq!(state.message.as_deref(), Some("An unexpected error occurred."));
    assert_eq!(state.detail.as_deref(), Some("transaction failed on chain"));
    assert_eq!(state.hash, Some(TxHash::new(SUBMIT_HASH)));
    assert!(h.client.explorer_tx_url().await.is_some());
    assert_eq!(h.client.voted_for().await, None);
    assert!(h.client.can_vote().await);
}

#[tokio::test(start_paused = true)]
async fn confirmation_times_out_after_twenty_checks() {
    let h = connected().await;
    let started = tokio::time::Instant::now();

    let state = h.client.vote(VoteOption::A).await;

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(30), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(31), "elapsed {elapsed:?}");
    assert_eq!(h.rpc.status_queries(), 20);
    assert_eq!(state.phase, TxPhase::Error);
    assert_eq!(state.error, Some(ErrorKind::Unknown));
    assert_eq!(
        state.detail.as_deref(),
        Some("transaction timed out after 20 status checks")
    );
    assert_eq!(state.hash, Some(TxHash::new(SUBMIT_HASH)));
}

#[tokio::test]
async fn unfunded_account_is_insufficient_balance() {
    let h = harness();
    h.freighter.set_address(OTHER_ACCOUNT);
    h.client.connect(ProviderKind::Freighter).await.unwrap();
    h.rpc.reset_calls();

    let state = h.client.vote(VoteOption::A).await;

    assert_eq!(state.phase, TxPhase::Error);
    assert_eq!(state.error, Some(ErrorKind::InsufficientBalance));
    assert_eq!(
        state.message.as_deref(),
        Some("Insufficient balance to complete this transaction.")
    );
    assert_eq!(h.rpc.calls(), vec![RpcCall::GetAccount(OTHER_ACCOUNT.to_string())]);
    assert!(state.hash.is_none());
}

#[tokio::test]
async fn unreachable_account_lookup_is_insufficient_balance() {
    let h = connected().await;
    h.rpc.fail(method::GET_ACCOUNT, "connection refused");

    let state = h.client.vote(VoteOption::A).await;

    assert_eq!(state.phase, TxPhase::Error);
    assert_eq!(state.error, Some(ErrorKind::InsufficientBalance));
    assert_eq!(
        state.detail.as_deref(),
        Some("insufficient balance or account not funded on the network")
    );
    assert_eq!(h.rpc.calls(), vec![RpcCall::GetAccount(TEST_ACCOUNT.to_string())]);
    assert!(h.rpc.submitted().is_empty());
    assert!(h.freighter.signed().is_empty());
    assert!(h.client.can_vote().await);
}

#[tokio::test]
async fn prepare_transport_failure_is_network_error() {
    let h = connected().await;
    h.rpc.fail(method::PREPARE, "connection refused");

    let state = h.client.vote(VoteOption::A).await;

    assert_eq!(state.error, Some(ErrorKind::NetworkError));
    assert!(h.freighter.signed().is_empty());
}

#[tokio::test]
async fn signing_rejected_stops_before_submit() {
    let h = connected().await;
    h.freighter.reject_signing("User declined access");

    let state = h.client.vote(VoteOption::B).await;

    assert_eq!(state.phase, TxPhase::Error);
    assert_eq!(state.error, Some(ErrorKind::WalletRejected));
    assert!(!h.rpc.calls().contains(&RpcCall::Submit));
}

#[tokio::test]
async fn submission_error_fails_without_polling() {
    let h = connected().await;
    h.rpc.set_submit_status(SendStatus::Error);

    let state = h.client.vote(VoteOption::A).await;

    assert_eq!(state.phase, TxPhase::Error);
    assert_eq!(state.error, Some(ErrorKind::Unknown));
    assert_eq!(state.hash, Some(TxHash::new(SUBMIT_HASH)));
    assert_eq!(h.rpc.status_queries(), 0);
}

// ── Session changes mid-flight ──────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn disconnect_discards_in_flight_attempt() {
    let h = connected().await;
    let client = h.client.clone();
    let attempt = tokio::spawn(async move { client.vote(VoteOption::A).await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    h.client.disconnect().await;
    h.rpc.set_default_status(TxStatus::Success);

    let state = attempt.await.unwrap();
    assert_eq!(state.phase, TxPhase::Idle);
    assert_eq!(h.client.transaction().await.phase, TxPhase::Idle);
    assert_eq!(h.client.voted_for().await, None);
    assert_eq!(h.rpc.status_queries(), 0);
}

#[tokio::test(start_paused = true)]
async fn reconnect_supersedes_in_flight_attempt() {
    let h = connected().await;
    let client = h.client.clone();
    let attempt = tokio::spawn(async move { client.vote(VoteOption::A).await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    h.client.connect(ProviderKind::Freighter).await.unwrap();
    h.rpc.push_statuses([TxStatus::Success]);

    attempt.await.unwrap();
    assert_eq!(h.client.transaction().await.phase, TxPhase::Idle);
    assert_eq!(h.client.voted_for().await, None);
    assert!(h.client.can_vote().await);
}

// ── Connection ──────────────────────────────────────────────────────────

#[tokio::test]
async fn connecting_missing_provider_is_wallet_not_found() {
    let h = harness();
    let err = h.client.connect(ProviderKind::XBull).await.unwrap_err();
    assert!(err.to_string().contains("xBull not installed"));

    let state = h.client.transaction().await;
    assert_eq!(state.phase, TxPhase::Error);
    assert_eq!(state.error, Some(ErrorKind::WalletNotFound));
    assert!(h.client.identity().await.is_none());
    assert_eq!(h.client.detected_providers(), vec![ProviderKind::Freighter]);
}

#[tokio::test]
async fn denied_access_is_wallet_rejected() {
    let h = harness();
    h.freighter.deny_access("User declined access");
    assert!(h.client.connect(ProviderKind::Freighter).await.is_err());
    assert_eq!(
        h.client.transaction().await.error,
        Some(ErrorKind::WalletRejected)
    );
}

#[tokio::test]
async fn connect_resets_transaction_state() {
    let h = harness();
    h.client.vote(VoteOption::A).await;
    assert_eq!(h.client.transaction().await.phase, TxPhase::Error);

    let identity = h.client.connect(ProviderKind::Freighter).await.unwrap();
    assert_eq!(identity.address.as_str(), TEST_ACCOUNT);
    assert_eq!(h.client.transaction().await.phase, TxPhase::Idle);
    assert!(h.client.can_vote().await);
}

#[tokio::test(start_paused = true)]
async fn disconnect_clears_voted_flag() {
    let h = connected().await;
    h.rpc.push_statuses([TxStatus::Success]);
    h.client.vote(VoteOption::A).await;

    h.client.disconnect().await;
    assert!(h.client.identity().await.is_none());
    assert!(h.client.short_address().await.is_none());
    assert_eq!(h.client.voted_for().await, None);
    assert!(h.client.explorer_tx_url().await.is_none());

    h.client.connect(ProviderKind::Freighter).await.unwrap();
    assert!(h.client.can_vote().await);
}

// ── Results ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn snapshot_survives_failed_refresh() {
    let h = harness();
    h.rpc.set_results(3, 5);
    assert_eq!(h.client.snapshot().total(), 0);
    assert!(matches!(h.client.refresh().await, RefreshOutcome::Updated(_)));

    h.rpc.remove_account(FALLBACK_ACCOUNT);
    h.rpc.set_results(7, 7);
    assert_eq!(h.client.refresh().await, RefreshOutcome::SkippedAccountMissing);

    let snapshot = h.client.snapshot();
    assert_eq!((snapshot.a, snapshot.b), (3, 5));
    assert_eq!(snapshot.shares(), (38, 63));
    assert_eq!(snapshot.leading(), Some(VoteOption::B));
}

#[tokio::test(start_paused = true)]
async fn polling_follows_connected_account() {
    let h = harness();
    let handle = h.client.start_polling();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(h.rpc.calls()[0], RpcCall::GetAccount(FALLBACK_ACCOUNT.to_string()));

    h.client.connect(ProviderKind::Freighter).await.unwrap();
    h.rpc.reset_calls();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(h.rpc.calls()[0], RpcCall::GetAccount(TEST_ACCOUNT.to_string()));

    handle.stop().await;
}
