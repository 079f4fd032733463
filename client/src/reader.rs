//! Reads the poll tallies through a simulated, never-submitted contract call.

use poll_rpc::{Account, InvokeContract, LedgerRpc, RpcError, TransactionBuilder};
use poll_types::{AccountAddress, ResultsSnapshot};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

use crate::config::ClientConfig;

/// The read-only contract method returning `(count_a, count_b)`.
pub const RESULTS_METHOD: &str = "get_results";

/// What a refresh did. Failures are absorbed, so this is informational only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    Updated(ResultsSnapshot),
    /// The source account could not be looked up.
    SkippedAccountMissing,
    /// Another refresh was already running.
    SkippedInFlight,
    /// Simulation, decoding or the ledger query failed.
    Failed,
}

/// How many refreshes ended in each outcome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefreshCounts {
    pub updated: u64,
    pub account_missing: u64,
    pub in_flight: u64,
    pub failed: u64,
}

#[derive(Default)]
struct RefreshStats {
    updated: AtomicU64,
    account_missing: AtomicU64,
    in_flight: AtomicU64,
    failed: AtomicU64,
}

impl RefreshStats {
    fn record(&self, outcome: &RefreshOutcome) {
        let counter = match outcome {
            RefreshOutcome::Updated(_) => &self.updated,
            RefreshOutcome::SkippedAccountMissing => &self.account_missing,
            RefreshOutcome::SkippedInFlight => &self.in_flight,
            RefreshOutcome::Failed => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn counts(&self) -> RefreshCounts {
        RefreshCounts {
            updated: self.updated.load(Ordering::Relaxed),
            account_missing: self.account_missing.load(Ordering::Relaxed),
            in_flight: self.in_flight.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Owns the results snapshot; the only writer to it.
///
/// The snapshot is replaced wholesale, and only when every step of a refresh
/// succeeded. Subscribers see each replacement through a watch channel.
pub struct ResultsReader {
    rpc: Arc<dyn LedgerRpc>,
    config: Arc<ClientConfig>,
    snapshot: watch::Sender<Option<ResultsSnapshot>>,
    in_flight: Mutex<()>,
    stats: RefreshStats,
}

impl ResultsReader {
    pub fn new(rpc: Arc<dyn LedgerRpc>, config: Arc<ClientConfig>) -> Self {
        let (snapshot, _) = watch::channel(None);
        Self {
            rpc,
            config,
            snapshot,
            in_flight: Mutex::new(()),
            stats: RefreshStats::default(),
        }
    }

    /// The last good snapshot, if any refresh has succeeded yet.
    pub fn snapshot(&self) -> Option<ResultsSnapshot> {
        *self.snapshot.borrow()
    }

    /// Receive every snapshot replacement.
    pub fn subscribe(&self) -> watch::Receiver<Option<ResultsSnapshot>> {
        self.snapshot.subscribe()
    }

    /// Refresh counts per outcome.
    pub fn stats(&self) -> RefreshCounts {
        self.stats.counts()
    }

    /// Refresh, waiting for any refresh already in flight to finish first.
    pub async fn refresh(&self, observer: Option<&AccountAddress>) -> RefreshOutcome {
        let _guard = self.in_flight.lock().await;
        let outcome = self.refresh_locked(observer).await;
        self.stats.record(&outcome);
        outcome
    }

    /// Refresh unless another refresh is in flight, in which case skip.
    pub async fn try_refresh(&self, observer: Option<&AccountAddress>) -> RefreshOutcome {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::debug!("results refresh already in flight, skipping");
            self.stats.record(&RefreshOutcome::SkippedInFlight);
            return RefreshOutcome::SkippedInFlight;
        };
        let outcome = self.refresh_locked(observer).await;
        self.stats.record(&outcome);
        outcome
    }

    async fn refresh_locked(&self, observer: Option<&AccountAddress>) -> RefreshOutcome {
        let source = observer.unwrap_or(&self.config.fallback_account);

        let account = match self.rpc.get_account(source).await {
            Ok(account) => account,
            Err(e) => {
                tracing::warn!(account = %source, error = %e, "results source account unavailable");
                return RefreshOutcome::SkippedAccountMissing;
            }
        };

        match self.read(&account).await {
            Ok(snapshot) => {
                tracing::debug!(
                    a = snapshot.a,
                    b = snapshot.b,
                    ledger = snapshot.ledger,
                    "results refreshed"
                );
                self.snapshot.send_replace(Some(snapshot));
                RefreshOutcome::Updated(snapshot)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to read poll results");
                RefreshOutcome::Failed
            }
        }
    }

    async fn read(&self, account: &Account) -> Result<ResultsSnapshot, RpcError> {
        let tx = TransactionBuilder::new(
            account,
            self.config.base_fee,
            self.config.network_passphrase.as_str(),
        )
        .add_operation(InvokeContract::call(
            self.config.contract_id.clone(),
            RESULTS_METHOD,
        ))
        .set_timeout(self.config.tx_timeout())
        .build()?;

        let simulation = self.rpc.simulate(&tx).await?;
        if let Some(err) = simulation.error {
            return Err(RpcError::Simulation(err));
        }
        let (a, b) = simulation
            .retval
            .ok_or_else(|| RpcError::InvalidResponse("simulation returned no value".into()))?
            .as_count_pair()?;

        let ledger = self.rpc.latest_ledger().await?;
        Ok(ResultsSnapshot::new(a, b, ledger))
    }
}
