//! The poll client façade: one session wired to the ledger and wallets.

use poll_rpc::{LedgerRpc, SorobanRpcClient};
use poll_types::{classify, ProviderKind, ResultsSnapshot, TransactionState, VoteOption};
use poll_wallet::{WalletError, WalletProviders};
use std::sync::Arc;
use tokio::sync::watch;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::pipeline::VotePipeline;
use crate::reader::{RefreshOutcome, ResultsReader};
use crate::scheduler::{spawn_polling, SchedulerHandle};
use crate::session::{Identity, Session};

/// Everything a poll front end needs: wallet connection, voting, results.
///
/// Cloning is cheap and every clone drives the same session.
#[derive(Clone)]
pub struct PollClient {
    config: Arc<ClientConfig>,
    providers: WalletProviders,
    session: Arc<Session>,
    reader: Arc<ResultsReader>,
    pipeline: Arc<VotePipeline>,
}

impl PollClient {
    pub fn new(config: ClientConfig, rpc: Arc<dyn LedgerRpc>, providers: WalletProviders) -> Self {
        let config = Arc::new(config);
        let session = Arc::new(Session::new());
        let reader = Arc::new(ResultsReader::new(rpc.clone(), config.clone()));
        let pipeline = Arc::new(VotePipeline::new(
            rpc,
            session.clone(),
            reader.clone(),
            config.clone(),
        ));
        Self {
            config,
            providers,
            session,
            reader,
            pipeline,
        }
    }

    /// Build a client talking to the configured RPC endpoint over HTTP.
    pub fn connect_rpc(config: ClientConfig, providers: WalletProviders) -> Result<Self, ClientError> {
        config.validate()?;
        let rpc = SorobanRpcClient::new(config.rpc_url.clone(), config.request_timeout())?;
        Ok(Self::new(config, Arc::new(rpc), providers))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Installed wallet providers.
    pub fn detected_providers(&self) -> Vec<ProviderKind> {
        self.providers.detected()
    }

    // ── Wallet ──────────────────────────────────────────────────────────

    /// Connect a wallet provider and make it the active signer.
    ///
    /// The transaction state is reset first. On failure the session moves to
    /// `Error` with the classified kind and the raw error is returned.
    pub async fn connect(&self, kind: ProviderKind) -> Result<Identity, WalletError> {
        let generation = self.session.begin_connect().await;
        let adapter = self.providers.adapter(kind);

        match adapter.connect().await {
            Ok(address) => {
                let identity = Identity {
                    address: address.clone(),
                    provider: kind,
                };
                if self
                    .session
                    .finish_connect(generation, adapter, address)
                    .await
                {
                    tracing::info!(provider = %kind, address = %identity.address, "wallet connected");
                } else {
                    tracing::debug!(provider = %kind, "connect superseded");
                }
                Ok(identity)
            }
            Err(e) => {
                let error_kind = classify(&e);
                tracing::warn!(provider = %kind, error = %e, "wallet connect failed");
                self.session
                    .fail(generation, error_kind, &e.to_string())
                    .await;
                Err(e)
            }
        }
    }

    /// Forget the wallet, the transaction state and the voted flag.
    pub async fn disconnect(&self) {
        self.session.disconnect().await;
        tracing::info!("wallet disconnected");
    }

    pub async fn identity(&self) -> Option<Identity> {
        self.session.identity().await
    }

    /// The connected address abbreviated for display, e.g. `GBYC...PMAM`.
    pub async fn short_address(&self) -> Option<String> {
        self.session.address().await.map(|address| address.short())
    }

    // ── Voting ──────────────────────────────────────────────────────────

    pub async fn vote(&self, option: VoteOption) -> TransactionState {
        self.pipeline.vote(option).await
    }

    pub async fn transaction(&self) -> TransactionState {
        self.session.transaction().await
    }

    pub async fn voted_for(&self) -> Option<VoteOption> {
        self.session.voted_for().await
    }

    /// Whether a vote would pass the guards right now.
    pub async fn can_vote(&self) -> bool {
        self.session.identity().await.is_some()
            && self.session.voted_for().await.is_none()
            && !self.session.transaction().await.is_pending()
    }

    /// Explorer link for the current attempt's transaction, once submitted.
    pub async fn explorer_tx_url(&self) -> Option<String> {
        self.session
            .transaction()
            .await
            .hash
            .map(|hash| self.config.explorer_tx_url(&hash))
    }

    pub fn explorer_contract_url(&self) -> String {
        self.config.explorer_contract_url()
    }

    // ── Results ─────────────────────────────────────────────────────────

    /// Refresh results now, through the connected account if any.
    pub async fn refresh(&self) -> RefreshOutcome {
        let observer = self.session.address().await;
        self.reader.refresh(observer.as_ref()).await
    }

    /// Start periodic results polling at the configured interval.
    pub fn start_polling(&self) -> SchedulerHandle {
        spawn_polling(
            self.reader.clone(),
            self.session.clone(),
            self.config.refresh_interval(),
        )
    }

    /// The last good results snapshot; zeros before the first refresh.
    pub fn snapshot(&self) -> ResultsSnapshot {
        self.reader.snapshot().unwrap_or_default()
    }

    /// Receive every snapshot replacement.
    pub fn subscribe(&self) -> watch::Receiver<Option<ResultsSnapshot>> {
        self.reader.subscribe()
    }
}
