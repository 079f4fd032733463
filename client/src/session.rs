//! Per-session state: identity, active wallet, vote attempt and generation.
//!
//! All mutation goes through [`Session`], which holds a single lock so that
//! guard checks and the state they guard are updated atomically. Every
//! attempt carries the generation it started under; connect, disconnect and
//! each new attempt bump the generation, and writes tagged with an older
//! generation are dropped.

use poll_types::{AccountAddress, ErrorKind, ProviderKind, TransactionState, TxHash, VoteOption};
use poll_wallet::{WalletAdapter, WalletError};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Message shown when a vote is attempted without a connected wallet.
pub const CONNECT_FIRST: &str = "Connect your wallet first.";

/// The connected account and the provider that exposed it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub address: AccountAddress,
    pub provider: ProviderKind,
}

/// Why a vote attempt was refused before any network call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardRejection {
    NotConnected,
    AlreadyVoted,
    InProgress,
}

/// A vote attempt admitted by the guards.
#[derive(Clone, Debug)]
pub struct Attempt {
    pub generation: u64,
    pub option: VoteOption,
    pub address: AccountAddress,
}

#[derive(Default)]
struct SessionState {
    identity: Option<Identity>,
    adapter: Option<Arc<dyn WalletAdapter>>,
    tx: TransactionState,
    voted: Option<VoteOption>,
    generation: u64,
}

/// Shared session state for one user of the poll client.
#[derive(Default)]
pub struct Session {
    state: RwLock<SessionState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn identity(&self) -> Option<Identity> {
        self.state.read().await.identity.clone()
    }

    pub async fn address(&self) -> Option<AccountAddress> {
        self.state
            .read()
            .await
            .identity
            .as_ref()
            .map(|identity| identity.address.clone())
    }

    pub async fn transaction(&self) -> TransactionState {
        self.state.read().await.tx.clone()
    }

    /// The option this session voted for, once a vote has been confirmed.
    pub async fn voted_for(&self) -> Option<VoteOption> {
        self.state.read().await.voted
    }

    pub async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    pub async fn is_current(&self, generation: u64) -> bool {
        self.state.read().await.generation == generation
    }

    // ── Connection ──────────────────────────────────────────────────────

    /// Start a connect: clear the transaction state and supersede any
    /// in-flight attempt. Returns the generation the connect runs under.
    pub async fn begin_connect(&self) -> u64 {
        let mut state = self.state.write().await;
        state.generation += 1;
        state.tx = TransactionState::idle();
        state.generation
    }

    /// Record a successful connect. Dropped if superseded.
    pub async fn finish_connect(
        &self,
        generation: u64,
        adapter: Arc<dyn WalletAdapter>,
        address: AccountAddress,
    ) -> bool {
        let mut state = self.state.write().await;
        if state.generation != generation {
            return false;
        }
        state.identity = Some(Identity {
            address,
            provider: adapter.kind(),
        });
        state.adapter = Some(adapter);
        true
    }

    /// Clear identity, provider, transaction state and the voted flag.
    pub async fn disconnect(&self) {
        let mut state = self.state.write().await;
        let generation = state.generation + 1;
        *state = SessionState {
            generation,
            ..SessionState::default()
        };
    }

    // ── Vote attempts ───────────────────────────────────────────────────

    /// Run the guards and, if they pass, start a new attempt in `Pending`.
    ///
    /// A refused attempt in progress leaves the state untouched; the other
    /// refusals publish an `Error` state.
    pub async fn begin_attempt(
        &self,
        option: VoteOption,
        status: &str,
    ) -> Result<Attempt, GuardRejection> {
        let mut state = self.state.write().await;
        if state.tx.is_pending() {
            return Err(GuardRejection::InProgress);
        }
        let Some(address) = state.identity.as_ref().map(|i| i.address.clone()) else {
            state.tx = TransactionState::rejected(CONNECT_FIRST);
            return Err(GuardRejection::NotConnected);
        };
        if state.voted.is_some() {
            let mut tx = TransactionState::idle();
            tx.fail(ErrorKind::AlreadyVoted, "vote already recorded for this session");
            state.tx = tx;
            return Err(GuardRejection::AlreadyVoted);
        }

        state.generation += 1;
        state.tx = TransactionState::pending(status);
        Ok(Attempt {
            generation: state.generation,
            option,
            address,
        })
    }

    /// Publish a status line for the attempt. Returns `false` if superseded.
    pub async fn set_status(&self, generation: u64, message: &str) -> bool {
        self.update(generation, |tx| tx.set_status(message)).await
    }

    /// Record the submitted transaction hash.
    pub async fn record_hash(&self, generation: u64, hash: TxHash) -> bool {
        self.update(generation, |tx| tx.hash = Some(hash)).await
    }

    /// Mark the attempt confirmed and set the voted flag.
    pub async fn confirm(&self, generation: u64, option: VoteOption, message: &str) -> bool {
        let mut state = self.state.write().await;
        if state.generation != generation {
            return false;
        }
        state.tx.succeed(message);
        state.voted = Some(option);
        true
    }

    /// Move the attempt (or connect) to `Error` with a classified kind.
    pub async fn fail(&self, generation: u64, kind: ErrorKind, detail: &str) -> bool {
        self.update(generation, |tx| tx.fail(kind, detail)).await
    }

    async fn update(&self, generation: u64, f: impl FnOnce(&mut TransactionState)) -> bool {
        let mut state = self.state.write().await;
        if state.generation != generation {
            return false;
        }
        f(&mut state.tx);
        true
    }

    // ── Signing ─────────────────────────────────────────────────────────

    /// Sign through the active provider.
    pub async fn sign(&self, envelope: &str, network_passphrase: &str) -> Result<String, WalletError> {
        let adapter = self
            .state
            .read()
            .await
            .adapter
            .clone()
            .ok_or(WalletError::NotConnected)?;
        adapter.sign(envelope, network_passphrase).await
    }
}
