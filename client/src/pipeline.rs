//! The vote transaction pipeline.
//!
//! A vote goes through six steps, each publishing a status line:
//!
//! 1. look up the voter's account
//! 2. build a single contract call with a bounded validity window
//! 3. prepare it (simulate, then apply resource fee and footprint)
//! 4. have the active wallet sign it
//! 5. submit it and record the hash
//! 6. poll for finality with a fixed attempt ceiling
//!
//! Failures are caught here, classified once, and published as the `Error`
//! state. Every step re-checks the attempt's generation and stops quietly if
//! the session has moved on.

use poll_rpc::{InvokeContract, LedgerRpc, SendStatus, TransactionBuilder, TxStatus};
use poll_types::{TransactionState, TxHash, VoteOption};
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::VoteError;
use crate::reader::ResultsReader;
use crate::session::{Attempt, GuardRejection, Session};

pub const STATUS_BUILDING: &str = "Building transaction...";
pub const STATUS_SIMULATING: &str = "Simulating transaction...";
pub const STATUS_SIGNING: &str = "Awaiting wallet signature...";
pub const STATUS_SUBMITTING: &str = "Submitting to network...";
pub const STATUS_CONFIRMING: &str = "Waiting for confirmation...";

fn confirmed_message(option: VoteOption) -> String {
    format!("Vote for Option {option} confirmed!")
}

/// Drives vote attempts for one session.
pub struct VotePipeline {
    rpc: Arc<dyn LedgerRpc>,
    session: Arc<Session>,
    reader: Arc<ResultsReader>,
    config: Arc<ClientConfig>,
}

impl VotePipeline {
    pub fn new(
        rpc: Arc<dyn LedgerRpc>,
        session: Arc<Session>,
        reader: Arc<ResultsReader>,
        config: Arc<ClientConfig>,
    ) -> Self {
        Self {
            rpc,
            session,
            reader,
            config,
        }
    }

    /// Cast a vote and return the resulting transaction state.
    ///
    /// Guard refusals make no network calls. If the attempt is superseded
    /// while running, the returned state is whatever the session now holds.
    pub async fn vote(&self, option: VoteOption) -> TransactionState {
        let attempt = match self.session.begin_attempt(option, STATUS_BUILDING).await {
            Ok(attempt) => attempt,
            Err(GuardRejection::InProgress) => {
                tracing::warn!(%option, "vote refused: another vote is pending");
                return self.session.transaction().await;
            }
            Err(rejection) => {
                tracing::info!(%option, ?rejection, "vote refused");
                return self.session.transaction().await;
            }
        };

        tracing::info!(
            %option,
            voter = %attempt.address,
            generation = attempt.generation,
            "vote started"
        );

        match self.run(&attempt).await {
            Ok(hash) => {
                let message = confirmed_message(option);
                if self.session.confirm(attempt.generation, option, &message).await {
                    tracing::info!(%option, %hash, "vote confirmed");
                    self.reader.refresh(Some(&attempt.address)).await;
                } else {
                    tracing::debug!(%hash, "confirmation arrived for a superseded attempt");
                }
            }
            Err(VoteError::Superseded) => {
                tracing::debug!(generation = attempt.generation, "vote attempt superseded");
            }
            Err(e) => {
                let kind = e.kind();
                tracing::error!(%option, error = %e, cause = ?e, ?kind, "vote failed");
                self.session
                    .fail(attempt.generation, kind, &e.to_string())
                    .await;
            }
        }

        self.session.transaction().await
    }

    async fn run(&self, attempt: &Attempt) -> Result<TxHash, VoteError> {
        let generation = attempt.generation;
        let config = &self.config;

        // Any lookup failure means the voter cannot pay for the call.
        let account = self
            .rpc
            .get_account(&attempt.address)
            .await
            .map_err(VoteError::AccountNotFunded)?;
        self.ensure_current(generation).await?;

        let tx = TransactionBuilder::new(&account, config.base_fee, config.network_passphrase.as_str())
            .add_operation(InvokeContract::call(
                config.contract_id.clone(),
                attempt.option.contract_method(),
            ))
            .set_timeout(config.tx_timeout())
            .build()?;

        self.step(generation, STATUS_SIMULATING).await?;
        let prepared = self.rpc.prepare(&tx).await?;
        tracing::debug!(fee = prepared.fee, "transaction prepared");

        self.step(generation, STATUS_SIGNING).await?;
        let envelope = prepared.to_envelope()?;
        let signed = self
            .session
            .sign(&envelope, &config.network_passphrase)
            .await?;

        self.step(generation, STATUS_SUBMITTING).await?;
        let sent = self.rpc.submit(&signed).await?;
        if !self.session.record_hash(generation, sent.hash).await {
            return Err(VoteError::Superseded);
        }
        tracing::info!(hash = %sent.hash, status = ?sent.status, "transaction submitted");
        if sent.status == SendStatus::Error {
            return Err(VoteError::SubmissionRejected {
                error_result: sent.error_result,
            });
        }

        self.step(generation, STATUS_CONFIRMING).await?;
        self.await_confirmation(generation, &sent.hash).await?;
        Ok(sent.hash)
    }

    /// Poll for finality: each check follows a fixed delay, up to the
    /// configured number of checks.
    async fn await_confirmation(&self, generation: u64, hash: &TxHash) -> Result<(), VoteError> {
        let attempts = self.config.confirmation_attempts;
        for attempt in 1..=attempts {
            tokio::time::sleep(self.config.confirmation_delay()).await;
            self.ensure_current(generation).await?;

            let status = self.rpc.transaction_status(hash).await?;
            tracing::debug!(attempt, status = ?status.status, "confirmation check");
            match status.status {
                TxStatus::Success => return Ok(()),
                TxStatus::Failed => return Err(VoteError::FailedOnChain),
                _ => {}
            }
        }
        Err(VoteError::TimedOut { attempts })
    }

    async fn step(&self, generation: u64, status: &str) -> Result<(), VoteError> {
        if self.session.set_status(generation, status).await {
            Ok(())
        } else {
            Err(VoteError::Superseded)
        }
    }

    async fn ensure_current(&self, generation: u64) -> Result<(), VoteError> {
        if self.session.is_current(generation).await {
            Ok(())
        } else {
            Err(VoteError::Superseded)
        }
    }
}
