//! Poll client core.
//!
//! Wires the ledger RPC service and the wallet providers into a single
//! session:
//! - [`Session`] holds identity, the active wallet and the vote attempt state
//! - [`VotePipeline`] builds, signs, submits and confirms a vote
//! - [`ResultsReader`] reads tallies through a simulated call
//! - [`spawn_polling`] refreshes results on a fixed period
//! - [`PollClient`] is the façade front ends talk to

pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod reader;
pub mod scheduler;
pub mod session;

pub use client::PollClient;
pub use config::ClientConfig;
pub use error::{ClientError, ConfigError, VoteError};
pub use pipeline::VotePipeline;
pub use reader::{RefreshCounts, RefreshOutcome, ResultsReader};
pub use scheduler::{spawn_polling, SchedulerHandle};
pub use session::{Attempt, GuardRejection, Identity, Session, CONNECT_FIRST};
