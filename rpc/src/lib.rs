//! Client side of the ledger RPC service.
//!
//! Provides:
//! - [`LedgerRpc`], the seam the pipeline and the results reader talk through
//! - [`SorobanRpcClient`], its JSON-RPC over HTTP implementation
//! - [`TransactionBuilder`] for single-operation contract calls
//! - [`ScVal`], the contract value model used for arguments and return values

pub mod client;
pub mod error;
pub mod ledger;
pub mod scval;
pub mod transaction;
pub mod types;

pub use client::SorobanRpcClient;
pub use error::RpcError;
pub use ledger::LedgerRpc;
pub use scval::ScVal;
pub use transaction::{InvokeContract, Transaction, TransactionBuilder};
pub use types::{Account, SendResponse, SendStatus, SimulationResult, TransactionStatus, TxStatus};
