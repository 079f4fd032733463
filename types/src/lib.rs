//! Fundamental types for the poll client.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account addresses, transaction hashes, vote options, result snapshots,
//! transaction lifecycle state, wallet provider identities, and the closed
//! error taxonomy together with its classifier.

pub mod address;
pub mod error;
pub mod hash;
pub mod option;
pub mod provider;
pub mod results;
pub mod state;

pub use address::{AccountAddress, ContractId};
pub use error::{classify, classify_message, ErrorKind, TypesError};
pub use hash::TxHash;
pub use option::VoteOption;
pub use provider::ProviderKind;
pub use results::ResultsSnapshot;
pub use state::{TransactionState, TxPhase};
