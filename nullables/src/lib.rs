//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator of the poll client (the ledger RPC service and
//! the wallet bridges) has an in-memory stand-in here that:
//! - returns scripted values
//! - can be made to fail on demand
//! - records every call for assertions
//! - never touches the network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod ledger;
pub mod wallet;

pub use ledger::{NullLedgerRpc, RpcCall};
pub use wallet::{NullFreighter, NullXBull};

/// A funded account used by tests.
pub const TEST_ACCOUNT: &str = "GAUJZDEGXDNCF32EPF3DHODZDOCIS2JHTLGMXGEDN73U55XTPLPFSMEG";

/// A second, distinct account.
pub const OTHER_ACCOUNT: &str = "GASEH2KVJ72CEUVW75EFR6EDT4SYWB5WKH7DNSIPZZ7FK4ZRI3R2X72I";

/// The read-only account results are simulated against when no wallet is connected.
pub const FALLBACK_ACCOUNT: &str = "GBYCOYFAW76NBYB5OPKNUUBZY6LHRI7Z43SBMKXJKHVK35Y6QA2CPMAM";

/// The poll contract.
pub const TEST_CONTRACT: &str = "CAFLJOOA7LQSAJ2XUID5ZZZZG6ZDMEN4KHVDGAJGXBENYJQWX6HH74FY";
