//! RPC error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("network request failed: {0}")]
    Transport(String),

    #[error("rpc server returned HTTP {0}")]
    Http(u16),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("invalid rpc response: {0}")]
    InvalidResponse(String),

    #[error("simulation failed: {0}")]
    Simulation(String),

    #[error("transaction build error: {0}")]
    Build(String),

    #[error("envelope encoding error: {0}")]
    Envelope(String),
}
