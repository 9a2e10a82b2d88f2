//! Error types for the crowdfund core
//!
//! Only the write-side planners, configuration and I/O are fallible.
//! Normalizing contract data never returns an error: malformed fields are
//! degraded to defaults instead.

use thiserror::Error;

/// Crowdfund core error types
#[derive(Debug, Error)]
pub enum Error {
    /// A write was attempted without a connected wallet
    #[error("Please connect your wallet first")]
    WalletNotConnected,

    /// User-entered token amount could not be converted to wei
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// User-entered account address is malformed
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// User-entered date could not be parsed
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Launch form failed one or more client-side checks
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Configuration is malformed or inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading an input or config file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input was not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for crowdfund operations
pub type Result<T> = std::result::Result<T, Error>;
