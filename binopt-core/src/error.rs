//! Error types for binopt-core

use thiserror::Error;

/// Result type alias for binopt operations
pub type Result<T> = std::result::Result<T, MarketError>;

/// Error types for market operations
#[derive(Error, Debug)]
pub enum MarketError {
    /// Bad construction input
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Operation attempted outside its legal phase
    #[error("Invalid phase: {operation} requires {expected}, market is {actual}")]
    InvalidPhase {
        operation: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// Resolution attempted before maturity
    #[error("Too early: maturity at {maturity_time}, now is {now}")]
    TooEarly { maturity_time: i64, now: i64 },

    /// Oracle adapter query failed
    #[error("Oracle unavailable: {0}")]
    OracleUnavailable(String),

    /// Zero-value bid
    #[error("Invalid amount: bid amount must be greater than zero")]
    InvalidAmount,

    /// Participant already withdrew their reward
    #[error("Reward already claimed by {0}")]
    AlreadyClaimed(String),

    /// Nothing to pay out
    #[error("No stake: {0}")]
    NoStake(String),

    /// Caller is not the market owner
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Outbound payout was refused by the funds sink
    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    /// Settlement or ledger arithmetic exceeded u128
    #[error("Arithmetic overflow in {0}")]
    Overflow(&'static str),

    /// Factory lookup miss
    #[error("Unknown market: {0}")]
    UnknownMarket(String),

    /// Participant identity could not be parsed
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    /// Secp256k1 errors
    #[error("Secp256k1 error: {0}")]
    Secp256k1(#[from] secp256k1::Error),

    /// Hex decoding errors
    #[error("Hex decoding error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Serde JSON errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MarketError {
    /// Stable category code surfaced to callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidParameter(_) => "InvalidParameter",
            Self::InvalidPhase { .. } => "InvalidPhase",
            Self::TooEarly { .. } => "TooEarly",
            Self::OracleUnavailable(_) => "OracleUnavailable",
            Self::InvalidAmount => "InvalidAmount",
            Self::AlreadyClaimed(_) => "AlreadyClaimed",
            Self::NoStake(_) => "NoStake",
            Self::Unauthorized(_) => "Unauthorized",
            Self::TransferFailed(_) => "TransferFailed",
            Self::Overflow(_) => "Overflow",
            Self::UnknownMarket(_) => "UnknownMarket",
            Self::InvalidIdentity(_) | Self::Secp256k1(_) | Self::Hex(_) => "InvalidIdentity",
            Self::Json(_) => "Json",
            Self::Io(_) => "Io",
        }
    }
}
