//! Error types for the Greeks engine
//!
//! Only collaborator failures are errors. An undefined Black-Scholes result
//! (expired option, missing spot or rate) is an `Option::None`, never a
//! `GreeksError`.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GreeksError {
    #[error("Price unavailable for {symbol}")]
    PriceUnavailable { symbol: String },

    #[error("Option expired at {expiry}")]
    OptionExpired { expiry: DateTime<Utc> },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Task error: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

pub type GreeksResult<T> = Result<T, GreeksError>;

impl GreeksError {
    pub fn price_unavailable(symbol: impl Into<String>) -> Self {
        Self::PriceUnavailable {
            symbol: symbol.into(),
        }
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<reqwest::Error> for GreeksError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Data(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}
