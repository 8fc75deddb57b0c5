//! Core data types for the Greeks engine
//!
//! Defines fundamental types:
//! - OptionContract: Strike, expiry, type (call/put)
//! - Stock: Underlying symbol and spot price
//! - Greeks: Sensitivities and fair value
//! - GreeksError: Collaborator failures

pub mod asset;
pub mod error;
pub mod greeks;
pub mod option;

pub use asset::*;
pub use error::*;
pub use greeks::*;
pub use option::*;
