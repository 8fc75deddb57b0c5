//! Market data fetching
//!
//! Handles:
//! - IEX quotes for the underlying spot price
//! - Treasury bill rates for the risk-free rate
//! - The async gateway trait the pricing session depends on

pub mod gateway;
pub mod iex;
pub mod treasury;

pub use gateway::*;
pub use iex::*;
pub use treasury::*;
