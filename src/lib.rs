//! # Black-Scholes Greeks
//!
//! Prices a single European stock option and computes its Greeks with the
//! Black-Scholes closed form.
//!
//! ## Key Components
//!
//! - **Normal distribution**: pdf and a stable cdf
//! - **Black-Scholes**: d1/d2, delta, gamma, theta, rho, vega and fair value
//! - **Market data**: IEX spot quotes and Treasury bill risk-free rates
//! - **Pricing session**: fills spot and rate in the background
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bs_greeks::prelude::*;
//! use chrono::NaiveDate;
//!
//! # async fn run() -> GreeksResult<()> {
//! let settings = Settings::load(None)?;
//! let gateway = HttpMarketData::from_settings(&settings)?.shared();
//!
//! let expiry = NaiveDate::from_ymd_opt(2030, 1, 18).unwrap();
//! let option = OptionContract::expiring_on(100.0, expiry, OptionType::Call)?.on("AAPL");
//!
//! let mut session = PricingSession::for_symbol("AAPL", option, 0.25, gateway)?;
//! session.ready().await?;
//!
//! let greeks = session.greeks();
//! println!("delta = {:?}", greeks.delta);
//! # Ok(())
//! # }
//! ```
//!
//! ## Undefined Results
//!
//! Every Greek is an `Option<f64>`. `None` means the closed form is undefined
//! for the current state: the option has expired, or spot or rate has not
//! arrived yet. It is a normal branch, not an error.

pub mod config;
pub mod core;
pub mod data;
pub mod models;
pub mod session;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{GreeksError, GreeksResult, Greeks, OptionContract, OptionType, Stock};

    // Configuration
    pub use crate::config::Settings;

    // Data fetching
    pub use crate::data::{
        BillRates, BillTenor, HttpMarketData, IexClient, MarketDataGateway, SharedGateway,
        SpotQuote, TreasuryClient,
    };

    // Models
    pub use crate::models::{
        greeks as bs_greeks, norm_cdf, norm_pdf, value as bs_value, BlackScholes, PricingInputs,
    };

    // Session
    pub use crate::session::PricingSession;
}

// Re-export main types at crate root
pub use crate::core::{GreeksError, GreeksResult};
pub use crate::models::BlackScholes;
pub use crate::session::PricingSession;
