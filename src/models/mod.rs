//! Pricing models
//!
//! - normal: Standard normal pdf/cdf
//! - black_scholes: Closed-form valuation engine and Greeks

pub mod black_scholes;
pub mod normal;

pub use black_scholes::{
    d1, d2, delta, gamma, greeks, norm_pdf_d1, rho, round_to, theta, value, vega, BlackScholes,
    PricingInputs, GREEK_DECIMALS, ONE_TRADING_DAY,
};
pub use normal::{norm_cdf, norm_pdf};
