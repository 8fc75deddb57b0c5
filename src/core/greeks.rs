//! Option Greeks
//!
//! First and second order sensitivities plus fair value, each of which may be
//! undefined for the current market state.

use serde::{Deserialize, Serialize};

/// Option Greeks (sensitivities) and fair value for one evaluation instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta: dV/dS (sensitivity to spot)
    pub delta: Option<f64>,
    /// Gamma: d²V/dS² (sensitivity of delta to spot)
    pub gamma: Option<f64>,
    /// Theta: dV/dt (time decay, per year)
    pub theta: Option<f64>,
    /// Vega: dV/dσ (sensitivity to volatility)
    pub vega: Option<f64>,
    /// Rho: dV/dr (sensitivity to interest rate)
    pub rho: Option<f64>,
    /// Fair value of the option
    pub value: Option<f64>,
}

impl Greeks {
    /// Every output undefined
    pub fn undefined() -> Self {
        Self::default()
    }

    /// True when every Greek and the value are defined
    pub fn is_complete(&self) -> bool {
        self.delta.is_some()
            && self.gamma.is_some()
            && self.theta.is_some()
            && self.vega.is_some()
            && self.rho.is_some()
            && self.value.is_some()
    }

    /// True when nothing could be computed
    pub fn is_undefined(&self) -> bool {
        *self == Self::undefined()
    }
}
