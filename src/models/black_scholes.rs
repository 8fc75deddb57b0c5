//! Black-Scholes Model
//!
//! Provides:
//! - d1/d2 and the density at d1
//! - Delta, gamma, theta, rho and vega, rounded to three decimals
//! - Fair value, collapsing to intrinsic value inside the last trading day
//!
//! The math is a set of pure functions over a [`PricingInputs`] snapshot.
//! [`BlackScholes`] holds the mutable market state and takes a fresh snapshot
//! on every query, so results move as real time passes.
//!
//! Every function returns `None` when the closed form is undefined: expired
//! option, zero time or volatility, missing spot or rate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::normal::{norm_cdf, norm_pdf};
use crate::core::{Greeks, GreeksError, GreeksResult, OptionContract, OptionType, Stock};

/// Below this time to expiry, value is intrinsic value
pub const ONE_TRADING_DAY: f64 = 1.0 / 365.0;

/// Decimals kept on every Greek
pub const GREEK_DECIMALS: i32 = 3;

/// Round half away from zero to `decimals` places
pub fn round_to(x: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (x * scale).round() / scale
}

fn finite(x: f64) -> Option<f64> {
    x.is_finite().then_some(x)
}

/// Rounded greek; a value that rounds to zero is reported as `+0.0`
fn greek(x: f64) -> Option<f64> {
    finite(x).map(|x| round_to(x, GREEK_DECIMALS) + 0.0)
}

/// Snapshot of everything the closed form reads
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingInputs {
    pub spot: f64,
    pub strike: f64,
    pub rate: f64,
    pub volatility: f64,
    /// Years to expiry, negative once expired
    pub time: f64,
    pub option_type: OptionType,
}

/// Black-Scholes d1 parameter
pub fn d1(inputs: &PricingInputs) -> Option<f64> {
    let PricingInputs {
        spot,
        strike,
        rate,
        volatility: vol,
        time,
        ..
    } = *inputs;

    if time < 0.0 {
        return None;
    }

    finite(((spot / strike).ln() + (rate + vol * vol / 2.0) * time) / (vol * time.sqrt()))
}

/// Black-Scholes d2 parameter
pub fn d2(inputs: &PricingInputs) -> Option<f64> {
    let d1 = d1(inputs)?;
    finite(d1 - inputs.volatility * inputs.time.sqrt())
}

/// Standard normal density at d1
pub fn norm_pdf_d1(inputs: &PricingInputs) -> Option<f64> {
    d1(inputs).map(norm_pdf)
}

/// Delta: cdf(d1) for a call, cdf(d1) - 1 for a put
pub fn delta(inputs: &PricingInputs) -> Option<f64> {
    let d1 = d1(inputs)?;
    let delta = match inputs.option_type {
        OptionType::Call => norm_cdf(d1),
        OptionType::Put => norm_cdf(d1) - 1.0,
    };
    greek(delta)
}

/// Gamma, identical for calls and puts
pub fn gamma(inputs: &PricingInputs) -> Option<f64> {
    let pdf_d1 = norm_pdf_d1(inputs)?;
    greek(pdf_d1 / (inputs.spot * inputs.volatility * inputs.time.sqrt()))
}

/// Theta per year. A theta of -10 loses 10 of value over a year of decay.
pub fn theta(inputs: &PricingInputs) -> Option<f64> {
    let d1 = d1(inputs)?;
    let d2 = d2(inputs)?;
    norm_pdf_d1(inputs)?;

    let PricingInputs {
        spot,
        strike,
        rate,
        volatility: vol,
        time,
        option_type,
    } = *inputs;
    let sign = option_type.phi();

    let decay = -spot * norm_cdf(d1) * vol / (2.0 * time.sqrt());
    let carry = sign * rate * strike * (-rate * time).exp() * norm_pdf(sign * d2);

    greek(decay - carry)
}

/// Rho: change in value for a unit change in the risk-free rate
pub fn rho(inputs: &PricingInputs) -> Option<f64> {
    let d2 = d2(inputs)?;
    let sign = inputs.option_type.phi();
    let time = inputs.time;

    greek(sign * inputs.strike * time * (-inputs.rate * time).exp() * norm_cdf(sign * d2))
}

/// Vega, identical for calls and puts
pub fn vega(inputs: &PricingInputs) -> Option<f64> {
    let d1 = d1(inputs)?;
    d2(inputs)?;

    greek(inputs.spot * inputs.time.sqrt() * norm_pdf(d1))
}

/// Fair value. Not rounded.
pub fn value(inputs: &PricingInputs) -> Option<f64> {
    let d1 = d1(inputs)?;
    let d2 = d2(inputs)?;

    let PricingInputs {
        spot,
        strike,
        rate,
        time,
        option_type,
        ..
    } = *inputs;

    // The closed form is unstable this close to expiry
    if time < ONE_TRADING_DAY {
        return Some(option_type.intrinsic(spot, strike));
    }

    let sign = option_type.phi();
    let price_term = spot * norm_cdf(sign * d1);
    let strike_term = strike * (-rate * time).exp() * norm_cdf(sign * d2);

    finite(match option_type {
        OptionType::Call => price_term - strike_term,
        OptionType::Put => strike_term - price_term,
    })
}

/// All five Greeks and the value from one snapshot
pub fn greeks(inputs: &PricingInputs) -> Greeks {
    Greeks {
        delta: delta(inputs),
        gamma: gamma(inputs),
        theta: theta(inputs),
        vega: vega(inputs),
        rho: rho(inputs),
        value: value(inputs),
    }
}

/// Valuation engine for one option on one stock
///
/// Spot price and risk-free rate may be missing while market data is in
/// flight; every query then yields `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct BlackScholes {
    stock: Stock,
    option: OptionContract,
    volatility: f64,
    risk_free_rate: Option<f64>,
}

impl BlackScholes {
    pub fn new(
        stock: Stock,
        option: OptionContract,
        volatility: f64,
        risk_free_rate: f64,
    ) -> GreeksResult<Self> {
        let mut engine = Self::without_rate(stock, option, volatility)?;
        engine.risk_free_rate = Some(risk_free_rate);
        Ok(engine)
    }

    /// Engine whose risk-free rate arrives later
    pub fn without_rate(stock: Stock, option: OptionContract, volatility: f64) -> GreeksResult<Self> {
        validate_volatility(volatility)?;
        Ok(Self {
            stock,
            option,
            volatility,
            risk_free_rate: None,
        })
    }

    pub fn stock(&self) -> &Stock {
        &self.stock
    }

    pub fn option(&self) -> &OptionContract {
        &self.option
    }

    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    pub fn risk_free_rate(&self) -> Option<f64> {
        self.risk_free_rate
    }

    pub fn set_spot(&mut self, price: f64) {
        self.stock.price = Some(price);
    }

    pub fn set_risk_free_rate(&mut self, rate: f64) {
        self.risk_free_rate = Some(rate);
    }

    /// Forget the rate; queries are undefined until a new one is set
    pub fn clear_risk_free_rate(&mut self) {
        self.risk_free_rate = None;
    }

    pub fn set_volatility(&mut self, volatility: f64) -> GreeksResult<()> {
        validate_volatility(volatility)?;
        self.volatility = volatility;
        Ok(())
    }

    pub fn set_option(&mut self, option: OptionContract) {
        self.option = option;
    }

    /// Snapshot of the current state, `None` while spot or rate is missing
    pub fn inputs_at(&self, now: DateTime<Utc>) -> Option<PricingInputs> {
        Some(PricingInputs {
            spot: self.stock.price?,
            strike: self.option.strike(),
            rate: self.risk_free_rate?,
            volatility: self.volatility,
            time: self.option.time_to_expiry(now),
            option_type: self.option.option_type,
        })
    }

    pub fn time_to_expiry(&self) -> f64 {
        self.option.time_to_expiry_now()
    }

    pub fn d1_at(&self, now: DateTime<Utc>) -> Option<f64> {
        d1(&self.inputs_at(now)?)
    }

    pub fn d2_at(&self, now: DateTime<Utc>) -> Option<f64> {
        d2(&self.inputs_at(now)?)
    }

    pub fn norm_pdf_d1_at(&self, now: DateTime<Utc>) -> Option<f64> {
        norm_pdf_d1(&self.inputs_at(now)?)
    }

    pub fn delta_at(&self, now: DateTime<Utc>) -> Option<f64> {
        delta(&self.inputs_at(now)?)
    }

    pub fn gamma_at(&self, now: DateTime<Utc>) -> Option<f64> {
        gamma(&self.inputs_at(now)?)
    }

    pub fn theta_at(&self, now: DateTime<Utc>) -> Option<f64> {
        theta(&self.inputs_at(now)?)
    }

    pub fn rho_at(&self, now: DateTime<Utc>) -> Option<f64> {
        rho(&self.inputs_at(now)?)
    }

    pub fn vega_at(&self, now: DateTime<Utc>) -> Option<f64> {
        vega(&self.inputs_at(now)?)
    }

    pub fn value_at(&self, now: DateTime<Utc>) -> Option<f64> {
        value(&self.inputs_at(now)?)
    }

    pub fn greeks_at(&self, now: DateTime<Utc>) -> Greeks {
        self.inputs_at(now)
            .map(|inputs| greeks(&inputs))
            .unwrap_or_default()
    }

    pub fn d1(&self) -> Option<f64> {
        self.d1_at(Utc::now())
    }

    pub fn d2(&self) -> Option<f64> {
        self.d2_at(Utc::now())
    }

    pub fn norm_pdf_d1(&self) -> Option<f64> {
        self.norm_pdf_d1_at(Utc::now())
    }

    pub fn delta(&self) -> Option<f64> {
        self.delta_at(Utc::now())
    }

    pub fn gamma(&self) -> Option<f64> {
        self.gamma_at(Utc::now())
    }

    pub fn theta(&self) -> Option<f64> {
        self.theta_at(Utc::now())
    }

    pub fn rho(&self) -> Option<f64> {
        self.rho_at(Utc::now())
    }

    pub fn vega(&self) -> Option<f64> {
        self.vega_at(Utc::now())
    }

    pub fn value(&self) -> Option<f64> {
        self.value_at(Utc::now())
    }

    pub fn greeks(&self) -> Greeks {
        self.greeks_at(Utc::now())
    }
}

fn validate_volatility(volatility: f64) -> GreeksResult<()> {
    if !volatility.is_finite() || volatility < 0.0 {
        return Err(GreeksError::invalid_input(format!(
            "volatility must be non-negative, got {}",
            volatility
        )));
    }
    Ok(())
}
