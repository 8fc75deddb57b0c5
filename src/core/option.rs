//! Option contract definitions
//!
//! A single European option on a stock: strike, expiry instant and kind.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GreeksError, GreeksResult};

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Milliseconds in a 365.25-day year
const MILLIS_PER_YEAR: f64 = 365.25 * MILLIS_PER_DAY;

/// Weeks from `now` until `expiry`, negative once `expiry` has passed
pub fn weeks_until(expiry: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (expiry - now).num_milliseconds() as f64 / (7.0 * MILLIS_PER_DAY)
}

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Payoff direction: +1 for call, -1 for put
    pub fn phi(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Intrinsic value at given spot: max(phi * (S - K), 0)
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        (self.phi() * (spot - strike)).max(0.0)
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = GreeksError;

    fn from_str(s: &str) -> GreeksResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            other => Err(GreeksError::invalid_input(format!(
                "unknown option type '{}', expected call or put",
                other
            ))),
        }
    }
}

/// Option contract specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ContractFields")]
pub struct OptionContract {
    /// Strike price, always > 0
    strike: f64,
    /// Expiration instant
    pub expiry: DateTime<Utc>,
    /// Option type (Call/Put)
    pub option_type: OptionType,
    /// Underlying symbol, informational only
    pub underlying: Option<String>,
}

/// Wire form of [`OptionContract`], validated on the way in
#[derive(Deserialize)]
struct ContractFields {
    strike: f64,
    expiry: DateTime<Utc>,
    option_type: OptionType,
    #[serde(default)]
    underlying: Option<String>,
}

impl TryFrom<ContractFields> for OptionContract {
    type Error = GreeksError;

    fn try_from(fields: ContractFields) -> GreeksResult<Self> {
        let mut contract = Self::european(fields.strike, fields.expiry, fields.option_type)?;
        contract.underlying = fields.underlying;
        Ok(contract)
    }
}

impl OptionContract {
    /// Create a new European option. Rejects a non-positive or non-finite strike.
    pub fn european(
        strike: f64,
        expiry: DateTime<Utc>,
        option_type: OptionType,
    ) -> GreeksResult<Self> {
        Self::validate_strike(strike)?;
        Ok(Self {
            strike,
            expiry,
            option_type,
            underlying: None,
        })
    }

    /// European option expiring at midnight UTC on `date`
    pub fn expiring_on(
        strike: f64,
        date: NaiveDate,
        option_type: OptionType,
    ) -> GreeksResult<Self> {
        Self::european(strike, date.and_time(NaiveTime::MIN).and_utc(), option_type)
    }

    /// Attach the underlying symbol
    pub fn on(mut self, underlying: impl Into<String>) -> Self {
        self.underlying = Some(underlying.into());
        self
    }

    pub fn strike(&self) -> f64 {
        self.strike
    }

    pub fn set_strike(&mut self, strike: f64) -> GreeksResult<()> {
        Self::validate_strike(strike)?;
        self.strike = strike;
        Ok(())
    }

    fn validate_strike(strike: f64) -> GreeksResult<()> {
        if !strike.is_finite() || strike <= 0.0 {
            return Err(GreeksError::invalid_input(format!(
                "strike must be positive, got {}",
                strike
            )));
        }
        Ok(())
    }

    /// Time to expiry in years from `now`. Negative once expired.
    pub fn time_to_expiry(&self, now: DateTime<Utc>) -> f64 {
        (self.expiry - now).num_milliseconds() as f64 / MILLIS_PER_YEAR
    }

    /// Time to expiry from the current instant
    pub fn time_to_expiry_now(&self) -> f64 {
        self.time_to_expiry(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_option_type() {
        assert_eq!(OptionType::Call.phi(), 1.0);
        assert_eq!(OptionType::Put.phi(), -1.0);

        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.intrinsic(110.0, 100.0), 0.0);
    }

    #[test]
    fn test_parse_option_type() {
        assert_eq!("Call".parse::<OptionType>().unwrap(), OptionType::Call);
        assert_eq!(" PUT ".parse::<OptionType>().unwrap(), OptionType::Put);
        assert_eq!("p".parse::<OptionType>().unwrap(), OptionType::Put);
        assert!(matches!(
            "straddle".parse::<OptionType>(),
            Err(GreeksError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_strike_must_be_positive() {
        let expiry = Utc.with_ymd_and_hms(2025, 6, 20, 0, 0, 0).unwrap();
        assert!(OptionContract::european(0.0, expiry, OptionType::Call).is_err());
        assert!(OptionContract::european(-5.0, expiry, OptionType::Put).is_err());
        assert!(OptionContract::european(f64::NAN, expiry, OptionType::Put).is_err());

        let mut opt = OptionContract::european(100.0, expiry, OptionType::Call).unwrap();
        assert!(opt.set_strike(-1.0).is_err());
        assert_eq!(opt.strike(), 100.0);
    }

    #[test]
    fn test_deserialize_validates_strike() {
        let expiry = Utc.with_ymd_and_hms(2017, 7, 24, 0, 0, 0).unwrap();
        let opt = OptionContract::european(100.0, expiry, OptionType::Put)
            .unwrap()
            .on("fb");
        let json = serde_json::to_string(&opt).unwrap();
        assert_eq!(serde_json::from_str::<OptionContract>(&json).unwrap(), opt);

        let bad = r#"{"strike":-5.0,"expiry":"2017-07-24T00:00:00Z","option_type":"call"}"#;
        let err = serde_json::from_str::<OptionContract>(bad).unwrap_err();
        assert!(err.to_string().contains("strike must be positive"));

        let bare = r#"{"strike":100.0,"expiry":"2017-07-24T00:00:00Z","option_type":"put"}"#;
        let parsed: OptionContract = serde_json::from_str(bare).unwrap();
        assert_eq!(parsed.underlying, None);
        assert_eq!(parsed.strike(), 100.0);
    }

    #[test]
    fn test_time_to_expiry() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let opt = OptionContract::european(500.0, now + Duration::days(365), OptionType::Call)
            .unwrap()
            .on("QQQ");

        let tte = opt.time_to_expiry(now);
        assert!((tte - 365.0 / 365.25).abs() < 1e-12);
        assert_eq!(opt.underlying.as_deref(), Some("QQQ"));

        // Expired options report negative time
        let later = now + Duration::days(400);
        assert!(opt.time_to_expiry(later) < 0.0);
    }

    #[test]
    fn test_expiring_on_midnight() {
        let date = NaiveDate::from_ymd_opt(2017, 7, 24).unwrap();
        let opt = OptionContract::expiring_on(100.0, date, OptionType::Put).unwrap();
        assert_eq!(opt.expiry, Utc.with_ymd_and_hms(2017, 7, 24, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_weeks_until() {
        let expiry = Utc.with_ymd_and_hms(2017, 7, 24, 0, 0, 0).unwrap();
        assert!((weeks_until(expiry, expiry - Duration::weeks(3)) - 3.0).abs() < 1e-12);
        assert!((weeks_until(expiry, expiry - Duration::days(1)) - 1.0 / 7.0).abs() < 1e-12);
        assert!(weeks_until(expiry, expiry + Duration::hours(1)) < 0.0);
    }
}
