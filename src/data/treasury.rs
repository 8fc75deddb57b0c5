//! Treasury bill rates
//!
//! Picks the risk-free rate from the US Treasury daily bill rates dataset
//! (`USTREASURY/BILLRATES`). The bill whose maturity is nearest to the option's
//! time to expiry wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Settings;
use crate::core::{weeks_until, GreeksError, GreeksResult};

const DATASET_PATH: &str = "/api/v3/datasets/USTREASURY/BILLRATES.json";

/// Bill maturities published in the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillTenor {
    FourWeek,
    ThirteenWeek,
    TwentySixWeek,
    FiftyTwoWeek,
}

impl BillTenor {
    pub const ALL: [BillTenor; 4] = [
        BillTenor::FourWeek,
        BillTenor::ThirteenWeek,
        BillTenor::TwentySixWeek,
        BillTenor::FiftyTwoWeek,
    ];

    pub fn weeks(&self) -> f64 {
        match self {
            BillTenor::FourWeek => 4.0,
            BillTenor::ThirteenWeek => 13.0,
            BillTenor::TwentySixWeek => 26.0,
            BillTenor::FiftyTwoWeek => 52.0,
        }
    }

    /// Nearest tenor. Boundaries sit halfway between neighbouring maturities
    /// and belong to the shorter bill.
    pub fn nearest(weeks_to_expiry: f64) -> Self {
        Self::ALL
            .windows(2)
            .find(|pair| weeks_to_expiry <= (pair[0].weeks() + pair[1].weeks()) / 2.0)
            .map(|pair| pair[0])
            .unwrap_or(BillTenor::FiftyTwoWeek)
    }

    /// Bank discount column in a dataset row (column 0 is the date)
    fn column(&self) -> usize {
        match self {
            BillTenor::FourWeek => 1,
            BillTenor::ThirteenWeek => 3,
            BillTenor::TwentySixWeek => 5,
            BillTenor::FiftyTwoWeek => 7,
        }
    }
}

/// One day of bill rates, in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillRates {
    pub date: String,
    pub four_week: f64,
    pub thirteen_week: f64,
    pub twenty_six_week: f64,
    pub fifty_two_week: f64,
}

impl BillRates {
    fn from_row(row: &[Value]) -> GreeksResult<Self> {
        let date = row
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| GreeksError::data("bill rate row has no date"))?
            .to_string();

        let rate = |tenor: BillTenor| {
            row.get(tenor.column())
                .and_then(Value::as_f64)
                .ok_or_else(|| {
                    GreeksError::data(format!("no {}-week rate for {}", tenor.weeks(), date))
                })
        };

        Ok(Self {
            four_week: rate(BillTenor::FourWeek)?,
            thirteen_week: rate(BillTenor::ThirteenWeek)?,
            twenty_six_week: rate(BillTenor::TwentySixWeek)?,
            fifty_two_week: rate(BillTenor::FiftyTwoWeek)?,
            date,
        })
    }

    pub fn percent(&self, tenor: BillTenor) -> f64 {
        match tenor {
            BillTenor::FourWeek => self.four_week,
            BillTenor::ThirteenWeek => self.thirteen_week,
            BillTenor::TwentySixWeek => self.twenty_six_week,
            BillTenor::FiftyTwoWeek => self.fifty_two_week,
        }
    }

    /// Rate as a decimal, e.g. 0.0102 for 1.02%
    pub fn decimal(&self, tenor: BillTenor) -> f64 {
        self.percent(tenor) / 100.0
    }
}

/// Treasury dataset client
#[derive(Debug, Clone)]
pub struct TreasuryClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl TreasuryClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_settings(settings: &Settings) -> GreeksResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self::new(
            settings.treasury_base_url.clone(),
            settings.treasury_api_key.clone(),
            client,
        ))
    }

    /// Most recent row of the dataset
    pub async fn latest_bill_rates(&self) -> GreeksResult<BillRates> {
        let url = format!("{}{}", self.base_url, DATASET_PATH);
        tracing::debug!(%url, "requesting treasury bill rates");

        let mut request = self.client.get(&url).query(&[("rows", "1")]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("api_key", key.as_str())]);
        }

        let response: DatasetResponse = request.send().await?.error_for_status()?.json().await?;
        let row = response
            .dataset
            .data
            .first()
            .ok_or_else(|| GreeksError::data("treasury dataset returned no rows"))?;

        BillRates::from_row(row)
    }

    /// Risk-free rate for an option expiring at `expiry`, measured from `now`
    pub async fn risk_free_rate_at(
        &self,
        expiry: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> GreeksResult<f64> {
        let weeks = weeks_until(expiry, now);
        if weeks < 0.0 {
            return Err(GreeksError::OptionExpired { expiry });
        }

        let tenor = BillTenor::nearest(weeks);
        let rates = self.latest_bill_rates().await?;
        tracing::debug!(?tenor, weeks, date = %rates.date, "selected bill rate");

        Ok(rates.decimal(tenor))
    }

    pub async fn risk_free_rate(&self, expiry: DateTime<Utc>) -> GreeksResult<f64> {
        self.risk_free_rate_at(expiry, Utc::now()).await
    }
}

// Dataset response structures

#[derive(Debug, Deserialize)]
struct DatasetResponse {
    dataset: Dataset,
}

#[derive(Debug, Deserialize)]
struct Dataset {
    data: Vec<Vec<Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nearest_tenor() {
        assert_eq!(BillTenor::nearest(0.0), BillTenor::FourWeek);
        assert_eq!(BillTenor::nearest(8.5), BillTenor::FourWeek);
        assert_eq!(BillTenor::nearest(8.6), BillTenor::ThirteenWeek);
        assert_eq!(BillTenor::nearest(19.5), BillTenor::ThirteenWeek);
        assert_eq!(BillTenor::nearest(20.0), BillTenor::TwentySixWeek);
        assert_eq!(BillTenor::nearest(39.0), BillTenor::TwentySixWeek);
        assert_eq!(BillTenor::nearest(39.1), BillTenor::FiftyTwoWeek);
        assert_eq!(BillTenor::nearest(120.0), BillTenor::FiftyTwoWeek);
    }

    #[test]
    fn test_row_parsing() {
        let row = vec![
            json!("2017-06-23"),
            json!(0.86),
            json!(0.87),
            json!(0.98),
            json!(1.0),
            json!(1.08),
            json!(1.11),
            json!(1.15),
            json!(1.17),
        ];
        let rates = BillRates::from_row(&row).unwrap();

        assert_eq!(rates.date, "2017-06-23");
        assert_eq!(rates.percent(BillTenor::FourWeek), 0.86);
        assert_eq!(rates.percent(BillTenor::ThirteenWeek), 0.98);
        assert_eq!(rates.percent(BillTenor::TwentySixWeek), 1.08);
        assert_eq!(rates.percent(BillTenor::FiftyTwoWeek), 1.15);
        assert!((rates.decimal(BillTenor::FiftyTwoWeek) - 0.0115).abs() < 1e-12);
    }

    #[test]
    fn test_short_row_is_data_error() {
        let row = vec![json!("2017-06-23"), json!(0.86)];
        assert!(matches!(BillRates::from_row(&row), Err(GreeksError::Data(_))));
    }

    #[tokio::test]
    async fn test_expired_option_fails_before_request() {
        // Unroutable host: reaching the network would be a Network error
        let client = TreasuryClient::new("http://127.0.0.1:9", None, reqwest::Client::new());
        let now = Utc::now();
        let expiry = now - chrono::Duration::days(1);

        let err = client.risk_free_rate_at(expiry, now).await.unwrap_err();
        assert!(matches!(err, GreeksError::OptionExpired { expiry: e } if e == expiry));
    }
}
