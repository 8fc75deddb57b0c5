//! IEX quote fetcher
//!
//! Reads the last official price of a stock from the IEX `quote` endpoint,
//! falling back to the delayed price when no live print is available.

use chrono::{DateTime, Utc};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::core::{GreeksError, GreeksResult};

/// IEX API client
#[derive(Debug, Clone)]
pub struct IexClient {
    client: reqwest::Client,
    base_url: String,
}

impl IexClient {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> GreeksResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self::new(settings.quote_base_url.clone(), client))
    }

    /// Quote endpoint for `symbol`, kept to a single encoded path segment
    fn quote_url(&self, symbol: &str) -> GreeksResult<Url> {
        let bad_url = |reason: String| {
            GreeksError::config(format!("bad quote url '{}': {}", self.base_url, reason))
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| bad_url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| bad_url("cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["stock", symbol, "quote"]);
        Ok(url)
    }

    /// Get current quote for a symbol
    pub async fn get_quote(&self, symbol: &str) -> GreeksResult<SpotQuote> {
        let url = self.quote_url(symbol)?;
        tracing::debug!(%url, "requesting quote");

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(GreeksError::price_unavailable(symbol));
        }

        let data: Option<IexQuoteData> = response.error_for_status()?.json().await?;
        SpotQuote::from_iex(symbol, data)
    }

    /// Spot price only
    pub async fn current_price(&self, symbol: &str) -> GreeksResult<f64> {
        Ok(self.get_quote(symbol).await?.price)
    }
}

/// Which IEX field produced the price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceSource {
    Latest,
    Delayed,
}

/// Spot price quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotQuote {
    pub symbol: String,
    pub price: f64,
    pub source: PriceSource,
    pub timestamp: DateTime<Utc>,
}

impl SpotQuote {
    /// Latest price, else delayed price. A missing body or both fields absent is
    /// `PriceUnavailable`; there is no zero fallback.
    fn from_iex(symbol: &str, data: Option<IexQuoteData>) -> GreeksResult<Self> {
        let data = data.ok_or_else(|| GreeksError::price_unavailable(symbol))?;

        let (price, source) = match (data.latest_price, data.delayed_price) {
            (Some(price), _) => (price, PriceSource::Latest),
            (None, Some(price)) => (price, PriceSource::Delayed),
            (None, None) => return Err(GreeksError::price_unavailable(symbol)),
        };

        Ok(Self {
            symbol: symbol.to_string(),
            price,
            source,
            timestamp: Utc::now(),
        })
    }
}

// IEX API response structures

#[derive(Debug, Deserialize)]
struct IexQuoteData {
    #[serde(rename = "latestPrice")]
    latest_price: Option<f64>,
    #[serde(rename = "delayedPrice")]
    delayed_price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<IexQuoteData> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_prefers_latest_price() {
        let quote = SpotQuote::from_iex(
            "fb",
            parse(r#"{"symbol":"FB","latestPrice":151.2,"delayedPrice":150.9}"#),
        )
        .unwrap();

        assert_eq!(quote.price, 151.2);
        assert_eq!(quote.source, PriceSource::Latest);
    }

    #[test]
    fn test_falls_back_to_delayed_price() {
        let quote =
            SpotQuote::from_iex("fb", parse(r#"{"latestPrice":null,"delayedPrice":150.9}"#)).unwrap();

        assert_eq!(quote.price, 150.9);
        assert_eq!(quote.source, PriceSource::Delayed);
    }

    #[test]
    fn test_no_price_is_an_error() {
        let err = SpotQuote::from_iex("fb", parse(r#"{"companyName":"Facebook"}"#)).unwrap_err();
        assert!(matches!(err, GreeksError::PriceUnavailable { ref symbol } if symbol == "fb"));

        let err = SpotQuote::from_iex("fb", parse("null")).unwrap_err();
        assert!(matches!(err, GreeksError::PriceUnavailable { .. }));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = IexClient::new("https://api.iextrading.com/1.0/", reqwest::Client::new());
        assert_eq!(client.base_url, "https://api.iextrading.com/1.0");
        assert_eq!(
            client.quote_url("fb").unwrap().as_str(),
            "https://api.iextrading.com/1.0/stock/fb/quote"
        );
    }

    #[test]
    fn test_symbol_stays_in_its_path_segment() {
        let client = IexClient::new("https://api.iextrading.com/1.0", reqwest::Client::new());

        let url = client.quote_url("brk/b?x=1#y").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.iextrading.com/1.0/stock/brk%2Fb%3Fx=1%23y/quote"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);

        let root = IexClient::new("http://127.0.0.1:8080", reqwest::Client::new());
        assert_eq!(root.quote_url("fb").unwrap().path(), "/stock/fb/quote");
    }

    #[test]
    fn test_unparseable_base_url_is_config_error() {
        let client = IexClient::new("not a url", reqwest::Client::new());
        assert!(matches!(client.quote_url("fb"), Err(GreeksError::Config(_))));
    }
}
