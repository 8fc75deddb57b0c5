//! Market data gateway
//!
//! The valuation engine only needs two numbers from the outside world: the
//! spot price of the underlying and a risk-free rate for the option's tenor.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{IexClient, TreasuryClient};
use crate::config::Settings;
use crate::core::GreeksResult;

/// Asynchronous source of spot prices and risk-free rates
#[async_trait]
pub trait MarketDataGateway: Send + Sync {
    /// Latest spot price for `symbol`. Fails with `PriceUnavailable` when the
    /// upstream has no quote.
    async fn current_price(&self, symbol: &str) -> GreeksResult<f64>;

    /// Risk-free rate, as a decimal, for an option expiring at `expiry`. Fails
    /// with `OptionExpired` when `expiry` is already past.
    async fn risk_free_rate(&self, expiry: DateTime<Utc>) -> GreeksResult<f64>;
}

/// Gateway shared between the session and its fetch tasks
pub type SharedGateway = Arc<dyn MarketDataGateway>;

/// HTTP gateway: IEX for quotes, the Treasury bill dataset for rates
#[derive(Debug, Clone)]
pub struct HttpMarketData {
    quotes: IexClient,
    treasury: TreasuryClient,
}

impl HttpMarketData {
    pub fn new(quotes: IexClient, treasury: TreasuryClient) -> Self {
        Self { quotes, treasury }
    }

    pub fn from_settings(settings: &Settings) -> GreeksResult<Self> {
        Ok(Self::new(
            IexClient::from_settings(settings)?,
            TreasuryClient::from_settings(settings)?,
        ))
    }

    pub fn shared(self) -> SharedGateway {
        Arc::new(self)
    }
}

#[async_trait]
impl MarketDataGateway for HttpMarketData {
    async fn current_price(&self, symbol: &str) -> GreeksResult<f64> {
        self.quotes.current_price(symbol).await
    }

    async fn risk_free_rate(&self, expiry: DateTime<Utc>) -> GreeksResult<f64> {
        self.treasury.risk_free_rate(expiry).await
    }
}
