//! Pricing session
//!
//! Couples a [`BlackScholes`] engine with a market data gateway. Missing spot
//! price and risk-free rate are fetched on background tasks and written into
//! the engine; queries never wait for them and see `None` until the data
//! lands. Moving the expiry through [`PricingSession::update`] drops the rate
//! and fetches the one for the new tenor.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::task::JoinHandle;

use crate::core::{Greeks, GreeksError, GreeksResult, OptionContract, Stock};
use crate::data::SharedGateway;
use crate::models::BlackScholes;

type Fetch = JoinHandle<GreeksResult<f64>>;

/// An engine whose market inputs arrive asynchronously
pub struct PricingSession {
    engine: Arc<RwLock<BlackScholes>>,
    gateway: SharedGateway,
    price_fetch: Option<Fetch>,
    rate_fetch: Option<Fetch>,
}

impl PricingSession {
    /// Spawn fetches for whatever `engine` is missing. Must be called from
    /// within a tokio runtime.
    pub fn start(engine: BlackScholes, gateway: SharedGateway) -> Self {
        let symbol = engine.stock().symbol.clone();
        let expiry = engine.option().expiry;
        let needs_price = !engine.stock().has_price();
        let needs_rate = engine.risk_free_rate().is_none();

        let engine = Arc::new(RwLock::new(engine));

        let price_fetch =
            needs_price.then(|| spawn_price_fetch(engine.clone(), gateway.clone(), symbol));
        let rate_fetch =
            needs_rate.then(|| spawn_rate_fetch(engine.clone(), gateway.clone(), expiry));

        Self {
            engine,
            gateway,
            price_fetch,
            rate_fetch,
        }
    }

    /// Session for a bare symbol: spot and rate are both fetched
    pub fn for_symbol(
        symbol: impl Into<String>,
        option: OptionContract,
        volatility: f64,
        gateway: SharedGateway,
    ) -> GreeksResult<Self> {
        let engine = BlackScholes::without_rate(Stock::new(symbol), option, volatility)?;
        Ok(Self::start(engine, gateway))
    }

    /// Copy of the engine as it stands now
    pub fn engine(&self) -> BlackScholes {
        self.engine.read().clone()
    }

    /// Mutate the engine in place, e.g. to change volatility.
    ///
    /// If `f` moves the option's expiry without setting a rate itself, the
    /// current rate belongs to the wrong tenor: it is cleared and refetched for
    /// the new expiry, and any rate fetch still in flight is aborted. That
    /// refetch needs a tokio runtime.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut BlackScholes) -> R) -> R {
        let mut engine = self.engine.write();
        let expiry = engine.option().expiry;
        let rate = engine.risk_free_rate();

        let result = f(&mut engine);

        let new_expiry = engine.option().expiry;
        if new_expiry != expiry && engine.risk_free_rate() == rate {
            engine.clear_risk_free_rate();
            drop(engine);

            if let Some(stale) = self.rate_fetch.take() {
                stale.abort();
            }
            tracing::debug!(%expiry, %new_expiry, "expiry moved, refetching risk-free rate");
            self.rate_fetch = Some(spawn_rate_fetch(
                self.engine.clone(),
                self.gateway.clone(),
                new_expiry,
            ));
        }
        result
    }

    pub fn is_ready(&self) -> bool {
        let engine = self.engine.read();
        engine.stock().has_price() && engine.risk_free_rate().is_some()
    }

    pub fn greeks_at(&self, now: DateTime<Utc>) -> Greeks {
        self.engine.read().greeks_at(now)
    }

    pub fn greeks(&self) -> Greeks {
        self.greeks_at(Utc::now())
    }

    /// Wait for the spot price fetch, surfacing its error
    pub async fn wait_for_price(&mut self) -> GreeksResult<f64> {
        if let Some(fetch) = self.price_fetch.take() {
            return join(fetch).await;
        }
        let engine = self.engine.read();
        engine
            .stock()
            .price
            .ok_or_else(|| GreeksError::price_unavailable(engine.stock().symbol.clone()))
    }

    /// Wait for the risk-free rate fetch, surfacing its error
    pub async fn wait_for_rate(&mut self) -> GreeksResult<f64> {
        if let Some(fetch) = self.rate_fetch.take() {
            return join(fetch).await;
        }
        self.engine
            .read()
            .risk_free_rate()
            .ok_or_else(|| GreeksError::data("risk-free rate was never fetched"))
    }

    /// Wait for both inputs. The price error wins when both fail.
    pub async fn ready(&mut self) -> GreeksResult<()> {
        let price = self.wait_for_price().await;
        let rate = self.wait_for_rate().await;
        price?;
        rate?;
        Ok(())
    }
}

impl Drop for PricingSession {
    fn drop(&mut self) {
        for fetch in [self.price_fetch.take(), self.rate_fetch.take()].into_iter().flatten() {
            fetch.abort();
        }
    }
}

async fn join(fetch: Fetch) -> GreeksResult<f64> {
    fetch
        .await
        .map_err(|e| GreeksError::Task(e.to_string()))?
}

fn spawn_price_fetch(
    engine: Arc<RwLock<BlackScholes>>,
    gateway: SharedGateway,
    symbol: String,
) -> Fetch {
    tokio::spawn(async move {
        match gateway.current_price(&symbol).await {
            Ok(price) => {
                engine.write().set_spot(price);
                tracing::info!(%symbol, price, "spot price received");
                Ok(price)
            }
            Err(e) => {
                tracing::warn!(%symbol, error = %e, "spot price fetch failed");
                Err(e)
            }
        }
    })
}

fn spawn_rate_fetch(
    engine: Arc<RwLock<BlackScholes>>,
    gateway: SharedGateway,
    expiry: DateTime<Utc>,
) -> Fetch {
    tokio::spawn(async move {
        match gateway.risk_free_rate(expiry).await {
            Ok(rate) => {
                let mut engine = engine.write();
                if engine.option().expiry != expiry {
                    tracing::debug!(%expiry, rate, "discarding rate for superseded expiry");
                    return Ok(rate);
                }
                engine.set_risk_free_rate(rate);
                tracing::info!(%expiry, rate, "risk-free rate received");
                Ok(rate)
            }
            Err(e) => {
                tracing::warn!(%expiry, error = %e, "risk-free rate fetch failed");
                Err(e)
            }
        }
    })
}
