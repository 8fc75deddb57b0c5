//! Black-Scholes Greeks CLI
//!
//! Prices one European option, fetching whatever market data was not given on
//! the command line.

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bs_greeks::prelude::*;

#[derive(Parser)]
#[command(name = "bs-greeks")]
#[command(about = "Black-Scholes value and Greeks for a European stock option")]
struct Args {
    /// Underlying ticker symbol
    #[arg(long)]
    symbol: String,

    /// Strike price
    #[arg(long)]
    strike: f64,

    /// Expiry date (YYYY-MM-DD, midnight UTC)
    #[arg(long)]
    expiry: NaiveDate,

    /// Option kind: call or put
    #[arg(long, default_value = "call")]
    kind: OptionType,

    /// Annualized volatility, e.g. 0.25
    #[arg(long)]
    volatility: f64,

    /// Spot price; fetched from the quote service when omitted
    #[arg(long)]
    spot: Option<f64>,

    /// Risk-free rate as a decimal; fetched from Treasury bill rates when omitted
    #[arg(long)]
    rate: Option<f64>,

    /// Path to configuration file (TOML)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Print the Greeks as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref()).context("loading settings")?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let option = OptionContract::expiring_on(args.strike, args.expiry, args.kind)?.on(&args.symbol);
    let stock = match args.spot {
        Some(price) => Stock::with_price(&args.symbol, price),
        None => Stock::new(&args.symbol),
    };
    let engine = match args.rate {
        Some(rate) => BlackScholes::new(stock, option, args.volatility, rate)?,
        None => BlackScholes::without_rate(stock, option, args.volatility)?,
    };

    let gateway = HttpMarketData::from_settings(&settings)?.shared();
    let mut session = PricingSession::start(engine, gateway);
    session.ready().await.context("fetching market data")?;

    let engine = session.engine();
    let greeks = session.greeks();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&greeks)?);
        return Ok(());
    }

    println!("{} {} {:.2} expiring {}", args.symbol, args.kind, args.strike, args.expiry);
    println!("  Spot: {}", show(engine.stock().price));
    println!("  Rate: {}", show(engine.risk_free_rate()));
    println!("  Vol:  {:.4}", engine.volatility());
    println!("  Time: {:.4} years\n", engine.time_to_expiry());

    println!("  Value: {}", show(greeks.value));
    println!("  Delta: {}", show(greeks.delta));
    println!("  Gamma: {}", show(greeks.gamma));
    println!("  Theta: {}", show(greeks.theta));
    println!("  Vega:  {}", show(greeks.vega));
    println!("  Rho:   {}", show(greeks.rho));

    Ok(())
}

fn show(x: Option<f64>) -> String {
    x.map(|v| format!("{:.4}", v)).unwrap_or_else(|| "n/a".to_string())
}
