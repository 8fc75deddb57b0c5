//! Example: Black-Scholes Greeks without network access
//!
//! Run with: cargo run --example basic_pricing

use bs_greeks::prelude::*;
use chrono::{Duration, Utc};

fn main() -> GreeksResult<()> {
    let now = Utc::now();
    let expiry = now + Duration::days(29);

    let stock = Stock::with_price("fb", 100.0);
    let call = OptionContract::european(100.0, expiry, OptionType::Call)?.on("fb");
    let put = OptionContract::european(100.0, expiry, OptionType::Put)?.on("fb");

    let call_engine = BlackScholes::new(stock.clone(), call, 0.1, 0.06)?;
    let put_engine = BlackScholes::new(stock, put, 0.1, 0.06)?;

    println!("=== Black-Scholes Greeks ===\n");
    println!("Spot:     $100.00");
    println!("Strike:   $100.00");
    println!("Time:     {:.4} years", call_engine.time_to_expiry());
    println!("Rate:     6.0%");
    println!("Vol:      10.0%\n");

    for (label, engine) in [("Call", &call_engine), ("Put", &put_engine)] {
        let greeks = engine.greeks_at(now);
        println!("{}:", label);
        println!("  Value: {:?}", greeks.value);
        println!("  Delta: {:?}", greeks.delta);
        println!("  Gamma: {:?}", greeks.gamma);
        println!("  Theta: {:?}", greeks.theta);
        println!("  Vega:  {:?}", greeks.vega);
        println!("  Rho:   {:?}\n", greeks.rho);
    }

    // Put-call parity: C - P = S - K*e^(-rT)
    if let (Some(c), Some(p)) = (call_engine.value_at(now), put_engine.value_at(now)) {
        let time = call_engine.option().time_to_expiry(now);
        let rhs = 100.0 - 100.0 * (-0.06 * time).exp();
        println!("Put-Call Parity Check:");
        println!("  C - P = {:.6}", c - p);
        println!("  S - K*e^(-rT) = {:.6}", rhs);
    }

    Ok(())
}
