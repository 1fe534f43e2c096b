//! Simple binary option market example
//!
//! This example walks one market through its whole lifecycle: creation,
//! bidding, oracle resolution and reward claims.

use anyhow::Result;
use binopt_core::{
    utils::*, FundsTransfer, Identity, InMemoryOracle, ManualClock, MarketFactory, MarketParams,
    PriceSample, Side,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Wallet balances credited by reward claims.
#[derive(Default)]
struct Wallets(HashMap<Identity, u128>);

impl FundsTransfer for Wallets {
    fn transfer(&mut self, to: &Identity, amount: u128) -> binopt_core::Result<()> {
        *self.0.entry(*to).or_insert(0) += amount;
        Ok(())
    }
}

fn main() -> Result<()> {
    println!("🎯 Simple Binary Option Market Example");
    println!("══════════════════════════════════════\n");

    let start = 1_735_689_600; // January 1, 2025
    let maturity = start + 7 * 86_400;
    let oracle = Arc::new(InMemoryOracle::new());
    let clock = Arc::new(ManualClock::new(start));
    let mut factory = MarketFactory::with_salt(
        salt_from_label("simple-market"),
        oracle.clone(),
        clock.clone(),
    );

    let owner = Identity::from_seed(1)?;
    let alice = Identity::from_seed(2)?;
    let bob = Identity::from_seed(3)?;
    let charlie = Identity::from_seed(4)?;

    // 1. Create a new market
    println!("1. Creating a new market...");
    let handle = factory.create_market(
        owner,
        MarketParams {
            trading_pair: "BTC/USD".to_string(),
            price_feed_id: "btc-usd".to_string(),
            strike_price: parse_units("100000")?,
            maturity_time: maturity,
            fee_percentage: 10,
            index_bg: 1,
        },
    )?;
    let market = factory.market_mut(handle)?;
    println!("   Address: {}", market.address());
    println!("   Owner: {}", market.owner());
    println!("   Strike: {}", format_units(market.params().strike_price));
    println!("   Maturity: {}", format_timestamp(maturity));
    println!();

    // 2. Take bids
    println!("2. Taking bids...");
    market.start_bidding(&owner)?;
    market.bid(&alice, Side::Long, parse_units("1")?)?;
    market.bid(&bob, Side::Short, parse_units("2")?)?;
    market.bid(&charlie, Side::Long, parse_units("0.5")?)?;
    println!("   Alice bid 1 on long");
    println!("   Bob bid 2 on short");
    println!("   Charlie bid 0.5 on long");
    println!();

    // 3. Pool statistics
    println!("3. Current market statistics...");
    let positions = market.positions();
    println!("   Long pool: {}", format_units(positions.long_total));
    println!("   Short pool: {}", format_units(positions.short_total));
    println!("   Odds for long: {:.2}x", market.odds_long());
    println!("   Odds for short: {:.2}x", market.odds_short());
    println!();

    // 4. Lock, wait for maturity, resolve
    println!("4. Resolving at maturity...");
    market.lock_bidding(&owner)?;
    clock.set(maturity);
    oracle.set_price("btc-usd", PriceSample::new(10_250_000_000_000, -8, maturity))?;
    let final_price = market.resolve_market(&owner)?;
    println!("   Final price: {}", format_units(final_price));
    if let Some(outcome) = market.outcome() {
        println!("   Outcome: {}", outcome);
    }
    println!("   Status: {}", market.status());
    println!();

    // 5. Claims
    println!("5. Claiming rewards...");
    market.expire_market(&owner)?;
    let mut wallets = Wallets::default();
    for (name, who) in [("Alice", alice), ("Bob", bob), ("Charlie", charlie)] {
        match market.claim_reward(&who, &mut wallets) {
            Ok(reward) => println!("   {} received {}", name, format_units(reward)),
            Err(e) => println!("   {} has nothing to claim ({})", name, e),
        }
    }
    if let Some(fee) = market.fee_amount()? {
        println!("   Fee retained by the market: {}", format_units(fee));
    }
    println!();

    println!("✅ Example completed successfully!");
    println!(
        "   Paid out {} of {} deposited.",
        format_units(market.total_paid_out()),
        format_units(market.total_deposited())
    );

    Ok(())
}
