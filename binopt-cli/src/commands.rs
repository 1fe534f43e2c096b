//! # Calculator Commands
//!
//! Pure helpers behind the `payout`, `normalize`, `validate` and `keygen`
//! subcommands. They take already-parsed values so they can be tested without
//! spawning the binary.

use binopt_core::{
    fee_amount, normalize_price, settlement_payout, Identity, MarketError, MarketParams, Outcome,
    Positions, PriceSample, Side,
};

/// Settlement of a single stake under a hypothetical final price.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PayoutQuote {
    pub outcome: Outcome,
    /// Fee withheld from the losing pool (zero on a tie)
    pub fee: u128,
    /// Amount paid to the stake; zero when it sits on the losing side
    pub reward: u128,
}

/// Price `stake` on `side` in a market with the given pools.
pub fn quote_payout(
    positions: Positions,
    fee_percentage: u16,
    stake: u128,
    side: Side,
    strike_price: u128,
    final_price: u128,
) -> binopt_core::Result<PayoutQuote> {
    if stake > positions.side_total(side) {
        return Err(MarketError::InvalidParameter(format!(
            "stake exceeds the {side} pool"
        )));
    }
    let outcome = Outcome::from_prices(final_price, strike_price);
    let fee = match outcome.winning_side() {
        Some(Side::Long) => fee_amount(positions.short_total, fee_percentage)?,
        Some(Side::Short) => fee_amount(positions.long_total, fee_percentage)?,
        None => 0,
    };
    let (long_stake, short_stake) = match side {
        Side::Long => (stake, 0),
        Side::Short => (0, stake),
    };

    let reward = match settlement_payout(outcome, positions, long_stake, short_stake, fee_percentage)
    {
        Ok(reward) => reward,
        Err(MarketError::NoStake(_)) => 0,
        Err(e) => return Err(e),
    };
    Ok(PayoutQuote {
        outcome,
        fee,
        reward,
    })
}

/// Scale a raw `price * 10^expo` reading to 18 decimals.
pub fn normalize(price: i64, expo: i32) -> binopt_core::Result<u128> {
    normalize_price(&PriceSample::new(price, expo, 0))
}

/// Check creation parameters at time `now`, with placeholder pair and feed.
pub fn check_params(
    maturity_time: i64,
    fee_percentage: u16,
    index_bg: u8,
    strike_price: u128,
    now: i64,
) -> binopt_core::Result<MarketParams> {
    let params = MarketParams {
        trading_pair: "validate".to_string(),
        price_feed_id: "validate".to_string(),
        strike_price,
        maturity_time,
        fee_percentage,
        index_bg,
    };
    params.validate(now)?;
    Ok(params)
}

/// Identity a scenario file gets for participant seed `seed`.
pub fn keygen(seed: u8) -> binopt_core::Result<Identity> {
    Identity::from_seed(seed)
}
