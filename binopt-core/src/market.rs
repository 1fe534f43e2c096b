//! # Binary Option Market
//!
//! A market holds the two pooled positions of a single binary option: **long**
//! wins when the final oracle price settles above the strike, **short** wins
//! when it settles below. The owner drives the market through a fixed,
//! forward-only sequence of phases:
//!
//! ```text
//! Created -> Bidding -> Locked -> Resolved -> Expired
//! ```
//!
//! Deposits are accepted only while `Bidding`. Resolution samples the bound
//! oracle exactly once, at or after maturity. Rewards become claimable once the
//! market is `Expired`: each winner gets their stake back plus a pro-rata share
//! of the losing pool after the fee is taken from it. A final price exactly at
//! the strike settles as a tie, in which case every participant is refunded
//! their full stake and no fee is taken.

use crate::{
    clock::Clock,
    error::Result,
    identity::Identity,
    oracle::{normalize_price, PriceOracle},
    utils::format_units,
    MarketError, FEE_DENOMINATOR, MAX_FEE_PERCENTAGE, MAX_INDEX_BG, MIN_FEE_PERCENTAGE,
    MIN_INDEX_BG,
};
use serde::{Deserialize, Serialize};
use primitive_types::U256;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Position taken by a bid.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => f.write_str("long"),
            Side::Short => f.write_str("short"),
        }
    }
}

impl FromStr for Side {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" | "up" => Ok(Side::Long),
            "short" | "down" => Ok(Side::Short),
            other => Err(MarketError::InvalidParameter(format!(
                "side must be 'long' or 'short', got '{other}'"
            ))),
        }
    }
}

/// Lifecycle stage of a market. Variants are declared in their only legal order.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarketPhase {
    Created,
    Bidding,
    Locked,
    Resolved,
    Expired,
}

impl MarketPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketPhase::Created => "Created",
            MarketPhase::Bidding => "Bidding",
            MarketPhase::Locked => "Locked",
            MarketPhase::Resolved => "Resolved",
            MarketPhase::Expired => "Expired",
        }
    }

    /// The single phase reachable from this one, if any.
    pub fn next(&self) -> Option<MarketPhase> {
        match self {
            MarketPhase::Created => Some(MarketPhase::Bidding),
            MarketPhase::Bidding => Some(MarketPhase::Locked),
            MarketPhase::Locked => Some(MarketPhase::Resolved),
            MarketPhase::Resolved => Some(MarketPhase::Expired),
            MarketPhase::Expired => None,
        }
    }
}

impl fmt::Display for MarketPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement result derived from `final_price` versus `strike_price`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Long,
    Short,
    Tie,
}

impl Outcome {
    pub fn from_prices(final_price: u128, strike_price: u128) -> Self {
        match final_price.cmp(&strike_price) {
            std::cmp::Ordering::Greater => Outcome::Long,
            std::cmp::Ordering::Less => Outcome::Short,
            std::cmp::Ordering::Equal => Outcome::Tie,
        }
    }

    pub fn winning_side(&self) -> Option<Side> {
        match self {
            Outcome::Long => Some(Side::Long),
            Outcome::Short => Some(Side::Short),
            Outcome::Tie => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Long => f.write_str("Long won"),
            Outcome::Short => f.write_str("Short won"),
            Outcome::Tie => f.write_str("Tie at strike"),
        }
    }
}

/// Aggregate deposits per side.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Positions {
    pub long_total: u128,
    pub short_total: u128,
}

impl Positions {
    pub fn side_total(&self, side: Side) -> u128 {
        match side {
            Side::Long => self.long_total,
            Side::Short => self.short_total,
        }
    }
}

/// Immutable creation parameters of a market.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MarketParams {
    /// Display label, e.g. "BTC/USD"
    pub trading_pair: String,
    /// Identifier handed to the price oracle
    pub price_feed_id: String,
    /// Strike price, 18-decimal fixed point
    pub strike_price: u128,
    /// Maturity (Unix timestamp)
    pub maturity_time: i64,
    /// Fee on the losing pool, in parts per thousand (1..=200)
    pub fee_percentage: u16,
    /// Opaque display tag (1..=10)
    pub index_bg: u8,
}

impl MarketParams {
    /// Check the parameters against the creation rules at time `now`.
    pub fn validate(&self, now: i64) -> Result<()> {
        if self.trading_pair.trim().is_empty() {
            return Err(MarketError::InvalidParameter(
                "trading pair must not be empty".to_string(),
            ));
        }
        if self.price_feed_id.trim().is_empty() {
            return Err(MarketError::InvalidParameter(
                "price feed id must not be empty".to_string(),
            ));
        }
        if self.strike_price == 0 {
            return Err(MarketError::InvalidParameter(
                "strike price must be greater than zero".to_string(),
            ));
        }
        if self.maturity_time <= now {
            return Err(MarketError::InvalidParameter(format!(
                "maturity time {} must be in the future (now {})",
                self.maturity_time, now
            )));
        }
        if !(MIN_FEE_PERCENTAGE..=MAX_FEE_PERCENTAGE).contains(&self.fee_percentage) {
            return Err(MarketError::InvalidParameter(format!(
                "fee percentage {} outside [{}, {}]",
                self.fee_percentage, MIN_FEE_PERCENTAGE, MAX_FEE_PERCENTAGE
            )));
        }
        if !(MIN_INDEX_BG..=MAX_INDEX_BG).contains(&self.index_bg) {
            return Err(MarketError::InvalidParameter(format!(
                "index bg {} outside [{}, {}]",
                self.index_bg, MIN_INDEX_BG, MAX_INDEX_BG
            )));
        }
        Ok(())
    }
}

/// Notification emitted by every successful market mutation.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MarketEvent {
    BiddingStarted { at: i64 },
    BidPlaced { bidder: Identity, side: Side, amount: u128 },
    BiddingLocked { at: i64 },
    MarketResolved { final_price: u128, outcome: Outcome, at: i64 },
    MarketExpired { at: i64 },
    RewardClaimed { claimant: Identity, amount: u128 },
}

/// Outbound payment channel used when a reward is claimed.
///
/// `claim_reward` holds `&mut Market` across `transfer`, so an implementation
/// cannot re-enter the market. The claimed flag is set before the call and
/// cleared again if the transfer fails.
pub trait FundsTransfer {
    fn transfer(&mut self, to: &Identity, amount: u128) -> Result<()>;
}

fn check_fee(fee_percentage: u16) -> Result<()> {
    if !(MIN_FEE_PERCENTAGE..=MAX_FEE_PERCENTAGE).contains(&fee_percentage) {
        return Err(MarketError::InvalidParameter(format!(
            "fee percentage {} outside [{}, {}]",
            fee_percentage, MIN_FEE_PERCENTAGE, MAX_FEE_PERCENTAGE
        )));
    }
    Ok(())
}

/// Amount withheld from a losing pool: `losing_total * fee / 1000`, truncated.
pub fn fee_amount(losing_total: u128, fee_percentage: u16) -> Result<u128> {
    check_fee(fee_percentage)?;
    // split so the product never leaves u128: L = 1000a + b
    let fee = fee_percentage as u128;
    let whole = (losing_total / FEE_DENOMINATOR) * fee;
    let rest = (losing_total % FEE_DENOMINATOR) * fee / FEE_DENOMINATOR;
    Ok(whole + rest)
}

/// Reward owed to a winning stake.
///
/// The stake is returned in full, plus `stake * (losing_total - fee) /
/// winning_total`, truncated. The product is formed in 256 bits, so only a
/// reward that itself exceeds `u128` is reported as an overflow.
pub fn calculate_reward(
    stake: u128,
    winning_total: u128,
    losing_total: u128,
    fee_percentage: u16,
) -> Result<u128> {
    let fee = fee_amount(losing_total, fee_percentage)?;
    if winning_total == 0 {
        return Err(MarketError::NoStake(
            "nobody staked the winning side".to_string(),
        ));
    }
    if stake == 0 {
        return Err(MarketError::NoStake(
            "no stake on the winning side".to_string(),
        ));
    }
    let distributable = U256::from(losing_total - fee);
    let share = U256::from(stake) * distributable / U256::from(winning_total);
    if share > U256::from(u128::MAX) {
        return Err(MarketError::Overflow("reward share"));
    }
    stake
        .checked_add(share.low_u128())
        .ok_or(MarketError::Overflow("reward total"))
}

/// Amount a participant holding `long_stake` and `short_stake` is owed once a
/// market settles with `outcome`.
///
/// Winners are paid through [`calculate_reward`]; a tie refunds both stakes
/// and takes no fee. Holding nothing on the paid side is [`MarketError::NoStake`].
pub fn settlement_payout(
    outcome: Outcome,
    positions: Positions,
    long_stake: u128,
    short_stake: u128,
    fee_percentage: u16,
) -> Result<u128> {
    match outcome.winning_side() {
        Some(side) => {
            let stake = match side {
                Side::Long => long_stake,
                Side::Short => short_stake,
            };
            calculate_reward(
                stake,
                positions.side_total(side),
                positions.side_total(opposite(side)),
                fee_percentage,
            )
        }
        None => {
            check_fee(fee_percentage)?;
            let refund = long_stake
                .checked_add(short_stake)
                .ok_or(MarketError::Overflow("refund"))?;
            if refund == 0 {
                return Err(MarketError::NoStake("no stake to refund".to_string()));
            }
            Ok(refund)
        }
    }
}

/// A single binary option market.
pub struct Market {
    address: String,
    owner: Identity,
    params: MarketParams,
    phase: MarketPhase,
    final_price: Option<u128>,
    positions: Positions,
    long_bids: HashMap<Identity, u128>,
    short_bids: HashMap<Identity, u128>,
    claimed: HashSet<Identity>,
    total_deposited: u128,
    total_paid_out: u128,
    deploy_time: i64,
    bidding_start_time: Option<i64>,
    resolve_time: Option<i64>,
    events: Vec<MarketEvent>,
    oracle: Arc<dyn PriceOracle>,
    clock: Arc<dyn Clock>,
}

impl Market {
    /// Creates a market in the `Created` phase.
    ///
    /// # Arguments
    /// * `address` - Registry address assigned by the factory
    /// * `owner` - Identity allowed to drive phase transitions
    /// * `params` - Immutable creation parameters, validated against `clock`
    /// * `oracle` - Price source sampled at resolution
    /// * `clock` - Time source for deploy time and maturity gating
    pub fn new(
        address: String,
        owner: Identity,
        params: MarketParams,
        oracle: Arc<dyn PriceOracle>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let now = clock.now();
        params.validate(now)?;

        Ok(Self {
            address,
            owner,
            params,
            phase: MarketPhase::Created,
            final_price: None,
            positions: Positions::default(),
            long_bids: HashMap::new(),
            short_bids: HashMap::new(),
            claimed: HashSet::new(),
            total_deposited: 0,
            total_paid_out: 0,
            deploy_time: now,
            bidding_start_time: None,
            resolve_time: None,
            events: Vec::new(),
            oracle,
            clock,
        })
    }

    fn require_owner(&self, caller: &Identity, operation: &str) -> Result<()> {
        if *caller != self.owner {
            return Err(MarketError::Unauthorized(format!(
                "{operation} may only be called by the market owner"
            )));
        }
        Ok(())
    }

    fn require_phase(&self, operation: &'static str, expected: MarketPhase) -> Result<()> {
        if self.phase != expected {
            return Err(MarketError::InvalidPhase {
                operation,
                expected: expected.as_str(),
                actual: self.phase.as_str(),
            });
        }
        Ok(())
    }

    fn advance(&mut self, to: MarketPhase) {
        debug_assert_eq!(self.phase.next(), Some(to));
        self.phase = to;
    }

    /// Open the market for deposits.
    pub fn start_bidding(&mut self, caller: &Identity) -> Result<()> {
        self.require_owner(caller, "start_bidding")?;
        self.require_phase("start_bidding", MarketPhase::Created)?;

        let now = self.clock.now();
        self.bidding_start_time = Some(now);
        self.advance(MarketPhase::Bidding);
        self.events.push(MarketEvent::BiddingStarted { at: now });
        info!(market = %self.address, at = now, "bidding started");
        Ok(())
    }

    /// Close the bidding window. Also known as "start trading".
    pub fn lock_bidding(&mut self, caller: &Identity) -> Result<()> {
        self.require_owner(caller, "lock_bidding")?;
        self.require_phase("lock_bidding", MarketPhase::Bidding)?;

        let now = self.clock.now();
        self.advance(MarketPhase::Locked);
        self.events.push(MarketEvent::BiddingLocked { at: now });
        info!(
            market = %self.address,
            long_total = self.positions.long_total,
            short_total = self.positions.short_total,
            "bidding locked"
        );
        Ok(())
    }

    /// Sample the oracle and record the final price.
    ///
    /// Nothing is mutated unless the oracle query and normalization both
    /// succeed, so a failed resolution can simply be retried later.
    pub fn resolve_market(&mut self, caller: &Identity) -> Result<u128> {
        self.require_owner(caller, "resolve_market")?;
        self.require_phase("resolve_market", MarketPhase::Locked)?;

        let now = self.clock.now();
        if now < self.params.maturity_time {
            return Err(MarketError::TooEarly {
                maturity_time: self.params.maturity_time,
                now,
            });
        }

        let final_price = self
            .oracle
            .query(&self.params.price_feed_id)
            .and_then(|sample| {
                debug!(
                    market = %self.address,
                    price = sample.price,
                    expo = sample.expo,
                    publish_time = sample.publish_time,
                    "oracle sample"
                );
                normalize_price(&sample)
            })
            .inspect_err(|e| {
                warn!(market = %self.address, feed = %self.params.price_feed_id, error = %e, "resolution aborted");
            })?;

        let outcome = Outcome::from_prices(final_price, self.params.strike_price);
        self.final_price = Some(final_price);
        self.resolve_time = Some(now);
        self.advance(MarketPhase::Resolved);
        self.events.push(MarketEvent::MarketResolved {
            final_price,
            outcome,
            at: now,
        });
        info!(
            market = %self.address,
            final_price = %format_units(final_price),
            strike_price = %format_units(self.params.strike_price),
            %outcome,
            "market resolved"
        );
        Ok(final_price)
    }

    /// Open reward withdrawal.
    pub fn expire_market(&mut self, caller: &Identity) -> Result<()> {
        self.require_owner(caller, "expire_market")?;
        self.require_phase("expire_market", MarketPhase::Resolved)?;

        let now = self.clock.now();
        self.advance(MarketPhase::Expired);
        self.events.push(MarketEvent::MarketExpired { at: now });
        info!(market = %self.address, "market expired, claims open");
        Ok(())
    }

    /// Deposit `amount` on `side` for `caller`.
    pub fn bid(&mut self, caller: &Identity, side: Side, amount: u128) -> Result<()> {
        self.require_phase("bid", MarketPhase::Bidding)?;
        if amount == 0 {
            return Err(MarketError::InvalidAmount);
        }

        let stake = self
            .bids(side)
            .get(caller)
            .copied()
            .unwrap_or(0)
            .checked_add(amount)
            .ok_or(MarketError::Overflow("participant stake"))?;
        let side_total = self
            .positions
            .side_total(side)
            .checked_add(amount)
            .ok_or(MarketError::Overflow("side total"))?;
        let total_deposited = self
            .total_deposited
            .checked_add(amount)
            .ok_or(MarketError::Overflow("total deposited"))?;

        match side {
            Side::Long => {
                self.long_bids.insert(*caller, stake);
                self.positions.long_total = side_total;
            }
            Side::Short => {
                self.short_bids.insert(*caller, stake);
                self.positions.short_total = side_total;
            }
        }
        self.total_deposited = total_deposited;

        self.events.push(MarketEvent::BidPlaced {
            bidder: *caller,
            side,
            amount,
        });
        debug!(market = %self.address, bidder = %caller.short(), %side, amount, "bid placed");
        Ok(())
    }

    /// Reward `participant` is entitled to, without paying it.
    ///
    /// Available from `Resolved` onwards so claimants can preview payouts
    /// before the owner opens withdrawals.
    pub fn claimable_reward(&self, participant: &Identity) -> Result<u128> {
        let outcome = self.outcome().ok_or(MarketError::InvalidPhase {
            operation: "claimable_reward",
            expected: MarketPhase::Resolved.as_str(),
            actual: self.phase.as_str(),
        })?;
        if self.claimed.contains(participant) {
            return Err(MarketError::AlreadyClaimed(participant.to_hex()));
        }

        settlement_payout(
            outcome,
            self.positions,
            self.bid_of(participant, Side::Long),
            self.bid_of(participant, Side::Short),
            self.params.fee_percentage,
        )
    }

    /// Pay `caller` their reward through `funds`.
    ///
    /// The claimed flag is set before `funds.transfer` runs. A failed transfer
    /// clears it again and surfaces [`MarketError::TransferFailed`].
    pub fn claim_reward(&mut self, caller: &Identity, funds: &mut dyn FundsTransfer) -> Result<u128> {
        self.require_phase("claim_reward", MarketPhase::Expired)?;
        if self.claimed.contains(caller) {
            return Err(MarketError::AlreadyClaimed(caller.to_hex()));
        }
        let reward = self.claimable_reward(caller)?;
        let total_paid_out = self
            .total_paid_out
            .checked_add(reward)
            .ok_or(MarketError::Overflow("total paid out"))?;

        self.claimed.insert(*caller);
        if let Err(e) = funds.transfer(caller, reward) {
            self.claimed.remove(caller);
            warn!(market = %self.address, claimant = %caller.short(), error = %e, "reward transfer failed");
            return Err(MarketError::TransferFailed(e.to_string()));
        }
        self.total_paid_out = total_paid_out;

        self.events.push(MarketEvent::RewardClaimed {
            claimant: *caller,
            amount: reward,
        });
        info!(market = %self.address, claimant = %caller.short(), reward = %format_units(reward), "reward claimed");
        Ok(reward)
    }

    fn bids(&self, side: Side) -> &HashMap<Identity, u128> {
        match side {
            Side::Long => &self.long_bids,
            Side::Short => &self.short_bids,
        }
    }

    fn bid_of(&self, participant: &Identity, side: Side) -> u128 {
        self.bids(side).get(participant).copied().unwrap_or(0)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn owner(&self) -> &Identity {
        &self.owner
    }

    pub fn params(&self) -> &MarketParams {
        &self.params
    }

    pub fn phase(&self) -> MarketPhase {
        self.phase
    }

    pub fn resolved(&self) -> bool {
        self.final_price.is_some()
    }

    pub fn final_price(&self) -> Option<u128> {
        self.final_price
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.final_price
            .map(|price| Outcome::from_prices(price, self.params.strike_price))
    }

    pub fn positions(&self) -> Positions {
        self.positions
    }

    pub fn total_deposited(&self) -> u128 {
        self.total_deposited
    }

    pub fn total_paid_out(&self) -> u128 {
        self.total_paid_out
    }

    pub fn long_bid(&self, participant: &Identity) -> u128 {
        self.bid_of(participant, Side::Long)
    }

    pub fn short_bid(&self, participant: &Identity) -> u128 {
        self.bid_of(participant, Side::Short)
    }

    pub fn has_claimed(&self, participant: &Identity) -> bool {
        self.claimed.contains(participant)
    }

    pub fn deploy_time(&self) -> i64 {
        self.deploy_time
    }

    pub fn bidding_start_time(&self) -> Option<i64> {
        self.bidding_start_time
    }

    pub fn resolve_time(&self) -> Option<i64> {
        self.resolve_time
    }

    pub fn events(&self) -> &[MarketEvent] {
        &self.events
    }

    /// Fee withheld from the losing pool once the market is resolved.
    pub fn fee_amount(&self) -> Result<Option<u128>> {
        match self.outcome().map(|o| o.winning_side()) {
            None => Ok(None),
            Some(None) => Ok(Some(0)),
            Some(Some(side)) => fee_amount(
                self.positions.side_total(opposite(side)),
                self.params.fee_percentage,
            )
            .map(Some),
        }
    }

    /// Current payout ratio for the long side (total pool / long pool)
    pub fn odds_long(&self) -> f64 {
        pool_odds(self.positions.long_total, self.total_deposited)
    }

    /// Current payout ratio for the short side (total pool / short pool)
    pub fn odds_short(&self) -> f64 {
        pool_odds(self.positions.short_total, self.total_deposited)
    }

    /// Get market status summary
    pub fn status(&self) -> String {
        match self.phase {
            MarketPhase::Created => "Created - Awaiting bidding window".to_string(),
            MarketPhase::Bidding => "Bidding - Accepting bids".to_string(),
            MarketPhase::Locked if self.clock.now() >= self.params.maturity_time => {
                "Locked - Awaiting resolution".to_string()
            }
            MarketPhase::Locked => "Locked - Awaiting maturity".to_string(),
            MarketPhase::Resolved | MarketPhase::Expired => {
                let outcome = self
                    .outcome()
                    .map(|o| o.to_string())
                    .unwrap_or_default();
                let price = self.final_price.map(format_units).unwrap_or_default();
                if self.phase == MarketPhase::Resolved {
                    format!("Resolved - {outcome} at {price}, awaiting expiry")
                } else {
                    format!("Expired - {outcome} at {price}, claims open")
                }
            }
        }
    }

    /// Serializable view of every market field.
    pub fn snapshot(&self) -> MarketSnapshot {
        let mut claimed: Vec<Identity> = self.claimed.iter().copied().collect();
        claimed.sort();

        MarketSnapshot {
            address: self.address.clone(),
            owner: self.owner,
            params: self.params.clone(),
            phase: self.phase,
            resolved: self.resolved(),
            final_price: self.final_price,
            outcome: self.outcome(),
            positions: self.positions,
            total_deposited: self.total_deposited,
            total_paid_out: self.total_paid_out,
            deploy_time: self.deploy_time,
            bidding_start_time: self.bidding_start_time,
            resolve_time: self.resolve_time,
            long_bids: self.long_bids.iter().map(|(k, v)| (*k, *v)).collect(),
            short_bids: self.short_bids.iter().map(|(k, v)| (*k, *v)).collect(),
            claimed,
        }
    }
}

impl fmt::Debug for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Market")
            .field("address", &self.address)
            .field("owner", &self.owner)
            .field("params", &self.params)
            .field("phase", &self.phase)
            .field("final_price", &self.final_price)
            .field("positions", &self.positions)
            .field("claimed", &self.claimed.len())
            .finish_non_exhaustive()
    }
}

/// Point-in-time copy of a market's state.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MarketSnapshot {
    pub address: String,
    pub owner: Identity,
    pub params: MarketParams,
    pub phase: MarketPhase,
    pub resolved: bool,
    pub final_price: Option<u128>,
    pub outcome: Option<Outcome>,
    pub positions: Positions,
    pub total_deposited: u128,
    pub total_paid_out: u128,
    pub deploy_time: i64,
    pub bidding_start_time: Option<i64>,
    pub resolve_time: Option<i64>,
    pub long_bids: BTreeMap<Identity, u128>,
    pub short_bids: BTreeMap<Identity, u128>,
    pub claimed: Vec<Identity>,
}

fn opposite(side: Side) -> Side {
    match side {
        Side::Long => Side::Short,
        Side::Short => Side::Long,
    }
}

fn pool_odds(side_total: u128, total: u128) -> f64 {
    if side_total == 0 {
        return 1.0;
    }
    total as f64 / side_total as f64
}
