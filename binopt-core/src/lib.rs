//! # Binopt Core
//!
//! Core Rust library for oracle-settled binary option markets.
//!
//! Participants deposit into one of two mutually exclusive positions on
//! whether an asset's price at maturity will settle above (**long**) or below
//! (**short**) a fixed strike. After maturity the market samples its price
//! oracle once and winners split the losing pool, minus a fee, in proportion
//! to their stake.
//!
//! ## Features
//!
//! - **Market Factory**: Validated market creation with an append-only registry
//! - **Phase State Machine**: `Created -> Bidding -> Locked -> Resolved -> Expired`
//! - **Bid Ledger**: Per-participant stakes with exact aggregate accounting
//! - **Oracle Settlement**: Single authoritative sample, normalized to 18 decimals
//! - **Reward Distribution**: Stake plus pro-rata share of the fee-reduced losing pool
//!
//! ## Examples
//!
//! ```rust
//! use binopt_core::{
//!     InMemoryOracle, ManualClock, MarketFactory, MarketParams, PriceSample, Identity, Side,
//!     ONE_UNIT,
//! };
//! use std::sync::Arc;
//!
//! let oracle = Arc::new(InMemoryOracle::new());
//! let clock = Arc::new(ManualClock::new(1_735_689_600));
//! let mut factory = MarketFactory::new(oracle.clone(), clock.clone());
//!
//! let owner = Identity::from_seed(1)?;
//! let alice = Identity::from_seed(2)?;
//! let bob = Identity::from_seed(3)?;
//!
//! let handle = factory.create_market(owner, MarketParams {
//!     trading_pair: "BTC/USD".to_string(),
//!     price_feed_id: "btc-usd".to_string(),
//!     strike_price: 55_000 * ONE_UNIT,
//!     maturity_time: 1_735_776_000,
//!     fee_percentage: 10,
//!     index_bg: 1,
//! })?;
//!
//! let market = factory.market_mut(handle)?;
//! market.start_bidding(&owner)?;
//! market.bid(&alice, Side::Long, ONE_UNIT)?;
//! market.bid(&bob, Side::Short, ONE_UNIT)?;
//! market.lock_bidding(&owner)?;
//!
//! clock.set(1_735_776_000);
//! oracle.set_price("btc-usd", PriceSample::new(6_000_000_000_000, -8, 1_735_776_000))?;
//! market.resolve_market(&owner)?;
//! market.expire_market(&owner)?;
//!
//! assert_eq!(market.claimable_reward(&alice)?, 1_990_000_000_000_000_000);
//! Ok::<(), binopt_core::MarketError>(())
//! ```

pub mod clock;
pub mod error;
pub mod factory;
pub mod identity;
pub mod market;
pub mod oracle;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{MarketError, Result};
pub use factory::{FactoryEvent, MarketFactory, MarketHandle};
pub use identity::Identity;
pub use market::{
    calculate_reward, fee_amount, settlement_payout, FundsTransfer, Market, MarketEvent,
    MarketParams, MarketPhase, MarketSnapshot, Outcome, Positions, Side,
};
pub use oracle::{normalize_price, InMemoryOracle, JsonFileOracle, PriceOracle, PriceSample};
pub use utils::*;

/// Decimal places of fixed-point prices and amounts
pub const PRICE_DECIMALS: u32 = 18;

/// One whole unit in 18-decimal fixed point
pub const ONE_UNIT: u128 = 1_000_000_000_000_000_000;

/// Fees are expressed in parts per thousand
pub const FEE_DENOMINATOR: u128 = 1_000;

/// Smallest accepted fee (0.1%)
pub const MIN_FEE_PERCENTAGE: u16 = 1;

/// Largest accepted fee (20%)
pub const MAX_FEE_PERCENTAGE: u16 = 200;

pub const MIN_INDEX_BG: u8 = 1;
pub const MAX_INDEX_BG: u8 = 10;
