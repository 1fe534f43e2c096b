//! Common test utilities for binopt-core tests.
//!
//! This module provides shared functionality for testing across all modules,
//! including identities, a controllable oracle and clock, and market setup.

use crate::clock::{Clock, ManualClock};
use crate::market::{FundsTransfer, Market, MarketParams};
use crate::oracle::{InMemoryOracle, PriceSample};
use crate::{Identity, MarketError, Result, ONE_UNIT};
use std::sync::Arc;

pub const TEST_NOW: i64 = 1_735_689_600;
pub const TEST_MATURITY: i64 = TEST_NOW + 86_400;
pub const TEST_PAIR: &str = "BTC/USD";
pub const TEST_FEED: &str = "btc-usd";
pub const TEST_STRIKE: u128 = 55_000 * ONE_UNIT;
pub const TEST_FEE: u16 = 10;

pub fn owner() -> Identity {
    Identity::from_seed(1).unwrap()
}

pub fn alice() -> Identity {
    Identity::from_seed(2).unwrap()
}

pub fn bob() -> Identity {
    Identity::from_seed(3).unwrap()
}

pub fn carol() -> Identity {
    Identity::from_seed(4).unwrap()
}

pub fn dave() -> Identity {
    Identity::from_seed(5).unwrap()
}

/// BTC/USD market, strike 55000, 1% fee, maturing one day after `TEST_NOW`.
pub fn test_params() -> MarketParams {
    MarketParams {
        trading_pair: TEST_PAIR.to_string(),
        price_feed_id: TEST_FEED.to_string(),
        strike_price: TEST_STRIKE,
        maturity_time: TEST_MATURITY,
        fee_percentage: TEST_FEE,
        index_bg: 1,
    }
}

/// Oracle and clock shared by the markets under test.
pub struct TestEnv {
    pub oracle: Arc<InMemoryOracle>,
    pub clock: Arc<ManualClock>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            oracle: Arc::new(InMemoryOracle::new()),
            clock: Arc::new(ManualClock::new(TEST_NOW)),
        }
    }

    /// Publish an already-normalized price on `TEST_FEED`.
    pub fn publish_price(&self, price: u128) {
        // test prices are multiples of 1e9, so expo -9 normalizes back exactly
        let raw = i64::try_from(price / 1_000_000_000).unwrap();
        self.oracle
            .set_price(TEST_FEED, PriceSample::new(raw, -9, self.clock.now()))
            .unwrap();
    }

    pub fn create_test_market(&self) -> Market {
        Market::new(
            "0x00000000000000000000000000000000000000aa".to_string(),
            owner(),
            test_params(),
            self.oracle.clone(),
            self.clock.clone(),
        )
        .unwrap()
    }
}

/// Funds sink that records every payout, or refuses all of them.
#[derive(Debug, Default)]
pub struct RecordingFunds {
    pub transfers: Vec<(Identity, u128)>,
    pub fail: bool,
}

impl FundsTransfer for RecordingFunds {
    fn transfer(&mut self, to: &Identity, amount: u128) -> Result<()> {
        if self.fail {
            return Err(MarketError::TransferFailed("sink offline".to_string()));
        }
        self.transfers.push((*to, amount));
        Ok(())
    }
}
