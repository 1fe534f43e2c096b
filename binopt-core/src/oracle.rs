//! # Price Oracle Adapter
//!
//! Boundary between a market and its external price source. An adapter turns
//! a feed identifier into a raw `(price, expo, publish_time)` sample; the
//! market normalizes that sample to the 18-decimal fixed-point convention used
//! by strike prices.
//!
//! Adapters never cache and never retry. Any failure surfaces as
//! [`MarketError::OracleUnavailable`] so that the calling resolution aborts
//! without touching market state.

use crate::{error::Result, MarketError, PRICE_DECIMALS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// One raw observation from a price feed. The value is `price * 10^expo`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceSample {
    pub price: i64,
    pub expo: i32,
    pub publish_time: i64,
}

impl PriceSample {
    pub fn new(price: i64, expo: i32, publish_time: i64) -> Self {
        Self {
            price,
            expo,
            publish_time,
        }
    }
}

/// External price source queried once per market resolution.
pub trait PriceOracle: Send + Sync {
    fn query(&self, feed_id: &str) -> Result<PriceSample>;
}

impl<T: PriceOracle + ?Sized> PriceOracle for Arc<T> {
    fn query(&self, feed_id: &str) -> Result<PriceSample> {
        (**self).query(feed_id)
    }
}

/// Scale a raw sample to an 18-decimal fixed-point value.
///
/// Digits below 10^-18 are truncated. Non-positive prices, and samples whose
/// scaled value overflows `u128` or truncates to zero, are rejected.
pub fn normalize_price(sample: &PriceSample) -> Result<u128> {
    if sample.price <= 0 {
        return Err(MarketError::OracleUnavailable(format!(
            "non-positive price {} reported",
            sample.price
        )));
    }
    let price = sample.price as u128;
    let shift = PRICE_DECIMALS as i64 + sample.expo as i64;

    let scaled = if shift >= 0 {
        pow10(shift).and_then(|factor| price.checked_mul(factor))
    } else {
        pow10(-shift).map(|divisor| price / divisor)
    };

    match scaled {
        Some(0) => Err(MarketError::OracleUnavailable(format!(
            "price {}e{} truncates to zero at {} decimals",
            sample.price, sample.expo, PRICE_DECIMALS
        ))),
        Some(value) => Ok(value),
        None => Err(MarketError::OracleUnavailable(format!(
            "price {}e{} cannot be represented at {} decimals",
            sample.price, sample.expo, PRICE_DECIMALS
        ))),
    }
}

fn pow10(exp: i64) -> Option<u128> {
    u32::try_from(exp).ok().and_then(|e| 10u128.checked_pow(e))
}

/// Thread-safe in-process price table.
#[derive(Debug, Default)]
pub struct InMemoryOracle {
    prices: RwLock<HashMap<String, PriceSample>>,
}

impl InMemoryOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish (or replace) the current sample for a feed.
    pub fn set_price(&self, feed_id: &str, sample: PriceSample) -> Result<()> {
        let mut prices = self
            .prices
            .write()
            .map_err(|_| MarketError::OracleUnavailable("price table poisoned".to_string()))?;
        prices.insert(feed_id.to_string(), sample);
        Ok(())
    }

    /// Remove a feed, making subsequent queries fail.
    pub fn clear_price(&self, feed_id: &str) -> Result<()> {
        let mut prices = self
            .prices
            .write()
            .map_err(|_| MarketError::OracleUnavailable("price table poisoned".to_string()))?;
        prices.remove(feed_id);
        Ok(())
    }
}

impl PriceOracle for InMemoryOracle {
    fn query(&self, feed_id: &str) -> Result<PriceSample> {
        let prices = self
            .prices
            .read()
            .map_err(|_| MarketError::OracleUnavailable("price table poisoned".to_string()))?;
        prices
            .get(feed_id)
            .copied()
            .ok_or_else(|| MarketError::OracleUnavailable(format!("no price for feed {feed_id}")))
    }
}

/// Oracle reading a JSON object of `feed id -> sample` from disk on every query.
#[derive(Clone, Debug)]
pub struct JsonFileOracle {
    path: PathBuf,
}

impl JsonFileOracle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<HashMap<String, PriceSample>> {
        let raw = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl PriceOracle for JsonFileOracle {
    fn query(&self, feed_id: &str) -> Result<PriceSample> {
        let prices = self.load().map_err(|e| {
            MarketError::OracleUnavailable(format!("{}: {e}", self.path.display()))
        })?;
        prices
            .get(feed_id)
            .copied()
            .ok_or_else(|| MarketError::OracleUnavailable(format!("no price for feed {feed_id}")))
    }
}
