//! # Market Factory
//!
//! Validates creation parameters, instantiates markets bound to the factory's
//! oracle and clock, and keeps an append-only registry of them. Markets live
//! in an arena and are addressed by stable [`MarketHandle`]s or by their
//! derived address.

use crate::{
    clock::Clock,
    error::Result,
    market::{Market, MarketParams},
    oracle::PriceOracle,
    utils::derive_market_address,
    Identity, MarketError,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Stable index of a market inside its factory.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarketHandle(usize);

impl MarketHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Notification emitted when the registry grows.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FactoryEvent {
    MarketCreated {
        index: usize,
        address: String,
        owner: Identity,
        trading_pair: String,
    },
}

/// Creates markets and records their addresses.
pub struct MarketFactory {
    salt: Uuid,
    oracle: Arc<dyn PriceOracle>,
    clock: Arc<dyn Clock>,
    markets: Vec<Market>,
    by_address: HashMap<String, usize>,
    events: Vec<FactoryEvent>,
}

impl MarketFactory {
    /// Create a factory with a random salt.
    pub fn new(oracle: Arc<dyn PriceOracle>, clock: Arc<dyn Clock>) -> Self {
        Self::with_salt(Uuid::new_v4(), oracle, clock)
    }

    /// Create a factory whose market addresses are reproducible.
    pub fn with_salt(salt: Uuid, oracle: Arc<dyn PriceOracle>, clock: Arc<dyn Clock>) -> Self {
        Self {
            salt,
            oracle,
            clock,
            markets: Vec::new(),
            by_address: HashMap::new(),
            events: Vec::new(),
        }
    }

    pub fn salt(&self) -> &Uuid {
        &self.salt
    }

    /// Validate `params` and deploy a market owned by `owner`.
    ///
    /// Returns the handle of the new market; its address is available through
    /// [`MarketFactory::deployed_market`] or [`Market::address`].
    pub fn create_market(&mut self, owner: Identity, params: MarketParams) -> Result<MarketHandle> {
        params.validate(self.clock.now())?;

        let index = self.markets.len();
        let address = derive_market_address(&self.salt, index as u64, &owner, &params);
        let trading_pair = params.trading_pair.clone();
        let market = Market::new(
            address.clone(),
            owner,
            params,
            Arc::clone(&self.oracle),
            Arc::clone(&self.clock),
        )?;

        self.markets.push(market);
        self.by_address.insert(address.clone(), index);
        info!(index, %address, owner = %owner.short(), %trading_pair, "market created");
        self.events.push(FactoryEvent::MarketCreated {
            index,
            address,
            owner,
            trading_pair,
        });

        Ok(MarketHandle(index))
    }

    pub fn deployed_markets_count(&self) -> usize {
        self.markets.len()
    }

    /// Address of the `index`-th deployed market.
    pub fn deployed_market(&self, index: usize) -> Option<&str> {
        self.markets.get(index).map(Market::address)
    }

    /// All deployed addresses, in creation order.
    pub fn deployed_markets(&self) -> impl Iterator<Item = &str> {
        self.markets.iter().map(Market::address)
    }

    pub fn handle_of(&self, address: &str) -> Option<MarketHandle> {
        self.by_address.get(address).copied().map(MarketHandle)
    }

    pub fn market(&self, handle: MarketHandle) -> Result<&Market> {
        self.markets
            .get(handle.0)
            .ok_or_else(|| MarketError::UnknownMarket(format!("index {}", handle.0)))
    }

    pub fn market_mut(&mut self, handle: MarketHandle) -> Result<&mut Market> {
        self.markets
            .get_mut(handle.0)
            .ok_or_else(|| MarketError::UnknownMarket(format!("index {}", handle.0)))
    }

    pub fn market_by_address(&self, address: &str) -> Result<&Market> {
        let handle = self
            .handle_of(address)
            .ok_or_else(|| MarketError::UnknownMarket(address.to_string()))?;
        self.market(handle)
    }

    pub fn market_by_address_mut(&mut self, address: &str) -> Result<&mut Market> {
        let handle = self
            .handle_of(address)
            .ok_or_else(|| MarketError::UnknownMarket(address.to_string()))?;
        self.market_mut(handle)
    }

    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    pub fn events(&self) -> &[FactoryEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{MarketPhase, Side};
    use crate::test_utils::*;
    use crate::ONE_UNIT;

    fn factory(env: &TestEnv) -> MarketFactory {
        MarketFactory::with_salt(Uuid::from_u128(7), env.oracle.clone(), env.clock.clone())
    }

    #[test]
    fn test_create_market_records_address_and_event() {
        let env = TestEnv::new();
        let mut factory = factory(&env);
        assert_eq!(factory.deployed_markets_count(), 0);

        let handle = factory.create_market(owner(), test_params()).unwrap();
        assert_eq!(handle.index(), 0);
        assert_eq!(factory.deployed_markets_count(), 1);

        let address = factory.deployed_market(0).unwrap().to_string();
        assert_eq!(factory.handle_of(&address), Some(handle));
        let market = factory.market(handle).unwrap();
        assert_eq!(market.address(), address);
        assert_eq!(market.owner(), &owner());
        assert_eq!(market.phase(), MarketPhase::Created);

        assert_eq!(
            factory.events(),
            &[FactoryEvent::MarketCreated {
                index: 0,
                address,
                owner: owner(),
                trading_pair: TEST_PAIR.to_string(),
            }]
        );
    }

    #[test]
    fn test_fee_bounds() {
        let env = TestEnv::new();
        let mut factory = factory(&env);

        for fee in [0, 201] {
            let params = MarketParams {
                fee_percentage: fee,
                ..test_params()
            };
            let err = factory.create_market(owner(), params).unwrap_err();
            assert_eq!(err.code(), "InvalidParameter");
        }
        assert_eq!(factory.deployed_markets_count(), 0);
        assert!(factory.events().is_empty());

        for fee in [1, 200] {
            let params = MarketParams {
                fee_percentage: fee,
                ..test_params()
            };
            factory.create_market(owner(), params).unwrap();
        }
        assert_eq!(factory.deployed_markets_count(), 2);
    }

    #[test]
    fn test_rejects_past_maturity_and_bad_index() {
        let env = TestEnv::new();
        let mut factory = factory(&env);

        let params = MarketParams {
            maturity_time: TEST_NOW,
            ..test_params()
        };
        assert_eq!(
            factory.create_market(owner(), params).unwrap_err().code(),
            "InvalidParameter"
        );
        for index_bg in [0, 11] {
            let params = MarketParams {
                index_bg,
                ..test_params()
            };
            assert!(factory.create_market(owner(), params).is_err());
        }
        for index_bg in [1, 10] {
            let params = MarketParams {
                index_bg,
                ..test_params()
            };
            assert!(factory.create_market(owner(), params).is_ok());
        }
    }

    #[test]
    fn test_registry_is_append_only_with_unique_addresses() {
        let env = TestEnv::new();
        let mut factory = factory(&env);
        let handles: Vec<_> = (0..3)
            .map(|_| factory.create_market(owner(), test_params()).unwrap())
            .collect();

        let addresses: Vec<String> = factory.deployed_markets().map(str::to_string).collect();
        assert_eq!(addresses.len(), 3);
        assert_ne!(addresses[0], addresses[1]);
        assert_ne!(addresses[1], addresses[2]);
        for (handle, address) in handles.iter().zip(&addresses) {
            assert_eq!(factory.handle_of(address), Some(*handle));
        }
        assert!(factory.deployed_market(3).is_none());
        assert_eq!(
            factory.market_by_address("0xdead").unwrap_err().code(),
            "UnknownMarket"
        );
    }

    #[test]
    fn test_markets_fail_independently() {
        let env = TestEnv::new();
        let mut factory = factory(&env);
        let btc = factory.create_market(owner(), test_params()).unwrap();
        let eth = factory
            .create_market(
                owner(),
                MarketParams {
                    trading_pair: "ETH/USD".to_string(),
                    price_feed_id: "eth-usd".to_string(),
                    ..test_params()
                },
            )
            .unwrap();

        for handle in [btc, eth] {
            let market = factory.market_mut(handle).unwrap();
            market.start_bidding(&owner()).unwrap();
            market.bid(&alice(), Side::Long, ONE_UNIT).unwrap();
            market.lock_bidding(&owner()).unwrap();
        }

        env.clock.set(TEST_MATURITY);
        env.publish_price(60_000 * ONE_UNIT);

        let eth_market = factory.market_mut(eth).unwrap();
        assert_eq!(
            eth_market.resolve_market(&owner()).unwrap_err().code(),
            "OracleUnavailable"
        );
        let btc_market = factory.market_mut(btc).unwrap();
        btc_market.resolve_market(&owner()).unwrap();

        assert_eq!(factory.market(btc).unwrap().phase(), MarketPhase::Resolved);
        assert_eq!(factory.market(eth).unwrap().phase(), MarketPhase::Locked);
    }
}
