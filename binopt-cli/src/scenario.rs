//! # Scenario Replay
//!
//! A scenario is a JSON file describing named participants and an ordered list
//! of timed market operations. Replaying it drives a real [`MarketFactory`]
//! against an in-memory oracle and a manual clock, so whole market lifecycles
//! can be checked from the command line.
//!
//! ```json
//! {
//!   "start_time": 1735689600,
//!   "participants": { "owner": 1, "alice": 2, "bob": 3 },
//!   "steps": [
//!     { "action": "create", "market": "btc", "owner": "owner",
//!       "trading_pair": "BTC/USD", "price_feed_id": "btc-usd",
//!       "strike": "55000", "maturity": 1735776000, "fee": 10, "index_bg": 1 },
//!     { "action": "start_bidding", "market": "btc", "caller": "owner" },
//!     { "action": "bid", "market": "btc", "bidder": "alice", "side": "long", "amount": "1" },
//!     { "action": "bid", "market": "btc", "bidder": "bob", "amount": "0", "side": "short",
//!       "expect_error": "InvalidAmount" }
//!   ]
//! }
//! ```

use anyhow::{anyhow, Context};
use binopt_core::{
    format_units, parse_units, salt_from_label, Clock, FundsTransfer, Identity, InMemoryOracle,
    ManualClock, MarketFactory, MarketHandle, MarketParams, MarketSnapshot, PriceSample, Side,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Top-level scenario file.
#[derive(Deserialize, Clone, Debug)]
pub struct Scenario {
    /// Clock value before the first step
    pub start_time: i64,
    /// Optional label mixed into the factory salt so addresses are reproducible
    #[serde(default)]
    pub name: Option<String>,
    /// Participant name -> identity seed
    pub participants: BTreeMap<String, u8>,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("Failed to parse scenario JSON")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;
        Self::from_json(&raw)
    }
}

/// One operation, optionally pinned to a clock value and an expected failure.
#[derive(Deserialize, Clone, Debug)]
pub struct ScenarioStep {
    /// Set the clock to this value before running the action
    #[serde(default)]
    pub at: Option<i64>,
    /// Error code the action is expected to fail with
    #[serde(default)]
    pub expect_error: Option<String>,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Create {
        market: String,
        owner: String,
        trading_pair: String,
        price_feed_id: String,
        strike: String,
        maturity: i64,
        fee: u16,
        index_bg: u8,
    },
    StartBidding {
        market: String,
        caller: String,
    },
    Bid {
        market: String,
        bidder: String,
        side: Side,
        amount: String,
    },
    Lock {
        market: String,
        caller: String,
    },
    SetPrice {
        feed: String,
        price: i64,
        expo: i32,
    },
    ClearPrice {
        feed: String,
    },
    Resolve {
        market: String,
        caller: String,
    },
    Expire {
        market: String,
        caller: String,
    },
    Claim {
        market: String,
        claimant: String,
    },
    Advance {
        seconds: i64,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Create { .. } => "create",
            Action::StartBidding { .. } => "start_bidding",
            Action::Bid { .. } => "bid",
            Action::Lock { .. } => "lock",
            Action::SetPrice { .. } => "set_price",
            Action::ClearPrice { .. } => "clear_price",
            Action::Resolve { .. } => "resolve",
            Action::Expire { .. } => "expire",
            Action::Claim { .. } => "claim",
            Action::Advance { .. } => "advance",
        }
    }
}

/// Result of a single step.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Ok { detail: String },
    Failed { code: String, message: String },
}

#[derive(Serialize, Clone, Debug)]
pub struct StepReport {
    pub index: usize,
    pub action: &'static str,
    pub time: i64,
    pub outcome: StepOutcome,
    pub expected_error: Option<String>,
    /// Whether the outcome matched `expect_error` (or success when none)
    pub as_expected: bool,
}

/// Everything a replay produced.
#[derive(Serialize, Clone, Debug)]
pub struct ScenarioReport {
    pub steps: Vec<StepReport>,
    pub markets: BTreeMap<String, MarketSnapshot>,
    /// Participant name -> total paid out, as a decimal string
    pub payouts: BTreeMap<String, String>,
}

impl ScenarioReport {
    pub fn all_as_expected(&self) -> bool {
        self.steps.iter().all(|s| s.as_expected)
    }
}

/// Funds sink crediting claimants in memory.
#[derive(Debug, Default)]
pub struct Ledger {
    balances: HashMap<Identity, u128>,
}

impl Ledger {
    pub fn balance(&self, who: &Identity) -> u128 {
        self.balances.get(who).copied().unwrap_or(0)
    }
}

impl FundsTransfer for Ledger {
    fn transfer(&mut self, to: &Identity, amount: u128) -> binopt_core::Result<()> {
        let balance = self.balances.entry(*to).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(binopt_core::MarketError::Overflow("ledger balance"))?;
        Ok(())
    }
}

/// Replays scenarios against a fresh factory.
pub struct ScenarioRunner {
    factory: MarketFactory,
    oracle: Arc<InMemoryOracle>,
    clock: Arc<ManualClock>,
    participants: BTreeMap<String, Identity>,
    markets: BTreeMap<String, MarketHandle>,
    ledger: Ledger,
}

impl ScenarioRunner {
    pub fn new(scenario: &Scenario) -> anyhow::Result<Self> {
        let oracle = Arc::new(InMemoryOracle::new());
        let clock = Arc::new(ManualClock::new(scenario.start_time));
        let salt = salt_from_label(scenario.name.as_deref().unwrap_or("binopt-scenario"));
        let factory = MarketFactory::with_salt(salt, oracle.clone(), clock.clone());

        let mut participants = BTreeMap::new();
        for (name, seed) in &scenario.participants {
            let identity = Identity::from_seed(*seed)
                .with_context(|| format!("Invalid seed {seed} for participant '{name}'"))?;
            participants.insert(name.clone(), identity);
        }

        Ok(Self {
            factory,
            oracle,
            clock,
            participants,
            markets: BTreeMap::new(),
            ledger: Ledger::default(),
        })
    }

    /// Run every step of `scenario`, collecting outcomes instead of stopping
    /// at the first failure.
    pub fn run(mut self, scenario: &Scenario) -> anyhow::Result<ScenarioReport> {
        let mut steps = Vec::with_capacity(scenario.steps.len());
        for (index, step) in scenario.steps.iter().enumerate() {
            if let Some(at) = step.at {
                self.clock.set(at);
            }
            let time = self.clock.now();
            let outcome = match self.apply(&step.action) {
                Ok(detail) => StepOutcome::Ok { detail },
                Err(e) => {
                    let code = e
                        .downcast_ref::<binopt_core::MarketError>()
                        .map(|m| m.code().to_string())
                        .unwrap_or_else(|| "Scenario".to_string());
                    StepOutcome::Failed {
                        code,
                        message: format!("{e:#}"),
                    }
                }
            };
            let as_expected = match (&outcome, &step.expect_error) {
                (StepOutcome::Ok { .. }, None) => true,
                (StepOutcome::Failed { code, .. }, Some(expected)) => code == expected,
                _ => false,
            };
            debug!(index, action = step.action.name(), ?outcome, as_expected, "scenario step");
            steps.push(StepReport {
                index,
                action: step.action.name(),
                time,
                outcome,
                expected_error: step.expect_error.clone(),
                as_expected,
            });
        }

        let mut markets = BTreeMap::new();
        for (label, handle) in &self.markets {
            markets.insert(label.clone(), self.factory.market(*handle)?.snapshot());
        }
        let payouts = self
            .participants
            .iter()
            .map(|(name, id)| (name.clone(), format_units(self.ledger.balance(id))))
            .collect();

        info!(steps = steps.len(), markets = markets.len(), "scenario finished");
        Ok(ScenarioReport {
            steps,
            markets,
            payouts,
        })
    }

    fn participant(&self, name: &str) -> anyhow::Result<Identity> {
        self.participants
            .get(name)
            .copied()
            .ok_or_else(|| anyhow!("Unknown participant '{name}'"))
    }

    fn handle(&self, label: &str) -> anyhow::Result<MarketHandle> {
        self.markets
            .get(label)
            .copied()
            .ok_or_else(|| anyhow!("Unknown market '{label}'"))
    }

    fn apply(&mut self, action: &Action) -> anyhow::Result<String> {
        match action {
            Action::Create {
                market,
                owner,
                trading_pair,
                price_feed_id,
                strike,
                maturity,
                fee,
                index_bg,
            } => {
                if self.markets.contains_key(market) {
                    return Err(anyhow!("Market label '{market}' already used"));
                }
                let owner = self.participant(owner)?;
                let params = MarketParams {
                    trading_pair: trading_pair.clone(),
                    price_feed_id: price_feed_id.clone(),
                    strike_price: parse_units(strike)?,
                    maturity_time: *maturity,
                    fee_percentage: *fee,
                    index_bg: *index_bg,
                };
                let handle = self.factory.create_market(owner, params)?;
                self.markets.insert(market.clone(), handle);
                let address = self.factory.market(handle)?.address().to_string();
                Ok(format!("deployed {market} at {address}"))
            }
            Action::StartBidding { market, caller } => {
                let caller = self.participant(caller)?;
                let handle = self.handle(market)?;
                self.factory.market_mut(handle)?.start_bidding(&caller)?;
                Ok(format!("{market} open for bids"))
            }
            Action::Bid {
                market,
                bidder,
                side,
                amount,
            } => {
                let who = self.participant(bidder)?;
                let handle = self.handle(market)?;
                let amount = parse_units(amount)?;
                self.factory.market_mut(handle)?.bid(&who, *side, amount)?;
                Ok(format!("{bidder} bid {} {side}", format_units(amount)))
            }
            Action::Lock { market, caller } => {
                let caller = self.participant(caller)?;
                let handle = self.handle(market)?;
                self.factory.market_mut(handle)?.lock_bidding(&caller)?;
                Ok(format!("{market} locked"))
            }
            Action::SetPrice { feed, price, expo } => {
                let now = self.clock.now();
                self.oracle
                    .set_price(feed, PriceSample::new(*price, *expo, now))?;
                Ok(format!("{feed} = {price}e{expo}"))
            }
            Action::ClearPrice { feed } => {
                self.oracle.clear_price(feed)?;
                Ok(format!("{feed} cleared"))
            }
            Action::Resolve { market, caller } => {
                let caller = self.participant(caller)?;
                let handle = self.handle(market)?;
                let m = self.factory.market_mut(handle)?;
                let final_price = m.resolve_market(&caller)?;
                let outcome = m
                    .outcome()
                    .map(|o| o.to_string())
                    .unwrap_or_default();
                Ok(format!(
                    "{market} resolved at {}: {outcome}",
                    format_units(final_price)
                ))
            }
            Action::Expire { market, caller } => {
                let caller = self.participant(caller)?;
                let handle = self.handle(market)?;
                self.factory.market_mut(handle)?.expire_market(&caller)?;
                Ok(format!("{market} expired"))
            }
            Action::Claim { market, claimant } => {
                let who = self.participant(claimant)?;
                let handle = self.handle(market)?;
                let reward = self
                    .factory
                    .market_mut(handle)?
                    .claim_reward(&who, &mut self.ledger)?;
                Ok(format!("{claimant} received {}", format_units(reward)))
            }
            Action::Advance { seconds } => {
                self.clock.advance(*seconds);
                Ok(format!("clock +{seconds}s"))
            }
        }
    }
}
