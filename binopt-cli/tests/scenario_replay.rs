use binopt_cli::{Scenario, ScenarioRunner, StepOutcome};
use binopt_core::{MarketPhase, ONE_UNIT};
use std::io::Write;

const WEEKLY: &str = include_str!("../scenarios/btc_weekly.json");

fn replay(raw: &str) -> binopt_cli::ScenarioReport {
    let scenario = Scenario::from_json(raw).unwrap();
    ScenarioRunner::new(&scenario)
        .unwrap()
        .run(&scenario)
        .unwrap()
}

fn lifecycle(extra_steps: &str) -> String {
    format!(
        r#"{{
  "start_time": 1735689600,
  "participants": {{ "owner": 1, "alice": 2, "bob": 3 }},
  "steps": [
    {{ "action": "create", "market": "btc", "owner": "owner",
       "trading_pair": "BTC/USD", "price_feed_id": "btc-usd",
       "strike": "55000", "maturity": 1735776000, "fee": 10, "index_bg": 1 }},
    {{ "action": "start_bidding", "market": "btc", "caller": "owner" }},
    {{ "action": "bid", "market": "btc", "bidder": "alice", "side": "long", "amount": "1" }},
    {{ "action": "bid", "market": "btc", "bidder": "bob", "side": "short", "amount": "1" }},
    {{ "action": "lock", "market": "btc", "caller": "owner" }}
    {extra_steps}
  ]
}}"#
    )
}

#[test]
fn test_weekly_scenario_runs_as_expected() {
    let report = replay(WEEKLY);

    for step in &report.steps {
        assert!(step.as_expected, "step {} ({}) diverged: {:?}", step.index, step.action, step.outcome);
    }
    assert_eq!(report.payouts["alice"], "1.495");
    assert_eq!(report.payouts["carol"], "4.485");
    assert_eq!(report.payouts["bob"], "0");

    let market = &report.markets["btc"];
    assert_eq!(market.phase, MarketPhase::Expired);
    assert_eq!(market.final_price, Some(60_000 * ONE_UNIT));
    assert_eq!(market.total_paid_out, 5_980_000_000_000_000_000);
}

#[test]
fn test_winner_receives_stake_plus_net_losing_pool() {
    let report = replay(&lifecycle(
        r#",
    { "at": 1735776000, "action": "set_price", "feed": "btc-usd", "price": 6000000000000, "expo": -8 },
    { "action": "resolve", "market": "btc", "caller": "owner" },
    { "action": "expire", "market": "btc", "caller": "owner" },
    { "action": "claim", "market": "btc", "claimant": "alice" },
    { "action": "claim", "market": "btc", "claimant": "bob", "expect_error": "NoStake" }"#,
    ));

    assert!(report.all_as_expected());
    assert_eq!(report.payouts["alice"], "1.99");
    assert_eq!(report.payouts["bob"], "0");
}

#[test]
fn test_price_at_strike_refunds_everyone() {
    let report = replay(&lifecycle(
        r#",
    { "at": 1735776000, "action": "set_price", "feed": "btc-usd", "price": 55000, "expo": 0 },
    { "action": "resolve", "market": "btc", "caller": "owner" },
    { "action": "expire", "market": "btc", "caller": "owner" },
    { "action": "claim", "market": "btc", "claimant": "alice" },
    { "action": "claim", "market": "btc", "claimant": "bob" }"#,
    ));

    assert!(report.all_as_expected());
    assert_eq!(report.payouts["alice"], "1");
    assert_eq!(report.payouts["bob"], "1");
}

#[test]
fn test_oracle_outage_leaves_market_retryable() {
    let report = replay(&lifecycle(
        r#",
    { "at": 1735776000, "action": "resolve", "market": "btc", "caller": "owner",
      "expect_error": "OracleUnavailable" },
    { "action": "set_price", "feed": "btc-usd", "price": -1, "expo": 0 },
    { "action": "resolve", "market": "btc", "caller": "owner",
      "expect_error": "OracleUnavailable" },
    { "action": "set_price", "feed": "btc-usd", "price": 50000, "expo": 0 },
    { "action": "resolve", "market": "btc", "caller": "owner" }"#,
    ));

    assert!(report.all_as_expected());
    let market = &report.markets["btc"];
    assert_eq!(market.phase, MarketPhase::Resolved);
    assert_eq!(market.final_price, Some(50_000 * ONE_UNIT));
}

#[test]
fn test_unexpected_failure_is_reported() {
    let report = replay(&lifecycle(
        r#",
    { "action": "bid", "market": "btc", "bidder": "alice", "side": "long", "amount": "1" }"#,
    ));

    assert!(!report.all_as_expected());
    let last = report.steps.last().unwrap();
    assert!(!last.as_expected);
    match &last.outcome {
        StepOutcome::Failed { code, .. } => assert_eq!(code, "InvalidPhase"),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn test_scenario_errors_use_scenario_code() {
    let report = replay(&lifecycle(
        r#",
    { "action": "claim", "market": "eth", "claimant": "alice", "expect_error": "Scenario" },
    { "action": "claim", "market": "btc", "claimant": "mallory", "expect_error": "Scenario" }"#,
    ));

    assert!(report.all_as_expected());
}

#[test]
fn test_invalid_creation_parameters() {
    let raw = r#"{
  "start_time": 1735689600,
  "participants": { "owner": 1 },
  "steps": [
    { "action": "create", "market": "a", "owner": "owner", "trading_pair": "BTC/USD",
      "price_feed_id": "btc-usd", "strike": "1", "maturity": 1735689600, "fee": 10,
      "index_bg": 1, "expect_error": "InvalidParameter" },
    { "action": "create", "market": "b", "owner": "owner", "trading_pair": "BTC/USD",
      "price_feed_id": "btc-usd", "strike": "1", "maturity": 1735776000, "fee": 201,
      "index_bg": 1, "expect_error": "InvalidParameter" },
    { "action": "create", "market": "c", "owner": "owner", "trading_pair": "BTC/USD",
      "price_feed_id": "btc-usd", "strike": "1", "maturity": 1735776000, "fee": 200,
      "index_bg": 10 }
  ]
}"#;
    let report = replay(raw);

    assert!(report.all_as_expected());
    assert_eq!(report.markets.len(), 1);
    assert!(report.markets.contains_key("c"));
}

#[test]
fn test_named_scenarios_derive_stable_addresses() {
    let first = replay(WEEKLY);
    let second = replay(WEEKLY);
    assert_eq!(first.markets["btc"].address, second.markets["btc"].address);
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(WEEKLY.as_bytes()).unwrap();

    let scenario = Scenario::load(file.path()).unwrap();
    assert_eq!(scenario.name.as_deref(), Some("btc-weekly"));
    assert_eq!(scenario.participants.len(), 4);

    assert!(Scenario::load(std::path::Path::new("/nonexistent/scenario.json")).is_err());
    assert!(Scenario::from_json("{ \"steps\": [] }").is_err());
}

#[test]
fn test_zero_seed_participant_is_rejected() {
    let scenario =
        Scenario::from_json(r#"{ "start_time": 0, "participants": { "ghost": 0 }, "steps": [] }"#)
            .unwrap();
    assert!(ScenarioRunner::new(&scenario).is_err());
}
