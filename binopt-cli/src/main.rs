//! # Binopt CLI
//!
//! Command-line interface for replaying and inspecting binary option markets.

use anyhow::{bail, Result};
use binopt_cli::{
    commands, init_logging, Scenario, ScenarioReport, ScenarioRunner, StepOutcome,
};
use binopt_core::{
    format_timestamp, format_units, parse_units, Clock, Positions, Side, SystemClock,
    MAX_FEE_PERCENTAGE, MIN_FEE_PERCENTAGE,
};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "binopt")]
#[command(about = "Oracle-settled binary option markets")]
#[command(version)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a market scenario file
    Run {
        /// Scenario JSON file
        scenario: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compute the reward of a stake for a given settlement
    Payout {
        /// Total staked on long (decimal units)
        #[arg(long)]
        long: String,
        /// Total staked on short (decimal units)
        #[arg(long)]
        short: String,
        /// Fee in parts per thousand (1-200)
        #[arg(
            long,
            value_parser = clap::value_parser!(u16)
                .range(MIN_FEE_PERCENTAGE as i64..=MAX_FEE_PERCENTAGE as i64)
        )]
        fee: u16,
        /// Stake being paid out (decimal units)
        #[arg(long)]
        stake: String,
        /// Side of the stake
        #[arg(long)]
        side: Side,
        /// Strike price (decimal units)
        #[arg(long)]
        strike: String,
        /// Final oracle price (decimal units)
        #[arg(long)]
        final_price: String,
    },
    /// Normalize a raw oracle sample to 18 decimals
    Normalize {
        /// Raw integer price
        #[arg(long, allow_hyphen_values = true)]
        price: i64,
        /// Decimal exponent
        #[arg(long, allow_hyphen_values = true)]
        expo: i32,
    },
    /// Validate market creation parameters against the current time
    Validate {
        /// Maturity (Unix timestamp)
        #[arg(long)]
        maturity: i64,
        /// Fee in parts per thousand
        #[arg(long)]
        fee: u16,
        /// Display tag
        #[arg(long, default_value = "1")]
        index_bg: u8,
        /// Strike price (decimal units)
        #[arg(long, default_value = "1")]
        strike: String,
    },
    /// Print the deterministic identity for a scenario seed
    Keygen {
        /// Seed byte (1-255)
        seed: u8,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run { scenario, json } => {
            let loaded = Scenario::load(&scenario)?;
            let report = ScenarioRunner::new(&loaded)?.run(&loaded)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            if !report.all_as_expected() {
                bail!("scenario {} did not run as expected", scenario.display());
            }
        }

        Commands::Payout {
            long,
            short,
            fee,
            stake,
            side,
            strike,
            final_price,
        } => {
            let positions = Positions {
                long_total: parse_units(&long)?,
                short_total: parse_units(&short)?,
            };
            let stake = parse_units(&stake)?;
            let quote = commands::quote_payout(
                positions,
                fee,
                stake,
                side,
                parse_units(&strike)?,
                parse_units(&final_price)?,
            )?;

            println!("{}: {}", "Outcome".yellow().bold(), quote.outcome);
            println!("{}: {}", "Fee withheld".yellow().bold(), format_units(quote.fee));
            println!(
                "{}: {} stake of {} pays {}",
                "Payout".green().bold(),
                side,
                format_units(stake).cyan(),
                format_units(quote.reward).green()
            );
        }

        Commands::Normalize { price, expo } => {
            let value = commands::normalize(price, expo)?;
            println!(
                "{}: {}e{} = {} ({} raw)",
                "Normalized".green().bold(),
                price,
                expo,
                format_units(value).cyan(),
                value
            );
        }

        Commands::Validate {
            maturity,
            fee,
            index_bg,
            strike,
        } => {
            let strike = parse_units(&strike)?;
            match commands::check_params(maturity, fee, index_bg, strike, SystemClock.now()) {
                Ok(_) => println!(
                    "{}: parameters are {} (maturity {})",
                    "Validation".green().bold(),
                    "valid".green(),
                    format_timestamp(maturity).yellow()
                ),
                Err(e) => {
                    println!("{}: {}", "Validation".red().bold(), e.to_string().red());
                    bail!("invalid market parameters");
                }
            }
        }

        Commands::Keygen { seed } => {
            let identity = commands::keygen(seed)?;
            println!("{}: {}", "Identity".green().bold(), identity.to_hex().cyan());
        }
    }

    Ok(())
}

fn print_report(report: &ScenarioReport) {
    println!("{}", "Scenario Replay".green().bold());
    println!("{}", "═".repeat(60).bright_black());
    for step in &report.steps {
        let marker = if step.as_expected {
            "✓".green()
        } else {
            "✗".red()
        };
        match &step.outcome {
            StepOutcome::Ok { detail } => {
                println!(
                    "{} {:>3} {:<14} {} {}",
                    marker,
                    step.index,
                    step.action.cyan(),
                    format_timestamp(step.time).bright_black(),
                    detail
                );
            }
            StepOutcome::Failed { code, message } => {
                println!(
                    "{} {:>3} {:<14} {} {} {}",
                    marker,
                    step.index,
                    step.action.cyan(),
                    format_timestamp(step.time).bright_black(),
                    code.yellow().bold(),
                    message.bright_black()
                );
            }
        }
    }

    for (label, market) in &report.markets {
        println!();
        println!("{}", "═".repeat(60).bright_black());
        println!("{}: {}", "Market".yellow().bold(), label);
        println!("{}: {}", "Address".yellow().bold(), market.address.cyan());
        println!("{}: {}", "Pair".yellow().bold(), market.params.trading_pair);
        println!("{}: {}", "Strike".yellow().bold(), format_units(market.params.strike_price));
        println!(
            "{}: {}",
            "Final price".yellow().bold(),
            market
                .final_price
                .map(format_units)
                .unwrap_or_else(|| "-".to_string())
        );
        println!("{}: {}", "Phase".yellow().bold(), market.phase);
        println!(
            "{}: long {} / short {}",
            "Pool".yellow().bold(),
            format_units(market.positions.long_total),
            format_units(market.positions.short_total)
        );
        println!("{}: {}", "Paid out".yellow().bold(), format_units(market.total_paid_out));
    }

    println!();
    println!("{}", "═".repeat(60).bright_black());
    for (name, amount) in &report.payouts {
        println!("{}: {}", name.yellow().bold(), amount.green());
    }
}
