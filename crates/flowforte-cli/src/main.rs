//! FlowForte Scheduler Binary
//!
//! Compiles workflows into scheduler parameters and builds swap calldata offline.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use ethers::types::U256;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use flowforte_chain::{Contract, SchedulerConfig};
use flowforte_evm::{min_amount_out, parse_address, SwapCall, SwapCallEncoder};
use flowforte_workflow::{FixedClock, Slippage, SystemClock, Wad, Workflow, WorkflowAdapter};

#[derive(Parser)]
#[command(name = "flowforte")]
#[command(about = "FlowForte workflow compiler and swap call encoder")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a workflow JSON document into scheduler parameters
    Compile {
        /// Workflow file, or `-` for stdin
        #[arg(long, default_value = "-")]
        workflow: String,

        /// Evaluate relative schedules at this RFC 3339 instant instead of now
        #[arg(long)]
        now: Option<DateTime<Utc>>,

        /// Print the parameters as JSON
        #[arg(long)]
        json: bool,
    },
    /// Encode a swapExactInputSingle call
    EncodeSwap {
        #[arg(long)]
        token_in: String,

        #[arg(long)]
        token_out: String,

        /// Input amount in base units
        #[arg(long)]
        amount_in: String,

        /// Minimum output in base units
        #[arg(long)]
        amount_out_min: String,

        #[arg(long)]
        fee_recipient: Option<String>,

        /// Fee rate in millionths
        #[arg(long, default_value = "0")]
        fee_rate: String,

        /// Print a Cadence [UInt8] literal instead of hex calldata
        #[arg(long)]
        cadence_bytes: bool,
    },
    /// Print the swapExactInputSingle selector
    Selector,
    /// Minimum output for an input amount, price and slippage
    MinOut {
        /// Input amount in base units
        #[arg(long)]
        amount_in: String,

        /// Output units per input unit
        #[arg(long)]
        price: String,

        #[arg(long, default_value = "0.01")]
        slippage: String,
    },
    /// Report on endpoints and contract addresses
    CheckConfig(ConfigArgs),
}

#[derive(clap::Args)]
struct ConfigArgs {
    #[arg(long, env = "FLOW_ACCESS_NODE")]
    access_node: Option<String>,

    #[arg(long, env = "FLOW_WALLET_DISCOVERY")]
    wallet_discovery: Option<String>,

    #[arg(long, env = "TRADING_SCHEDULER_ADDRESS")]
    trading_scheduler: Option<String>,

    #[arg(long, env = "SCHEDULED_SWAP_HANDLER_ADDRESS")]
    scheduled_swap_handler: Option<String>,

    #[arg(long, env = "FLOW_TRANSACTION_SCHEDULER_ADDRESS")]
    flow_transaction_scheduler: Option<String>,

    #[arg(long, env = "DEFI_ACTIONS_ADDRESS")]
    defi_actions: Option<String>,

    #[arg(long, env = "BAND_ORACLE_CONNECTORS_ADDRESS")]
    band_oracle_connectors: Option<String>,
}

impl ConfigArgs {
    fn lookup(&self, key: &str) -> Option<String> {
        let value = match key {
            "FLOW_ACCESS_NODE" => &self.access_node,
            "FLOW_WALLET_DISCOVERY" => &self.wallet_discovery,
            k if k == Contract::TradingScheduler.env_key() => &self.trading_scheduler,
            k if k == Contract::ScheduledSwapHandler.env_key() => &self.scheduled_swap_handler,
            k if k == Contract::FlowTransactionScheduler.env_key() => &self.flow_transaction_scheduler,
            k if k == Contract::DeFiActions.env_key() => &self.defi_actions,
            k if k == Contract::BandOracleConnectors.env_key() => &self.band_oracle_connectors,
            _ => return None,
        };
        value.clone()
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Compile { workflow, now, json } => {
            let workflow = read_workflow(&workflow)?;
            let params = match now {
                Some(now) => WorkflowAdapter::new(FixedClock::new(now)).compile(&workflow)?,
                None => WorkflowAdapter::new(SystemClock).compile(&workflow)?,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&params)?);
            } else {
                println!("{params}");
            }
        }
        Commands::EncodeSwap {
            token_in,
            token_out,
            amount_in,
            amount_out_min,
            fee_recipient,
            fee_rate,
            cadence_bytes,
        } => {
            let call = swap_call(
                &token_in,
                &token_out,
                &amount_in,
                &amount_out_min,
                fee_recipient.as_deref(),
                &fee_rate,
            )?;

            let encoder = SwapCallEncoder::new()?;
            if cadence_bytes {
                println!("{}", cadence_byte_literal(&encoder.encode_for_cadence(&call)?));
            } else {
                println!("{}", encoder.encode(&call)?.to_hex());
            }
        }
        Commands::Selector => {
            let selector = SwapCallEncoder::new()?.selector()?;
            println!("0x{}", hex::encode(selector));
        }
        Commands::MinOut {
            amount_in,
            price,
            slippage,
        } => {
            let amount_in = parse_base_units("amount-in", &amount_in)?;
            let price = Wad::parse_floor(&price)?;
            let slippage = Slippage::parse(&slippage)?;
            println!("{}", min_amount_out(amount_in, price, slippage)?);
        }
        Commands::CheckConfig(config_args) => {
            let config = SchedulerConfig::from_lookup(|key| config_args.lookup(key))?;
            let report = config.check();
            print!("{report}");
            if report.has_errors() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn read_workflow(source: &str) -> Result<Workflow> {
    let text = if source == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).context("reading workflow from stdin")?;
        text
    } else {
        let path = PathBuf::from(source);
        fs::read_to_string(&path).with_context(|| format!("reading workflow {}", path.display()))?
    };
    debug!(bytes = text.len(), "read workflow");
    serde_json::from_str(&text).context("parsing workflow JSON")
}

/// Recipient defaults to the zero address; the fee rate applies either way.
fn swap_call(
    token_in: &str,
    token_out: &str,
    amount_in: &str,
    amount_out_min: &str,
    fee_recipient: Option<&str>,
    fee_rate: &str,
) -> Result<SwapCall> {
    let fee_recipient = fee_recipient.map(parse_address).transpose()?.unwrap_or_default();
    Ok(SwapCall::new(
        parse_address(token_in)?,
        parse_address(token_out)?,
        parse_base_units("amount-in", amount_in)?,
        parse_base_units("amount-out-min", amount_out_min)?,
    )
    .with_fee(fee_recipient, parse_base_units("fee-rate", fee_rate)?))
}

fn parse_base_units(name: &str, value: &str) -> Result<U256> {
    U256::from_dec_str(value.trim()).with_context(|| format!("--{name} must be a non-negative integer, got `{value}`"))
}

fn cadence_byte_literal(bytes: &[u8]) -> String {
    let items: Vec<String> = bytes.iter().map(u8::to_string).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::Address;

    #[test]
    fn test_cadence_byte_literal() {
        assert_eq!(cadence_byte_literal(&[0x41, 0x4b, 0x00]), "[65, 75, 0]");
        assert_eq!(cadence_byte_literal(&[]), "[]");
    }

    const WFLOW: &str = "0xd3bF53DAC106A0290B0483EcBC89d40FcC961f3e";
    const USDC: &str = "0xF1815bd50389c46847f0Bda824eC8da914045D14";

    #[test]
    fn test_fee_rate_without_recipient() {
        let call = swap_call(WFLOW, USDC, "1000", "990", None, "3000").unwrap();
        assert_eq!(call.fee_recipient, Address::zero());
        assert_eq!(call.fee_rate, U256::from(3000u64));

        let payload = SwapCallEncoder::new().unwrap().encode(&call).unwrap().payload;
        let fee_rate_word = &payload[payload.len() - 32..];
        assert_eq!(U256::from_big_endian(fee_rate_word), U256::from(3000u64));
        let recipient_word = &payload[payload.len() - 64..payload.len() - 32];
        assert!(recipient_word.iter().all(|b| *b == 0));
    }

    #[test]
    fn test_fee_recipient_parsed() {
        let call = swap_call(WFLOW, USDC, "1000", "990", Some(USDC), "0").unwrap();
        assert_eq!(call.fee_recipient, parse_address(USDC).unwrap());
        assert!(call.fee_rate.is_zero());
        assert!(swap_call(WFLOW, USDC, "1000", "990", Some("0x12"), "0").is_err());
    }

    #[test]
    fn test_parse_base_units() {
        assert_eq!(parse_base_units("amount-in", " 1000 ").unwrap(), U256::from(1000u64));
        assert!(parse_base_units("amount-in", "1.5").is_err());
    }

    #[test]
    fn test_config_lookup() {
        let args = ConfigArgs {
            access_node: None,
            wallet_discovery: None,
            trading_scheduler: Some("0x8a4f2c1b9d3e7f60".to_string()),
            scheduled_swap_handler: None,
            flow_transaction_scheduler: None,
            defi_actions: None,
            band_oracle_connectors: None,
        };
        let config = SchedulerConfig::from_lookup(|key| args.lookup(key)).unwrap();
        assert_eq!(config.contracts.get(Contract::TradingScheduler), Some("0x8a4f2c1b9d3e7f60"));
        assert!(!config.check().has_errors());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["flowforte", "min-out", "--amount-in", "100", "--price", "2.0"]).unwrap();
        assert!(matches!(args.command, Commands::MinOut { ref slippage, .. } if slippage == "0.01"));
    }
}
