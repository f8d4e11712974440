//! Scheduler configuration: access endpoints and contract addresses.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ChainError, Result};

pub const DEFAULT_ACCESS_NODE: &str = "https://rest-testnet.onflow.org";
pub const DEFAULT_WALLET_DISCOVERY: &str = "https://fcl-discovery.onflow.org/testnet/authn";

pub const ACCESS_NODE_ENV: &str = "FLOW_ACCESS_NODE";
pub const WALLET_DISCOVERY_ENV: &str = "FLOW_WALLET_DISCOVERY";

/// Cadence contracts the scheduler depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Contract {
    TradingScheduler,
    ScheduledSwapHandler,
    FlowTransactionScheduler,
    DeFiActions,
    BandOracleConnectors,
}

impl Contract {
    pub const ALL: [Contract; 5] = [
        Self::TradingScheduler,
        Self::ScheduledSwapHandler,
        Self::FlowTransactionScheduler,
        Self::DeFiActions,
        Self::BandOracleConnectors,
    ];

    /// Contract name as deployed.
    pub fn name(self) -> &'static str {
        match self {
            Self::TradingScheduler => "TradingScheduler",
            Self::ScheduledSwapHandler => "ScheduledSwapHandler",
            Self::FlowTransactionScheduler => "FlowTransactionScheduler",
            Self::DeFiActions => "DeFiActions",
            Self::BandOracleConnectors => "BandOracleConnectors",
        }
    }

    /// Environment variable holding the contract address.
    pub fn env_key(self) -> &'static str {
        match self {
            Self::TradingScheduler => "TRADING_SCHEDULER_ADDRESS",
            Self::ScheduledSwapHandler => "SCHEDULED_SWAP_HANDLER_ADDRESS",
            Self::FlowTransactionScheduler => "FLOW_TRANSACTION_SCHEDULER_ADDRESS",
            Self::DeFiActions => "DEFI_ACTIONS_ADDRESS",
            Self::BandOracleConnectors => "BAND_ORACLE_CONNECTORS_ADDRESS",
        }
    }

    /// Import placeholder used in Cadence templates, e.g. `0xTradingScheduler`.
    pub fn placeholder(self) -> String {
        format!("0x{}", self.name())
    }

    /// Transactions and scripts cannot be rendered without this contract.
    pub fn is_required(self) -> bool {
        matches!(self, Self::TradingScheduler)
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validate a Flow account address: `0x` plus 16 hex digits.
pub fn parse_flow_address(value: &str) -> Result<String> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .ok_or_else(|| ChainError::Config(format!("Flow address `{value}` must start with 0x")))?;
    if digits.len() != 16 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ChainError::Config(format!(
            "Flow address `{value}` must have 16 hex digits"
        )));
    }
    Ok(trimmed.to_ascii_lowercase())
}

/// Deployed address per contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses(BTreeMap<Contract, String>);

impl ContractAddresses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, contract: Contract, address: &str) -> Result<Self> {
        self.set(contract, address)?;
        Ok(self)
    }

    pub fn set(&mut self, contract: Contract, address: &str) -> Result<()> {
        self.0.insert(contract, parse_flow_address(address)?);
        Ok(())
    }

    pub fn get(&self, contract: Contract) -> Option<&str> {
        self.0.get(&contract).map(String::as_str)
    }

    pub fn require(&self, contract: Contract) -> Result<&str> {
        self.get(contract)
            .ok_or_else(|| ChainError::Config(format!("no address configured for {contract}")))
    }

    /// Placeholder to address pairs for every configured contract.
    pub fn import_map(&self) -> Vec<(String, &str)> {
        self.0
            .iter()
            .map(|(contract, address)| (contract.placeholder(), address.as_str()))
            .collect()
    }
}

/// Endpoints and contract addresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub access_node: Url,
    pub wallet_discovery: Url,
    pub contracts: ContractAddresses,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            access_node: Url::parse(DEFAULT_ACCESS_NODE).expect("default access node URL"),
            wallet_discovery: Url::parse(DEFAULT_WALLET_DISCOVERY).expect("default discovery URL"),
            contracts: ContractAddresses::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from a key lookup. Absent or blank values count as unset, and
    /// unset endpoints fall back to testnet defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = non_blank(ACCESS_NODE_ENV) {
            config.access_node = parse_url(ACCESS_NODE_ENV, &value)?;
        }
        if let Some(value) = non_blank(WALLET_DISCOVERY_ENV) {
            config.wallet_discovery = parse_url(WALLET_DISCOVERY_ENV, &value)?;
        }
        for contract in Contract::ALL {
            if let Some(address) = non_blank(contract.env_key()) {
                config.contracts.set(contract, &address)?;
            }
        }

        Ok(config)
    }

    /// Readiness report for deployment.
    pub fn check(&self) -> DeploymentReport {
        let mut report = DeploymentReport::default();

        for (name, url) in [
            ("access node", &self.access_node),
            ("wallet discovery", &self.wallet_discovery),
        ] {
            match url.scheme() {
                "https" => report.push(name, CheckStatus::Ok, url.as_str()),
                "http" => report.push(name, CheckStatus::Warning, format!("{url} is not TLS")),
                other => report.push(name, CheckStatus::Error, format!("unsupported scheme `{other}`")),
            }
        }

        for contract in Contract::ALL {
            match (self.contracts.get(contract), contract.is_required()) {
                (Some(address), _) => report.push(contract.name(), CheckStatus::Ok, address),
                (None, true) => report.push(
                    contract.name(),
                    CheckStatus::Error,
                    format!("not configured, set {}", contract.env_key()),
                ),
                (None, false) => report.push(contract.name(), CheckStatus::Warning, "not configured"),
            }
        }

        report
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url> {
    Url::parse(value.trim()).map_err(|e| ChainError::Config(format!("{key}: invalid URL `{value}`: {e}")))
}

/// Outcome of one readiness check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

/// One line of a deployment report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckEntry {
    pub name: String,
    pub status: CheckStatus,
    pub detail: String,
}

/// Readiness report produced by `SchedulerConfig::check`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentReport {
    pub entries: Vec<CheckEntry>,
}

impl DeploymentReport {
    fn push(&mut self, name: &str, status: CheckStatus, detail: impl Into<String>) {
        self.entries.push(CheckEntry {
            name: name.to_string(),
            status,
            detail: detail.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|entry| entry.status == CheckStatus::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.entries.iter().any(|entry| entry.status == CheckStatus::Warning)
    }
}

impl fmt::Display for DeploymentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            let marker = match entry.status {
                CheckStatus::Ok => "ok",
                CheckStatus::Warning => "warn",
                CheckStatus::Error => "error",
            };
            writeln!(f, "[{marker:>5}] {:<26} {}", entry.name, entry.detail)?;
        }
        Ok(())
    }
}
