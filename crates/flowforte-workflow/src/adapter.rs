//! Workflow adapter
//!
//! Validates a raw [`Workflow`] and compiles it into [`CanonicalParams`], the
//! argument record for `TradingScheduler.scheduleSwap`.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use ethers::types::U256;
use serde::Serialize;
use tracing::{debug, info};

use crate::amount::{self, Slippage};
use crate::clock::{Clock, SystemClock};
use crate::error::{Result, WorkflowError, WorkflowField};
use crate::schedule::normalize;
use crate::token::{decimals_of, resolve};
use crate::workflow::{non_blank, DecimalInput, RawSchedule, Workflow};

/// Slippage applied when the workflow does not name one.
pub const DEFAULT_SLIPPAGE: &str = "0.01";

/// Fully resolved scheduler parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalParams {
    pub vault_address: String,
    pub token_in: String,
    pub token_out: String,
    /// Base units of `token_in`.
    #[serde(with = "amount::base_units")]
    pub amount_in: U256,
    pub slippage: Slippage,
    /// Unix seconds.
    pub execute_at: u64,
    pub recurring: bool,
    /// Seconds between runs, 0 when not recurring.
    pub frequency: u64,
}

/// Borrowed view of a workflow that passed structural validation.
#[derive(Debug, Clone, Copy)]
struct Validated<'a> {
    vault_address: &'a str,
    schedule: &'a RawSchedule,
    token_in: &'a str,
    token_out: &'a str,
    amount_in: &'a DecimalInput,
    slippage: Option<&'a DecimalInput>,
}

/// Check required fields in order: vault, schedule, action, tokens, amount.
fn validate(workflow: &Workflow) -> Result<Validated<'_>> {
    let vault_address =
        non_blank(&workflow.vault_address).ok_or(WorkflowError::MissingField(WorkflowField::VaultAddress))?;
    let schedule = workflow
        .schedule
        .as_ref()
        .ok_or(WorkflowError::MissingField(WorkflowField::Schedule))?;
    let action = workflow
        .action
        .as_ref()
        .ok_or(WorkflowError::MissingField(WorkflowField::Action))?;

    let (token_in, token_out) = match (non_blank(&action.token_in), non_blank(&action.token_out)) {
        (Some(token_in), Some(token_out)) => (token_in, token_out),
        _ => return Err(WorkflowError::MissingField(WorkflowField::Tokens)),
    };

    let amount_in = action
        .amount_in
        .as_ref()
        .filter(|amount| !amount.is_blank())
        .ok_or(WorkflowError::MissingField(WorkflowField::AmountIn))?;

    Ok(Validated {
        vault_address,
        schedule,
        token_in,
        token_out,
        amount_in,
        slippage: action.slippage.as_ref().filter(|value| !value.is_blank()),
    })
}

/// Compiles workflows against an injected clock.
#[derive(Debug, Clone, Default)]
pub struct WorkflowAdapter<C = SystemClock> {
    clock: C,
}

impl<C: Clock> WorkflowAdapter<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Compile using the adapter's clock, read once.
    pub fn compile(&self, workflow: &Workflow) -> Result<CanonicalParams> {
        self.compile_at(workflow, self.clock.now())
    }

    /// Compile as if the current instant were `now`.
    pub fn compile_at(&self, workflow: &Workflow, now: DateTime<Utc>) -> Result<CanonicalParams> {
        let validated = validate(workflow)?;

        let token_in = resolve(validated.token_in)?;
        let token_out = resolve(validated.token_out)?;

        let schedule = normalize(&validated.schedule.to_spec()?, now)?;

        let decimals = decimals_of(validated.token_in);
        let amount_in = amount::scale(&validated.amount_in.as_str(), decimals)?;

        let slippage = match validated.slippage {
            Some(value) => Slippage::parse(&value.as_str())?,
            None => Slippage::default(),
        };

        debug!(
            token_in = %token_in,
            token_out = %token_out,
            decimals,
            amount_in = %amount_in,
            "resolved swap action"
        );

        let params = CanonicalParams {
            vault_address: validated.vault_address.to_string(),
            token_in,
            token_out,
            amount_in,
            slippage,
            execute_at: schedule.execute_at,
            recurring: schedule.recurring,
            frequency: schedule.frequency,
        };

        info!(
            vault = %params.vault_address,
            execute_at = params.execute_at,
            recurring = params.recurring,
            "compiled workflow"
        );
        Ok(params)
    }
}

/// Hours with up to two decimals, trailing zeros trimmed.
fn format_hours(seconds: u64) -> String {
    let hundredths = u128::from(seconds) * 100 / 3_600;
    let (whole, fraction) = (hundredths / 100, hundredths % 100);
    if fraction == 0 {
        whole.to_string()
    } else {
        format!("{whole}.{fraction:02}").trim_end_matches('0').to_string()
    }
}

impl CanonicalParams {
    /// ISO-8601 rendering of `execute_at` with millisecond precision.
    pub fn execute_at_iso(&self) -> String {
        i64::try_from(self.execute_at)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|instant| instant.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_else(|| self.execute_at.to_string())
    }
}

impl fmt::Display for CanonicalParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const RULE: &str = "================================";

        writeln!(f, "Cadence Transaction Parameters:")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Vault Address: {}", self.vault_address)?;
        writeln!(f, "Token In:      {}", self.token_in)?;
        writeln!(f, "Token Out:     {}", self.token_out)?;
        writeln!(f, "Amount In:     {}", self.amount_in)?;
        writeln!(f, "Slippage:      {}%", self.slippage.percent())?;
        writeln!(f, "Execute At:    {}", self.execute_at_iso())?;
        writeln!(f, "Recurring:     {}", self.recurring)?;
        writeln!(
            f,
            "Frequency:     {} seconds ({} hours)",
            self.frequency,
            format_hours(self.frequency)
        )?;
        write!(f, "{RULE}")
    }
}
