//! Raw workflow objects as produced by the planning agent.
//!
//! Every field is optional at this layer so that structural validation (and
//! its fixed order) lives in the adapter rather than in the deserializer.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkflowError};
use crate::schedule::{Cadence, ScheduleSpec};

/// A decimal given either as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecimalInput {
    Text(String),
    Number(serde_json::Number),
}

impl DecimalInput {
    pub fn as_str(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text.as_str()),
            Self::Number(number) => Cow::Owned(number.to_string()),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }
}

impl From<&str> for DecimalInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<u64> for DecimalInput {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

/// Swap intent submitted by an agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub vault_address: Option<String>,
    pub schedule: Option<RawSchedule>,
    pub action: Option<ActionSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSchedule {
    /// Absolute first (or only) execution instant.
    pub execute_at: Option<String>,
    /// Cadence name, e.g. `"daily"`.
    pub frequency: Option<String>,
    /// Time of day for the first run, e.g. `"10:00 UTC"`.
    pub time: Option<String>,
}

impl RawSchedule {
    /// Convert into the typed schedule.
    ///
    /// With both `executeAt` and `frequency` present the task recurs and its
    /// first run is the absolute instant.
    pub fn to_spec(&self) -> Result<ScheduleSpec> {
        let execute_at = non_blank(&self.execute_at);
        let frequency = non_blank(&self.frequency);

        match (execute_at, frequency) {
            (execute_at, Some(frequency)) => Ok(ScheduleSpec::Recurring {
                cadence: Cadence::from_name(frequency),
                time: non_blank(&self.time).map(str::to_string),
                first_run: execute_at.map(str::to_string),
            }),
            (Some(execute_at), None) => Ok(ScheduleSpec::Once {
                execute_at: execute_at.to_string(),
            }),
            (None, None) => Err(WorkflowError::InvalidSchedule(
                "schedule needs executeAt or frequency".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSpec {
    /// Symbol (`"FLOW"`) or `0x` address.
    pub token_in: Option<String>,
    pub token_out: Option<String>,
    /// Human-readable amount of `token_in`.
    pub amount_in: Option<DecimalInput>,
    /// Fraction in `[0, 1)`; defaults to 0.01.
    pub slippage: Option<DecimalInput>,
}

pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.trim().is_empty())
}
