//! Error taxonomy for workflow compilation.

use std::fmt;

/// Structural field of a workflow, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowField {
    VaultAddress,
    Schedule,
    Action,
    /// `action.tokenIn` and `action.tokenOut` are checked together.
    Tokens,
    AmountIn,
}

impl WorkflowField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VaultAddress => "vaultAddress",
            Self::Schedule => "schedule",
            Self::Action => "action",
            Self::Tokens => "action.tokenIn/action.tokenOut",
            Self::AmountIn => "action.amountIn",
        }
    }
}

impl fmt::Display for WorkflowField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("missing {0} in workflow")]
    MissingField(WorkflowField),

    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("invalid time format `{0}`, expected 'HH:MM UTC'")]
    InvalidTimeFormat(String),

    #[error("unknown token symbol: {0}")]
    UnknownToken(String),

    #[error("invalid amount `{amount}`: {reason}")]
    InvalidAmount { amount: String, reason: String },

    #[error("invalid slippage `{value}`: {reason}")]
    InvalidSlippage { value: String, reason: String },
}

impl WorkflowError {
    pub(crate) fn invalid_amount(amount: &str, reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            amount: amount.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
