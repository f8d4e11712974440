//! JSON-Cadence values and the transaction/script envelopes sent to Flow.

use ethers::types::U256;
use serde::{Deserialize, Serialize};

use crate::error::{ChainError, Result};

/// A JSON-Cadence value, e.g. `{"type": "UInt256", "value": "1000"}`.
///
/// Numeric values travel as strings, as the Flow access API expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CadenceValue {
    String(String),
    Bool(bool),
    UInt8(String),
    UInt64(String),
    UInt256(String),
    UFix64(String),
    Optional(Option<Box<CadenceValue>>),
    Array(Vec<CadenceValue>),
}

impl CadenceValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn uint64(value: u64) -> Self {
        Self::UInt64(value.to_string())
    }

    pub fn uint256(value: U256) -> Self {
        Self::UInt256(value.to_string())
    }

    /// Whole seconds as a `UFix64` with 8 fractional digits.
    pub fn ufix64_secs(secs: u64) -> Self {
        Self::UFix64(format!("{secs}.00000000"))
    }

    /// A `[UInt8]` array holding raw bytes.
    pub fn bytes(data: &[u8]) -> Self {
        Self::Array(data.iter().map(|b| Self::UInt8(b.to_string())).collect())
    }

    /// Unwrap `Optional` layers; `None` for a nil optional.
    pub fn into_inner(self) -> Option<CadenceValue> {
        match self {
            Self::Optional(Some(inner)) => inner.into_inner(),
            Self::Optional(None) => None,
            other => Some(other),
        }
    }

    /// Whole seconds of a `UFix64`; the fractional part is dropped.
    pub fn as_ufix64_secs(&self) -> Result<u64> {
        let Self::UFix64(text) = self else {
            return Err(ChainError::UnexpectedResponse(format!("expected UFix64, got {self:?}")));
        };
        let whole = text.split('.').next().unwrap_or_default();
        whole
            .parse()
            .map_err(|_| ChainError::UnexpectedResponse(format!("malformed UFix64 `{text}`")))
    }
}

/// A named positional argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CadenceArgument {
    pub name: &'static str,
    #[serde(flatten)]
    pub value: CadenceValue,
}

impl CadenceArgument {
    pub fn new(name: &'static str, value: CadenceValue) -> Self {
        Self { name, value }
    }
}

/// A Cadence transaction with resolved imports. Signing is left to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CadenceTransaction {
    pub code: String,
    pub arguments: Vec<CadenceArgument>,
    pub compute_limit: u64,
}

impl CadenceTransaction {
    /// Argument values in order, without names.
    pub fn argument_values(&self) -> Vec<&CadenceValue> {
        self.arguments.iter().map(|arg| &arg.value).collect()
    }
}

/// A read-only Cadence script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CadenceScript {
    pub code: String,
    pub arguments: Vec<CadenceArgument>,
}
