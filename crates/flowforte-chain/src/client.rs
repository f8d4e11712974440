//! Flow client collaborator seam.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cadence::{CadenceScript, CadenceTransaction};

/// Flow transaction id (hex).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(pub String);

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TxId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Lifecycle of a submitted transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    Submitted,
    Sealed,
    Failed,
}

/// Event emitted by a sealed transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: serde_json::Value,
}

/// Final state of a transaction with its events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResult {
    pub status: TxStatus,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub events: Vec<FlowEvent>,
}

/// Signs, submits and queries on behalf of the scheduler.
///
/// Implementations own authorization, transport and finality tracking.
/// Errors are returned to the caller unchanged.
#[async_trait::async_trait]
pub trait FlowClient: Send + Sync {
    /// Sign and submit a transaction, returning its id.
    async fn submit_transaction(&self, transaction: &CadenceTransaction) -> anyhow::Result<TxId>;

    /// Run a read-only script and return its JSON-Cadence result.
    async fn execute_script(&self, script: &CadenceScript) -> anyhow::Result<serde_json::Value>;

    /// Wait until the transaction is sealed or has failed.
    async fn await_sealed(&self, tx_id: &TxId) -> anyhow::Result<TransactionResult>;
}

/// `taskId` of the first event whose type contains `TaskScheduled`.
pub fn extract_task_id(events: &[FlowEvent]) -> Option<u64> {
    let event = events
        .iter()
        .find(|event| event.event_type.contains("TaskScheduled"))?;
    match event.data.get("taskId")? {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
