//! Errors raised by configuration, compilation and the Flow client.

use flowforte_workflow::WorkflowError;

/// Chain plumbing errors
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Compile(#[from] WorkflowError),

    /// Failure reported by the Flow client, passed through as-is.
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),

    #[error("transaction {tx_id} failed: {message}")]
    TransactionFailed { tx_id: String, message: String },

    #[error("transaction {0} was not sealed")]
    NotSealed(String),

    #[error("unexpected query result: {0}")]
    UnexpectedResponse(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChainError>;
