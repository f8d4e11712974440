//! FlowForte Chain Plumbing
//!
//! Renders compiled workflow parameters into Cadence transactions and scripts
//! for the `TradingScheduler` contract and drives them through a [`FlowClient`].
//! Signing, transport and finality tracking belong to the client
//! implementation; this crate never retries on its own.

pub mod cadence;
pub mod client;
pub mod config;
pub mod error;
pub mod service;
pub mod transaction;

pub use cadence::{CadenceArgument, CadenceScript, CadenceTransaction, CadenceValue};
pub use client::{extract_task_id, FlowClient, FlowEvent, TransactionResult, TxId, TxStatus};
pub use config::{CheckStatus, Contract, ContractAddresses, DeploymentReport, SchedulerConfig};
pub use error::{ChainError, Result};
pub use service::{ScheduleReceipt, SchedulerService};
pub use transaction::{ScheduleSwapTransaction, SCHEDULE_COMPUTE_LIMIT};
