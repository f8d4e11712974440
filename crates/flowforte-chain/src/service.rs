//! Compile, submit and track scheduled swaps.

use serde::Serialize;
use tracing::{debug, info, warn};

use flowforte_workflow::{CanonicalParams, Clock, SystemClock, Workflow, WorkflowAdapter};

use crate::cadence::{CadenceTransaction, CadenceValue};
use crate::client::{extract_task_id, FlowClient, TxId, TxStatus};
use crate::config::SchedulerConfig;
use crate::error::{ChainError, Result};
use crate::transaction::{get_all_tasks_script, get_task_script, next_execution_script, ScheduleSwapTransaction};

/// Outcome of a sealed `scheduleSwap` transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleReceipt {
    pub tx_id: TxId,
    /// `None` when the transaction emitted no `TaskScheduled` event.
    pub task_id: Option<u64>,
    pub execute_at: u64,
    pub recurring: bool,
    pub frequency: u64,
}

/// Scheduler facade over a Flow client
pub struct SchedulerService<F, C = SystemClock> {
    config: SchedulerConfig,
    client: F,
    adapter: WorkflowAdapter<C>,
}

impl<F: FlowClient> SchedulerService<F> {
    pub fn new(config: SchedulerConfig, client: F) -> Self {
        Self::with_clock(config, client, SystemClock)
    }
}

impl<F: FlowClient, C: Clock> SchedulerService<F, C> {
    pub fn with_clock(config: SchedulerConfig, client: F, clock: C) -> Self {
        Self {
            config,
            client,
            adapter: WorkflowAdapter::new(clock),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn client(&self) -> &F {
        &self.client
    }

    /// Compile a workflow and render its transaction without submitting it.
    pub fn prepare(&self, workflow: &Workflow) -> Result<(CanonicalParams, CadenceTransaction)> {
        let params = self.adapter.compile(workflow)?;
        let transaction = ScheduleSwapTransaction::render(&params, &self.config.contracts)?;
        Ok((params, transaction))
    }

    pub async fn schedule_swap(&self, workflow: &Workflow) -> Result<ScheduleReceipt> {
        let (params, transaction) = self.prepare(workflow)?;
        info!("\n{}", params);

        let tx_id = self.client.submit_transaction(&transaction).await?;
        info!(%tx_id, "submitted scheduleSwap transaction");

        let result = self.client.await_sealed(&tx_id).await?;
        match result.status {
            TxStatus::Sealed => {}
            TxStatus::Failed => {
                let message = result
                    .error_message
                    .unwrap_or_else(|| "no error message".to_string());
                warn!(%tx_id, %message, "scheduleSwap transaction failed");
                return Err(ChainError::TransactionFailed {
                    tx_id: tx_id.to_string(),
                    message,
                });
            }
            TxStatus::Submitted => return Err(ChainError::NotSealed(tx_id.to_string())),
        }

        let task_id = extract_task_id(&result.events);
        if task_id.is_none() {
            warn!(%tx_id, "sealed transaction emitted no TaskScheduled event");
        }
        info!(%tx_id, ?task_id, "scheduleSwap transaction sealed");

        Ok(ScheduleReceipt {
            tx_id,
            task_id,
            execute_at: params.execute_at,
            recurring: params.recurring,
            frequency: params.frequency,
        })
    }

    /// Raw JSON-Cadence `TaskInfo?` for one task.
    pub async fn get_task_status(&self, task_id: u64) -> Result<serde_json::Value> {
        let script = get_task_script(task_id, &self.config.contracts)?;
        debug!(task_id, "querying task");
        Ok(self.client.execute_script(&script).await?)
    }

    /// Raw JSON-Cadence dictionary of every task.
    pub async fn get_all_tasks(&self) -> Result<serde_json::Value> {
        let script = get_all_tasks_script(&self.config.contracts)?;
        Ok(self.client.execute_script(&script).await?)
    }

    /// Next execution as unix seconds, `None` for an unknown task.
    pub async fn get_next_execution_time(&self, task_id: u64) -> Result<Option<u64>> {
        let script = next_execution_script(task_id, &self.config.contracts)?;
        let value: CadenceValue = serde_json::from_value(self.client.execute_script(&script).await?)?;
        value.into_inner().map(|inner| inner.as_ufix64_secs()).transpose()
    }
}
