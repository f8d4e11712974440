//! Cadence transaction and query script builders for `TradingScheduler`.

use flowforte_workflow::CanonicalParams;

use crate::cadence::{CadenceArgument, CadenceScript, CadenceTransaction, CadenceValue};
use crate::config::{Contract, ContractAddresses};
use crate::error::Result;

pub const SCHEDULE_COMPUTE_LIMIT: u64 = 9999;

const SCHEDULE_SWAP_CADENCE: &str = r#"import TradingScheduler from 0xTradingScheduler

transaction(
    vaultAddress: String,
    tokenIn: String,
    tokenOut: String,
    amountIn: UInt256,
    slippage: UFix64,
    executeAt: UFix64,
    recurring: Bool,
    frequency: UFix64
) {
    prepare(signer: auth(Storage) &Account) {
        let taskId = TradingScheduler.scheduleSwap(
            vaultAddress: vaultAddress,
            tokenIn: tokenIn,
            tokenOut: tokenOut,
            amountIn: amountIn,
            slippage: slippage,
            executeAt: executeAt,
            recurring: recurring,
            frequency: frequency
        )

        log("Task ID: ".concat(taskId.toString()))
        log("Next execution: ".concat(executeAt.toString()))
    }
}
"#;

const GET_TASK_CADENCE: &str = r#"import TradingScheduler from 0xTradingScheduler

access(all) fun main(taskId: UInt64): TradingScheduler.TaskInfo? {
    return TradingScheduler.getTask(taskId: taskId)
}
"#;

const GET_ALL_TASKS_CADENCE: &str = r#"import TradingScheduler from 0xTradingScheduler

access(all) fun main(): {UInt64: TradingScheduler.TaskInfo} {
    return TradingScheduler.getAllTasks()
}
"#;

const NEXT_EXECUTION_CADENCE: &str = r#"import TradingScheduler from 0xTradingScheduler

access(all) fun main(taskId: UInt64): UFix64? {
    if let task = TradingScheduler.getTask(taskId: taskId) {
        return task.nextExecutionAt
    }
    return nil
}
"#;

/// Replace `0x<Contract>` import placeholders with configured addresses.
///
/// Fails when the code references a contract with no configured address.
pub fn resolve_imports(code: &str, contracts: &ContractAddresses) -> Result<String> {
    let mut resolved = code.to_string();
    for contract in Contract::ALL {
        let placeholder = contract.placeholder();
        if resolved.contains(&placeholder) {
            let address = contracts.require(contract)?;
            resolved = resolved.replace(&placeholder, address);
        }
    }
    Ok(resolved)
}

/// The `scheduleSwap` transaction for one set of compiled parameters.
pub struct ScheduleSwapTransaction;

impl ScheduleSwapTransaction {
    pub fn render(params: &CanonicalParams, contracts: &ContractAddresses) -> Result<CadenceTransaction> {
        Ok(CadenceTransaction {
            code: resolve_imports(SCHEDULE_SWAP_CADENCE, contracts)?,
            arguments: Self::arguments(params),
            compute_limit: SCHEDULE_COMPUTE_LIMIT,
        })
    }

    /// Positional arguments matching the transaction signature.
    pub fn arguments(params: &CanonicalParams) -> Vec<CadenceArgument> {
        vec![
            CadenceArgument::new("vaultAddress", CadenceValue::string(&params.vault_address)),
            CadenceArgument::new("tokenIn", CadenceValue::string(&params.token_in)),
            CadenceArgument::new("tokenOut", CadenceValue::string(&params.token_out)),
            CadenceArgument::new("amountIn", CadenceValue::uint256(params.amount_in)),
            CadenceArgument::new("slippage", CadenceValue::UFix64(params.slippage.to_ufix64())),
            CadenceArgument::new("executeAt", CadenceValue::ufix64_secs(params.execute_at)),
            CadenceArgument::new("recurring", CadenceValue::Bool(params.recurring)),
            CadenceArgument::new("frequency", CadenceValue::ufix64_secs(params.frequency)),
        ]
    }
}

/// `TaskInfo?` for one task.
pub fn get_task_script(task_id: u64, contracts: &ContractAddresses) -> Result<CadenceScript> {
    Ok(CadenceScript {
        code: resolve_imports(GET_TASK_CADENCE, contracts)?,
        arguments: vec![CadenceArgument::new("taskId", CadenceValue::uint64(task_id))],
    })
}

/// Every task keyed by id.
pub fn get_all_tasks_script(contracts: &ContractAddresses) -> Result<CadenceScript> {
    Ok(CadenceScript {
        code: resolve_imports(GET_ALL_TASKS_CADENCE, contracts)?,
        arguments: Vec::new(),
    })
}

/// `nextExecutionAt` of one task, nil when unknown.
pub fn next_execution_script(task_id: u64, contracts: &ContractAddresses) -> Result<CadenceScript> {
    Ok(CadenceScript {
        code: resolve_imports(NEXT_EXECUTION_CADENCE, contracts)?,
        arguments: vec![CadenceArgument::new("taskId", CadenceValue::uint64(task_id))],
    })
}
