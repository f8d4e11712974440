//! FlowForte Workflow Compiler
//!
//! Turns an agent-authored swap workflow into the canonical parameter record
//! expected by the on-chain `TradingScheduler` contract: token symbols become
//! addresses, human amounts become base units, and schedules become absolute
//! Unix timestamps plus a recurrence interval.

pub mod adapter;
pub mod amount;
pub mod clock;
pub mod error;
pub mod schedule;
pub mod token;
pub mod workflow;

pub use adapter::{CanonicalParams, WorkflowAdapter, DEFAULT_SLIPPAGE};
pub use amount::{scale, unscale, Slippage, Wad};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Result, WorkflowError, WorkflowField};
pub use schedule::{normalize, Cadence, NormalizedSchedule, ScheduleSpec};
pub use token::{decimals_of, resolve, KnownToken, NATIVE_TOKEN_ADDRESS};
pub use workflow::{ActionSpec, DecimalInput, RawSchedule, Workflow};
