//! Live delta store for streamed assistant text.
//!
//! This module provides:
//! - [`LiveDeltaStore`], which coalesces fragments into snapshots
//! - Coalescing schedulers deciding when a flush runs
//! - A decoder and pump for the line-delimited chat stream

mod producer;
mod scheduler;
mod snapshot;
mod store;
mod wire;

pub use producer::{pump_stream, PumpSummary};
pub use scheduler::{
    CoalescingScheduler, FlushTask, IntervalScheduler, ManualScheduler, ScheduledFlush,
};
pub use snapshot::LiveSnapshot;
pub use store::LiveDeltaStore;
pub use wire::{StreamDecoder, StreamRecord};
