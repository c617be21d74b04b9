//! A hybrid scheduler library.
//!
//! This library splits processes into three classes and drains each class
//! with its own policy: system processes by priority, interactive processes
//! by round robin and background processes first come, first served.
//! Every dispatch runs in an isolated unit that reports through a shared,
//! lock protected execution count.
//!

use std::num::NonZeroUsize;

mod common_types;
pub use crate::common_types::{Pid, Policy, ProcessClass, DEFAULT_QUANTUM, DEFAULT_TIME_UNIT_MS};

mod error;
pub use crate::error::SchedulerError;

mod process_control_block;
pub use crate::process_control_block::ProcessControlBlock;

mod events;
pub use crate::events::{EventSink, LogSink, NullSink, SchedulerEvent};

mod collector;
pub use crate::collector::Recorder;

mod sync;
pub use crate::sync::SyncState;

mod executor;
pub use crate::executor::{
    DispatchOutcome, Executor, Isolation, Job, ThreadIsolation, UnitHandle, WorkModel,
};

pub mod schedulers;
pub use crate::schedulers::{
    Dispatch, FcfsScheduler, PriorityScheduler, RoundRobinScheduler, ScheduleReport, Scheduler,
};

pub mod classifier;
pub use crate::classifier::{partition, ClassQueues};

mod config;
pub use crate::config::SchedulerConfig;

mod controller;
pub use crate::controller::{validate, RunController, RunSummary};

/// Returns a structure that implements the `Scheduler` trait with a first come, first served policy
pub fn fcfs() -> impl Scheduler {
    FcfsScheduler::new()
}

/// Returns a structure that implements the `Scheduler` trait with a non preemptive priority policy
///
/// Lower priority values run first, equal priorities keep their arrival order.
pub fn priority() -> impl Scheduler {
    PriorityScheduler::new()
}

/// Returns a structure that implements the `Scheduler` trait with a round robin scheduler policy
///
/// * `quantum` - the time quanta that a process can run before the next
///               process of the queue gets the processor
pub fn round_robin(quantum: NonZeroUsize) -> impl Scheduler {
    RoundRobinScheduler::new(quantum)
}
