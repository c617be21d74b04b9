//! The scheduling policies, one per process class.
//!
//! ```ignore
//! let report = RoundRobinScheduler::new(quantum).schedule(queue, &executor)?;
//! ```
//!

use std::num::NonZeroUsize;

use crate::{
    DispatchOutcome, Executor, Pid, Policy, ProcessControlBlock, SchedulerError, SchedulerEvent,
};

mod fcfs;
pub use fcfs::FcfsScheduler;

mod priority;
pub use priority::PriorityScheduler;

mod round_robin;
pub use round_robin::RoundRobinScheduler;

/// A policy that drains a queue of processes through an executor
pub trait Scheduler {
    fn policy(&self) -> Policy;

    /// The time slice of the policy, if it slices at all
    fn quantum(&self) -> Option<NonZeroUsize> {
        None
    }

    /// Dispatches every process of `queue` until none has work left
    ///
    /// * `queue` - processes of a single class, in arrival order
    /// * `executor` - runs each dispatch in its own unit
    fn schedule(
        &self,
        queue: Vec<ProcessControlBlock>,
        executor: &Executor,
    ) -> Result<ScheduleReport, SchedulerError>;
}

/// One dispatch made by a policy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dispatch {
    pub pid: Pid,
    /// Units of burst time handed to the unit
    pub slice: usize,
    pub outcome: DispatchOutcome,
}

/// What a policy did with its queue
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleReport {
    pub policy: Policy,
    /// Every dispatch, in the order it was made
    pub dispatches: Vec<Dispatch>,
    /// The queue as the policy left it
    pub processes: Vec<ProcessControlBlock>,
}

impl ScheduleReport {
    pub fn new(policy: Policy) -> ScheduleReport {
        ScheduleReport {
            policy,
            dispatches: Vec::new(),
            processes: Vec::new(),
        }
    }

    fn record(&mut self, pid: Pid, slice: usize, outcome: DispatchOutcome) {
        self.dispatches.push(Dispatch { pid, slice, outcome });
    }

    /// Returns the pids in dispatch order
    pub fn order(&self) -> Vec<Pid> {
        self.dispatches.iter().map(|dispatch| dispatch.pid).collect()
    }

    /// Returns the slices handed out to `pid`, in order
    pub fn slices_of(&self, pid: Pid) -> Vec<usize> {
        self.dispatches
            .iter()
            .filter(|dispatch| dispatch.pid == pid)
            .map(|dispatch| dispatch.slice)
            .collect()
    }

    /// Returns the number of dispatches that ran to completion
    pub fn completed(&self) -> usize {
        self.dispatches
            .iter()
            .filter(|dispatch| dispatch.outcome == DispatchOutcome::Completed)
            .count()
    }
}

fn announce(scheduler: &dyn Scheduler, executor: &Executor) {
    executor.sink().emit(SchedulerEvent::PolicyStarted {
        policy: scheduler.policy(),
        quantum: scheduler.quantum(),
    });
}

/// Dispatches every process once with its whole burst, in queue order
///
/// * `queue` - the processes, already in dispatch order
/// * `executor` - runs each dispatch
/// * `report` - collects the dispatches
fn run_to_completion(
    queue: &[ProcessControlBlock],
    executor: &Executor,
    report: &mut ScheduleReport,
) -> Result<(), SchedulerError> {
    for pcb in queue {
        if pcb.is_drained() {
            return Err(SchedulerError::InvariantViolation(format!(
                "{} reached {} with no time remaining",
                pcb.pid(),
                report.policy
            )));
        }

        let outcome = executor.dispatch(pcb)?;
        report.record(pcb.pid(), pcb.burst_time(), outcome);
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use crate::{
        Executor, Isolation, Pid, ProcessClass, ProcessControlBlock, Recorder, SyncState,
        ThreadIsolation, WorkModel,
    };

    pub(crate) fn pcb(
        pid: u32,
        priority: i32,
        burst: usize,
        class: ProcessClass,
    ) -> ProcessControlBlock {
        ProcessControlBlock::new(Pid::new(pid), priority, burst, class)
    }

    pub(crate) fn instant_executor() -> (Executor, Arc<SyncState>, Arc<Recorder>) {
        executor_with(Arc::new(ThreadIsolation::new()))
    }

    pub(crate) fn executor_with(
        isolation: Arc<dyn Isolation>,
    ) -> (Executor, Arc<SyncState>, Arc<Recorder>) {
        let sync = SyncState::new();
        let recorder = Arc::new(Recorder::new());
        let executor = Executor::new(
            Arc::clone(&sync),
            recorder.clone(),
            isolation,
            WorkModel::Instant,
        );
        (executor, sync, recorder)
    }
}
