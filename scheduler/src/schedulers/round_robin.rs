use std::num::NonZeroUsize;

use crate::{Executor, Policy, ProcessControlBlock, SchedulerError, SchedulerEvent, DEFAULT_QUANTUM};

use super::{announce, ScheduleReport, Scheduler};

/// Strict round robin over a fixed queue
///
/// Every round visits the queue in arrival order and gives each process
/// that still has work a slice of at most `quanta` units. A failed slice
/// is still charged to the process, so the queue always drains.
#[derive(Clone, Copy, Debug)]
pub struct RoundRobinScheduler {
    quanta: NonZeroUsize,
}

impl RoundRobinScheduler {
    /// * `quanta` - the maximum time a process runs in one dispatch
    pub fn new(quanta: NonZeroUsize) -> RoundRobinScheduler {
        RoundRobinScheduler { quanta }
    }
}

impl Default for RoundRobinScheduler {
    fn default() -> Self {
        RoundRobinScheduler::new(DEFAULT_QUANTUM)
    }
}

impl Scheduler for RoundRobinScheduler {
    fn policy(&self) -> Policy {
        Policy::RoundRobin
    }

    fn quantum(&self) -> Option<NonZeroUsize> {
        Some(self.quanta)
    }

    fn schedule(
        &self,
        mut queue: Vec<ProcessControlBlock>,
        executor: &Executor,
    ) -> Result<ScheduleReport, SchedulerError> {
        announce(self, executor);

        let mut report = ScheduleReport::new(self.policy());
        let mut round = 0;
        loop {
            let mut completed = true;
            round += 1;

            for pcb in queue.iter_mut().filter(|pcb| !pcb.is_drained()) {
                completed = false;

                let slice = pcb.remaining_time().min(self.quanta.get());
                let outcome = executor.dispatch(&pcb.fragment(slice))?;
                report.record(pcb.pid(), slice, outcome);

                let remaining = pcb.consume(slice)?;
                executor
                    .sink()
                    .emit(SchedulerEvent::RemainingTime { pid: pcb.pid(), remaining });
            }

            if completed {
                break;
            }
            log::debug!("round robin round {round} finished");
        }

        report.processes = queue;
        Ok(report)
    }
}
