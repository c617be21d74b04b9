use crate::{Executor, Policy, ProcessControlBlock, SchedulerError};

use super::{announce, run_to_completion, ScheduleReport, Scheduler};

/// Non preemptive priority scheduling
///
/// The queue is ordered by priority, lowest value first. Processes with the
/// same priority keep their arrival order. After that it behaves like FCFS.
#[derive(Clone, Copy, Debug, Default)]
pub struct PriorityScheduler;

impl PriorityScheduler {
    pub fn new() -> PriorityScheduler {
        PriorityScheduler
    }
}

impl Scheduler for PriorityScheduler {
    fn policy(&self) -> Policy {
        Policy::Priority
    }

    fn schedule(
        &self,
        mut queue: Vec<ProcessControlBlock>,
        executor: &Executor,
    ) -> Result<ScheduleReport, SchedulerError> {
        announce(self, executor);

        // sort_by_key is stable, ties stay in arrival order
        queue.sort_by_key(|pcb| pcb.priority());

        let mut report = ScheduleReport::new(self.policy());
        run_to_completion(&queue, executor, &mut report)?;
        report.processes = queue;

        Ok(report)
    }
}
