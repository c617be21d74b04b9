use crate::{Executor, Policy, ProcessControlBlock, SchedulerError};

use super::{announce, run_to_completion, ScheduleReport, Scheduler};

/// First come, first served: every process runs once, to the end, in arrival order
#[derive(Clone, Copy, Debug, Default)]
pub struct FcfsScheduler;

impl FcfsScheduler {
    pub fn new() -> FcfsScheduler {
        FcfsScheduler
    }
}

impl Scheduler for FcfsScheduler {
    fn policy(&self) -> Policy {
        Policy::Fcfs
    }

    fn schedule(
        &self,
        queue: Vec<ProcessControlBlock>,
        executor: &Executor,
    ) -> Result<ScheduleReport, SchedulerError> {
        announce(self, executor);

        let mut report = ScheduleReport::new(self.policy());
        run_to_completion(&queue, executor, &mut report)?;
        report.processes = queue;

        Ok(report)
    }
}
