use std::collections::HashSet;
use std::sync::Arc;

use crate::classifier::checked_partition;
use crate::schedulers::{ScheduleReport, Scheduler};
use crate::{
    fcfs, priority, round_robin, DispatchOutcome, EventSink, Executor, Isolation,
    ProcessControlBlock, SchedulerConfig, SchedulerError, SchedulerEvent, SyncState,
    ThreadIsolation,
};

/// What a complete run did
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub system: ScheduleReport,
    pub interactive: ScheduleReport,
    pub background: ScheduleReport,
    /// The execution count when the shared state was torn down
    pub execution_count: u64,
}

impl RunSummary {
    /// Returns the reports in the order their policies ran
    pub fn reports(&self) -> [&ScheduleReport; 3] {
        [&self.system, &self.interactive, &self.background]
    }

    /// Returns the number of dispatches attempted across all classes
    pub fn dispatches(&self) -> usize {
        self.reports().iter().map(|report| report.dispatches.len()).sum()
    }

    /// Returns the number of dispatches that ran to completion
    pub fn completed(&self) -> usize {
        self.reports().iter().map(|report| report.completed()).sum()
    }
}

/// Drives a whole run: partition, one policy per class, teardown
pub struct RunController {
    config: SchedulerConfig,
    sink: Arc<dyn EventSink>,
    isolation: Arc<dyn Isolation>,
}

impl RunController {
    /// Creates a controller that runs every dispatch on its own thread
    ///
    /// * `config` - quantum and timing of the run
    /// * `sink` - receiver of every notification
    pub fn new(config: SchedulerConfig, sink: Arc<dyn EventSink>) -> RunController {
        let isolation = match config.worker_stack_size {
            Some(stack_size) => ThreadIsolation::with_stack_size(stack_size),
            None => ThreadIsolation::new(),
        };

        RunController {
            config,
            sink,
            isolation: Arc::new(isolation),
        }
    }

    /// Replaces the mechanism that creates execution units
    pub fn with_isolation(mut self, isolation: Arc<dyn Isolation>) -> RunController {
        self.isolation = isolation;
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    fn executor(&self, sync: &Arc<SyncState>) -> Executor {
        Executor::new(
            Arc::clone(sync),
            Arc::clone(&self.sink),
            Arc::clone(&self.isolation),
            self.config.work_model(),
        )
    }

    fn announce_route(&self, pcb: &ProcessControlBlock) {
        self.sink.emit(SchedulerEvent::Routed {
            pid: pcb.pid(),
            class: pcb.class(),
            policy: pcb.class().policy(),
        });
    }

    /// Schedules every process to completion
    ///
    /// System processes go through priority scheduling, then interactive
    /// ones through round robin, then background ones through FCFS. A class
    /// starts only once the previous one is drained.
    ///
    /// * `processes` - the processes of the run, in arrival order
    pub fn run(&self, processes: &[ProcessControlBlock]) -> Result<RunSummary, SchedulerError> {
        validate(processes)?;

        for pcb in processes {
            self.sink.emit(SchedulerEvent::ProcessLoaded {
                pid: pcb.pid(),
                priority: pcb.priority(),
                burst_time: pcb.burst_time(),
                class: pcb.class(),
            });
        }

        let queues = checked_partition(processes)?;
        for pcb in processes {
            self.announce_route(pcb);
        }

        let sync = SyncState::new();
        let (system, interactive, background) = {
            let executor = self.executor(&sync);
            (
                priority().schedule(queues.system, &executor)?,
                round_robin(self.config.quantum).schedule(queues.interactive, &executor)?,
                fcfs().schedule(queues.background, &executor)?,
            )
        };
        let execution_count = SyncState::destroy(sync)?;

        log::info!(
            "run finished: {} processes, {} dispatches",
            processes.len(),
            execution_count
        );
        self.sink.emit(SchedulerEvent::AllCompleted { execution_count });

        Ok(RunSummary {
            system,
            interactive,
            background,
            execution_count,
        })
    }

    /// Routes a single process and runs its whole burst once, in a run of its own
    ///
    /// * `pcb` - the process to dispatch
    pub fn classify_and_dispatch(
        &self,
        pcb: &ProcessControlBlock,
    ) -> Result<DispatchOutcome, SchedulerError> {
        pcb.validate()?;
        self.announce_route(pcb);

        let sync = SyncState::new();
        let outcome = self.executor(&sync).dispatch(pcb)?;
        SyncState::destroy(sync)?;

        Ok(outcome)
    }
}

/// Checks every process and rejects duplicated pids
pub fn validate(processes: &[ProcessControlBlock]) -> Result<(), SchedulerError> {
    let mut seen = HashSet::new();

    for pcb in processes {
        pcb.validate()?;
        if !seen.insert(pcb.pid()) {
            return Err(SchedulerError::DuplicatePid(pcb.pid()));
        }
    }

    Ok(())
}
