//! The execution context of a single dispatch.
//!
//! Every dispatch runs inside its own isolated unit (a thread by default).
//! The unit bumps the shared execution count, simulates the burst with the
//! guard released, and announces its completion. The scheduler waits for
//! the unit before it moves on, so one unit per scheduler is in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::{
    EventSink, Pid, ProcessControlBlock, SchedulerError, SchedulerEvent, SyncState,
};

/// The body of an execution unit
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// How long a burst keeps an execution unit busy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkModel {
    /// Bursts take no wall clock time
    Instant,
    /// Every unit of burst time lasts the given duration
    Scaled(Duration),
}

impl WorkModel {
    pub fn from_millis(time_unit_ms: u64) -> WorkModel {
        if time_unit_ms == 0 {
            WorkModel::Instant
        } else {
            WorkModel::Scaled(Duration::from_millis(time_unit_ms))
        }
    }

    /// Returns the wall clock time a burst of `burst_time` units takes
    pub fn duration(&self, burst_time: usize) -> Duration {
        match self {
            WorkModel::Instant => Duration::ZERO,
            WorkModel::Scaled(unit) => u32::try_from(burst_time)
                .ok()
                .and_then(|units| unit.checked_mul(units))
                .unwrap_or(Duration::MAX),
        }
    }

    fn perform(&self, burst_time: usize) {
        let duration = self.duration(burst_time);
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

/// A running execution unit
pub struct UnitHandle {
    pid: Pid,
    handle: JoinHandle<()>,
}

impl UnitHandle {
    pub fn new(pid: Pid, handle: JoinHandle<()>) -> UnitHandle {
        UnitHandle { pid, handle }
    }

    /// Blocks until the unit is gone
    pub fn join(self) -> Result<(), SchedulerError> {
        self.handle
            .join()
            .map_err(|_| SchedulerError::UnitPanicked { pid: self.pid })
    }
}

/// The mechanism that keeps a dispatch apart from the scheduler
pub trait Isolation: Send + Sync {
    /// Starts `job` in a new unit on behalf of `pid`
    ///
    /// * `pid` - the process the unit runs for
    /// * `job` - the work of the unit
    fn spawn(&self, pid: Pid, job: Job) -> Result<UnitHandle, SchedulerError>;
}

/// Runs every dispatch on a dedicated, named OS thread
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadIsolation {
    stack_size: Option<usize>,
}

impl ThreadIsolation {
    pub fn new() -> ThreadIsolation {
        ThreadIsolation::default()
    }

    /// * `stack_size` - stack of every unit thread, in bytes
    pub fn with_stack_size(stack_size: usize) -> ThreadIsolation {
        ThreadIsolation {
            stack_size: Some(stack_size),
        }
    }
}

impl Isolation for ThreadIsolation {
    fn spawn(&self, pid: Pid, job: Job) -> Result<UnitHandle, SchedulerError> {
        let mut builder = thread::Builder::new().name(format!("unit-{}", pid.get()));
        if let Some(stack_size) = self.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let handle = builder
            .spawn(job)
            .map_err(|source| SchedulerError::ResourceExhaustion { pid, source })?;

        Ok(UnitHandle::new(pid, handle))
    }
}

/// Whether a dispatch ran to completion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    Completed,
    Failed,
}

/// Hands processes to isolated units and waits for them
pub struct Executor {
    sync: Arc<SyncState>,
    sink: Arc<dyn EventSink>,
    isolation: Arc<dyn Isolation>,
    work: WorkModel,
}

impl Executor {
    /// * `sync` - shared state of the current run
    /// * `sink` - receiver of the notifications
    /// * `isolation` - creates the unit of every dispatch
    /// * `work` - how long a burst lasts
    pub fn new(
        sync: Arc<SyncState>,
        sink: Arc<dyn EventSink>,
        isolation: Arc<dyn Isolation>,
        work: WorkModel,
    ) -> Executor {
        Executor {
            sync,
            sink,
            isolation,
            work,
        }
    }

    pub fn sink(&self) -> &dyn EventSink {
        self.sink.as_ref()
    }

    /// Runs `pcb` for its whole burst time inside a new unit and waits for it
    ///
    /// * `pcb` - a process, or a fragment of one, to run
    pub fn execute(&self, pcb: &ProcessControlBlock) -> Result<(), SchedulerError> {
        let pid = pcb.pid();
        let burst_time = pcb.burst_time();
        if burst_time == 0 {
            return Err(SchedulerError::InvariantViolation(format!(
                "{pid} dispatched with nothing left to run"
            )));
        }

        let sync = Arc::clone(&self.sync);
        let sink = Arc::clone(&self.sink);
        let work = self.work;
        let finished = Arc::new(AtomicBool::new(false));
        let job: Job = {
            let finished = Arc::clone(&finished);
            Box::new(move || {
                let unit = thread::current().name().unwrap_or("unnamed").to_string();
                sink.emit(SchedulerEvent::UnitCreated { pid, unit });

                sync.begin(pid, sink.as_ref());
                sink.emit(SchedulerEvent::Executing { pid, burst_time });
                work.perform(burst_time);
                sync.finish(pid, sink.as_ref());
                finished.store(true, Ordering::Release);
            })
        };

        let unit = self.isolation.spawn(pid, job)?;
        match unit.join() {
            Ok(()) => {}
            // The burst was counted and announced, only the unit's exit failed.
            Err(SchedulerError::UnitPanicked { .. }) if finished.load(Ordering::Acquire) => {
                log::debug!("unit of {pid} died after completing its burst");
            }
            Err(err) => return Err(err),
        }
        self.sink.emit(SchedulerEvent::UnitFinished { pid });

        Ok(())
    }

    /// Runs `pcb` like [`Executor::execute`], reporting a failed unit instead
    /// of stopping the run
    ///
    /// A unit that dies after announcing its completion still counts as
    /// completed. Errors other than unit failures are returned as they are.
    pub fn dispatch(&self, pcb: &ProcessControlBlock) -> Result<DispatchOutcome, SchedulerError> {
        match self.execute(pcb) {
            Ok(()) => Ok(DispatchOutcome::Completed),
            Err(err) if err.is_recoverable() => {
                self.sink.emit(SchedulerEvent::DispatchFailed {
                    pid: pcb.pid(),
                    reason: err.to_string(),
                });
                Ok(DispatchOutcome::Failed)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashSet;
    use std::io;

    use super::*;
    use crate::{ProcessClass, Recorder};

    /// Refuses to create units for the given pids
    pub(crate) struct Exhausted(pub HashSet<Pid>);

    impl Isolation for Exhausted {
        fn spawn(&self, pid: Pid, job: Job) -> Result<UnitHandle, SchedulerError> {
            if self.0.contains(&pid) {
                return Err(SchedulerError::ResourceExhaustion {
                    pid,
                    source: io::Error::new(io::ErrorKind::WouldBlock, "unit limit reached"),
                });
            }
            ThreadIsolation::new().spawn(pid, job)
        }
    }

    /// Creates units that die before doing any bookkeeping
    struct Crashing;

    impl Isolation for Crashing {
        fn spawn(&self, pid: Pid, _job: Job) -> Result<UnitHandle, SchedulerError> {
            let handle = thread::spawn(|| panic!("unit crashed on start"));
            Ok(UnitHandle::new(pid, handle))
        }
    }

    /// Creates units that run their job and die on the way out
    pub(crate) struct CrashesOnExit;

    impl Isolation for CrashesOnExit {
        fn spawn(&self, pid: Pid, job: Job) -> Result<UnitHandle, SchedulerError> {
            let handle = thread::spawn(move || {
                job();
                panic!("unit crashed on exit");
            });
            Ok(UnitHandle::new(pid, handle))
        }
    }

    fn executor(isolation: Arc<dyn Isolation>) -> (Executor, Arc<SyncState>, Arc<Recorder>) {
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

    fn pcb(pid: u32, burst: usize) -> ProcessControlBlock {
        ProcessControlBlock::new(Pid::new(pid), 1, burst, ProcessClass::Background)
    }

    #[test]
    fn execute_reports_start_work_and_completion_in_order() {
        let (executor, sync, recorder) = executor(Arc::new(ThreadIsolation::new()));
        executor.execute(&pcb(4, 10)).unwrap();

        let pid = Pid::new(4);
        assert_eq!(
            recorder.events(),
            vec![
                SchedulerEvent::UnitCreated { pid, unit: "unit-4".to_string() },
                SchedulerEvent::DispatchStarted { pid, execution_count: 1 },
                SchedulerEvent::Executing { pid, burst_time: 10 },
                SchedulerEvent::DispatchCompleted { pid },
                SchedulerEvent::UnitFinished { pid },
            ]
        );
        assert_eq!(sync.execution_count(), 1);
    }

    #[test]
    fn unit_releases_its_handle_on_the_shared_state() {
        let (executor, sync, _recorder) =
            executor(Arc::new(ThreadIsolation::with_stack_size(64 * 1024)));
        executor.execute(&pcb(1, 1)).unwrap();
        executor.execute(&pcb(2, 1)).unwrap();

        drop(executor);
        assert_eq!(SyncState::destroy(sync).unwrap(), 2);
    }

    #[test]
    fn exhausted_isolation_skips_the_dispatch() {
        let (executor, sync, recorder) =
            executor(Arc::new(Exhausted(HashSet::from([Pid::new(5)]))));

        assert_eq!(executor.dispatch(&pcb(5, 4)).unwrap(), DispatchOutcome::Failed);
        assert_eq!(executor.dispatch(&pcb(6, 4)).unwrap(), DispatchOutcome::Completed);

        assert_eq!(sync.execution_count(), 1);
        let failed: Vec<Pid> = recorder
            .events()
            .iter()
            .filter_map(|event| match event {
                SchedulerEvent::DispatchFailed { pid, .. } => Some(*pid),
                _ => None,
            })
            .collect();
        assert_eq!(failed, vec![Pid::new(5)]);
    }

    #[test]
    fn crashed_unit_is_reported_and_leaves_the_state_usable() {
        let (crashing, sync, recorder) = executor(Arc::new(Crashing));
        assert_eq!(crashing.dispatch(&pcb(7, 2)).unwrap(), DispatchOutcome::Failed);
        assert_eq!(sync.execution_count(), 0);
        assert!(matches!(
            recorder.events().last(),
            Some(SchedulerEvent::DispatchFailed { .. })
        ));
    }

    #[test]
    fn unit_dying_after_its_burst_still_completes() {
        let (executor, sync, recorder) = executor(Arc::new(CrashesOnExit));
        assert_eq!(executor.dispatch(&pcb(8, 3)).unwrap(), DispatchOutcome::Completed);

        let pid = Pid::new(8);
        let events = recorder.events();
        assert_eq!(sync.execution_count(), 1);
        assert!(events.contains(&SchedulerEvent::DispatchCompleted { pid }));
        assert_eq!(events.last(), Some(&SchedulerEvent::UnitFinished { pid }));
        assert!(!events
            .iter()
            .any(|event| matches!(event, SchedulerEvent::DispatchFailed { .. })));
    }

    #[test]
    fn zero_length_dispatch_is_an_invariant_violation() {
        let (executor, sync, _recorder) = executor(Arc::new(ThreadIsolation::new()));
        let drained = pcb(3, 2).fragment(0);

        assert!(matches!(
            executor.dispatch(&drained),
            Err(SchedulerError::InvariantViolation(_))
        ));
        assert_eq!(sync.execution_count(), 0);
    }

    /// Records whether the guard was held while each event was delivered
    struct GuardWitness {
        sync: Arc<SyncState>,
        held: std::sync::Mutex<Vec<(&'static str, bool)>>,
    }

    impl EventSink for GuardWitness {
        fn emit(&self, event: SchedulerEvent) {
            let kind = match event {
                SchedulerEvent::DispatchStarted { .. } => "started",
                SchedulerEvent::Executing { .. } => "executing",
                SchedulerEvent::DispatchCompleted { .. } => "completed",
                _ => return,
            };
            self.held.lock().unwrap().push((kind, self.sync.is_held()));
        }
    }

    #[test]
    fn only_bookkeeping_runs_under_the_guard() {
        let sync = SyncState::new();
        let witness = Arc::new(GuardWitness {
            sync: Arc::clone(&sync),
            held: Default::default(),
        });
        let executor = Executor::new(
            Arc::clone(&sync),
            witness.clone(),
            Arc::new(ThreadIsolation::new()),
            WorkModel::from_millis(1),
        );

        executor.execute(&pcb(1, 3)).unwrap();

        assert_eq!(
            *witness.held.lock().unwrap(),
            vec![("started", true), ("executing", false), ("completed", true)]
        );
    }

    #[test]
    fn scaled_work_multiplies_the_time_unit() {
        let work = WorkModel::from_millis(5);
        assert_eq!(work.duration(3), Duration::from_millis(15));
        assert_eq!(WorkModel::from_millis(0), WorkModel::Instant);
        assert_eq!(WorkModel::Instant.duration(100), Duration::ZERO);
    }
}
