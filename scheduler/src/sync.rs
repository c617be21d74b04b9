use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
#[cfg(test)]
use std::sync::TryLockError;

use crate::{EventSink, Pid, SchedulerError, SchedulerEvent};

/// State shared by every execution unit of a run
///
/// The mutex guards the execution count and also serializes the start and
/// completion notifications, so they never interleave with a count update.
#[derive(Debug, Default)]
pub struct SyncState {
    execution_count: Mutex<u64>,
}

impl SyncState {
    /// Creates the shared state of a new run
    pub fn new() -> Arc<SyncState> {
        Arc::new(SyncState::default())
    }

    // The count is updated in a single step, a poisoned guard still holds a
    // consistent value.
    fn guard(&self) -> MutexGuard<'_, u64> {
        self.execution_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Counts a new dispatch and announces it
    ///
    /// * `pid` - the process being dispatched
    /// * `sink` - receiver of the start notification
    pub fn begin(&self, pid: Pid, sink: &dyn EventSink) -> u64 {
        let mut count = self.guard();
        *count += 1;
        sink.emit(SchedulerEvent::DispatchStarted {
            pid,
            execution_count: *count,
        });

        *count
    }

    /// Announces the end of a dispatch
    ///
    /// * `pid` - the process that finished its burst
    /// * `sink` - receiver of the completion notification
    pub fn finish(&self, pid: Pid, sink: &dyn EventSink) {
        let _count = self.guard();
        sink.emit(SchedulerEvent::DispatchCompleted { pid });
    }

    pub fn execution_count(&self) -> u64 {
        *self.guard()
    }

    #[cfg(test)]
    pub(crate) fn is_held(&self) -> bool {
        matches!(self.execution_count.try_lock(), Err(TryLockError::WouldBlock))
    }

    /// Tears the shared state down at the end of a run and returns the
    /// final execution count
    ///
    /// Fails if an execution unit still holds a handle to the state.
    pub fn destroy(state: Arc<SyncState>) -> Result<u64, SchedulerError> {
        match Arc::try_unwrap(state) {
            Ok(state) => Ok(state
                .execution_count
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner)),
            Err(state) => Err(SchedulerError::InvariantViolation(format!(
                "synchronization state torn down while {} handles are still alive",
                Arc::strong_count(&state) - 1
            ))),
        }
    }
}
