use std::io;

use thiserror::Error;

use crate::Pid;

#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The isolated unit backing a dispatch could not be created
    #[error("could not create an execution unit for {pid}: {source}")]
    ResourceExhaustion {
        pid: Pid,
        #[source]
        source: io::Error,
    },

    /// The unit running a dispatch terminated abnormally
    #[error("execution unit for {pid} terminated abnormally")]
    UnitPanicked { pid: Pid },

    #[error("scheduler invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid process {pid}: {reason}")]
    InvalidProcess { pid: Pid, reason: String },

    #[error("process id {0} appears more than once")]
    DuplicatePid(Pid),
}

impl SchedulerError {
    /// Returns true when the error only costs the current dispatch and
    /// the run may go on with the rest of the queue
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SchedulerError::ResourceExhaustion { .. } | SchedulerError::UnitPanicked { .. }
        )
    }
}
