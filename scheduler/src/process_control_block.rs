use serde::Serialize;

use crate::{Pid, ProcessClass, SchedulerError};

/// The process control block of a schedulable unit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ProcessControlBlock {
    /// The pid of the process
    pid: Pid,
    /// The priority of the process
    ///
    /// A lower value means a more important process
    priority: i32,
    /// The total CPU time the process needs, in time units
    ///
    /// For a fragment this is the size of the slice to run
    burst_time: usize,
    /// The time the process still needs
    ///
    /// Only the round robin scheduler consumes it
    remaining_time: usize,
    /// The class deciding which scheduler handles the process
    class: ProcessClass,
}

impl ProcessControlBlock {
    /// Creates a new Process Control Block, with all its burst time left
    ///
    /// * `pid` - pid of the new process
    /// * `priority` - priority of the new process, lower is more important
    /// * `burst_time` - CPU time the process requires
    /// * `class` - scheduling class of the process
    pub fn new(
        pid: Pid,
        priority: i32,
        burst_time: usize,
        class: ProcessClass,
    ) -> ProcessControlBlock {
        ProcessControlBlock {
            pid,
            priority,
            burst_time,
            remaining_time: burst_time,
            class,
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn burst_time(&self) -> usize {
        self.burst_time
    }

    pub fn remaining_time(&self) -> usize {
        self.remaining_time
    }

    pub fn class(&self) -> ProcessClass {
        self.class
    }

    pub fn is_drained(&self) -> bool {
        self.remaining_time == 0
    }

    /// Returns a copy of the process that runs for `slice` units in a single dispatch
    ///
    /// * `slice` - the burst time of the fragment
    pub fn fragment(&self, slice: usize) -> ProcessControlBlock {
        ProcessControlBlock {
            burst_time: slice,
            remaining_time: slice,
            ..*self
        }
    }

    /// Subtracts a dispatched slice from the remaining time
    ///
    /// * `slice` - units of time the process was dispatched for
    pub fn consume(&mut self, slice: usize) -> Result<usize, SchedulerError> {
        if slice == 0 || slice > self.remaining_time {
            return Err(SchedulerError::InvariantViolation(format!(
                "{} consumed a slice of {} with {} units remaining",
                self.pid, slice, self.remaining_time
            )));
        }

        self.remaining_time -= slice;
        Ok(self.remaining_time)
    }

    /// Checks that the process can be admitted to a run
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.pid.get() == 0 {
            return Err(SchedulerError::InvalidProcess {
                pid: self.pid,
                reason: "process ids start at 1".to_string(),
            });
        }

        if self.burst_time == 0 {
            return Err(SchedulerError::InvalidProcess {
                pid: self.pid,
                reason: "burst time must be at least one unit".to_string(),
            });
        }

        Ok(())
    }
}
