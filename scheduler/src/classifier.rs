use crate::{ProcessClass, ProcessControlBlock, SchedulerError};

/// The ready queues of a run, one per process class
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassQueues {
    pub system: Vec<ProcessControlBlock>,
    pub interactive: Vec<ProcessControlBlock>,
    pub background: Vec<ProcessControlBlock>,
}

impl ClassQueues {
    pub fn len(&self) -> usize {
        self.system.len() + self.interactive.len() + self.background.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the queue that holds processes of `class`
    pub fn queue(&self, class: ProcessClass) -> &[ProcessControlBlock] {
        match class {
            ProcessClass::System => &self.system,
            ProcessClass::Interactive => &self.interactive,
            ProcessClass::Background => &self.background,
        }
    }
}

/// Splits the processes into their class queues
///
/// Every queue keeps the relative order the processes had in `processes`.
///
/// * `processes` - the processes of the run, in arrival order
pub fn partition(processes: &[ProcessControlBlock]) -> ClassQueues {
    let mut queues = ClassQueues::default();

    for pcb in processes {
        match pcb.class() {
            ProcessClass::System => queues.system.push(*pcb),
            ProcessClass::Interactive => queues.interactive.push(*pcb),
            ProcessClass::Background => queues.background.push(*pcb),
        }
    }

    queues
}

/// Like [`partition`], but checks that no process was lost or duplicated
pub fn checked_partition(processes: &[ProcessControlBlock]) -> Result<ClassQueues, SchedulerError> {
    let queues = partition(processes);

    if queues.len() != processes.len() {
        return Err(SchedulerError::InvariantViolation(format!(
            "partition produced {} processes out of {}",
            queues.len(),
            processes.len()
        )));
    }

    Ok(queues)
}
