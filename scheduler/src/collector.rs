use std::sync::{Mutex, PoisonError};

use crate::{EventSink, Pid, SchedulerEvent};

/// An event sink that keeps every notification it receives, in order
#[derive(Debug, Default)]
pub struct Recorder {
    events: Mutex<Vec<SchedulerEvent>>,
}

impl Recorder {
    pub fn new() -> Recorder {
        Recorder::default()
    }

    /// Returns a copy of the events collected so far
    pub fn events(&self) -> Vec<SchedulerEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // Returns the pids in the order their dispatches started
    pub fn dispatch_order(&self) -> Vec<Pid> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SchedulerEvent::DispatchStarted { pid, .. } => Some(pid),
                _ => None,
            })
            .collect()
    }

    // Returns the execution counts in the order they were announced
    pub fn execution_counts(&self) -> Vec<u64> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SchedulerEvent::DispatchStarted { execution_count, .. } => Some(execution_count),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for Recorder {
    fn emit(&self, event: SchedulerEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_events_in_arrival_order() {
        let recorder = Recorder::new();
        recorder.emit(SchedulerEvent::DispatchStarted { pid: Pid::new(4), execution_count: 1 });
        recorder.emit(SchedulerEvent::DispatchCompleted { pid: Pid::new(4) });
        recorder.emit(SchedulerEvent::DispatchStarted { pid: Pid::new(5), execution_count: 2 });

        assert_eq!(recorder.events().len(), 3);
        assert_eq!(recorder.dispatch_order(), vec![Pid::new(4), Pid::new(5)]);
        assert_eq!(recorder.execution_counts(), vec![1, 2]);
    }
}
