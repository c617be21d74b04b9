//! Structured notifications emitted while a run makes progress.
//!
//! The scheduler never formats text itself. Every step of a run is
//! reported as a [`SchedulerEvent`] handed to an [`EventSink`], and the
//! presentation layer decides how it looks.

use std::num::NonZeroUsize;

use serde::Serialize;

use crate::{Pid, Policy, ProcessClass};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum SchedulerEvent {
    /// A process was admitted to the run
    ProcessLoaded {
        pid: Pid,
        priority: i32,
        burst_time: usize,
        class: ProcessClass,
    },

    /// A process was routed to the policy of its class
    Routed {
        pid: Pid,
        class: ProcessClass,
        policy: Policy,
    },

    /// A policy started draining its queue
    PolicyStarted {
        policy: Policy,
        /// Only set for round robin
        quantum: Option<NonZeroUsize>,
    },

    /// The isolated unit for a dispatch was created
    UnitCreated { pid: Pid, unit: String },

    /// The execution count was bumped for a dispatch
    DispatchStarted { pid: Pid, execution_count: u64 },

    /// The simulated work of a dispatch began
    Executing { pid: Pid, burst_time: usize },

    DispatchCompleted { pid: Pid },

    /// The isolated unit for a dispatch went away
    UnitFinished { pid: Pid },

    /// Round robin time left after a slice
    RemainingTime { pid: Pid, remaining: usize },

    /// A dispatch was abandoned
    DispatchFailed { pid: Pid, reason: String },

    AllCompleted { execution_count: u64 },
}

impl SchedulerEvent {
    /// Returns the process the event is about, if any
    pub fn pid(&self) -> Option<Pid> {
        match self {
            SchedulerEvent::ProcessLoaded { pid, .. }
            | SchedulerEvent::Routed { pid, .. }
            | SchedulerEvent::UnitCreated { pid, .. }
            | SchedulerEvent::DispatchStarted { pid, .. }
            | SchedulerEvent::Executing { pid, .. }
            | SchedulerEvent::DispatchCompleted { pid }
            | SchedulerEvent::UnitFinished { pid }
            | SchedulerEvent::RemainingTime { pid, .. }
            | SchedulerEvent::DispatchFailed { pid, .. } => Some(*pid),
            SchedulerEvent::PolicyStarted { .. } | SchedulerEvent::AllCompleted { .. } => None,
        }
    }
}

/// Receiver of scheduler notifications
///
/// Sinks are shared with every execution unit, so they have to be
/// usable from several threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: SchedulerEvent);
}

/// Sends every notification to the `log` facade
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: SchedulerEvent) {
        match event {
            SchedulerEvent::ProcessLoaded { pid, priority, burst_time, class } => {
                log::info!("loaded {pid} priority={priority} burst={burst_time} class={class}")
            }
            SchedulerEvent::Routed { pid, policy, .. } => {
                log::info!("{pid} -> {policy} scheduling")
            }
            SchedulerEvent::PolicyStarted { policy, quantum: Some(quantum) } => {
                log::info!("{policy} scheduling started (quantum = {quantum})")
            }
            SchedulerEvent::PolicyStarted { policy, quantum: None } => {
                log::info!("{policy} scheduling started")
            }
            SchedulerEvent::UnitCreated { pid, unit } => {
                log::debug!("unit {unit} created for {pid}")
            }
            SchedulerEvent::DispatchStarted { pid, execution_count } => {
                log::info!("{pid} started, execution count = {execution_count}")
            }
            SchedulerEvent::Executing { pid, burst_time } => {
                log::debug!("executing {pid} for {burst_time} units")
            }
            SchedulerEvent::DispatchCompleted { pid } => log::info!("{pid} completed"),
            SchedulerEvent::UnitFinished { pid } => log::debug!("unit for {pid} finished"),
            SchedulerEvent::RemainingTime { pid, remaining } => {
                log::info!("{pid} remaining time = {remaining}")
            }
            SchedulerEvent::DispatchFailed { pid, reason } => {
                log::warn!("{pid} dispatch failed: {reason}")
            }
            SchedulerEvent::AllCompleted { execution_count } => {
                log::info!("all processes completed after {execution_count} dispatches")
            }
        }
    }
}

/// Discards every notification
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: SchedulerEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_a_kind_tag() {
        let event = SchedulerEvent::DispatchStarted { pid: Pid::new(2), execution_count: 7 };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "dispatch_started");
        assert_eq!(json["pid"], 2);
        assert_eq!(json["execution_count"], 7);
    }

    #[test]
    fn run_wide_events_carry_no_pid() {
        assert_eq!(SchedulerEvent::AllCompleted { execution_count: 3 }.pid(), None);
        assert_eq!(
            SchedulerEvent::RemainingTime { pid: Pid::new(5), remaining: 0 }.pid(),
            Some(Pid::new(5))
        );
    }
}
