use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use scheduler::{EventSink, SchedulerEvent};

/// Returns the transcript line of an event
pub fn describe(event: &SchedulerEvent) -> String {
    match event {
        SchedulerEvent::ProcessLoaded { pid, priority, burst_time, class } => {
            format!("{pid} | Priority={priority} | Burst={burst_time} | Type={class}")
        }
        SchedulerEvent::Routed { pid, policy, .. } => {
            format!("Process {pid} → {policy} Scheduling")
        }
        SchedulerEvent::PolicyStarted { policy, quantum: Some(quantum) } => {
            format!("\n--- {policy} Scheduling (Quantum = {quantum}) ---")
        }
        SchedulerEvent::PolicyStarted { policy, quantum: None } => {
            format!("\n--- {policy} Scheduling ---")
        }
        SchedulerEvent::UnitCreated { pid, unit } => {
            format!("\nExecution unit created: {pid} ({unit})")
        }
        SchedulerEvent::DispatchStarted { pid, execution_count } => {
            format!("Thread started for {pid} | Execution Count = {execution_count}")
        }
        SchedulerEvent::Executing { pid, burst_time } => {
            format!("Executing {pid} for {burst_time} units")
        }
        SchedulerEvent::DispatchCompleted { pid } => format!("Thread completed for {pid}"),
        SchedulerEvent::UnitFinished { pid } => format!("Process {pid} completed execution"),
        SchedulerEvent::RemainingTime { pid, remaining } => {
            format!("Scheduler: {pid} remaining time = {remaining}")
        }
        SchedulerEvent::DispatchFailed { pid, reason } => {
            format!("Dispatch of {pid} failed: {reason}")
        }
        SchedulerEvent::AllCompleted { .. } => {
            "\nAll processes completed successfully.".to_string()
        }
    }
}

/// Returns the lines printed before the events of a text transcript
///
/// * `single` - whether only one process is dispatched, which loads no table
pub fn banner(single: bool) -> Vec<&'static str> {
    let mut lines = vec!["Hybrid CPU Scheduler Simulation", "--------------------------------\n"];
    if !single {
        lines.push("Loaded Processes:");
    }
    lines
}

/// Prints the human readable transcript of a run
pub struct TextSink<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> TextSink<W> {
    pub fn new(out: W) -> TextSink<W> {
        TextSink { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> EventSink for TextSink<W> {
    fn emit(&self, event: SchedulerEvent) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = writeln!(out, "{}", describe(&event)) {
            log::error!("failed to print event: {err}");
        }
    }
}

/// Prints every event as one JSON object per line
pub struct JsonSink<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonSink<W> {
    pub fn new(out: W) -> JsonSink<W> {
        JsonSink { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> EventSink for JsonSink<W> {
    fn emit(&self, event: SchedulerEvent) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let written = serde_json::to_writer(&mut *out, &event)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(out));
        if let Err(err) = written {
            log::error!("failed to print event: {err}");
        }
    }
}

/// Hands every event to several sinks
pub struct Tee(pub Vec<Arc<dyn EventSink>>);

impl EventSink for Tee {
    fn emit(&self, event: SchedulerEvent) {
        for sink in &self.0 {
            sink.emit(event.clone());
        }
    }
}
