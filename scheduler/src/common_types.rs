use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Round robin time slice used when nothing else is configured
pub const DEFAULT_QUANTUM: NonZeroUsize = match NonZeroUsize::new(2) {
    Some(quantum) => quantum,
    None => unreachable!(),
};

/// Length of one simulated time unit, in milliseconds
pub const DEFAULT_TIME_UNIT_MS: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pid(u32);

impl Pid {
    /// Creates a new Pid object
    ///
    /// * `pid` - the numeric process identifier
    pub const fn new(pid: u32) -> Pid {
        Pid(pid)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// The category of a process, deciding which policy schedules it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessClass {
    System,
    Interactive,
    Background,
}

impl ProcessClass {
    /// Returns the scheduling policy that drains this class
    pub fn policy(&self) -> Policy {
        match self {
            ProcessClass::System => Policy::Priority,
            ProcessClass::Interactive => Policy::RoundRobin,
            ProcessClass::Background => Policy::Fcfs,
        }
    }
}

impl fmt::Display for ProcessClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessClass::System => "system",
            ProcessClass::Interactive => "interactive",
            ProcessClass::Background => "background",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    Priority,
    RoundRobin,
    Fcfs,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Policy::Priority => "Priority",
            Policy::RoundRobin => "Round Robin",
            Policy::Fcfs => "FCFS",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_class_routes_to_its_own_policy() {
        assert_eq!(ProcessClass::System.policy(), Policy::Priority);
        assert_eq!(ProcessClass::Interactive.policy(), Policy::RoundRobin);
        assert_eq!(ProcessClass::Background.policy(), Policy::Fcfs);
    }

    #[test]
    fn pid_displays_with_process_prefix() {
        assert_eq!(Pid::new(4).to_string(), "P4");
    }

    #[test]
    fn class_names_deserialize_in_snake_case() {
        let class: ProcessClass = serde_json::from_str("\"interactive\"").unwrap();
        assert_eq!(class, ProcessClass::Interactive);
    }
}
