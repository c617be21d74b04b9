use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use scheduler::{Pid, ProcessClass, ProcessControlBlock, SchedulerConfig};

/// The contents of a runner configuration file
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerFile {
    pub scheduler: SchedulerConfig,
    #[serde(rename = "process")]
    pub processes: Vec<ProcessEntry>,
}

/// One `[[process]]` table of the configuration file
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessEntry {
    pub id: u32,
    pub priority: i32,
    pub burst_time: usize,
    pub class: ProcessClass,
}

impl From<ProcessEntry> for ProcessControlBlock {
    fn from(entry: ProcessEntry) -> Self {
        ProcessControlBlock::new(Pid::new(entry.id), entry.priority, entry.burst_time, entry.class)
    }
}

impl RunnerFile {
    pub fn parse(contents: &str) -> Result<RunnerFile> {
        toml::from_str(contents).context("invalid runner configuration")
    }

    pub fn load(path: &Path) -> Result<RunnerFile> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        RunnerFile::parse(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Returns the processes of the file, or the demo table when it lists none
    pub fn process_table(&self) -> Vec<ProcessControlBlock> {
        if self.processes.is_empty() {
            return demo_table();
        }

        self.processes.iter().copied().map(ProcessControlBlock::from).collect()
    }
}

/// The five process table used when no other is given
pub fn demo_table() -> Vec<ProcessControlBlock> {
    vec![
        ProcessControlBlock::new(Pid::new(1), 1, 5, ProcessClass::System),
        ProcessControlBlock::new(Pid::new(2), 3, 8, ProcessClass::Interactive),
        ProcessControlBlock::new(Pid::new(3), 4, 6, ProcessClass::Interactive),
        ProcessControlBlock::new(Pid::new(4), 7, 10, ProcessClass::Background),
        ProcessControlBlock::new(Pid::new(5), 8, 4, ProcessClass::Background),
    ]
}
