use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::{WorkModel, DEFAULT_QUANTUM, DEFAULT_TIME_UNIT_MS};

/// Tuning knobs of a run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// The maximum time slice of the round robin policy
    pub quantum: NonZeroUsize,
    /// Wall clock length of one unit of burst time
    ///
    /// Zero makes bursts instantaneous.
    pub time_unit_ms: u64,
    /// Stack size of the execution unit threads, in bytes
    pub worker_stack_size: Option<usize>,
}

impl SchedulerConfig {
    pub fn work_model(&self) -> WorkModel {
        WorkModel::from_millis(self.time_unit_ms)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            quantum: DEFAULT_QUANTUM,
            time_unit_ms: DEFAULT_TIME_UNIT_MS,
            worker_stack_size: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: SchedulerConfig = serde_json::from_str(r#"{ "quantum": 4 }"#).unwrap();

        assert_eq!(config.quantum.get(), 4);
        assert_eq!(config.time_unit_ms, DEFAULT_TIME_UNIT_MS);
        assert_eq!(config.worker_stack_size, None);
    }

    #[test]
    fn zero_quantum_is_rejected() {
        assert!(serde_json::from_str::<SchedulerConfig>(r#"{ "quantum": 0 }"#).is_err());
    }

    #[test]
    fn default_work_model_uses_one_second_units() {
        assert_eq!(
            SchedulerConfig::default().work_model(),
            WorkModel::Scaled(Duration::from_secs(1))
        );
    }
}
