use report_block::workflow::DEFAULT_TIMESTAMP_FORMAT;
use report_block::WorkflowOptions;
use std::env;
use std::path::PathBuf;

/// Settings read from the environment, with defaults for local runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    pub capture_dir: PathBuf,
    pub signal_capacity: usize,
    pub geocode_max_results: usize,
    pub timestamp_format: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            capture_dir: PathBuf::from("captures"),
            signal_capacity: 64,
            geocode_max_results: 1,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl WorkflowConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values keep the default
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let capture_dir = lookup("REPORT_CAPTURE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.capture_dir);
        let signal_capacity = parse_or("REPORT_SIGNAL_CAPACITY", &lookup, defaults.signal_capacity);
        let geocode_max_results =
            parse_or("REPORT_GEOCODE_MAX_RESULTS", &lookup, defaults.geocode_max_results);
        let timestamp_format = lookup("REPORT_TIMESTAMP_FORMAT")
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(defaults.timestamp_format);

        Self {
            capture_dir,
            signal_capacity,
            geocode_max_results,
            timestamp_format,
        }
    }

    pub fn workflow_options(&self) -> WorkflowOptions {
        WorkflowOptions {
            signal_capacity: self.signal_capacity,
            geocode_max_results: self.geocode_max_results,
            timestamp_format: self.timestamp_format.clone(),
        }
    }
}

fn parse_or(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: usize) -> usize {
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(value) if value > 0 => value,
            _ => {
                tracing::warn!("⚠️ Ignoring {}={:?}, using {}", key, raw, default);
                default
            }
        },
        None => default,
    }
}
