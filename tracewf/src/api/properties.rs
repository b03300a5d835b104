use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::document::Author;
use crate::dag::linker::LinkOptions;
use crate::functions::file_size::FileSizePolicy;

pub const SECONDS_PER_HOUR: i64 = 3600;

/// Settings of one converter run. Every field has a default so a YAML file
/// only needs to carry the values it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub trace_path: PathBuf,
    pub output_dir: PathBuf,

    pub start_offset_hours: i64,
    pub duration_hours: i64,
    /// wall-clock ceiling for linking one job
    pub link_time_budget_secs: f64,
    /// max live jobs before FIFO eviction begins
    pub dump_interval: usize,

    pub max_num_machine: i64,
    pub accepted_status: String,
    pub allow_redundant_edges: bool,

    pub progress_interval: u64,
    pub file_size: FileSizePolicy,
    pub author: Author,

    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfig {
            trace_path: PathBuf::from("trace/batch_instance.csv"),
            output_dir: PathBuf::from("output/workflows/"),
            start_offset_hours: 0,
            duration_hours: 24,
            link_time_budget_secs: 10.0,
            dump_interval: 1000,
            max_num_machine: 4096,
            accepted_status: "Terminated".to_string(),
            allow_redundant_edges: false,
            progress_interval: 10000,
            file_size: FileSizePolicy::default(),
            author: Author::default(),
            log_level: "INFO".to_string(),
            log_file: None,
        }
    }
}

impl ConverterConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> crate::api::Result<Self> {
        let context = read_config_from_path(path.as_ref())?;
        let config: ConverterConfig = serde_yaml::from_str(&context)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::api::Result<()> {
        if self.duration_hours <= 0 {
            return Err(crate::api::ConvertError::config(format!(
                "`duration_hours` must be positive, got {}",
                self.duration_hours
            )));
        }
        if !self.link_time_budget_secs.is_finite() || self.link_time_budget_secs < 0.0 {
            return Err(crate::api::ConvertError::config(format!(
                "`link_time_budget_secs` must be a non-negative number, got {}",
                self.link_time_budget_secs
            )));
        }
        if self.max_num_machine <= 0 {
            return Err(crate::api::ConvertError::config(format!(
                "`max_num_machine` must be positive, got {}",
                self.max_num_machine
            )));
        }
        Ok(())
    }

    pub fn window_bounds(&self) -> WindowBounds {
        WindowBounds::from_hours(self.start_offset_hours, self.duration_hours)
    }

    pub fn link_options(&self) -> LinkOptions {
        LinkOptions {
            time_budget: Duration::from_secs_f64(self.link_time_budget_secs.max(0.0)),
            allow_redundant: self.allow_redundant_edges,
        }
    }
}

pub fn read_config_from_path(path: &Path) -> Result<String, std::io::Error> {
    let mut file = File::open(path)?;
    let mut buffer = String::new();
    file.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Half-open trace time window `[start, end)`, in trace seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    start: i64,
    end: i64,
}

impl WindowBounds {
    pub fn new(start: i64, end: i64) -> Self {
        WindowBounds { start, end }
    }

    pub fn from_hours(start_offset_hours: i64, duration_hours: i64) -> Self {
        let start = start_offset_hours * SECONDS_PER_HOUR;
        WindowBounds::new(start, start + duration_hours * SECONDS_PER_HOUR)
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.start <= timestamp && timestamp < self.end
    }

    /// Moves a trace timestamp so the window starts at 0.
    pub fn shift(&self, timestamp: i64) -> i64 {
        timestamp - self.start
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::api::properties::{ConverterConfig, WindowBounds};
    use crate::functions::file_size::FileSizePolicy;

    #[test]
    pub fn window_bounds_test() {
        let bounds = WindowBounds::from_hours(2, 1);
        assert_eq!(bounds.start(), 7200);
        assert_eq!(bounds.end(), 10800);

        assert!(!bounds.contains(7199));
        assert!(bounds.contains(7200));
        assert!(bounds.contains(10799));
        assert!(!bounds.contains(10800));

        assert_eq!(bounds.shift(7210), 10);
    }

    #[test]
    pub fn load_yaml_test() {
        let path = std::env::temp_dir().join(format!("tracewf-{}.yaml", uuid::Uuid::new_v4()));
        {
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "trace_path: /data/batch_instance.csv").unwrap();
            writeln!(file, "dump_interval: 20").unwrap();
            writeln!(file, "allow_redundant_edges: true").unwrap();
            writeln!(file, "file_size:").unwrap();
            writeln!(file, "  policy: seeded").unwrap();
            writeln!(file, "  min: 10.0").unwrap();
            writeln!(file, "  max: 20.0").unwrap();
            writeln!(file, "  jitter: 1.0").unwrap();
            writeln!(file, "  slope: 0.0").unwrap();
        }

        let config = ConverterConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.trace_path.to_str().unwrap(), "/data/batch_instance.csv");
        assert_eq!(config.dump_interval, 20);
        assert!(config.allow_redundant_edges);
        assert_eq!(
            config.file_size,
            FileSizePolicy::Seeded {
                min: 10.0,
                max: 20.0,
                jitter: 1.0,
                slope: 0.0
            }
        );
        // untouched fields keep their defaults
        assert_eq!(config.max_num_machine, 4096);
        assert_eq!(config.accepted_status, "Terminated");
    }

    #[test]
    pub fn validate_test() {
        let mut config = ConverterConfig::default();
        assert!(config.validate().is_ok());

        config.duration_hours = 0;
        assert!(config.validate().is_err());

        config.duration_hours = 1;
        config.link_time_budget_secs = -1.0;
        assert!(config.validate().is_err());
    }
}
