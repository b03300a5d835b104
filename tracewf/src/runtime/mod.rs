//! Drivers of a conversion: the row loop, its statistics, the task counter
//! and log bootstrap.

use crate::api::properties::ConverterConfig;
use crate::functions::sink::JsonFileOutputFormat;
use crate::functions::source::CsvInputFormat;

pub mod converter;
pub mod logger;
pub mod stats;
pub mod task_count;

pub use converter::ConverterRun;
pub use stats::RunStats;
pub use task_count::{count_tasks, TaskCounter};

/// Converts the trace at `config.trace_path` into json documents under
/// `config.output_dir`.
pub fn run(config: ConverterConfig) -> crate::api::Result<RunStats> {
    let mut input = CsvInputFormat::from_path(config.trace_path.as_path())?;
    let output = JsonFileOutputFormat::new(config.output_dir.clone());

    let mut converter = ConverterRun::new(config, output)?;
    converter.run(&mut input)?;
    let (stats, _output) = converter.finish()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use crate::api::properties::ConverterConfig;
    use crate::runtime::run;

    #[test]
    pub fn run_test() {
        let dir = std::env::temp_dir().join(uuid::Uuid::new_v4().to_string());
        std::fs::create_dir_all(&dir).unwrap();
        let trace_path = dir.join("batch_instance.csv");
        std::fs::write(
            &trace_path,
            "i1,Maa,j_1,1,Terminated,10,20,m_1,1,1,50.0,60.0,0.2,0.3\n\
             i2,Mab_aa,j_1,1,Terminated,25,40,m_2,1,1,40.0,45.0,0.1,0.2\n\
             i1,M1,j_2,1,Terminated,3700,3800,m_2,1,1,40.0,45.0,0.1,0.2\n\
             i1,M1,j_3,1,Failed,3700,3800,m_2,1,1,40.0,45.0,0.1,0.2\n",
        )
        .unwrap();

        let config = ConverterConfig {
            trace_path,
            output_dir: dir.join("workflows"),
            ..ConverterConfig::default()
        };
        let stats = run(config).unwrap();
        assert_eq!(stats.rows_read, 4);
        assert_eq!(stats.jobs_emitted, 2);
        assert_eq!(stats.jobs_excluded, 1);

        assert!(dir.join("workflows").join("0-1").join("j_1.json").is_file());
        assert!(dir.join("workflows").join("1-2").join("j_2.json").is_file());
        assert!(!dir.join("workflows").join("1-2").join("j_3.json").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    pub fn run_missing_trace_test() {
        let config = ConverterConfig {
            trace_path: std::env::temp_dir().join(uuid::Uuid::new_v4().to_string()),
            ..ConverterConfig::default()
        };
        assert!(run(config).is_err());
    }
}
