use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracewf::api::properties::ConverterConfig;
use tracewf::functions::source::CsvInputFormat;
use tracewf::runtime::logger::init_log;
use tracewf::runtime::{self, count_tasks as count_trace_tasks};
use tracewf::utils::VERSION;

use crate::ConvertArgs;

pub fn convert(args: ConvertArgs) -> Result<()> {
    let config = build_config(args)?;
    init_log(config.log_level.as_str(), config.log_file.as_deref())?;
    info!("tracewf {}: {:?}", VERSION, config);

    let stats = runtime::run(config)?;
    eprintln!(
        "{} jobs emitted, {} timed out, {} cyclic, {} excluded",
        stats.jobs_emitted, stats.jobs_timed_out, stats.jobs_cyclic, stats.jobs_excluded
    );
    Ok(())
}

pub fn count_tasks(trace: PathBuf, output: PathBuf, log_level: String) -> Result<()> {
    init_log(log_level.as_str(), None)?;

    let mut input = CsvInputFormat::from_path(trace.as_path())
        .with_context(|| format!("open trace {}", trace.display()))?;
    let counter = count_trace_tasks(&mut input)?;

    let file = File::create(output.as_path())
        .with_context(|| format!("create {}", output.display()))?;
    counter.write_csv(BufWriter::new(file))?;
    info!("task counts written to {}", output.display());
    Ok(())
}

fn build_config(args: ConvertArgs) -> Result<ConverterConfig> {
    let mut config = match &args.config {
        Some(path) => ConverterConfig::load(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => ConverterConfig::default(),
    };

    if let Some(start_offset_hours) = args.start_offset_hours {
        config.start_offset_hours = start_offset_hours;
    }
    if let Some(duration_hours) = args.duration_hours {
        config.duration_hours = duration_hours;
    }
    if let Some(link_time_budget_secs) = args.link_time_budget_secs {
        config.link_time_budget_secs = link_time_budget_secs;
    }
    if let Some(dump_interval) = args.dump_interval {
        config.dump_interval = dump_interval;
    }
    if let Some(trace) = args.trace {
        config.trace_path = trace;
    }
    if let Some(output) = args.output {
        config.output_dir = output;
    }
    if let Some(max_machines) = args.max_machines {
        config.max_num_machine = max_machines;
    }
    if args.allow_redundant {
        config.allow_redundant_edges = true;
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::commands::build_config;
    use crate::{Cli, Commands};

    #[test]
    pub fn positional_args_test() {
        let cli = Cli::parse_from([
            "tracewf",
            "convert",
            "2",
            "3",
            "0.5",
            "20",
            "--max-machines",
            "10",
            "--allow-redundant",
        ]);
        let args = match cli.command {
            Some(Commands::Convert(args)) => args,
            _ => panic!("expected convert"),
        };

        let config = build_config(args).unwrap();
        assert_eq!(config.start_offset_hours, 2);
        assert_eq!(config.duration_hours, 3);
        assert_eq!(config.link_time_budget_secs, 0.5);
        assert_eq!(config.dump_interval, 20);
        assert_eq!(config.max_num_machine, 10);
        assert!(config.allow_redundant_edges);
        assert_eq!(config.accepted_status, "Terminated");
    }

    #[test]
    pub fn default_command_test() {
        let cli = Cli::try_parse_from(["tracewf", "0", "24", "10", "1000"]).unwrap();
        assert!(cli.command.is_none());

        let config = build_config(cli.convert).unwrap();
        assert_eq!(config.start_offset_hours, 0);
        assert_eq!(config.duration_hours, 24);
        assert_eq!(config.link_time_budget_secs, 10.0);
        assert_eq!(config.dump_interval, 1000);

        let cli = Cli::try_parse_from(["tracewf", "count-tasks", "--output", "counts.csv"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::CountTasks { .. })));
    }

    #[test]
    pub fn invalid_args_test() {
        let cli = Cli::parse_from(["tracewf", "convert", "0", "0"]);
        let args = match cli.command {
            Some(Commands::Convert(args)) => args,
            _ => panic!("expected convert"),
        };
        assert!(build_config(args).is_err());
    }
}
