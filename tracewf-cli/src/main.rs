//! Command line entry of the trace to workflow converter.

#[macro_use]
extern crate log;

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tracewf")]
#[command(about = "Converts a cluster task-instance trace into DAG workflow documents", long_about = None)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Used when no subcommand is given
    #[command(flatten)]
    convert: ConvertArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the trace into one workflow document per job
    Convert(ConvertArgs),

    /// Count rows per trace hour, without filtering
    CountTasks {
        /// Trace file
        #[arg(long, default_value = "trace/batch_instance.csv")]
        trace: PathBuf,

        /// CSV file to write
        #[arg(long, short, default_value = "task_count.csv")]
        output: PathBuf,

        /// Log level
        #[arg(long, default_value = "INFO")]
        log_level: String,
    },
}

#[derive(Args)]
pub struct ConvertArgs {
    /// First trace hour to convert
    pub start_offset_hours: Option<i64>,

    /// Number of trace hours to convert
    pub duration_hours: Option<i64>,

    /// Wall-clock seconds allowed for linking one job
    pub link_time_budget_secs: Option<f64>,

    /// Live jobs kept before the oldest is written out
    pub dump_interval: Option<usize>,

    /// Trace file
    #[arg(long)]
    pub trace: Option<PathBuf>,

    /// Root directory of the workflow documents
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// YAML config file; positional values and options override it
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Hosts with a larger id are rejected
    #[arg(long)]
    pub max_machines: Option<i64>,

    /// Keep control edges already implied by other paths
    #[arg(long)]
    pub allow_redundant: bool,

    /// Log level: OFF, ERROR, WARN, INFO, DEBUG or TRACE
    #[arg(long)]
    pub log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => commands::convert(args),
        Some(Commands::CountTasks {
            trace,
            output,
            log_level,
        }) => commands::count_tasks(trace, output, log_level),
        None => commands::convert(cli.convert),
    }
}
