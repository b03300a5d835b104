//! Job DAG model and builder
//! rows -> job_graph -> (linker) -> linked job_graph -> export

use std::collections::BTreeSet;

use thiserror::Error;

pub mod export;
pub mod job_graph;
pub mod linker;
pub(crate) mod reachability;

pub use job_graph::JobGraph;

/// Cores requested by every task instance.
pub const TASK_CORES: u32 = 1;

pub const OUTPUT_FILE_SUFFIX: &str = "_output";
pub const INPUT_FILE_SUFFIX: &str = "_input";

#[derive(Error, Debug)]
pub enum DagError {
    #[error("DAG would cycle: {parent} -> {child}")]
    WouldCycle { parent: String, child: String },
    #[error("task `{0}` not found")]
    TaskNotFound(String),
    #[error("file `{0}` not found")]
    FileNotFound(String),
}

/// One task instance of a job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    /// seconds, `max(end - start, 0)`
    pub runtime: f64,
    pub cores: u32,
    pub avg_cpu: f64,
    pub memory: f64,
    pub host: i64,
    pub start_time: i64,
    pub end_time: i64,
    /// file ids, in attachment order
    pub input_files: Vec<String>,
    pub output_files: Vec<String>,
}

impl Task {
    pub fn new(id: String) -> Self {
        Task {
            id,
            runtime: 0.0,
            cores: TASK_CORES,
            avg_cpu: 0.0,
            memory: 0.0,
            host: 0,
            start_time: 0,
            end_time: 0,
            input_files: Vec::new(),
            output_files: Vec::new(),
        }
    }
}

/// Control dependency parent -> child.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlEdge;

/// A synthetic file. The producer, if any, is unique.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub id: String,
    pub size: Option<f64>,
    pub producer: Option<String>,
    pub consumers: BTreeSet<String>,
}

impl File {
    pub fn new(id: String) -> Self {
        File {
            id,
            size: None,
            producer: None,
            consumers: BTreeSet::new(),
        }
    }
}

pub fn output_file_id(task_id: &str) -> String {
    format!("{}{}", task_id, OUTPUT_FILE_SUFFIX)
}

pub fn input_file_id(task_id: &str) -> String {
    format!("{}{}", task_id, INPUT_FILE_SUFFIX)
}
