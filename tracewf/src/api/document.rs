//! Output workflow document, one per emitted job.

pub const SCHEMA_VERSION: &str = "1.0";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDocument {
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub schema_version: String,
    pub author: Author,
    pub wms: Wms,
    pub workflow: Workflow,
}

impl WorkflowDocument {
    /// Copy of the document with the wall-clock field blanked, for comparing
    /// the output of two runs.
    pub fn without_created_at(&self) -> WorkflowDocument {
        let mut document = self.clone();
        document.created_at = String::new();
        document
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
    pub institution: String,
    pub country: String,
}

impl Default for Author {
    fn default() -> Self {
        Author {
            name: "none".to_string(),
            email: "none".to_string(),
            institution: "none".to_string(),
            country: "none".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wms {
    pub name: String,
    pub url: String,
    pub version: String,
}

impl Default for Wms {
    fn default() -> Self {
        Wms {
            name: "none".to_string(),
            url: "none".to_string(),
            version: "none".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub makespan: i64,
    pub executed_at: i64,
    pub jobs: Vec<WorkflowJob>,
}

/// One task of the job. The schema calls tasks "jobs".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowJob {
    pub name: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub arguments: Vec<String>,
    pub runtime: f64,
    pub cores: u32,
    #[serde(rename = "avgCPU")]
    pub avg_cpu: f64,
    pub memory: f64,
    pub energy: i64,
    pub avg_power: i64,
    pub priority: i64,
    pub machine: String,
    pub end_time_in_trace: i64,
    pub start_time_in_trace: i64,
    pub parents: Vec<String>,
    pub files: Vec<FileEntry>,
    pub bytes_read: f64,
    pub bytes_written: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub size: i64,
    pub link: FileLink,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileLink {
    Input,
    Output,
}

/// A document together with the hour bucket its job was submitted in. The
/// bucket decides where file based sinks place the document.
#[derive(Clone, Debug, PartialEq)]
pub struct EmittedWorkflow {
    pub hour_bucket: i64,
    pub document: WorkflowDocument,
}
