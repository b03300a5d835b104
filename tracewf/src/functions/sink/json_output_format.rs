use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::api::document::{EmittedWorkflow, WorkflowDocument};
use crate::api::function::{NamedFunction, OutputFormat};

pub fn json_file_sink<P: AsRef<Path>>(output_dir: P) -> JsonFileOutputFormat {
    JsonFileOutputFormat::new(output_dir.as_ref().to_path_buf())
}

/// Writes one pretty-printed document per job to
/// `<output_dir>/<h>-<h+1>/<job_name>.json`, `h` the job's hour bucket.
pub struct JsonFileOutputFormat {
    output_dir: PathBuf,
    written: u64,
}

impl JsonFileOutputFormat {
    pub fn new(output_dir: PathBuf) -> Self {
        JsonFileOutputFormat {
            output_dir,
            written: 0,
        }
    }

    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_path()
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn document_path(&self, workflow: &EmittedWorkflow) -> PathBuf {
        self.output_dir
            .join(format!(
                "{}-{}",
                workflow.hour_bucket,
                workflow.hour_bucket + 1
            ))
            .join(format!("{}.json", workflow.document.name))
    }
}

impl NamedFunction for JsonFileOutputFormat {
    fn name(&self) -> &str {
        "JsonFileOutputFormat"
    }
}

impl OutputFormat for JsonFileOutputFormat {
    fn open(&mut self) -> crate::api::Result<()> {
        fs::create_dir_all(self.output_dir.as_path())?;
        info!("write workflows to {}", self.output_dir.display());
        Ok(())
    }

    fn write_workflow(&mut self, workflow: EmittedWorkflow) -> crate::api::Result<()> {
        let path = self.document_path(&workflow);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(path.as_path())?;
        let mut writer = BufWriter::new(file);
        write_pretty(&mut writer, &workflow.document)?;
        writer.flush()?;

        self.written += 1;
        debug!("write {}", path.display());
        Ok(())
    }

    fn close(&mut self) -> crate::api::Result<()> {
        info!("{} workflows written", self.written);
        Ok(())
    }
}

fn write_pretty<W: Write>(writer: W, document: &WorkflowDocument) -> crate::api::Result<()> {
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    document.serialize(&mut serializer)?;
    Ok(())
}
