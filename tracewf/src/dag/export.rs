use crate::api::document::{
    Author, EmittedWorkflow, FileEntry, FileLink, WorkflowDocument, WorkflowJob, Wms, Workflow,
    SCHEMA_VERSION,
};
use crate::api::properties::SECONDS_PER_HOUR;
use crate::dag::{DagError, JobGraph};

/// Trace memory is normalized; documents carry it scaled by this factor.
pub const MEMORY_SCALE: f64 = 100.0;

/// Hour bucket of a submission time, `(t - 1) div 3600` truncated toward 0.
pub fn hour_bucket(submitted_time: i64) -> i64 {
    if submitted_time <= 0 {
        0
    } else {
        (submitted_time - 1) / SECONDS_PER_HOUR
    }
}

/// Submission time relative to the start of its hour bucket.
pub fn executed_at(submitted_time: i64) -> i64 {
    submitted_time - hour_bucket(submitted_time) * SECONDS_PER_HOUR
}

impl JobGraph {
    /// Renders a linked and synthesized job. Does not mutate the job.
    pub fn to_workflow(
        &self,
        author: &Author,
        created_at: String,
    ) -> Result<EmittedWorkflow, DagError> {
        let hour_bucket = hour_bucket(self.submitted_time());
        let bucket_start = hour_bucket * SECONDS_PER_HOUR;

        let mut jobs = Vec::with_capacity(self.task_count());
        for task in self.tasks() {
            let mut files = Vec::with_capacity(task.input_files.len() + task.output_files.len());
            let mut bytes_read = 0.0;
            for file_id in &task.input_files {
                let size = self.file_size(file_id)?;
                bytes_read += size;
                files.push(FileEntry {
                    name: file_id.clone(),
                    size: size as i64,
                    link: FileLink::Input,
                });
            }
            let mut bytes_written = 0.0;
            for file_id in &task.output_files {
                let size = self.file_size(file_id)?;
                bytes_written += size;
                files.push(FileEntry {
                    name: file_id.clone(),
                    size: size as i64,
                    link: FileLink::Output,
                });
            }

            jobs.push(WorkflowJob {
                name: task.id.clone(),
                job_type: "compute".to_string(),
                arguments: vec!["none".to_string()],
                runtime: task.runtime,
                cores: task.cores,
                avg_cpu: task.avg_cpu,
                memory: task.memory * MEMORY_SCALE,
                energy: -1,
                avg_power: -1,
                priority: 0,
                machine: task.host.to_string(),
                end_time_in_trace: task.end_time - bucket_start,
                start_time_in_trace: task.start_time - bucket_start,
                parents: self.parents(&task.id)?,
                files,
                bytes_read,
                bytes_written,
            });
        }

        let document = WorkflowDocument {
            name: self.name().to_string(),
            description: format!("This job contains {} tasks.", self.task_count()),
            created_at,
            schema_version: SCHEMA_VERSION.to_string(),
            author: author.clone(),
            wms: Wms::default(),
            workflow: Workflow {
                makespan: -1,
                executed_at: executed_at(self.submitted_time()),
                jobs,
            },
        };

        Ok(EmittedWorkflow {
            hour_bucket,
            document,
        })
    }

    fn file_size(&self, file_id: &str) -> Result<f64, DagError> {
        self.file(file_id)
            .map(|file| file.size.unwrap_or(0.0))
            .ok_or_else(|| DagError::FileNotFound(file_id.to_string()))
    }
}
