use crate::api::document::EmittedWorkflow;
use crate::api::function::{NamedFunction, OutputFormat};

/// Keeps emitted workflows in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryOutputFormat {
    workflows: Vec<EmittedWorkflow>,
}

impl MemoryOutputFormat {
    pub fn new() -> Self {
        MemoryOutputFormat::default()
    }

    pub fn workflows(&self) -> &[EmittedWorkflow] {
        self.workflows.as_slice()
    }

    pub fn names(&self) -> Vec<String> {
        self.workflows
            .iter()
            .map(|w| w.document.name.clone())
            .collect()
    }

    pub fn into_workflows(self) -> Vec<EmittedWorkflow> {
        self.workflows
    }
}

impl NamedFunction for MemoryOutputFormat {
    fn name(&self) -> &str {
        "MemoryOutputFormat"
    }
}

impl OutputFormat for MemoryOutputFormat {
    fn open(&mut self) -> crate::api::Result<()> {
        Ok(())
    }

    fn write_workflow(&mut self, workflow: EmittedWorkflow) -> crate::api::Result<()> {
        self.workflows.push(workflow);
        Ok(())
    }

    fn close(&mut self) -> crate::api::Result<()> {
        Ok(())
    }
}
