use std::collections::{BTreeMap, BTreeSet};

use daggy::{Dag, NodeIndex, Walker};

use crate::api::element::TaskRecord;
use crate::dag::{ControlEdge, DagError, File, Task};
use crate::utils::task_name;

/// In-progress or finalized job: tasks as DAG nodes, a file registry, the
/// raw type-level dependency pairs and the type -> instance index.
///
/// Edges are resolved only at link time, once every instance of every type
/// of the job is known.
#[derive(Debug)]
pub struct JobGraph {
    name: String,
    submitted_time: i64,

    dag: Dag<Task, ControlEdge>,
    task_indies: BTreeMap<String, NodeIndex>,
    files: BTreeMap<String, File>,

    /// (own_type, parent_type)
    raw_dependencies: BTreeSet<(String, String)>,
    /// task type -> instance ids, in first-seen order
    task_instances: BTreeMap<String, Vec<String>>,
}

impl JobGraph {
    pub fn new(name: String, submitted_time: i64) -> Self {
        JobGraph {
            name,
            submitted_time,
            dag: Dag::new(),
            task_indies: BTreeMap::new(),
            files: BTreeMap::new(),
            raw_dependencies: BTreeSet::new(),
            task_instances: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn submitted_time(&self) -> i64 {
        self.submitted_time
    }

    pub fn task_count(&self) -> usize {
        self.task_indies.len()
    }

    pub fn edge_count(&self) -> usize {
        self.dag.edge_count()
    }

    pub fn raw_dependencies(&self) -> &BTreeSet<(String, String)> {
        &self.raw_dependencies
    }

    pub fn task_instances(&self) -> &BTreeMap<String, Vec<String>> {
        &self.task_instances
    }

    pub fn instances_of(&self, task_type: &str) -> &[String] {
        self.task_instances
            .get(task_type)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Ingests one admitted row of this job.
    pub fn update(&mut self, record: &TaskRecord) {
        let is_new = !self.task_indies.contains_key(&record.instance_id);
        let task = self.get_or_create_task(&record.instance_id);
        task.runtime = (record.end_time - record.start_time).max(0) as f64;
        task.avg_cpu = record.avg_cpu;
        task.memory = record.avg_mem;
        task.host = record.host;
        task.start_time = record.start_time;
        task.end_time = record.end_time;

        if record.start_time < self.submitted_time {
            self.submitted_time = record.start_time;
        }

        if let Some(decoded) = task_name::decode(&record.task_name) {
            for parent_type in &decoded.parent_types {
                self.raw_dependencies
                    .insert((decoded.own_type.to_string(), parent_type.to_string()));
            }

            if is_new {
                self.task_instances
                    .entry(decoded.own_type.to_string())
                    .or_insert_with(Vec::new)
                    .push(record.instance_id.clone());
            }
        }
    }

    fn get_or_create_task(&mut self, instance_id: &str) -> &mut Task {
        let node_index = match self.task_indies.get(instance_id) {
            Some(node_index) => *node_index,
            None => {
                let node_index = self.dag.add_node(Task::new(instance_id.to_string()));
                self.task_indies.insert(instance_id.to_string(), node_index);
                node_index
            }
        };
        &mut self.dag[node_index]
    }

    pub fn node_index(&self, task_id: &str) -> Result<NodeIndex, DagError> {
        self.task_indies
            .get(task_id)
            .copied()
            .ok_or_else(|| DagError::TaskNotFound(task_id.to_string()))
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.task_indies
            .get(task_id)
            .map(|node_index| &self.dag[*node_index])
    }

    pub(crate) fn task_at(&self, node_index: NodeIndex) -> &Task {
        &self.dag[node_index]
    }

    /// Tasks ordered by id.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.task_indies
            .values()
            .map(move |node_index| &self.dag[*node_index])
    }

    pub fn task_ids(&self) -> Vec<String> {
        self.task_indies.keys().cloned().collect()
    }

    /// Parent task ids of `task_id`, ordered by id.
    pub fn parents(&self, task_id: &str) -> Result<Vec<String>, DagError> {
        let node_index = self.node_index(task_id)?;
        let mut parents: Vec<String> = self
            .dag
            .parents(node_index)
            .iter(&self.dag)
            .map(|(_edge_index, parent_index)| self.dag[parent_index].id.clone())
            .collect();
        parents.sort();
        Ok(parents)
    }

    pub fn has_parents(&self, node_index: NodeIndex) -> bool {
        self.dag
            .parents(node_index)
            .walk_next(&self.dag)
            .is_some()
    }

    pub(crate) fn has_edge(&self, parent: NodeIndex, child: NodeIndex) -> bool {
        self.dag.find_edge(parent, child).is_some()
    }

    pub(crate) fn edges(&self) -> Vec<(NodeIndex, NodeIndex)> {
        self.dag
            .raw_edges()
            .iter()
            .map(|edge| (edge.source(), edge.target()))
            .collect()
    }

    pub(crate) fn add_control_edge(
        &mut self,
        parent: NodeIndex,
        child: NodeIndex,
    ) -> Result<(), DagError> {
        self.dag
            .add_edge(parent, child, ControlEdge)
            .map(|_edge_index| ())
            .map_err(|_would_cycle| DagError::WouldCycle {
                parent: self.dag[parent].id.clone(),
                child: self.dag[child].id.clone(),
            })
    }

    pub fn file(&self, file_id: &str) -> Option<&File> {
        self.files.get(file_id)
    }

    /// Files ordered by id.
    pub fn files(&self) -> impl Iterator<Item = &File> + '_ {
        self.files.values()
    }

    pub(crate) fn files_mut(&mut self) -> impl Iterator<Item = &mut File> + '_ {
        self.files.values_mut()
    }

    /// Registers `file_id` as produced by `task_id` and lists it among the
    /// task's outputs. Idempotent.
    pub(crate) fn attach_output(&mut self, task_id: &str, file_id: &str) -> Result<(), DagError> {
        let node_index = self.node_index(task_id)?;
        let file = self
            .files
            .entry(file_id.to_string())
            .or_insert_with(|| File::new(file_id.to_string()));
        if file.producer.is_none() {
            file.producer = Some(task_id.to_string());
        }

        let task = &mut self.dag[node_index];
        if !task.output_files.iter().any(|f| f == file_id) {
            task.output_files.push(file_id.to_string());
        }
        Ok(())
    }

    /// Registers `task_id` as a consumer of `file_id` and lists the file
    /// among the task's inputs. Idempotent.
    pub(crate) fn attach_input(&mut self, task_id: &str, file_id: &str) -> Result<(), DagError> {
        let node_index = self.node_index(task_id)?;
        let file = self
            .files
            .entry(file_id.to_string())
            .or_insert_with(|| File::new(file_id.to_string()));
        file.consumers.insert(task_id.to_string());

        let task = &mut self.dag[node_index];
        if !task.input_files.iter().any(|f| f == file_id) {
            task.input_files.push(file_id.to_string());
        }
        Ok(())
    }
}
