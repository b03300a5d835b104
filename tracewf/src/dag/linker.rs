//! Expands the raw (child_type, parent_type) pairs of a job into instance
//! level control edges and file based data edges, under a wall-clock budget.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::{Duration, Instant};

use daggy::NodeIndex;

use crate::dag::reachability::Reachability;
use crate::dag::{input_file_id, output_file_id, DagError, JobGraph};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkOptions {
    /// cumulative time allowed for pair expansion of one job
    pub time_budget: Duration,
    /// add every edge, even when the child is already reachable
    pub allow_redundant: bool,
}

impl Default for LinkOptions {
    fn default() -> Self {
        LinkOptions {
            time_budget: Duration::from_secs(10),
            allow_redundant: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LinkResult {
    Success,
    /// budget exhausted; the job holds partial edges and must be dropped
    TimedOut { elapsed: Duration },
    /// the encoding asks for `parent -> child` while `parent` is already
    /// reachable from `child`; the job must be dropped
    Cyclic { parent: String, child: String },
}

/// Links `job` in place.
///
/// Every task gets its `<id>_output` file. Each (child, parent) instance
/// pair of every dependency pair attaches the parent's output file as an
/// input of the child and adds the control edge parent -> child unless the
/// child is already reachable from the parent. Tasks left without parents
/// get one `<id>_input` file.
pub fn link(job: &mut JobGraph, options: &LinkOptions) -> Result<LinkResult, DagError> {
    for task_id in job.task_ids() {
        job.attach_output(&task_id, &output_file_id(&task_id))?;
    }

    if !job.raw_dependencies().is_empty() {
        if let Some(stopped) = link_pairs(job, options)? {
            return Ok(stopped);
        }
    }

    for task_id in job.task_ids() {
        let node_index = job.node_index(&task_id)?;
        if !job.has_parents(node_index) {
            job.attach_input(&task_id, &input_file_id(&task_id))?;
        }
    }

    Ok(LinkResult::Success)
}

/// Expands the dependency pairs. Building the closure counts against the
/// budget. Returns the result that stopped linking early, if any.
fn link_pairs(job: &mut JobGraph, options: &LinkOptions) -> Result<Option<LinkResult>, DagError> {
    let begin = Instant::now();
    let pairs = link_order(job.raw_dependencies());
    let locals = closure_nodes(job, &pairs)?;

    let mut reach = Reachability::new(locals.len());
    for (parent, child) in job.edges() {
        if let (Some(parent), Some(child)) = (locals.get(&parent), locals.get(&child)) {
            reach.connect(*parent, *child);
        }
    }

    let mut spent = begin.elapsed();
    if spent >= options.time_budget {
        return Ok(Some(LinkResult::TimedOut { elapsed: spent }));
    }

    for (child_type, parent_type) in pairs {
        let children = job.instances_of(&child_type).to_vec();
        let parents = job.instances_of(&parent_type).to_vec();

        for child_id in &children {
            for parent_id in &parents {
                if child_id == parent_id {
                    continue;
                }

                let begin = Instant::now();
                let linked = link_pair(job, &mut reach, &locals, parent_id, child_id, options)?;
                spent += begin.elapsed();

                if linked.is_some() {
                    return Ok(linked);
                }
                if spent >= options.time_budget {
                    return Ok(Some(LinkResult::TimedOut { elapsed: spent }));
                }
            }
        }
    }

    Ok(None)
}

/// Dense closure indices for the instances of every type named in `pairs`.
/// Tasks outside these types never take part in an edge.
fn closure_nodes(
    job: &JobGraph,
    pairs: &[(String, String)],
) -> Result<HashMap<NodeIndex, usize>, DagError> {
    let task_types: BTreeSet<&str> = pairs
        .iter()
        .flat_map(|(child, parent)| [child.as_str(), parent.as_str()])
        .collect();

    let mut locals = HashMap::new();
    for task_type in task_types {
        for task_id in job.instances_of(task_type) {
            let node_index = job.node_index(task_id)?;
            let next = locals.len();
            locals.entry(node_index).or_insert(next);
        }
    }
    Ok(locals)
}

fn local_index(
    job: &JobGraph,
    locals: &HashMap<NodeIndex, usize>,
    node_index: NodeIndex,
) -> Result<usize, DagError> {
    locals
        .get(&node_index)
        .copied()
        .ok_or_else(|| DagError::TaskNotFound(job.task_at(node_index).id.clone()))
}

/// Returns `Some(LinkResult::Cyclic)` when the pair closes a cycle.
fn link_pair(
    job: &mut JobGraph,
    reach: &mut Reachability,
    locals: &HashMap<NodeIndex, usize>,
    parent_id: &str,
    child_id: &str,
    options: &LinkOptions,
) -> Result<Option<LinkResult>, DagError> {
    let parent = job.node_index(parent_id)?;
    let child = job.node_index(child_id)?;
    let parent_local = local_index(job, locals, parent)?;
    let child_local = local_index(job, locals, child)?;

    if reach.reachable(child_local, parent_local) {
        return Ok(Some(LinkResult::Cyclic {
            parent: parent_id.to_string(),
            child: child_id.to_string(),
        }));
    }

    job.attach_input(child_id, &output_file_id(parent_id))?;

    let add_edge = if options.allow_redundant {
        !job.has_edge(parent, child)
    } else {
        !reach.reachable(parent_local, child_local)
    };
    if add_edge {
        job.add_control_edge(parent, child)?;
        reach.connect(parent_local, child_local);
    }

    Ok(None)
}

/// Orders dependency pairs so that the reachability gate removes transitive
/// edges independently of how the pairs sort by name: children in
/// topological order of the type graph, and for one child the nearest parent
/// type first. Types on a cycle of the type graph come last, in name order.
fn link_order(dependencies: &BTreeSet<(String, String)>) -> Vec<(String, String)> {
    let mut in_degree: BTreeMap<&str, usize> = BTreeMap::new();
    let mut followers: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (child, parent) in dependencies {
        in_degree.entry(parent.as_str()).or_insert(0);
        *in_degree.entry(child.as_str()).or_insert(0) += 1;
        followers
            .entry(parent.as_str())
            .or_insert_with(Vec::new)
            .push(child.as_str());
    }

    let mut ready: BTreeSet<&str> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(task_type, _)| *task_type)
        .collect();
    let mut rank: BTreeMap<&str, usize> = BTreeMap::new();
    while let Some(task_type) = ready.iter().next().copied() {
        ready.remove(task_type);
        rank.insert(task_type, rank.len());

        for follower in followers.get(task_type).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(follower) {
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(*follower);
                }
            }
        }
    }

    let unranked = usize::MAX;
    let mut pairs: Vec<(String, String)> = dependencies.iter().cloned().collect();
    pairs.sort_by_key(|(child, parent)| {
        let child_rank = rank.get(child.as_str()).copied().unwrap_or(unranked);
        let parent_rank = rank.get(parent.as_str()).copied().unwrap_or(unranked);
        (child_rank, Reverse(parent_rank), child.clone(), parent.clone())
    });
    pairs
}
