use std::collections::{HashMap, VecDeque};

use crate::api::element::TaskRecord;
use crate::dag::JobGraph;

/// Live jobs of a run, bounded by FIFO eviction on first-seen order.
///
/// Jobs discarded out of order leave a stale entry in the FIFO queue; the
/// entry is skipped when it reaches the front. Each admission that creates a
/// job takes a fresh sequence number, so a stale entry never matches a
/// later job of the same name.
#[derive(Debug)]
pub struct JobWindow {
    capacity: usize,
    sequence: u64,
    jobs: HashMap<String, (u64, JobGraph)>,
    order: VecDeque<(u64, String)>,
}

impl JobWindow {
    pub fn new(capacity: usize) -> Self {
        JobWindow {
            capacity,
            sequence: 0,
            jobs: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn contains(&self, job_name: &str) -> bool {
        self.jobs.contains_key(job_name)
    }

    pub fn get(&self, job_name: &str) -> Option<&JobGraph> {
        self.jobs.get(job_name).map(|(_, job)| job)
    }

    /// Routes `record` into its job, creating the job on its first row.
    /// Returns `true` when a job was created.
    pub fn admit(&mut self, record: &TaskRecord) -> bool {
        match self.jobs.get_mut(record.job_name.as_str()) {
            Some((_, job)) => {
                job.update(record);
                false
            }
            None => {
                self.sequence += 1;
                let mut job = JobGraph::new(record.job_name.clone(), record.start_time);
                job.update(record);
                self.jobs
                    .insert(record.job_name.clone(), (self.sequence, job));
                self.order.push_back((self.sequence, record.job_name.clone()));
                true
            }
        }
    }

    /// Drops a live job out of order.
    pub fn discard(&mut self, job_name: &str) -> Option<JobGraph> {
        self.jobs.remove(job_name).map(|(_, job)| job)
    }

    /// Removes the oldest live job when the live count exceeds the capacity.
    pub fn evict_overflow(&mut self) -> Option<JobGraph> {
        if self.jobs.len() > self.capacity {
            self.pop_oldest()
        } else {
            None
        }
    }

    /// Removes the oldest live job.
    pub fn pop_oldest(&mut self) -> Option<JobGraph> {
        while let Some((sequence, job_name)) = self.order.pop_front() {
            let is_live = self
                .jobs
                .get(job_name.as_str())
                .map(|(live_sequence, _)| *live_sequence == sequence)
                .unwrap_or(false);
            if is_live {
                return self.jobs.remove(job_name.as_str()).map(|(_, job)| job);
            }
        }
        None
    }

    /// Empties the window, oldest job first.
    pub fn drain(&mut self) -> Drain<'_> {
        Drain { window: self }
    }
}

pub struct Drain<'a> {
    window: &'a mut JobWindow,
}

impl<'a> Iterator for Drain<'a> {
    type Item = JobGraph;

    fn next(&mut self) -> Option<Self::Item> {
        self.window.pop_oldest()
    }
}

#[cfg(test)]
mod tests {
    use crate::dag::job_graph::tests::record;
    use crate::storage::JobWindow;

    #[test]
    pub fn admit_test() {
        let mut window = JobWindow::new(10);
        assert!(window.admit(&record("J1", "M1", "i1_1", 10, 20)));
        assert!(!window.admit(&record("J1", "R2_1", "i2_1", 5, 30)));
        assert!(window.admit(&record("J2", "M1", "i1_1", 12, 20)));

        assert_eq!(window.len(), 2);
        let job = window.get("J1").unwrap();
        assert_eq!(job.task_count(), 2);
        assert_eq!(job.submitted_time(), 5);
        assert_eq!(window.evict_overflow().map(|j| j.name().to_string()), None);
    }

    #[test]
    pub fn fifo_eviction_test() {
        let mut window = JobWindow::new(2);
        window.admit(&record("J1", "M1", "i1_1", 10, 20));
        window.admit(&record("J2", "M1", "i1_1", 11, 20));
        assert!(window.evict_overflow().is_none());

        window.admit(&record("J3", "M1", "i1_1", 12, 20));
        let evicted = window.evict_overflow().unwrap();
        assert_eq!(evicted.name(), "J1");
        assert!(window.evict_overflow().is_none());
        assert!(!window.contains("J1"));
        assert!(window.contains("J2"));
        assert!(window.contains("J3"));
    }

    #[test]
    pub fn discard_test() {
        let mut window = JobWindow::new(1);
        window.admit(&record("J1", "M1", "i1_1", 10, 20));
        window.admit(&record("J2", "M1", "i1_1", 11, 20));
        assert!(window.discard("J1").is_some());
        assert!(window.discard("J1").is_none());

        // the stale J1 entry is skipped
        assert!(window.evict_overflow().is_none());
        window.admit(&record("J3", "M1", "i1_1", 12, 20));
        assert_eq!(window.evict_overflow().unwrap().name(), "J2");
    }

    #[test]
    pub fn readmit_after_discard_test() {
        let mut window = JobWindow::new(10);
        window.admit(&record("J1", "M1", "i1_1", 10, 20));
        window.admit(&record("J2", "M1", "i1_1", 11, 20));
        window.discard("J1");
        window.admit(&record("J1", "M1", "i1_1", 12, 20));

        let names: Vec<String> = window.drain().map(|j| j.name().to_string()).collect();
        assert_eq!(names, vec!["J2".to_string(), "J1".to_string()]);
        assert!(window.is_empty());
    }
}
