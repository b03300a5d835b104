//! Deterministic sizes for the synthetic files of a linked job.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::api::properties::SECONDS_PER_HOUR;
use crate::dag::export::executed_at;
use crate::dag::{File, JobGraph};
use crate::utils::hash::seed_of;

const DEFAULT_INTERCEPT: f64 = 1_255_000_000.0;
const DEFAULT_SLOPE: f64 = -99_000_000.0;

/// How file sizes are derived. Every policy is a pure function of the job,
/// so repeated runs over the same trace give the same sizes. Sizes are
/// clamped at 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum FileSizePolicy {
    /// `intercept + slope * x`, `x` the submission offset inside its hour
    /// bucket, in hours. One size for every file of the job.
    SubmissionTime { intercept: f64, slope: f64 },
    /// `intercept + slope * x`, `x` the runtime in seconds of the producing
    /// task (output files) or of the consuming entry task (input files).
    TaskRuntime { intercept: f64, slope: f64 },
    /// Base drawn from `[min, max)` seeded by the job name, plus a per-file
    /// draw from `[-jitter, jitter]` seeded by the file id, plus
    /// `slope * producer runtime`.
    Seeded {
        min: f64,
        max: f64,
        jitter: f64,
        slope: f64,
    },
}

impl Default for FileSizePolicy {
    fn default() -> Self {
        FileSizePolicy::SubmissionTime {
            intercept: DEFAULT_INTERCEPT,
            slope: DEFAULT_SLOPE,
        }
    }
}

impl FileSizePolicy {
    pub fn task_runtime() -> Self {
        FileSizePolicy::TaskRuntime {
            intercept: DEFAULT_INTERCEPT,
            slope: DEFAULT_SLOPE,
        }
    }

    /// Assigns a size to every file of `job`. Called once, after a
    /// successful link.
    pub fn synthesize(&self, job: &mut JobGraph) {
        let sizes: Vec<f64> = job.files().map(|file| self.size_of(job, file)).collect();
        for (file, size) in job.files_mut().zip(sizes) {
            file.size = Some(size);
        }
    }

    pub fn size_of(&self, job: &JobGraph, file: &File) -> f64 {
        let size = match self {
            FileSizePolicy::SubmissionTime { intercept, slope } => {
                let hours = executed_at(job.submitted_time()) as f64 / SECONDS_PER_HOUR as f64;
                intercept + slope * hours
            }
            FileSizePolicy::TaskRuntime { intercept, slope } => {
                intercept + slope * task_runtime_of(job, file)
            }
            FileSizePolicy::Seeded {
                min,
                max,
                jitter,
                slope,
            } => {
                let base = draw(seed_of(job.name()), *min, *max);
                let noise = draw(seed_of(file.id.as_str()), -jitter.abs(), jitter.abs());
                base + noise + slope * producer_runtime(job, file)
            }
        };

        if size.is_finite() {
            size.max(0.0)
        } else {
            0.0
        }
    }
}

fn draw(seed: u64, low: f64, high: f64) -> f64 {
    if !(low < high) {
        return low;
    }
    let mut rng = StdRng::seed_from_u64(seed);
    rng.gen_range(low..high)
}

fn producer_runtime(job: &JobGraph, file: &File) -> f64 {
    file.producer
        .as_deref()
        .and_then(|task_id| job.task(task_id))
        .map(|task| task.runtime)
        .unwrap_or(0.0)
}

/// Runtime of the producer, or of the first consumer for files nobody
/// produces (entry task inputs).
fn task_runtime_of(job: &JobGraph, file: &File) -> f64 {
    match &file.producer {
        Some(_) => producer_runtime(job, file),
        None => file
            .consumers
            .iter()
            .next()
            .and_then(|task_id| job.task(task_id))
            .map(|task| task.runtime)
            .unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use crate::dag::job_graph::tests::job_of;
    use crate::dag::linker::{link, LinkOptions};
    use crate::dag::JobGraph;
    use crate::functions::file_size::FileSizePolicy;

    fn linked(name: &str) -> JobGraph {
        let mut job = job_of(name, &[("Maa", "i1_1"), ("Mab_aa", "i2_1")]);
        link(&mut job, &LinkOptions::default()).unwrap();
        job
    }

    fn sizes(job: &JobGraph) -> Vec<(String, f64)> {
        job.files()
            .map(|f| (f.id.clone(), f.size.unwrap()))
            .collect()
    }

    #[test]
    pub fn every_file_sized_test() {
        for policy in [
            FileSizePolicy::default(),
            FileSizePolicy::task_runtime(),
            FileSizePolicy::Seeded {
                min: 1000.0,
                max: 2000.0,
                jitter: 10.0,
                slope: 1.0,
            },
        ] {
            let mut job = linked("J1");
            policy.synthesize(&mut job);
            assert_eq!(job.files().count(), 3);
            for file in job.files() {
                let size = file.size.unwrap();
                assert!(size >= 0.0, "{:?} {} {}", policy, file.id, size);
            }
        }
    }

    #[test]
    pub fn submission_time_test() {
        // job_of submits at t = 100
        let mut job = linked("J1");
        FileSizePolicy::SubmissionTime {
            intercept: 3600.0,
            slope: 36.0,
        }
        .synthesize(&mut job);

        for (_, size) in sizes(&job) {
            assert!((size - 3601.0).abs() < 1e-9, "{}", size);
        }
    }

    #[test]
    pub fn task_runtime_clamped_test() {
        let mut job = linked("J1");
        FileSizePolicy::TaskRuntime {
            intercept: 5.0,
            slope: -1.0,
        }
        .synthesize(&mut job);

        // runtime 10 for every task: 5 - 10 clamps to 0
        for (_, size) in sizes(&job) {
            assert_eq!(size, 0.0);
        }
    }

    #[test]
    pub fn seeded_deterministic_test() {
        let policy = FileSizePolicy::Seeded {
            min: 1000.0,
            max: 2000.0,
            jitter: 50.0,
            slope: 0.0,
        };

        let mut first = linked("J1");
        let mut second = linked("J1");
        policy.synthesize(&mut first);
        policy.synthesize(&mut second);
        assert_eq!(sizes(&first), sizes(&second));

        for (_, size) in sizes(&first) {
            assert!(size >= 950.0 && size < 2050.0, "{}", size);
        }

        let mut other = linked("J2");
        policy.synthesize(&mut other);
        let other_sizes: Vec<f64> = sizes(&other).into_iter().map(|(_, s)| s).collect();
        let first_sizes: Vec<f64> = sizes(&first).into_iter().map(|(_, s)| s).collect();
        assert_ne!(other_sizes, first_sizes);
    }
}
