use std::collections::HashSet;
use std::convert::TryFrom;

use crate::api::element::TraceRow;
use crate::api::function::{FilterFunction, InputFormat, OutputFormat, Verdict};
use crate::api::properties::ConverterConfig;
use crate::dag::linker::{link, LinkOptions, LinkResult};
use crate::dag::JobGraph;
use crate::functions::filter::TraceFilter;
use crate::runtime::stats::RunStats;
use crate::storage::JobWindow;
use crate::utils::date_time::created_at_now;

/// One sequential pass over a trace: rows are filtered and accumulated per
/// job; a job is linked, sized and written when it is evicted from the
/// window or when the stream ends.
pub struct ConverterRun<O: OutputFormat> {
    config: ConverterConfig,
    filter: TraceFilter,
    link_options: LinkOptions,

    window: JobWindow,
    /// jobs refused by the filter
    excluded: HashSet<String>,
    /// jobs already finalized
    closed: HashSet<String>,

    output: O,
    output_opened: bool,
    stats: RunStats,
}

impl<O: OutputFormat> ConverterRun<O> {
    pub fn new(config: ConverterConfig, output: O) -> crate::api::Result<Self> {
        let filter = TraceFilter::try_from(&config)?;
        let link_options = config.link_options();
        let window = JobWindow::new(config.dump_interval);

        Ok(ConverterRun {
            config,
            filter,
            link_options,
            window,
            excluded: HashSet::new(),
            closed: HashSet::new(),
            output,
            output_opened: false,
            stats: RunStats::default(),
        })
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn live_jobs(&self) -> usize {
        self.window.len()
    }

    /// Consumes every row of `input`. Jobs still live afterwards are
    /// finalized by [`ConverterRun::finish`].
    pub fn run<I: InputFormat>(&mut self, input: &mut I) -> crate::api::Result<()> {
        let bounds = self.filter.bounds();
        info!(
            "convert `{}`: window [{}, {}), link budget {:?}, dump interval {}",
            input.name(),
            bounds.start(),
            bounds.end(),
            self.link_options.time_budget,
            self.window.capacity()
        );

        self.open_output()?;
        input.open()?;
        while let Some(row) = input.next_row() {
            let row = row?;
            self.process_row(&row)?;
        }
        input.close()
    }

    pub fn process_row(&mut self, row: &TraceRow) -> crate::api::Result<()> {
        self.open_output()?;
        self.stats.rows_read += 1;
        self.report_progress();

        let job_name = row.job_name.as_str();
        if self.excluded.contains(job_name) {
            self.stats.rows_discarded_excluded += 1;
            return Ok(());
        }
        if self.closed.contains(job_name) {
            self.stats.rows_late += 1;
            return Ok(());
        }

        match self.filter.filter(row) {
            Verdict::Reject(reason) => {
                debug!("exclude job {}: {:?}", job_name, reason);
                self.stats.reject(reason);
                self.stats.jobs_excluded += 1;
                self.excluded.insert(row.job_name.clone());
                if self.window.discard(job_name).is_some() {
                    self.stats.jobs_discarded += 1;
                }
            }
            Verdict::Admit(record) => {
                self.stats.rows_admitted += 1;
                if self.window.admit(&record) {
                    self.stats.jobs_created += 1;
                    if let Some(job) = self.window.evict_overflow() {
                        self.finalize(job)?;
                    }
                    self.stats.max_live_jobs =
                        self.stats.max_live_jobs.max(self.window.len() as u64);
                }
            }
        }

        Ok(())
    }

    /// Drains the remaining jobs oldest first and closes the output.
    pub fn finish(mut self) -> crate::api::Result<(RunStats, O)> {
        self.open_output()?;
        let remaining: Vec<JobGraph> = self.window.drain().collect();
        for job in remaining {
            self.finalize(job)?;
        }
        self.output.close()?;

        info!(
            "run finished: {}",
            serde_json::to_string(&self.stats).unwrap_or_default()
        );
        Ok((self.stats, self.output))
    }

    fn finalize(&mut self, mut job: JobGraph) -> crate::api::Result<()> {
        self.closed.insert(job.name().to_string());

        match link(&mut job, &self.link_options)? {
            LinkResult::Success => {
                self.config.file_size.synthesize(&mut job);
                let workflow = job.to_workflow(&self.config.author, created_at_now())?;
                self.output.write_workflow(workflow)?;
                self.stats.jobs_emitted += 1;
            }
            LinkResult::TimedOut { elapsed } => {
                warn!(
                    "job {} dropped: linking {} tasks timed out after {:?}",
                    job.name(),
                    job.task_count(),
                    elapsed
                );
                self.stats.jobs_timed_out += 1;
            }
            LinkResult::Cyclic { parent, child } => {
                warn!(
                    "job {} dropped: cyclic dependency {} -> {}",
                    job.name(),
                    parent,
                    child
                );
                self.stats.jobs_cyclic += 1;
            }
        }
        Ok(())
    }

    fn open_output(&mut self) -> crate::api::Result<()> {
        if !self.output_opened {
            self.output.open()?;
            self.output_opened = true;
        }
        Ok(())
    }

    fn report_progress(&self) {
        let interval = self.config.progress_interval;
        if interval > 0 && self.stats.rows_read % interval == 0 {
            info!(
                "{} rows read, {} live jobs, {} jobs emitted",
                self.stats.rows_read,
                self.window.len(),
                self.stats.jobs_emitted
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::api::document::WorkflowDocument;
    use crate::api::element::TraceRow;
    use crate::api::properties::ConverterConfig;
    use crate::functions::filter::trace_filter::tests::row;
    use crate::functions::sink::MemoryOutputFormat;
    use crate::functions::source::vec_source;
    use crate::runtime::converter::ConverterRun;
    use crate::runtime::stats::RunStats;

    fn config(dump_interval: usize) -> ConverterConfig {
        ConverterConfig {
            dump_interval,
            duration_hours: 1,
            ..ConverterConfig::default()
        }
    }

    fn convert(config: ConverterConfig, rows: Vec<TraceRow>) -> (RunStats, MemoryOutputFormat) {
        let mut run = ConverterRun::new(config, MemoryOutputFormat::new()).unwrap();
        run.run(&mut vec_source(rows)).unwrap();
        let (stats, output) = run.finish().unwrap();
        assert_eq!(stats.jobs_created, stats.jobs_closed());
        (stats, output)
    }

    #[test]
    pub fn two_task_job_test() {
        let (stats, output) = convert(
            config(10),
            vec![
                row("i1", "Maa", "J1", 10, 20, "m_1"),
                row("i2", "Mab_aa", "J1", 25, 40, "m_2"),
            ],
        );
        assert_eq!(stats.jobs_emitted, 1);
        assert_eq!(output.workflows().len(), 1);

        let workflow = &output.workflows()[0];
        assert_eq!(workflow.hour_bucket, 0);
        let jobs = &workflow.document.workflow.jobs;
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].name, "i1_1");
        assert!(jobs[0].parents.is_empty());
        assert_eq!(jobs[0].files.len(), 2);
        assert_eq!(jobs[0].files[0].name, "i1_1_input");
        assert_eq!(jobs[0].machine, "0");
        assert_eq!(jobs[1].name, "i2_1");
        assert_eq!(jobs[1].parents, vec!["i1_1".to_string()]);
        assert_eq!(jobs[1].runtime, 15.0);
        assert_eq!(jobs[1].machine, "1");
        assert_eq!(workflow.document.workflow.executed_at, 10);
    }

    #[test]
    pub fn windowing_order_test() {
        let (stats, output) = convert(
            config(2),
            vec![
                row("i1", "M1", "J1", 10, 20, "m_1"),
                row("i1", "M1", "J2", 11, 20, "m_1"),
                row("i1", "M1", "J3", 12, 20, "m_1"),
            ],
        );
        assert_eq!(output.names(), vec!["J1", "J2", "J3"]);
        assert_eq!(stats.max_live_jobs, 2);
    }

    #[test]
    pub fn eviction_before_end_of_stream_test() {
        let mut run = ConverterRun::new(config(2), MemoryOutputFormat::new()).unwrap();
        run.process_row(&row("i1", "M1", "J1", 10, 20, "m_1")).unwrap();
        run.process_row(&row("i1", "M1", "J2", 11, 20, "m_1")).unwrap();
        assert_eq!(run.stats().jobs_emitted, 0);

        run.process_row(&row("i1", "M1", "J3", 12, 20, "m_1")).unwrap();
        assert_eq!(run.stats().jobs_emitted, 1);
        assert_eq!(run.live_jobs(), 2);

        // J1 is closed; a late row neither re-opens nor re-emits it
        run.process_row(&row("i2", "M2", "J1", 13, 20, "m_1")).unwrap();
        assert_eq!(run.stats().rows_late, 1);
        assert_eq!(run.live_jobs(), 2);

        let (stats, output) = run.finish().unwrap();
        assert_eq!(output.names(), vec!["J1", "J2", "J3"]);
        assert_eq!(output.workflows()[0].document.workflow.jobs.len(), 1);
        assert_eq!(stats.jobs_emitted, 3);
    }

    #[test]
    pub fn sticky_exclusion_test() {
        let mut failed = row("i3", "M3", "J1", 30, 40, "m_1");
        failed.status = "Failed".to_string();

        let (stats, output) = convert(
            config(10),
            vec![
                row("i1", "M1", "J1", 10, 20, "m_1"),
                row("i1", "M1", "J2", 10, 20, "m_1"),
                failed,
                row("i4", "M4", "J1", 30, 40, "m_1"),
                row("i1", "M1", "J3", 10, 20, "m_9999"),
                row("i1", "M1", "J4", 4000, 4100, "m_1"),
                row("i1", "M1", "J5", 10, 20, "m_x"),
            ],
        );

        assert_eq!(output.names(), vec!["J2"]);
        assert_eq!(stats.rows_read, 7);
        assert_eq!(stats.rows_admitted, 2);
        assert_eq!(stats.rows_rejected_status, 1);
        assert_eq!(stats.rows_rejected_host, 1);
        assert_eq!(stats.rows_rejected_window, 1);
        assert_eq!(stats.rows_rejected_machine_id, 1);
        assert_eq!(stats.rows_discarded_excluded, 1);
        assert_eq!(stats.jobs_created, 2);
        assert_eq!(stats.jobs_excluded, 4);
        assert_eq!(stats.jobs_discarded, 1);
        assert_eq!(stats.jobs_emitted, 1);
    }

    #[test]
    pub fn time_out_test() {
        let config = ConverterConfig {
            link_time_budget_secs: 0.0,
            ..config(10)
        };
        assert_eq!(config.link_options().time_budget, Duration::ZERO);

        let (stats, output) = convert(
            config,
            vec![
                row("i1", "Maa", "J1", 10, 20, "m_1"),
                row("i2", "Mab_aa", "J1", 25, 40, "m_1"),
                row("i1", "M1", "J2", 10, 20, "m_1"),
            ],
        );
        // J2 has no dependency pairs to meter
        assert_eq!(output.names(), vec!["J2"]);
        assert_eq!(stats.jobs_timed_out, 1);
        assert_eq!(stats.jobs_emitted, 1);
    }

    #[test]
    pub fn cyclic_job_test() {
        let (stats, output) = convert(
            config(10),
            vec![
                row("i1", "Maa_ab", "J1", 10, 20, "m_1"),
                row("i2", "Mab_aa", "J1", 25, 40, "m_1"),
            ],
        );
        assert!(output.workflows().is_empty());
        assert_eq!(stats.jobs_cyclic, 1);
    }

    #[test]
    pub fn deterministic_test() {
        let rows = vec![
            row("i1", "Maa", "J1", 10, 20, "m_1"),
            row("i1", "Maa", "J2", 50, 70, "m_3"),
            row("i2", "Mab_aa", "J1", 25, 40, "m_2"),
            row("i2", "Mab_aa", "J2", 75, 90, "m_3"),
            row("i3", "Mac_aa_ab", "J1", 45, 60, "m_2"),
        ];

        let documents = |rows: Vec<TraceRow>| -> Vec<WorkflowDocument> {
            let (_, output) = convert(config(1), rows);
            output
                .workflows()
                .iter()
                .map(|w| w.document.without_created_at())
                .collect()
        };

        let first = documents(rows.clone());
        let second = documents(rows);
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }
}
