use std::collections::BTreeMap;
use std::io::Write;

use crate::api::element::TraceRow;
use crate::api::function::InputFormat;
use crate::api::properties::SECONDS_PER_HOUR;
use crate::utils::task_name;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HourCount {
    pub rows: u64,
    /// rows whose task name carries a dependency encoding
    pub dependent_rows: u64,
}

/// Unfiltered per-hour row counts of a trace, keyed by
/// `floor(start_time / 3600)`.
#[derive(Clone, Debug, Default)]
pub struct TaskCounter {
    hours: BTreeMap<i64, HourCount>,
}

impl TaskCounter {
    pub fn new() -> Self {
        TaskCounter::default()
    }

    pub fn observe(&mut self, row: &TraceRow) {
        let hour = row.start_time.div_euclid(SECONDS_PER_HOUR);
        let count = self.hours.entry(hour).or_default();
        count.rows += 1;
        if task_name::is_encoded(&row.task_name) {
            count.dependent_rows += 1;
        }
    }

    pub fn hours(&self) -> &BTreeMap<i64, HourCount> {
        &self.hours
    }

    /// Writes `hour,rows,dependent_rows` lines in ascending hour order.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> crate::api::Result<()> {
        for (hour, count) in &self.hours {
            writeln!(writer, "{},{},{}", hour, count.rows, count.dependent_rows)?;
        }
        writer.flush()?;
        Ok(())
    }
}

pub fn count_tasks<I: InputFormat>(input: &mut I) -> crate::api::Result<TaskCounter> {
    let mut counter = TaskCounter::new();
    input.open()?;
    while let Some(row) = input.next_row() {
        counter.observe(&row?);
    }
    input.close()?;

    info!("{} hours counted", counter.hours.len());
    Ok(counter)
}
