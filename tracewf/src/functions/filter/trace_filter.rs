use std::convert::TryFrom;

use crate::api::element::{TaskRecord, TraceRow};
use crate::api::function::{FilterFunction, NamedFunction, RejectReason, Verdict};
use crate::api::properties::{ConverterConfig, WindowBounds};
use crate::utils::parse_host_id;

/// Admission predicates in evaluation order: time window, host range, task
/// status.
#[derive(Clone, Debug)]
pub struct TraceFilter {
    bounds: WindowBounds,
    max_num_machine: i64,
    accepted_status: String,
}

impl TraceFilter {
    pub fn new(bounds: WindowBounds, max_num_machine: i64, accepted_status: &str) -> Self {
        TraceFilter {
            bounds,
            max_num_machine,
            accepted_status: accepted_status.to_string(),
        }
    }

    pub fn bounds(&self) -> &WindowBounds {
        &self.bounds
    }
}

impl FilterFunction for TraceFilter {
    fn filter(&self, row: &TraceRow) -> Verdict {
        if !self.bounds.contains(row.start_time) {
            return Verdict::Reject(RejectReason::OutOfWindow);
        }

        let host = match parse_host_id(&row.machine_id) {
            Some(host) => host,
            None => return Verdict::Reject(RejectReason::MalformedMachineId),
        };
        if host >= self.max_num_machine {
            return Verdict::Reject(RejectReason::HostOutOfRange);
        }

        if row.status != self.accepted_status {
            return Verdict::Reject(RejectReason::Status);
        }

        Verdict::Admit(TaskRecord {
            job_name: row.job_name.clone(),
            task_name: row.task_name.clone(),
            // instance names repeat across the full trace
            instance_id: format!("{}_{}", row.instance_name, row.sequence_number),
            start_time: self.bounds.shift(row.start_time),
            end_time: self.bounds.shift(row.end_time),
            avg_cpu: row.avg_cpu,
            avg_mem: row.avg_mem,
            host,
        })
    }
}

impl NamedFunction for TraceFilter {
    fn name(&self) -> &str {
        "TraceFilter"
    }
}

impl TryFrom<&ConverterConfig> for TraceFilter {
    type Error = crate::api::ConvertError;

    fn try_from(config: &ConverterConfig) -> Result<Self, Self::Error> {
        config.validate()?;
        Ok(TraceFilter::new(
            config.window_bounds(),
            config.max_num_machine,
            config.accepted_status.as_str(),
        ))
    }
}
