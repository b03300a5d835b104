use crate::api::function::RejectReason;

/// Counters of one converter run.
///
/// `jobs_created == jobs_emitted + jobs_timed_out + jobs_cyclic + jobs_discarded`
/// once the run has finished.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub rows_read: u64,
    pub rows_admitted: u64,
    pub rows_rejected_window: u64,
    pub rows_rejected_host: u64,
    pub rows_rejected_status: u64,
    pub rows_rejected_machine_id: u64,
    /// rows of a job excluded earlier
    pub rows_discarded_excluded: u64,
    /// rows of a job already finalized
    pub rows_late: u64,

    pub jobs_created: u64,
    pub jobs_excluded: u64,
    pub jobs_emitted: u64,
    pub jobs_timed_out: u64,
    pub jobs_cyclic: u64,
    /// partial jobs dropped on exclusion
    pub jobs_discarded: u64,
    pub max_live_jobs: u64,
}

impl RunStats {
    pub(crate) fn reject(&mut self, reason: RejectReason) {
        match reason {
            RejectReason::OutOfWindow => self.rows_rejected_window += 1,
            RejectReason::HostOutOfRange => self.rows_rejected_host += 1,
            RejectReason::Status => self.rows_rejected_status += 1,
            RejectReason::MalformedMachineId => self.rows_rejected_machine_id += 1,
        }
    }

    pub fn rows_rejected(&self) -> u64 {
        self.rows_rejected_window
            + self.rows_rejected_host
            + self.rows_rejected_status
            + self.rows_rejected_machine_id
    }

    pub fn jobs_closed(&self) -> u64 {
        self.jobs_emitted + self.jobs_timed_out + self.jobs_cyclic + self.jobs_discarded
    }
}
