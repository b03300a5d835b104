pub mod date_time;
pub mod hash;
pub mod task_name;

pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

/// Static host id of a machine: the trailing `_`-separated token of
/// `machine_id`, which the trace numbers from 1, moved to zero based.
///
/// Returns `None` when the suffix is not a number or names machine 0.
pub fn parse_host_id(machine_id: &str) -> Option<i64> {
    let suffix = machine_id.rsplit('_').next()?;
    let number = suffix.trim().parse::<i64>().ok()?;
    if number < 1 {
        return None;
    }
    Some(number - 1)
}
