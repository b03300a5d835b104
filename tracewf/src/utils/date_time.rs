use chrono::{DateTime, Local, Utc};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Format of the `createdAt` document field.
pub const FMT_CREATED_AT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// current timestamp
pub fn current_timestamp() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
}

/// format timestamp to string
pub fn fmt_date_time(dur: Duration, fmt: &str) -> String {
    let utl_dt: DateTime<Utc> = (UNIX_EPOCH + dur).into();
    let local_dt = utl_dt.with_timezone(&Local);
    local_dt.format(fmt).to_string()
}

pub fn created_at_now() -> String {
    fmt_date_time(current_timestamp(), FMT_CREATED_AT)
}

#[cfg(test)]
mod tests {
    use crate::utils::date_time::created_at_now;

    #[test]
    pub fn created_at_now_test() {
        let s = created_at_now();
        // 2024-05-01T10:11:12+0200
        assert_eq!(s.len(), 24, "{}", s);
        assert_eq!(&s[4..5], "-");
        assert_eq!(&s[10..11], "T");
    }
}
