use std::str::FromStr;

/// Number of columns of one instance trace line.
pub const TRACE_COLUMNS: usize = 14;

/// One line of the task-instance trace. Immutable once parsed.
///
/// Column order: instance_name, task_name, job_name, task_type, status,
/// start_time, end_time, machine_id, sequence_number, total_sequence_number,
/// avg_cpu, max_cpu, avg_mem, max_mem.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraceRow {
    pub instance_name: String,
    pub task_name: String,
    pub job_name: String,
    pub task_type: String,
    pub status: String,
    pub start_time: i64,
    pub end_time: i64,
    pub machine_id: String,
    pub sequence_number: i64,
    pub total_sequence_number: i64,
    pub avg_cpu: f64,
    pub max_cpu: f64,
    pub avg_mem: f64,
    pub max_mem: f64,
}

impl TraceRow {
    /// Builds a row from already tokenized fields. The error is a message
    /// without line context; the row source attaches the line number.
    pub fn from_fields(fields: &[&str]) -> Result<Self, String> {
        if fields.len() != TRACE_COLUMNS {
            return Err(format!(
                "expected {} columns, found {}",
                TRACE_COLUMNS,
                fields.len()
            ));
        }

        Ok(TraceRow {
            instance_name: fields[0].to_string(),
            task_name: fields[1].to_string(),
            job_name: fields[2].to_string(),
            task_type: fields[3].to_string(),
            status: fields[4].to_string(),
            start_time: parse_field(fields, 5, "start_time")?,
            end_time: parse_field(fields, 6, "end_time")?,
            machine_id: fields[7].to_string(),
            sequence_number: parse_field(fields, 8, "sequence_number")?,
            total_sequence_number: parse_field(fields, 9, "total_sequence_number")?,
            avg_cpu: parse_field(fields, 10, "avg_cpu")?,
            max_cpu: parse_field(fields, 11, "max_cpu")?,
            avg_mem: parse_field(fields, 12, "avg_mem")?,
            max_mem: parse_field(fields, 13, "max_mem")?,
        })
    }

    pub fn parse_line(line: &str) -> Result<Self, String> {
        let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();
        TraceRow::from_fields(fields.as_slice())
    }
}

/// An admitted row as forwarded to the job accumulator: instance id made
/// unique, timestamps shifted to the window start, host id resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub job_name: String,
    pub task_name: String,
    pub instance_id: String,
    pub start_time: i64,
    pub end_time: i64,
    pub avg_cpu: f64,
    pub avg_mem: f64,
    pub host: i64,
}

fn parse_field<T>(fields: &[&str], index: usize, name: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    fields[index]
        .parse::<T>()
        .map_err(|e| format!("column `{}` ({:?}): {}", name, fields[index], e))
}

#[cfg(test)]
mod tests {
    use super::TraceRow;

    #[test]
    pub fn parse_line_test() {
        let row = TraceRow::parse_line(
            "ins_1,M2_1,j_7,1,Terminated,157213,157229,m_1932,1,1,13,16,0.02,0.02",
        )
        .unwrap();

        assert_eq!(row.instance_name, "ins_1");
        assert_eq!(row.task_name, "M2_1");
        assert_eq!(row.job_name, "j_7");
        assert_eq!(row.status, "Terminated");
        assert_eq!(row.start_time, 157213);
        assert_eq!(row.end_time, 157229);
        assert_eq!(row.machine_id, "m_1932");
        assert_eq!(row.sequence_number, 1);
        assert_eq!(row.avg_cpu, 13.0);
        assert_eq!(row.avg_mem, 0.02);
    }

    #[test]
    pub fn parse_line_column_count_test() {
        let err = TraceRow::parse_line("ins_1,M2_1,j_7").unwrap_err();
        assert!(err.contains("expected 14 columns"), "{}", err);
    }

    #[test]
    pub fn parse_line_bad_number_test() {
        let err = TraceRow::parse_line(
            "ins_1,M2_1,j_7,1,Terminated,abc,157229,m_1932,1,1,13,16,0.02,0.02",
        )
        .unwrap_err();
        assert!(err.contains("start_time"), "{}", err);
    }
}
