use crate::api::document::EmittedWorkflow;
use crate::api::element::{TaskRecord, TraceRow};

/// Base of every pluggable stage of a converter run.
pub trait NamedFunction {
    fn name(&self) -> &str;
}

/// The base interface for row sources. Rows are yielded in file order.
///
/// `next_row` returns `None` at end of stream and `Some(Err(_))` for a line
/// that violates the row schema, which is fatal for the run.
pub trait InputFormat
where
    Self: NamedFunction,
{
    fn open(&mut self) -> crate::api::Result<()>;
    fn next_row(&mut self) -> Option<crate::api::Result<TraceRow>>;
    fn close(&mut self) -> crate::api::Result<()>;
}

/// Why a row was refused. The owning job is excluded for the rest of the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectReason {
    OutOfWindow,
    HostOutOfRange,
    Status,
    MalformedMachineId,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    Admit(TaskRecord),
    Reject(RejectReason),
}

/// Row-level admission predicate. Implementations are stateless; the sticky
/// per-job exclusion is kept by the caller.
pub trait FilterFunction
where
    Self: NamedFunction,
{
    fn filter(&self, row: &TraceRow) -> Verdict;
}

/// Receives finalized workflow documents. A failed write aborts the run.
pub trait OutputFormat
where
    Self: NamedFunction,
{
    fn open(&mut self) -> crate::api::Result<()>;

    fn write_workflow(&mut self, workflow: EmittedWorkflow) -> crate::api::Result<()>;

    fn close(&mut self) -> crate::api::Result<()>;
}
