pub mod trace_filter;

pub use trace_filter::TraceFilter;
