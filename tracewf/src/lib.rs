//! Converts a flat cluster task-instance trace into per-job DAG workflow
//! documents.
//!
//! rows -> [`functions::filter::TraceFilter`] -> [`storage::job_window::JobWindow`]
//! -> (eviction / end of stream) -> [`dag::linker`] -> [`functions::file_size`]
//! -> [`api::function::OutputFormat`]

#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;

pub mod api;
pub mod dag;
pub mod functions;
pub mod runtime;
pub mod storage;
pub mod utils;
