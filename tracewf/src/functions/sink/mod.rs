pub mod json_output_format;
pub mod memory_output_format;

pub use json_output_format::{json_file_sink, JsonFileOutputFormat};
pub use memory_output_format::MemoryOutputFormat;
