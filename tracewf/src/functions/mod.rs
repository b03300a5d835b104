pub mod file_size;
pub mod filter;
pub mod sink;
pub mod source;
