pub mod csv_input_format;
pub mod vec_input_format;

pub use csv_input_format::CsvInputFormat;
pub use vec_input_format::{vec_source, VecInputFormat};
