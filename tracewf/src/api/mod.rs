pub mod document;
pub mod element;
pub mod error;
pub mod function;
pub mod properties;

pub use error::{ConvertError, Result};
