use std::vec::IntoIter;

use crate::api::element::TraceRow;
use crate::api::function::{InputFormat, NamedFunction};

pub fn vec_source(rows: Vec<TraceRow>) -> VecInputFormat {
    VecInputFormat::new(rows)
}

/// Yields rows from memory, in vector order.
pub struct VecInputFormat {
    rows: Option<Vec<TraceRow>>,
    iter: Option<IntoIter<TraceRow>>,
}

impl VecInputFormat {
    pub fn new(rows: Vec<TraceRow>) -> Self {
        VecInputFormat {
            rows: Some(rows),
            iter: None,
        }
    }
}

impl NamedFunction for VecInputFormat {
    fn name(&self) -> &str {
        "VecInputFormat"
    }
}

impl InputFormat for VecInputFormat {
    fn open(&mut self) -> crate::api::Result<()> {
        if let Some(rows) = self.rows.take() {
            self.iter = Some(rows.into_iter());
        }
        Ok(())
    }

    fn next_row(&mut self) -> Option<crate::api::Result<TraceRow>> {
        if self.iter.is_none() {
            self.open().ok()?;
        }
        self.iter.as_mut()?.next().map(Ok)
    }

    fn close(&mut self) -> crate::api::Result<()> {
        self.iter = None;
        Ok(())
    }
}
