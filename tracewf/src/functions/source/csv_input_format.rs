use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::api::element::TraceRow;
use crate::api::function::{InputFormat, NamedFunction};
use crate::api::ConvertError;

/// Reads the headerless, comma separated instance trace line by line.
///
/// Blank lines are skipped. A malformed line ends the stream with a
/// [`ConvertError::Parse`] carrying its 1-based line number.
pub struct CsvInputFormat<R: BufRead> {
    name: String,
    reader: Option<R>,
    line_number: u64,
    buffer: String,
}

impl CsvInputFormat<BufReader<File>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> crate::api::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Ok(CsvInputFormat::new(
            path.display().to_string(),
            BufReader::new(file),
        ))
    }
}

impl<R: BufRead> CsvInputFormat<R> {
    pub fn new(name: String, reader: R) -> Self {
        CsvInputFormat {
            name,
            reader: Some(reader),
            line_number: 0,
            buffer: String::new(),
        }
    }

    pub fn line_number(&self) -> u64 {
        self.line_number
    }
}

impl<R: BufRead> NamedFunction for CsvInputFormat<R> {
    fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl<R: BufRead> InputFormat for CsvInputFormat<R> {
    fn open(&mut self) -> crate::api::Result<()> {
        info!("open trace `{}`", self.name);
        Ok(())
    }

    fn next_row(&mut self) -> Option<crate::api::Result<TraceRow>> {
        loop {
            let reader = self.reader.as_mut()?;
            self.buffer.clear();
            match reader.read_line(&mut self.buffer) {
                Ok(0) => {
                    self.reader = None;
                    return None;
                }
                Ok(_) => {
                    self.line_number += 1;
                    let line = self.buffer.trim_end_matches(&['\r', '\n'][..]);
                    if line.trim().is_empty() {
                        continue;
                    }

                    let row = TraceRow::parse_line(line)
                        .map_err(|message| ConvertError::parse(self.line_number, message));
                    if row.is_err() {
                        self.reader = None;
                    }
                    return Some(row);
                }
                Err(e) => {
                    self.reader = None;
                    return Some(Err(e.into()));
                }
            }
        }
    }

    fn close(&mut self) -> crate::api::Result<()> {
        self.reader = None;
        debug!("close trace `{}` at line {}", self.name, self.line_number);
        Ok(())
    }
}
