//! Where finished rows go. The walker only needs [`ResultSink::append`];
//! [`CsvSink`] is the file the tool produces.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use csv::{Terminator, Writer, WriterBuilder};
use f5export_common::record::{HEADER, OutputRow};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write output: {0}")]
    Csv(#[from] csv::Error),
    #[error("cannot write output: {0}")]
    Io(#[from] io::Error),
}

pub trait ResultSink {
    fn append(&mut self, row: &OutputRow) -> Result<(), ExportError>;
}

impl ResultSink for Vec<OutputRow> {
    fn append(&mut self, row: &OutputRow) -> Result<(), ExportError> {
        self.push(row.clone());
        Ok(())
    }
}

/// CSV writer that flushes after every row, so an interrupted run keeps every
/// row written up to that point.
pub struct CsvSink<W: Write> {
    writer: Writer<W>,
}

impl CsvSink<File> {
    /// Truncates `path` and writes the header.
    pub fn create(path: &Path) -> Result<Self, ExportError> {
        debug!("Writing export to {}", path.display());
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(inner: W) -> Result<Self, ExportError> {
        let writer = WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .from_writer(inner);
        let mut sink = Self { writer };
        sink.writer.write_record(HEADER)?;
        sink.writer.flush()?;
        Ok(sink)
    }

    pub fn into_inner(self) -> Result<W, ExportError> {
        self.writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))
    }
}

impl<W: Write> ResultSink for CsvSink<W> {
    fn append(&mut self, row: &OutputRow) -> Result<(), ExportError> {
        debug!(?row, "appending");
        self.writer.write_record(row.as_record())?;
        self.writer.flush()?;
        Ok(())
    }
}
