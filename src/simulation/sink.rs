//! # Result Sinks
//!
//! Destinations for a finished (or cancelled) run's result series.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::series::ResultSeries;
use crate::error::SinkError;

/// Receives the result series once per run
pub trait ResultSink {
    fn accept(&mut self, series: &ResultSeries) -> Result<(), SinkError>;
}

/// Keeps received series in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    runs: Vec<ResultSeries>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runs(&self) -> &[ResultSeries] {
        &self.runs
    }

    pub fn last(&self) -> Option<&ResultSeries> {
        self.runs.last()
    }
}

impl ResultSink for MemorySink {
    fn accept(&mut self, series: &ResultSeries) -> Result<(), SinkError> {
        self.runs.push(series.clone());
        Ok(())
    }
}

/// Tabular export, one row per simulated second
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
        }
    }

    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|e| SinkError::Io(e.into_error()))
    }
}

impl CsvSink<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl CsvSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ResultSink for CsvSink<W> {
    fn accept(&mut self, series: &ResultSeries) -> Result<(), SinkError> {
        for row in series.rows() {
            self.writer.serialize(row)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Whole series as one JSON document
pub struct JsonSink<W: Write> {
    inner: W,
    pretty: bool,
}

impl<W: Write> JsonSink<W> {
    pub fn new(inner: W, pretty: bool) -> Self {
        Self { inner, pretty }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl JsonSink<BufWriter<File>> {
    pub fn create(path: &Path, pretty: bool) -> Result<Self, SinkError> {
        Ok(Self::new(BufWriter::new(File::create(path)?), pretty))
    }
}

impl JsonSink<io::Stdout> {
    pub fn stdout(pretty: bool) -> Self {
        Self::new(io::stdout(), pretty)
    }
}

impl<W: Write> ResultSink for JsonSink<W> {
    fn accept(&mut self, series: &ResultSeries) -> Result<(), SinkError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.inner, series)?;
        } else {
            serde_json::to_writer(&mut self.inner, series)?;
        }
        writeln!(self.inner)?;
        self.inner.flush()?;
        Ok(())
    }
}
