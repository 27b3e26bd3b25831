//! JSON Lines publisher
//!
//! One `{"type":"file",...}` line per analyzed file, then a single
//! `{"type":"summary",...}` line with the run statistics.

use super::error::{PipelineError, PipelineResult};
use super::ports::Publisher;
use super::report::FileReport;
use crate::features::classification::RunStatistics;
use crate::shared::models::FileDescriptor;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Line<'a> {
    File {
        size_bytes: u64,
        #[serde(flatten)]
        report: &'a FileReport,
    },
    Summary {
        #[serde(flatten)]
        statistics: &'a RunStatistics,
    },
}

pub struct JsonLinesPublisher<W: Write> {
    writer: W,
    published: usize,
}

impl<W: Write> JsonLinesPublisher<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            published: 0,
        }
    }

    pub fn published(&self) -> usize {
        self.published
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, line: &Line<'_>, path: &str) -> PipelineResult<()> {
        serde_json::to_writer(&mut self.writer, line)
            .map_err(|e| PipelineError::Serialization(e.to_string()))?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| PipelineError::Publish {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }
}

impl<W: Write> Publisher for JsonLinesPublisher<W> {
    fn publish(&mut self, file: &FileDescriptor, report: &FileReport) -> PipelineResult<()> {
        let line = Line::File {
            size_bytes: file.size_bytes,
            report,
        };
        self.write_line(&line, &report.path)?;
        self.published += 1;
        Ok(())
    }

    fn finish(&mut self, statistics: &RunStatistics) -> PipelineResult<()> {
        self.write_line(&Line::Summary { statistics }, "<summary>")?;
        self.writer.flush()?;
        Ok(())
    }
}
