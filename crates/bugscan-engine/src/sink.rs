use crate::{Error, Result};
use bugscan_types::Report;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Destination for a finished report
pub trait ReportSink: Send + Sync {
    /// Persist every issue of `report`, one per line
    fn write(&self, report: &Report) -> Result<()>;

    /// Where the report goes, for progress output
    fn location(&self) -> String;
}

/// Writes the report as plain text, replacing any existing file
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn write_lines(&self, report: &Report) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(&self.path)?);
        for line in report.lines() {
            writeln!(writer, "{}", line)?;
        }
        writer.flush()
    }
}

impl ReportSink for FileSink {
    fn write(&self, report: &Report) -> Result<()> {
        self.write_lines(report).map_err(|source| Error::SinkWrite {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(path = %self.path.display(), issues = report.len(), "report written");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
