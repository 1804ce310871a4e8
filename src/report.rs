use std::fs::OpenOptions;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{error, info};

use crate::error::RoproError;

const SECTION_BREAK: &str = "\n\n-------------------------------------------------------------\n";

/// The append-only text report. The file handle is opened and closed per
/// section; the report is never read back.
#[derive(Debug, Clone)]
pub struct Report {
    path: Utf8PathBuf,
}

impl Report {
    /// Creates the report file and writes the run header. This happens before
    /// any stage runs; failure is fatal.
    pub fn create(path: Utf8PathBuf, sample: &str) -> Result<Self, RoproError> {
        let header = format!("ROPRO: REPORT ON PROKKA\n\nSAMPLE: {sample}\n");
        std::fs::write(path.as_std_path(), header)
            .map_err(|_| RoproError::ReportAppend(path.clone()))?;
        info!("generated report file: {path}");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Appends one labeled section. A failure to open or write is logged and
    /// reported as `false`; it never aborts the run.
    pub fn append_section(&self, title: &str, body: &[(String, String)]) -> bool {
        match self.try_append(title, body) {
            Ok(()) => true,
            Err(err) => {
                error!("could not report {title}: {err}. Skipping.");
                false
            }
        }
    }

    fn try_append(&self, title: &str, body: &[(String, String)]) -> Result<(), RoproError> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(self.path.as_std_path())
            .map_err(|_| RoproError::ReportAppend(self.path.clone()))?;

        let mut entry = format!("{SECTION_BREAK}{title}\n\n");
        for (label, value) in body {
            entry.push_str(label);
            entry.push_str(": ");
            entry.push_str(value);
            entry.push('\n');
        }
        file.write_all(entry.as_bytes())
            .map_err(|_| RoproError::ReportAppend(self.path.clone()))
    }
}
