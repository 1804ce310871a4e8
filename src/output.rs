use std::io::{self, Write};

use serde::Serialize;

/// Machine-readable summary of one run, printed with `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub sample: String,
    pub report_path: String,
    pub sections: Vec<String>,
    pub skipped_sections: Vec<String>,
    pub identifier_counts: Vec<GroupCount>,
    pub exported_sequences: usize,
    pub failed_exports: Vec<String>,
    pub alignments: usize,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupCount {
    pub group: String,
    pub count: usize,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_summary(summary: &RunSummary) -> io::Result<()> {
        let json = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

pub fn iso_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
