use std::fs;

use camino::Utf8Path;
use tracing::info;

use crate::error::RoproError;

/// Ordered `label: value` pairs as they appear in the source file.
pub type StatRecord = Vec<(String, String)>;

/// Extracts assembly statistics from a Prokka `.txt` file.
///
/// A line is significant only if it contains `": "`; it is split on the
/// first occurrence, the label kept exactly as found. Anything else is
/// skipped silently.
pub fn extract_stats(path: &Utf8Path) -> Result<StatRecord, RoproError> {
    info!("fetching basic statistics from {path}");

    let content = fs::read_to_string(path.as_std_path())
        .map_err(|_| RoproError::StatsRead(path.to_path_buf()))?;

    let mut stats = StatRecord::new();
    for line in content.lines() {
        let Some((label, value)) = line.split_once(": ") else {
            continue;
        };
        stats.push((label.to_string(), value.to_string()));
    }

    Ok(stats)
}
