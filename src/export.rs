use std::fs;

use camino::Utf8PathBuf;
use tracing::{error, info};

use crate::error::RoproError;
use crate::sequences::ExtractionResult;
use crate::workspace::Workspace;

#[derive(Debug)]
pub struct ExportOutcome {
    pub dir: Utf8PathBuf,
    pub failed_ids: Vec<String>,
}

/// Writes every extracted sequence to its own single-record FASTA under
/// `seqs_<label>`, named `<identifier>_<group>.fa`. The files are blastn-ready:
/// one `>` header line and the sequence body with no line wrapping.
///
/// Failing to create the directory is fatal; individual write failures are
/// collected and reported, and the stage completes.
pub fn export(
    workspace: &Workspace,
    results: &ExtractionResult,
    label: &str,
) -> Result<ExportOutcome, RoproError> {
    info!("exporting {} sequences", results.total());

    let dir = workspace.ensure_seqs_dir(label)?;
    let mut failed_ids = Vec::new();

    for (group, record) in results.records() {
        let path = dir.join(format!("{}_{}.fa", record.id, group));
        let body = format!(">{}\n{}\n", record.id, record.seq);
        if let Err(err) = fs::write(path.as_std_path(), body) {
            error!("could not export sequence {}: {err}", record.id);
            failed_ids.push(record.id.clone());
        }
    }

    Ok(ExportOutcome { dir, failed_ids })
}
