use std::fs;
use std::process::Command;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{info, warn};

use crate::error::RoproError;

/// Tabular output columns requested from blastn.
pub const BLAST_OUTFMT: &str = "7 qseqid stitle pident qcovs qcovhsp length evalue";

/// Runs one query file through an alignment search and returns the tool's
/// stdout verbatim. Seam for tests and for skipping the remote call.
pub trait Aligner {
    fn align(&self, query: &Utf8Path) -> Result<String, RoproError>;
}

/// Remote blastn against `nr` with fixed thresholds: percent identity >= 90,
/// query coverage >= 95%, top 5 hits. No retry and no timeout; a hung tool
/// hangs the run.
#[derive(Debug)]
pub struct BlastnAligner {
    path: Utf8PathBuf,
}

impl BlastnAligner {
    pub fn new(path: &Utf8Path) -> Result<Self, RoproError> {
        if !path.as_std_path().exists() {
            return Err(RoproError::MissingTool(path.to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl Aligner for BlastnAligner {
    fn align(&self, query: &Utf8Path) -> Result<String, RoproError> {
        let output = Command::new(self.path.as_std_path())
            .args([
                "-remote",
                "-db",
                "nr",
                "-query",
                query.as_str(),
                "-outfmt",
                BLAST_OUTFMT,
                "-perc_identity",
                "90",
                "-qcov_hsp_perc",
                "95",
                "-max_target_seqs",
                "5",
            ])
            .output()
            .map_err(|err| RoproError::Alignment(err.to_string()))?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Aligns every exported `.fa` file in `dir`, in sorted order. Each entry
/// maps the file stem to the raw result text; a failed invocation surfaces as
/// empty text, indistinguishable from a successful search with no hits.
pub fn align_all(
    dir: &Utf8Path,
    aligner: &dyn Aligner,
) -> Result<Vec<(String, String)>, RoproError> {
    let mut queries: Vec<Utf8PathBuf> = fs::read_dir(dir.as_std_path())
        .map_err(|err| RoproError::Filesystem(err.to_string()))?
        .flatten()
        .filter_map(|entry| Utf8PathBuf::from_path_buf(entry.path()).ok())
        .filter(|path| path.extension() == Some("fa"))
        .collect();
    queries.sort();

    info!("number of sequences that will be aligned: {}", queries.len());

    let mut results = Vec::new();
    for (idx, query) in queries.iter().enumerate() {
        info!("aligning sequence {} of {}", idx + 1, queries.len());
        let name = query
            .file_name()
            .and_then(|name| name.split('.').next())
            .unwrap_or_default()
            .to_string();
        let text = match aligner.align(query) {
            Ok(text) => text,
            Err(err) => {
                warn!("alignment of {name} failed: {err}");
                String::new()
            }
        };
        results.push((name, format!("\n{text}")));
    }

    Ok(results)
}
