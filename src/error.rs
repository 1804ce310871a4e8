use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum RoproError {
    #[error("not a directory: {0}")]
    NotADirectory(Utf8PathBuf),

    #[error("required input file with extension .{0} was not found")]
    MissingInput(String),

    #[error("failed to read assembly stats file {0}")]
    StatsRead(Utf8PathBuf),

    #[error("failed to scan feature table {0}")]
    FeatureTableRead(Utf8PathBuf),

    #[error("failed to scan annotation file {0}")]
    SequenceScan(Utf8PathBuf),

    #[error("failed to open FASTA {path}: {message}")]
    FastaOpen { path: Utf8PathBuf, message: String },

    #[error("sequence not found in FASTA index: {0}")]
    SequenceNotFound(String),

    #[error("failed to append to report {0}")]
    ReportAppend(Utf8PathBuf),

    #[error("required tool not found: {0}")]
    MissingTool(String),

    #[error("alignment invocation failed: {0}")]
    Alignment(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
