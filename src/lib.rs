//! ropro: Report On Prokka.
//!
//! Takes the annotation output Prokka produced for one sample and reports
//! the essential information: assembly statistics, CDS functional breakdown,
//! tRNA usage, and marker-gene sequences, with optional blastn alignment of
//! the extracted markers.

pub mod app;
pub mod blast;
pub mod config;
pub mod error;
pub mod export;
pub mod files;
pub mod functions;
pub mod output;
pub mod report;
pub mod sequences;
pub mod stats;
pub mod trna;
pub mod workspace;
