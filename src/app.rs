use tracing::{debug, error, info, warn};

use crate::blast::{Aligner, align_all};
use crate::config::RunConfig;
use crate::error::RoproError;
use crate::export::export;
use crate::files::AnnotationFiles;
use crate::functions::tally_functions;
use crate::output::{GroupCount, RunSummary, iso_timestamp};
use crate::report::Report;
use crate::sequences::{FastaIndex, extract_sequences, species_identifier_groups};
use crate::stats::extract_stats;
use crate::trna::tabulate_trna;
use crate::workspace::Workspace;

const SEQS_LABEL: &str = "species_identifiers";

/// The pipeline orchestrator. Stages run strictly in sequence; recoverable
/// stage failures degrade the report, fatal setup failures abort the run.
pub struct App<A: Aligner> {
    aligner: Option<A>,
}

impl<A: Aligner> App<A> {
    pub fn new(aligner: Option<A>) -> Self {
        Self { aligner }
    }

    pub fn run(&self, config: &RunConfig) -> Result<RunSummary, RoproError> {
        info!("reporting on data: {}", config.sample_name());

        let workspace = Workspace::create(config)?;
        info!("output will be sent to {}", workspace.base_dir());

        // required files are checked before the report exists, so a run that
        // cannot proceed leaves no report behind
        info!("looking for input files");
        let files = AnnotationFiles::scan(&config.input_dir)?;
        debug!(
            "found extensions: {}",
            files.extensions().collect::<Vec<_>>().join(", ")
        );
        if let Some(ext) = files.missing().first() {
            error!("file with suffix {ext} was not found");
            return Err(RoproError::MissingInput((*ext).to_string()));
        }

        let report = Report::create(workspace.report_path(), config.sample_name())?;
        let mut sections = SectionLog::default();

        let txt = files
            .first("txt")
            .ok_or_else(|| RoproError::MissingInput("txt".to_string()))?;
        let stats = extract_stats(txt)?;
        sections.append(&report, "BASIC ASSEMBLY STATISTICS", &stats);

        let tsv = files
            .first("tsv")
            .ok_or_else(|| RoproError::MissingInput("tsv".to_string()))?;
        let tally = tally_functions(tsv);
        sections.append(&report, "ANNOTATIONS BY FUNCTION", &tally.section_body());

        match tabulate_trna(tsv) {
            Ok(trna) => {
                sections.append(&report, "tRNA BREAKDOWN", &trna.section_body());
            }
            Err(err) => {
                error!("skipping tRNA breakdown: {err}");
                sections.skip("tRNA BREAKDOWN");
            }
        }

        // the .ffn headers carry the annotation names, so the same file is
        // both the scan target and the sequence source
        let ffn = files
            .first("ffn")
            .ok_or_else(|| RoproError::MissingInput("ffn".to_string()))?;
        let index = FastaIndex::open(ffn)?;
        let groups = species_identifier_groups();
        let results = extract_sequences(ffn, &index, &groups, true)?;
        sections.append(&report, "NUMBER OF IDENTIFIER GENES", &results.counts_body());

        let outcome = export(&workspace, &results, SEQS_LABEL)?;

        let mut alignments = 0;
        if config.run_alignment {
            match &self.aligner {
                Some(aligner) => {
                    info!("running blast alignments");
                    match align_all(&outcome.dir, aligner) {
                        Ok(hits) => {
                            alignments = hits.len();
                            sections.append(&report, "BLAST ALIGNMENTS", &hits);
                        }
                        Err(err) => {
                            error!("skipping blast alignments: {err}");
                            sections.skip("BLAST ALIGNMENTS");
                        }
                    }
                }
                None => warn!("alignment requested but no blastn path configured; skipping"),
            }
        }

        Ok(RunSummary {
            sample: config.sample_name().to_string(),
            report_path: report.path().to_string(),
            sections: sections.written,
            skipped_sections: sections.skipped,
            identifier_counts: results
                .counts_body()
                .into_iter()
                .map(|(group, count)| GroupCount {
                    group,
                    count: count.parse().unwrap_or(0),
                })
                .collect(),
            exported_sequences: results.total() - outcome.failed_ids.len(),
            failed_exports: outcome.failed_ids,
            alignments,
            generated_at: iso_timestamp(),
        })
    }
}

#[derive(Default)]
struct SectionLog {
    written: Vec<String>,
    skipped: Vec<String>,
}

impl SectionLog {
    fn append(&mut self, report: &Report, title: &str, body: &[(String, String)]) {
        if report.append_section(title, body) {
            self.written.push(title.to_string());
        } else {
            self.skip(title);
        }
    }

    fn skip(&mut self, title: &str) {
        self.skipped.push(title.to_string());
    }
}
