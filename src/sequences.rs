use std::collections::HashMap;
use std::fs;

use camino::Utf8Path;
use needletail::parse_fastx_file;
use tracing::info;

use crate::error::RoproError;

/// Fetches a sequence by identifier. Seam for the FASTA collaborator so the
/// extraction logic can be exercised against a mock in tests.
pub trait SequenceIndex {
    fn fetch(&self, id: &str) -> Result<String, RoproError>;
}

/// In-process index over one FASTA file: identifier (first header token,
/// without the leading `>`) to unwrapped sequence.
pub struct FastaIndex {
    by_id: HashMap<String, String>,
}

impl FastaIndex {
    pub fn open(path: &Utf8Path) -> Result<Self, RoproError> {
        let mut reader = parse_fastx_file(path.as_std_path()).map_err(|err| {
            RoproError::FastaOpen {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        })?;

        let mut by_id = HashMap::new();
        while let Some(record) = reader.next() {
            let record = record.map_err(|err| RoproError::FastaOpen {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
            let header = String::from_utf8_lossy(record.id()).to_string();
            let id = header
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string();
            let seq = String::from_utf8_lossy(&record.seq()).to_string();
            by_id.insert(id, seq);
        }

        Ok(Self { by_id })
    }
}

impl SequenceIndex for FastaIndex {
    fn fetch(&self, id: &str) -> Result<String, RoproError> {
        self.by_id
            .get(id)
            .cloned()
            .ok_or_else(|| RoproError::SequenceNotFound(id.to_string()))
    }
}

/// A named marker-gene group and the annotation names that identify it.
/// Duplicate phrases are dropped, first occurrence wins.
#[derive(Debug, Clone)]
pub struct KeyphraseGroup {
    pub name: String,
    pub phrases: Vec<String>,
}

impl KeyphraseGroup {
    pub fn new(name: &str, phrases: &[&str]) -> Self {
        let mut deduped: Vec<String> = Vec::new();
        for phrase in phrases {
            if !deduped.iter().any(|seen| seen == phrase) {
                deduped.push((*phrase).to_string());
            }
        }
        Self {
            name: name.to_string(),
            phrases: deduped,
        }
    }
}

/// The marker genes used to identify a species or strain.
pub fn species_identifier_groups() -> Vec<KeyphraseGroup> {
    vec![
        KeyphraseGroup::new("16S", &["16S ribosomal RNA"]),
        KeyphraseGroup::new("rpoB", &["DNA-directed RNA polymerase subunit beta"]),
        KeyphraseGroup::new("dnaA", &["Chromosomal replication initiator protein DnaA"]),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub id: String,
    pub seq: String,
}

/// Extracted sequences per group, in group declaration order.
#[derive(Debug, Default)]
pub struct ExtractionResult {
    groups: Vec<(String, Vec<SequenceRecord>)>,
}

impl ExtractionResult {
    pub fn group(&self, name: &str) -> Option<&[SequenceRecord]> {
        self.groups
            .iter()
            .find(|(group, _)| group == name)
            .map(|(_, records)| records.as_slice())
    }

    /// Every record paired with its group name, in extraction order.
    pub fn records(&self) -> impl Iterator<Item = (&str, &SequenceRecord)> {
        self.groups
            .iter()
            .flat_map(|(name, records)| records.iter().map(move |record| (name.as_str(), record)))
    }

    pub fn total(&self) -> usize {
        self.groups.iter().map(|(_, records)| records.len()).sum()
    }

    /// Report section body: one `group: count` line per group.
    pub fn counts_body(&self) -> Vec<(String, String)> {
        self.groups
            .iter()
            .map(|(name, records)| (name.clone(), records.len().to_string()))
            .collect()
    }
}

/// Scans `scan_path` for lines matching each group's phrases and fetches the
/// matched sequences from the index.
///
/// The identifier is the first whitespace-delimited token of a matching line
/// with any leading `>` stripped; the left-trimmed remainder is the
/// annotation name. With `exact` the remainder must equal the phrase
/// verbatim, which turns the substring scan into an exact-name filter. Any
/// failure to read the scan file or fetch a matched sequence aborts the
/// stage.
pub fn extract_sequences(
    scan_path: &Utf8Path,
    index: &dyn SequenceIndex,
    groups: &[KeyphraseGroup],
    exact: bool,
) -> Result<ExtractionResult, RoproError> {
    info!("extracting sequences of interest from {scan_path}");

    let content = fs::read_to_string(scan_path.as_std_path())
        .map_err(|_| RoproError::SequenceScan(scan_path.to_path_buf()))?;

    let mut result = ExtractionResult::default();
    for group in groups {
        let mut records = Vec::new();
        for phrase in &group.phrases {
            for line in content.lines().filter(|line| line.contains(phrase)) {
                let line = line.trim_end();
                let mut parts = line.splitn(2, |ch: char| ch.is_whitespace());
                let token = parts.next().unwrap_or_default();
                let name = parts.next().unwrap_or_default().trim_start();

                if exact && name != phrase.as_str() {
                    continue;
                }

                let id = token.strip_prefix('>').unwrap_or(token);
                let seq = index.fetch(id)?;
                records.push(SequenceRecord {
                    id: id.to_string(),
                    seq,
                });
            }
        }
        result.groups.push((group.name.clone(), records));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use camino::Utf8PathBuf;

    struct MockIndex;

    impl SequenceIndex for MockIndex {
        fn fetch(&self, id: &str) -> Result<String, RoproError> {
            match id {
                "SAMPLE_00001" => Ok("ACGTACGT".to_string()),
                "SAMPLE_00002" => Ok("TTTTCCCC".to_string()),
                other => Err(RoproError::SequenceNotFound(other.to_string())),
            }
        }
    }

    fn write_ffn(temp: &tempfile::TempDir, content: &str) -> Utf8PathBuf {
        let path = temp.path().join("sample.ffn");
        std::fs::write(&path, content).unwrap();
        Utf8PathBuf::from_path_buf(path).unwrap()
    }

    #[test]
    fn exact_match_excludes_partial_annotations() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_ffn(
            &temp,
            ">SAMPLE_00001 16S ribosomal RNA\nACGTACGT\n>SAMPLE_00002 16S ribosomal RNA (partial)\nTTTTCCCC\n",
        );
        let groups = vec![KeyphraseGroup::new("16S", &["16S ribosomal RNA"])];

        let result = extract_sequences(&path, &MockIndex, &groups, true).unwrap();
        let records = result.group("16S").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "SAMPLE_00001");
        assert_eq!(records[0].seq, "ACGTACGT");
    }

    #[test]
    fn substring_mode_keeps_partial_annotations() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_ffn(
            &temp,
            ">SAMPLE_00001 16S ribosomal RNA\nACGTACGT\n>SAMPLE_00002 16S ribosomal RNA (partial)\nTTTTCCCC\n",
        );
        let groups = vec![KeyphraseGroup::new("16S", &["16S ribosomal RNA"])];

        let result = extract_sequences(&path, &MockIndex, &groups, false).unwrap();
        assert_eq!(result.group("16S").unwrap().len(), 2);
    }

    #[test]
    fn duplicate_phrases_do_not_duplicate_records() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_ffn(&temp, ">SAMPLE_00001 16S ribosomal RNA\nACGTACGT\n");
        let groups = vec![KeyphraseGroup::new(
            "16S",
            &["16S ribosomal RNA", "16S ribosomal RNA"],
        )];

        let result = extract_sequences(&path, &MockIndex, &groups, true).unwrap();
        assert_eq!(result.group("16S").unwrap().len(), 1);
    }

    #[test]
    fn unmatched_groups_report_zero_counts() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_ffn(&temp, ">SAMPLE_00001 16S ribosomal RNA\nACGTACGT\n");
        let groups = vec![
            KeyphraseGroup::new("16S", &["16S ribosomal RNA"]),
            KeyphraseGroup::new("rpoB", &["DNA-directed RNA polymerase subunit beta"]),
        ];

        let result = extract_sequences(&path, &MockIndex, &groups, true).unwrap();
        assert_eq!(
            result.counts_body(),
            vec![
                ("16S".to_string(), "1".to_string()),
                ("rpoB".to_string(), "0".to_string()),
            ]
        );
    }

    #[test]
    fn missing_scan_file_is_fatal() {
        let temp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp.path().join("absent.ffn")).unwrap();
        let groups = species_identifier_groups();
        assert_matches!(
            extract_sequences(&path, &MockIndex, &groups, true),
            Err(RoproError::SequenceScan(_))
        );
    }

    #[test]
    fn fasta_index_fetches_by_first_header_token() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_ffn(
            &temp,
            ">SAMPLE_00001 16S ribosomal RNA\nACGT\nACGT\n>SAMPLE_00002 other gene\nTTTT\n",
        );

        let index = FastaIndex::open(&path).unwrap();
        // multi-line sequence comes back unwrapped
        assert_eq!(index.fetch("SAMPLE_00001").unwrap(), "ACGTACGT");
        assert_matches!(
            index.fetch("SAMPLE_99999"),
            Err(RoproError::SequenceNotFound(_))
        );
    }
}
