use std::fs;

use camino::Utf8Path;
use tracing::{debug, info};

use crate::error::RoproError;

/// Amino acids in report declaration order. The min/max tie-break depends on
/// this order staying fixed.
pub const AA_ORDER: [&str; 20] = [
    "Ala", "Arg", "Asn", "Asp", "Cys", "Gln", "Glu", "Gly", "His", "Ile", "Leu", "Lys", "Met",
    "Phe", "Pro", "Ser", "Thr", "Trp", "Tyr", "Val",
];

/// Anticodon-derived codons in report declaration order.
pub const CODON_ORDER: [&str; 64] = [
    "aaa", "aac", "aag", "aat", "aca", "acc", "acg", "act", "aga", "agc", "agg", "agt", "ata",
    "atc", "atg", "att", "caa", "cac", "cag", "cat", "cca", "ccc", "ccg", "cct", "cga", "cgc",
    "cgg", "cgt", "cta", "ctc", "ctg", "ctt", "gaa", "gac", "gag", "gat", "gca", "gcc", "gcg",
    "gct", "gga", "ggc", "ggg", "ggt", "gta", "gtc", "gtg", "gtt", "taa", "tac", "tag", "tat",
    "tca", "tcc", "tcg", "tct", "tga", "tgc", "tgg", "tgt", "tta", "ttc", "ttg", "ttt",
];

/// Frequency of tRNA annotations by amino acid and by codon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrnaTally {
    total: usize,
    aa_counts: [u32; 20],
    codon_counts: [u32; 64],
}

impl TrnaTally {
    fn new() -> Self {
        Self {
            total: 0,
            aa_counts: [0; 20],
            codon_counts: [0; 64],
        }
    }

    /// Total selected tRNA lines, including lines whose annotation field
    /// failed to parse.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn aa_count(&self, aa: &str) -> Option<u32> {
        AA_ORDER
            .iter()
            .position(|name| *name == aa)
            .map(|idx| self.aa_counts[idx])
    }

    pub fn codon_count(&self, codon: &str) -> Option<u32> {
        CODON_ORDER
            .iter()
            .position(|name| *name == codon)
            .map(|idx| self.codon_counts[idx])
    }

    /// Both tokens must be known; otherwise nothing is counted, so the
    /// amino-acid and codon tables always sum to the same value.
    fn record(&mut self, aa: &str, codon: &str) -> bool {
        let aa_idx = AA_ORDER.iter().position(|name| *name == aa);
        let codon_idx = CODON_ORDER.iter().position(|name| *name == codon);
        match (aa_idx, codon_idx) {
            (Some(aa_idx), Some(codon_idx)) => {
                self.aa_counts[aa_idx] += 1;
                self.codon_counts[codon_idx] += 1;
                true
            }
            _ => false,
        }
    }

    /// `"<min>-<max>"` across the 20 amino-acid counts.
    pub fn aa_range(&self) -> String {
        let min = self.aa_counts.iter().min().copied().unwrap_or(0);
        let max = self.aa_counts.iter().max().copied().unwrap_or(0);
        format!("{min}-{max}")
    }

    /// Tab-separated `key:count` pairs, five per row, indented to line up
    /// under the report label.
    pub fn aa_breakdown(&self) -> String {
        render_breakdown(&AA_ORDER, &self.aa_counts, "\t\t", 5)
    }

    /// Tab-separated `key:count` pairs, four per row.
    pub fn codon_breakdown(&self) -> String {
        render_breakdown(&CODON_ORDER, &self.codon_counts, "\t", 4)
    }

    pub fn section_body(&self) -> Vec<(String, String)> {
        vec![
            ("tRNAs total".to_string(), self.total.to_string()),
            ("tRNAs by AA".to_string(), self.aa_breakdown()),
            ("tRNA AA range".to_string(), self.aa_range()),
            ("tRNAs by codon".to_string(), self.codon_breakdown()),
        ]
    }
}

fn render_breakdown(keys: &[&str], counts: &[u32], indent: &str, per_row: usize) -> String {
    let mut out = indent.to_string();
    for (idx, (key, count)) in keys.iter().zip(counts.iter()).enumerate() {
        out.push_str(key);
        out.push(':');
        out.push_str(&count.to_string());
        if (idx + 1) % per_row == 0 {
            out.push_str("\n\t\t\t");
        } else {
            out.push('\t');
        }
    }
    out
}

/// Counts tRNA annotations in a Prokka `.tsv` feature table by the amino acid
/// they carry and the codon they recognize.
///
/// A line is selected when its annotation-type column equals `tRNA`; its
/// seventh field is expected to look like `tRNA-Ala(agc)`. Malformed or
/// unknown tokens are per-line skips. Only a failure to read the file at all
/// is an error, and the caller treats that as recoverable.
pub fn tabulate_trna(path: &Utf8Path) -> Result<TrnaTally, RoproError> {
    info!("extracting tRNA counts from {path}");

    let content = fs::read_to_string(path.as_std_path())
        .map_err(|_| RoproError::FeatureTableRead(path.to_path_buf()))?;

    let mut tally = TrnaTally::new();
    for line in content.lines() {
        if line.is_empty() || !line.contains("\ttRNA\t") {
            continue;
        }
        tally.total += 1;

        let Some(field) = line.split('\t').nth(6) else {
            continue;
        };
        let field = field.strip_prefix("tRNA-").unwrap_or(field);
        let field = field.strip_suffix(')').unwrap_or(field);
        let Some((aa, codon)) = field.split_once('(') else {
            continue;
        };
        if !tally.record(aa, codon) {
            debug!("skipping unrecognized tRNA annotation: {field}");
        }
    }

    Ok(tally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use camino::Utf8PathBuf;

    fn write_table(temp: &tempfile::TempDir, content: &str) -> Utf8PathBuf {
        let path = temp.path().join("sample.tsv");
        std::fs::write(&path, content).unwrap();
        Utf8PathBuf::from_path_buf(path).unwrap()
    }

    fn trna_line(annotation: &str) -> String {
        format!("id\ttRNA\t75\t+\t1\t75\t{annotation}\n")
    }

    #[test]
    fn empty_selection_yields_zero_tally() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_table(&temp, "id\tCDS\t100\t+\t1\t100\thypothetical protein\n");

        let tally = tabulate_trna(&path).unwrap();
        assert_eq!(tally.total(), 0);
        assert_eq!(tally.aa_range(), "0-0");
        assert!(AA_ORDER.iter().all(|aa| tally.aa_count(aa) == Some(0)));
    }

    #[test]
    fn counts_amino_acids_and_codons() {
        let temp = tempfile::tempdir().unwrap();
        let content = [
            trna_line("tRNA-Ala(agc)"),
            trna_line("tRNA-Ala(tgc)"),
            trna_line("tRNA-Val(tac)"),
        ]
        .concat();
        let path = write_table(&temp, &content);

        let tally = tabulate_trna(&path).unwrap();
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.aa_count("Ala"), Some(2));
        assert_eq!(tally.aa_count("Val"), Some(1));
        assert_eq!(tally.codon_count("agc"), Some(1));
        assert_eq!(tally.codon_count("tgc"), Some(1));
        assert_eq!(tally.aa_range(), "0-2");
    }

    #[test]
    fn malformed_lines_count_toward_total_but_not_tables() {
        let temp = tempfile::tempdir().unwrap();
        let content = [
            trna_line("tRNA-Ala(agc)"),
            trna_line("tRNA-Xyz(agc)"),
            trna_line("garbled"),
            "short\ttRNA\tline\n".to_string(),
        ]
        .concat();
        let path = write_table(&temp, &content);

        let tally = tabulate_trna(&path).unwrap();
        assert_eq!(tally.total(), 4);

        let aa_sum: u32 = AA_ORDER.iter().filter_map(|aa| tally.aa_count(aa)).sum();
        let codon_sum: u32 = CODON_ORDER
            .iter()
            .filter_map(|codon| tally.codon_count(codon))
            .sum();
        assert_eq!(aa_sum, codon_sum);
        assert_eq!(aa_sum, 1);
        assert!(aa_sum as usize <= tally.total());
    }

    #[test]
    fn trna_token_must_be_tab_bounded() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_table(&temp, "id\tCDS\t100\t+\t1\t100\ttRNA ligase\n");

        let tally = tabulate_trna(&path).unwrap();
        assert_eq!(tally.total(), 0);
    }

    #[test]
    fn breakdown_rows_wrap_at_fixed_widths() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_table(&temp, &trna_line("tRNA-Ala(agc)"));

        let tally = tabulate_trna(&path).unwrap();
        let aa = tally.aa_breakdown();
        assert!(aa.starts_with("\t\tAla:1\t"));
        assert_eq!(aa.matches('\n').count(), 4);

        let codons = tally.codon_breakdown();
        assert!(codons.starts_with("\taaa:0\t"));
        assert_eq!(codons.matches('\n').count(), 16);
    }

    #[test]
    fn unreadable_table_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp.path().join("absent.tsv")).unwrap();
        assert_matches!(tabulate_trna(&path), Err(RoproError::FeatureTableRead(_)));
    }
}
