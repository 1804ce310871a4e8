use std::fs;

use camino::Utf8Path;
use tracing::{error, info};

/// Fixed annotation-category phrases counted in the feature table. These are
/// independent substring counts, not a partition: a line can contribute to
/// more than one category.
pub const CATEGORIES: [&str; 3] = ["CDS", "hypothetical protein", "putative protein"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionTally {
    Counted {
        cds: u64,
        hypothetical: u64,
        putative: u64,
    },
    Unreadable,
}

impl FunctionTally {
    pub fn ok(&self) -> bool {
        matches!(self, FunctionTally::Counted { .. })
    }

    /// Report section body: per-category counts followed by the derived
    /// percentages, `NA` when no CDS were counted.
    pub fn section_body(&self) -> Vec<(String, String)> {
        match self {
            FunctionTally::Counted {
                cds,
                hypothetical,
                putative,
            } => {
                let mut body = vec![
                    ("CDS".to_string(), cds.to_string()),
                    ("hypothetical protein".to_string(), hypothetical.to_string()),
                    ("putative protein".to_string(), putative.to_string()),
                ];
                if *cds == 0 {
                    body.push(("perc_hypothetical".to_string(), "NA".to_string()));
                    body.push(("perc_putative".to_string(), "NA".to_string()));
                } else {
                    body.push((
                        "perc_hypothetical".to_string(),
                        format_percent(*hypothetical, *cds),
                    ));
                    body.push(("perc_putative".to_string(), format_percent(*putative, *cds)));
                }
                body
            }
            FunctionTally::Unreadable => vec![
                (
                    "error".to_string(),
                    "Could not extract genes by function.".to_string(),
                ),
                ("percent_hypothetical".to_string(), "NA".to_string()),
            ],
        }
    }
}

/// Counts CDS annotations by function in a Prokka `.tsv` feature table.
/// A read failure degrades to [`FunctionTally::Unreadable`]; the pipeline
/// continues.
pub fn tally_functions(path: &Utf8Path) -> FunctionTally {
    info!("calculating percent by function from {path}");

    let content = match fs::read_to_string(path.as_std_path()) {
        Ok(content) => content,
        Err(err) => {
            error!("could not read feature table {path}: {err}");
            return FunctionTally::Unreadable;
        }
    };

    let count = |phrase: &str| {
        content.lines().filter(|line| line.contains(phrase)).count() as u64
    };

    FunctionTally::Counted {
        cds: count(CATEGORIES[0]),
        hypothetical: count(CATEGORIES[1]),
        putative: count(CATEGORIES[2]),
    }
}

/// Percentage rounded to two decimals with trailing zeros trimmed, keeping at
/// least one fractional digit: `30.0%`, `33.33%`, `12.5%`.
pub(crate) fn format_percent(part: u64, total: u64) -> String {
    let value = (part as f64 / total as f64) * 100.0;
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0');
    let trimmed = if trimmed.ends_with('.') {
        &rounded[..trimmed.len() + 1]
    } else {
        trimmed
    };
    format!("{trimmed}%")
}
