//! National year -> consumption series from the workbook's annual sheet

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{AssemblyReport, parse_finite};
use crate::error::Result;
use crate::reader::Row;

/// Filters applied to the annual sheet rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NationalPolicy {
    /// Earliest year kept
    pub min_year: i32,
    /// 0-based position of the consumption value within a row
    pub value_column: usize,
}

impl Default for NationalPolicy {
    fn default() -> Self {
        Self {
            min_year: 1973,
            value_column: 12,
        }
    }
}

/// A manually curated value that always wins over the decoded one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearOverride {
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearValue {
    pub year: i32,
    pub consumption: f64,
}

/// One value per year, kept in ascending year order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NationalSeries {
    values: BTreeMap<i32, f64>,
}

impl NationalSeries {
    /// Record a value; a later value for the same year replaces the earlier one
    pub fn insert(&mut self, year: i32, consumption: f64) {
        self.values.insert(year, consumption);
    }

    pub fn get(&self, year: i32) -> Option<f64> {
        self.values.get(&year).copied()
    }

    /// Merge curated overrides on top of the decoded values.
    ///
    /// Must run after all decoding. Returns how many decoded values were replaced.
    pub fn apply_overrides(&mut self, overrides: &[YearOverride]) -> usize {
        let mut replaced = 0;
        for ov in overrides {
            if let Some(previous) = self.values.insert(ov.year, ov.value) {
                replaced += 1;
                warn!(
                    year = ov.year,
                    decoded = previous,
                    value = ov.value,
                    "override replaced a decoded value"
                );
            } else {
                debug!(year = ov.year, value = ov.value, "override added a year");
            }
        }
        replaced
    }

    /// Entries sorted by ascending year
    pub fn entries(&self) -> Vec<YearValue> {
        self.values
            .iter()
            .map(|(&year, &consumption)| YearValue { year, consumption })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn year_label() -> &'static Regex {
    static YEAR_LABEL: OnceLock<Regex> = OnceLock::new();
    YEAR_LABEL.get_or_init(|| Regex::new(r"^[0-9]{4}$").expect("year pattern is valid"))
}

/// Extract the national series from decoded sheet rows.
///
/// Only rows whose first cell is a four-digit year take part; monthly rows,
/// headers and footers fall out here. Overrides are not applied.
pub fn assemble_national<I>(rows: I, policy: &NationalPolicy) -> Result<(NationalSeries, AssemblyReport)>
where
    I: IntoIterator<Item = Result<Row>>,
{
    let mut series = NationalSeries::default();
    let mut report = AssemblyReport::default();

    for row in rows {
        let row = row?;
        report.scanned += 1;

        let Some(first) = row.first().map(|cell| cell.trim()) else {
            report.filtered += 1;
            continue;
        };
        if !year_label().is_match(first) {
            report.filtered += 1;
            continue;
        }

        let year = first.parse::<i32>().ok();
        let value = row
            .get(policy.value_column)
            .and_then(|cell| parse_finite(cell));
        let (Some(year), Some(value)) = (year, value) else {
            report.malformed += 1;
            continue;
        };

        if year < policy.min_year {
            report.below_threshold += 1;
            continue;
        }

        series.insert(year, value);
        report.accepted += 1;
    }

    Ok((series, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(first: &str, value: &str) -> Row {
        let mut cells = vec![first.to_string()];
        cells.extend((1..12).map(|i| format!("col{i}")));
        cells.push(value.to_string());
        cells
    }

    fn assemble(rows: Vec<Row>) -> (NationalSeries, AssemblyReport) {
        assemble_national(rows.into_iter().map(Ok), &NationalPolicy::default()).unwrap()
    }

    #[test]
    fn test_override_always_wins() {
        let (mut series, _) = assemble(vec![row("1973", "70.561"), row("2025", "ignored")]);
        series.apply_overrides(&[YearOverride {
            year: 2025,
            value: 56.270816,
        }]);
        assert_eq!(
            series.entries(),
            vec![
                YearValue {
                    year: 1973,
                    consumption: 70.561
                },
                YearValue {
                    year: 2025,
                    consumption: 56.270816
                },
            ]
        );
    }

    #[test]
    fn test_override_replaces_decoded_value() {
        let (mut series, _) = assemble(vec![row("2024", "94.1")]);
        let replaced = series.apply_overrides(&[
            YearOverride {
                year: 2024,
                value: 93.5,
            },
            YearOverride {
                year: 2025,
                value: 56.270816,
            },
        ]);
        assert_eq!(replaced, 1);
        assert_eq!(series.get(2024), Some(93.5));
        assert_eq!(series.get(2025), Some(56.270816));
    }

    #[test]
    fn test_non_year_labels_are_excluded() {
        let (series, report) = assemble(vec![
            row("97a3", "1.0"),
            row("197", "1.0"),
            row("19730", "1.0"),
            row("1973 January", "1.0"),
            row("Annual Total", "1.0"),
            row(" 1980 ", "78.0"),
        ]);
        assert_eq!(series.entries().len(), 1);
        assert_eq!(series.get(1980), Some(78.0));
        assert_eq!(report.filtered, 5);
        assert_eq!(report.accepted, 1);
    }

    #[test]
    fn test_years_before_threshold_are_dropped() {
        let (series, report) = assemble(vec![row("1949", "31.9"), row("1972", "71.2"), row("1973", "75.7")]);
        assert_eq!(series.len(), 1);
        assert_eq!(report.below_threshold, 2);
    }

    #[test]
    fn test_malformed_rows_are_skipped_and_counted() {
        let short = vec!["1990".to_string(), "84.4".to_string()];
        let (series, report) = assemble(vec![row("1975", "Not Available"), short, row("1976", "")]);
        assert!(series.is_empty());
        assert_eq!(report.malformed, 3);
        assert!(report.has_malformed());
    }

    #[test]
    fn test_empty_rows_are_filtered() {
        let (series, report) = assemble(vec![Row::new(), row("1990", "84.4")]);
        assert_eq!(series.len(), 1);
        assert_eq!(report.scanned, 2);
        assert_eq!(report.filtered, 1);
    }

    #[test]
    fn test_last_write_wins_for_duplicate_years() {
        let (series, _) = assemble(vec![row("2000", "98.8"), row("2000", "98.9")]);
        assert_eq!(series.get(2000), Some(98.9));
    }

    #[test]
    fn test_entries_are_sorted_by_year() {
        let (series, _) = assemble(vec![row("2001", "2"), row("1999", "1"), row("2000", "3")]);
        let years: Vec<i32> = series.entries().iter().map(|e| e.year).collect();
        assert_eq!(years, [1999, 2000, 2001]);
    }

    #[test]
    fn test_decode_error_propagates() {
        let rows: Vec<Result<Row>> = vec![
            Ok(row("1990", "84.4")),
            Err(crate::error::PrepError::InvalidStructure("broken".to_string())),
        ];
        assert!(assemble_national(rows, &NationalPolicy::default()).is_err());
    }
}
