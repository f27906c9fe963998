//! Petroleum share by state, from the curated `state,share` CSV

use std::io::Read;

use tracing::debug;

use super::{AssemblyReport, parse_finite};
use crate::error::{PrepError, Result};

/// Reserved state key that configures the fallback share (case-insensitive)
pub const DEFAULT_KEY: &str = "DEFAULT";

const COL_STATE: &str = "state";
const COL_SHARE: &str = "share";

/// A share value together with the text it is re-emitted as
#[derive(Debug, Clone, PartialEq)]
pub struct ShareValue {
    pub value: f64,
    pub text: String,
}

impl Default for ShareValue {
    fn default() -> Self {
        Self {
            value: 0.3,
            text: "0.3".to_string(),
        }
    }
}

/// Shares in input order plus the fallback
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShareTable {
    pub entries: Vec<(String, ShareValue)>,
    pub default: ShareValue,
}

/// Parse a raw share, keeping its textual form.
///
/// Surrounding whitespace is dropped and, for decimal text, trailing zeros
/// and a dangling point are stripped (`"0.30"` -> `"0.3"`). Text left without
/// any digit falls back to the canonical form of the value.
pub fn normalize_share(raw: &str) -> Option<ShareValue> {
    let value = parse_finite(raw)?;
    let mut text = raw.trim();
    if text.contains('.') {
        text = text.trim_end_matches('0').trim_end_matches('.');
    }
    let text = if text.chars().any(|c| c.is_ascii_digit()) {
        text.to_string()
    } else {
        format!("{value:?}")
    };
    Some(ShareValue { value, text })
}

/// Read the share table from CSV input. `source` names the input in errors.
pub fn assemble_shares<R: Read>(input: R, source: &str) -> Result<(ShareTable, AssemblyReport)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?;
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| PrepError::MissingColumn {
                column: name.to_string(),
                file: source.to_string(),
            })
    };
    let state_col = find(COL_STATE)?;
    let share_col = find(COL_SHARE)?;

    let mut table = ShareTable::default();
    let mut report = AssemblyReport::default();

    for record in reader.records() {
        let record = record?;
        report.scanned += 1;

        let state = record.get(state_col).unwrap_or_default().trim();
        if state.is_empty() {
            report.filtered += 1;
            continue;
        }

        // Short records carry no share cell; treat as zero
        let raw = record.get(share_col).unwrap_or("0");
        let Some(share) = normalize_share(raw) else {
            debug!(state, share = raw, "skipping malformed share");
            report.malformed += 1;
            continue;
        };

        if state.eq_ignore_ascii_case(DEFAULT_KEY) {
            table.default = share;
        } else {
            table.entries.push((state.to_string(), share));
        }
        report.accepted += 1;
    }

    Ok((table, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share(text: &str) -> ShareValue {
        normalize_share(text).unwrap()
    }

    #[test]
    fn test_normalize_keeps_textual_form() {
        assert_eq!(share("0.42").text, "0.42");
        assert_eq!(share("0.30").text, "0.3");
        assert_eq!(share(" 0.500 ").text, "0.5");
        assert_eq!(share("1.0").text, "1");
        assert_eq!(share("1").text, "1");
        assert_eq!(share("10").text, "10");
        assert_eq!(share(".0").text, "0.0");
        assert_eq!(share("0.30").value, 0.3);
    }

    #[test]
    fn test_normalize_rejects_non_numbers() {
        assert!(normalize_share("").is_none());
        assert!(normalize_share("n/a").is_none());
        assert!(normalize_share("inf").is_none());
    }

    #[test]
    fn test_default_key_is_separate() {
        let csv = "state,share\nTX,0.42\nDEFAULT,0.30\n";
        let (table, report) = assemble_shares(csv.as_bytes(), "shares.csv").unwrap();
        assert_eq!(table.entries, vec![("TX".to_string(), share("0.42"))]);
        assert_eq!(table.default.text, "0.3");
        assert_eq!(table.default.value, 0.3);
        assert_eq!(report.accepted, 2);
    }

    #[test]
    fn test_default_key_is_case_insensitive() {
        let csv = "state,share\nDefault,0.25\nCA,0.38\n";
        let (table, _) = assemble_shares(csv.as_bytes(), "shares.csv").unwrap();
        assert_eq!(table.default.text, "0.25");
        assert_eq!(table.entries.len(), 1);
    }

    #[test]
    fn test_builtin_default_when_absent() {
        let csv = "state,share\nCA,0.38\n";
        let (table, _) = assemble_shares(csv.as_bytes(), "shares.csv").unwrap();
        assert_eq!(table.default, ShareValue::default());
    }

    #[test]
    fn test_entries_keep_input_order_and_skip_blank_states() {
        let csv = "state,share\nTX,0.48\n ,0.1\nAL,0.36\nCA\nNY,abc\n";
        let (table, report) = assemble_shares(csv.as_bytes(), "shares.csv").unwrap();
        let states: Vec<&str> = table.entries.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(states, ["TX", "AL", "CA"]);
        assert_eq!(table.entries[2].1.text, "0");
        assert_eq!(report.filtered, 1);
        assert_eq!(report.malformed, 1);
    }

    #[test]
    fn test_missing_share_column_is_fatal() {
        let csv = "state,value\nTX,0.4\n";
        assert!(matches!(
            assemble_shares(csv.as_bytes(), "shares.csv"),
            Err(PrepError::MissingColumn { .. })
        ));
    }
}
