//! State-level series from the flat SEDS CSV extract

use std::io::Read;

use super::{AssemblyReport, parse_finite};
use crate::error::{PrepError, Result};

/// Sector label carried by every state record of this extraction
pub const ALL_SECTORS: &str = "All";
/// Pseudo-state holding the national aggregate
pub const NATIONAL_STATE_CODE: &str = "US";

const COL_MSN: &str = "MSN";
const COL_STATE: &str = "StateCode";
const COL_YEAR: &str = "Year";
const COL_DATA: &str = "Data";

/// Filters applied to the CSV records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePolicy {
    /// Series code (MSN) to keep
    pub series_code: String,
    /// Earliest year kept
    pub min_year: i32,
}

impl Default for StatePolicy {
    fn default() -> Self {
        Self {
            series_code: "TETCB".to_string(),
            min_year: 1990,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateRecord {
    pub year: i32,
    pub state: String,
    pub sector: &'static str,
    pub consumption: f64,
}

/// Column positions resolved from the header row
struct Columns {
    msn: usize,
    state: usize,
    year: usize,
    data: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord, source: &str) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| PrepError::MissingColumn {
                    column: name.to_string(),
                    file: source.to_string(),
                })
        };
        Ok(Self {
            msn: find(COL_MSN)?,
            state: find(COL_STATE)?,
            year: find(COL_YEAR)?,
            data: find(COL_DATA)?,
        })
    }
}

/// Extract the state series from CSV input.
///
/// `source` names the input in error messages. The result is sorted by
/// state code, then year.
pub fn assemble_state<R: Read>(
    input: R,
    source: &str,
    policy: &StatePolicy,
) -> Result<(Vec<StateRecord>, AssemblyReport)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let columns = Columns::from_headers(reader.headers()?, source)?;

    let mut records = Vec::new();
    let mut report = AssemblyReport::default();

    for record in reader.records() {
        let record = record?;
        report.scanned += 1;

        if record.get(columns.msn) != Some(policy.series_code.as_str()) {
            report.filtered += 1;
            continue;
        }
        let state = match record.get(columns.state) {
            Some(code) if !code.is_empty() && code != NATIONAL_STATE_CODE => code,
            _ => {
                report.filtered += 1;
                continue;
            }
        };

        let Some(year) = record
            .get(columns.year)
            .and_then(|y| y.trim().parse::<i32>().ok())
        else {
            report.malformed += 1;
            continue;
        };
        if year < policy.min_year {
            report.below_threshold += 1;
            continue;
        }
        let Some(consumption) = record.get(columns.data).and_then(parse_finite) else {
            report.malformed += 1;
            continue;
        };

        records.push(StateRecord {
            year,
            state: state.to_string(),
            sector: ALL_SECTORS,
            consumption,
        });
        report.accepted += 1;
    }

    records.sort_by(|a, b| a.state.cmp(&b.state).then(a.year.cmp(&b.year)));
    Ok((records, report))
}
