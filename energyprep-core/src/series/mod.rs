//! Series assembly: domain filters over decoded rows and CSV records

pub mod national;
pub mod shares;
pub mod state;

pub use national::{NationalPolicy, NationalSeries, YearOverride, YearValue, assemble_national};
pub use shares::{ShareTable, ShareValue, assemble_shares, normalize_share};
pub use state::{StatePolicy, StateRecord, assemble_state};

/// What happened to the input rows during one assembly pass.
///
/// Row-level problems never fail a run; this is the only place they show up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    /// Rows examined
    pub scanned: usize,
    /// Rows that produced an entry
    pub accepted: usize,
    /// Rows outside the extraction (headers, other series, aggregates)
    pub filtered: usize,
    /// Rows dropped because a year or value did not parse
    pub malformed: usize,
    /// Rows dropped for predating the year threshold
    pub below_threshold: usize,
}

impl AssemblyReport {
    pub fn has_malformed(&self) -> bool {
        self.malformed > 0
    }
}

/// Parse a numeric cell, tolerating surrounding whitespace.
///
/// Non-finite values are rejected since they cannot be emitted as literals.
pub(crate) fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
