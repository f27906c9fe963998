//! End-to-end runs: read inputs, assemble, render, write
//!
//! Every input is fully read and assembled before the output is touched, so
//! a failing run leaves any previous artifact in place.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::codegen::{render_energy_module, render_share_module, write_output};
use crate::config::PipelineConfig;
use crate::reader::Workbook;
use crate::series::{
    AssemblyReport, NationalPolicy, ShareValue, StatePolicy, StateRecord, YearOverride,
    YearValue, assemble_national, assemble_shares, assemble_state,
};

/// Outcome of an energy data run
#[derive(Debug, Clone)]
pub struct EnergySummary {
    pub output: PathBuf,
    pub state_rows: usize,
    pub national_rows: usize,
    pub state_report: AssemblyReport,
    pub national_report: AssemblyReport,
}

/// Outcome of a petroleum share run
#[derive(Debug, Clone)]
pub struct ShareSummary {
    pub output: PathBuf,
    pub entries: usize,
    pub default: ShareValue,
    pub report: AssemblyReport,
}

fn log_report(stage: &str, report: &AssemblyReport) {
    info!(
        stage,
        scanned = report.scanned,
        accepted = report.accepted,
        filtered = report.filtered,
        below_threshold = report.below_threshold,
        "assembled series"
    );
    if report.has_malformed() {
        warn!(
            stage,
            skipped = report.malformed,
            "rows skipped because a year or value did not parse"
        );
    }
}

fn open_input(path: &Path) -> Result<BufReader<File>> {
    info!(path = %path.display(), "opening input");
    let file =
        File::open(path).with_context(|| format!("Failed to open input: {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// State-level records from the SEDS CSV, sorted by state then year
pub fn load_state_series(
    path: &Path,
    policy: &StatePolicy,
) -> Result<(Vec<StateRecord>, AssemblyReport)> {
    let input = open_input(path)?;
    let source = path.display().to_string();
    let (records, report) = assemble_state(input, &source, policy)
        .with_context(|| format!("Failed to read state series from {source}"))?;
    log_report("state", &report);
    Ok((records, report))
}

/// National series from the named workbook sheet, overrides applied last
pub fn load_national_series(
    path: &Path,
    sheet: &str,
    policy: &NationalPolicy,
    overrides: &[YearOverride],
) -> Result<(Vec<YearValue>, AssemblyReport)> {
    let (mut series, report) = {
        let mut workbook = Workbook::open(path)
            .with_context(|| format!("Failed to open workbook: {}", path.display()))?;
        let sheet_xml = workbook
            .sheet_xml(sheet)
            .with_context(|| format!("Failed to read sheet '{sheet}' from {}", path.display()))?;
        assemble_national(workbook.rows(&sheet_xml), policy)
            .with_context(|| format!("Failed to decode sheet '{sheet}'"))?
    };
    log_report("national", &report);

    series.apply_overrides(overrides);
    Ok((series.entries(), report))
}

/// Build `energyData.js` from the SEDS CSV and the MER workbook
pub fn generate_energy_data(root: &Path, config: &PipelineConfig) -> Result<EnergySummary> {
    config.validate()?;

    let (states, state_report) =
        load_state_series(&root.join(&config.energy.seds_csv), &config.state_policy())?;
    let (national, national_report) = load_national_series(
        &root.join(&config.energy.workbook),
        &config.national.sheet,
        &config.national_policy(),
        &config.national.overrides,
    )?;

    let output = root.join(&config.energy.output);
    let module = render_energy_module(&states, &national);
    write_output(&output, &module)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(EnergySummary {
        output,
        state_rows: states.len(),
        national_rows: national.len(),
        state_report,
        national_report,
    })
}

/// Build `petroleumShares.js` from the curated share CSV
pub fn generate_petroleum_shares(root: &Path, config: &PipelineConfig) -> Result<ShareSummary> {
    let input_path = root.join(&config.petroleum.input);
    let source = input_path.display().to_string();
    let (table, report) = assemble_shares(open_input(&input_path)?, &source)
        .with_context(|| format!("Failed to read petroleum shares from {source}"))?;
    log_report("petroleum", &report);

    let output = root.join(&config.petroleum.output);
    write_output(&output, &render_share_module(&table))
        .with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(ShareSummary {
        output,
        entries: table.entries.len(),
        default: table.default,
        report,
    })
}
