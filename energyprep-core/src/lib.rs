//! energyprep-core: static data generation from energy statistics
//!
//! Decodes the annual sheet of a spreadsheet package and a flat SEDS CSV
//! extract into sorted series, then renders them as importable JavaScript
//! modules with byte-for-byte reproducible output.

pub mod codegen;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod reader;
pub mod series;

pub use config::PipelineConfig;
pub use error::{PrepError, Result};
pub use pipeline::{EnergySummary, ShareSummary, generate_energy_data, generate_petroleum_shares};
