//! Error types for package decoding and series extraction

use thiserror::Error;

/// Structural and file-level failures.
///
/// Anything represented here aborts the run. Cell and row level problems
/// never surface as a `PrepError`; they are absorbed where they occur.
#[derive(Error, Debug)]
pub enum PrepError {
    /// Error reading the ZIP container
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing XML content
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Error reading CSV input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Internal path absent from the package
    #[error("Entry not found in package: {0}")]
    EntryNotFound(String),

    /// No sheet with the requested name in the workbook descriptor
    #[error("Sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    /// Sheet references a relationship id missing from the manifest
    #[error("Relationship '{rel_id}' not found for sheet '{sheet}'")]
    RelationshipNotFound { rel_id: String, sheet: String },

    /// CSV input lacks a column the extraction depends on
    #[error("Missing required column '{column}' in {file}")]
    MissingColumn { column: String, file: String },

    /// Invalid document structure
    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),
}

impl From<quick_xml::events::attributes::AttrError> for PrepError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        PrepError::Xml(err.into())
    }
}

/// Result type for decoding and extraction
pub type Result<T> = std::result::Result<T, PrepError>;
