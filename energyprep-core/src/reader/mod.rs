//! Minimal spreadsheet package reader
//!
//! Supports exactly what the extraction needs: resolve one sheet by name
//! through the workbook relationships, decode the shared-string table, and
//! stream the sheet's rows as text. Formulas, styles and merged cells are
//! not interpreted.

pub mod package;
pub mod parser_utils;
pub mod relationships;
pub mod rows;
pub mod shared_strings;
pub mod workbook;

pub use package::Package;
pub use relationships::{
    Relationships, SheetDescriptor, WorkbookIndex, normalize_target, parse_sheet_descriptors,
    resolve_sheet_path,
};
pub use rows::{CellKind, RawCell, Row, SheetRows, decode_rows};
pub use shared_strings::SharedStrings;
pub use workbook::Workbook;
