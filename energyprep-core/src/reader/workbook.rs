//! Workbook handle: package, sheet index and shared strings in one place

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use tracing::{debug, info};

use super::package::Package;
use super::relationships::WorkbookIndex;
use super::rows::{SheetRows, decode_rows};
use super::shared_strings::SharedStrings;
use crate::error::Result;

/// An opened workbook, ready to hand out sheets by name.
///
/// The sheet index and the shared-string table are decoded once on open.
#[derive(Debug)]
pub struct Workbook<R: Read + Seek> {
    package: Package<R>,
    index: WorkbookIndex,
    shared_strings: SharedStrings,
}

impl Workbook<BufReader<File>> {
    /// Open a workbook from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "opening workbook");
        Self::from_package(Package::open(path)?)
    }
}

impl<R: Read + Seek> Workbook<R> {
    pub fn from_package(mut package: Package<R>) -> Result<Self> {
        let index = WorkbookIndex::load(&mut package)?;
        let shared_strings = SharedStrings::decode(&mut package)?;
        debug!(shared_strings = shared_strings.len(), "decoded shared strings");
        Ok(Self {
            package,
            index,
            shared_strings,
        })
    }

    /// Get all sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.index.sheet_names().collect()
    }

    /// Internal entry path of a named sheet
    pub fn sheet_path(&self, sheet_name: &str) -> Result<String> {
        self.index.sheet_path(sheet_name)
    }

    /// Raw XML of a named sheet
    pub fn sheet_xml(&mut self, sheet_name: &str) -> Result<Vec<u8>> {
        let path = self.sheet_path(sheet_name)?;
        info!(sheet = sheet_name, path = %path, "resolved sheet");
        self.package.read(&path)
    }

    pub fn shared_strings(&self) -> &SharedStrings {
        &self.shared_strings
    }

    /// Decode rows of sheet XML previously read from this workbook
    pub fn rows<'a>(&'a self, sheet_xml: &'a [u8]) -> SheetRows<'a> {
        decode_rows(sheet_xml, &self.shared_strings)
    }
}
