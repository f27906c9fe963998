//! Random-access view over the entries of a spreadsheet package

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{PrepError, Result};

/// An opened spreadsheet package (a ZIP archive of named entries).
///
/// Entry lookup is exact and case-sensitive. The underlying handle is owned
/// by the package and released when it is dropped.
#[derive(Debug)]
pub struct Package<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl Package<BufReader<File>> {
    /// Open a package from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> Package<R> {
    /// Create from any reader that implements Read + Seek
    pub fn from_reader(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Read the raw bytes of an entry, failing if it does not exist
    pub fn read(&mut self, path: &str) -> Result<Vec<u8>> {
        let mut entry = match self.archive.by_name(path) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(PrepError::EntryNotFound(path.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut bytes = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        entry.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// Read an entry that is allowed to be absent
    pub fn read_optional(&mut self, path: &str) -> Result<Option<Vec<u8>>> {
        match self.read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(PrepError::EntryNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Check if an entry exists in the package
    pub fn contains(&self, path: &str) -> bool {
        self.archive.file_names().any(|name| name == path)
    }

    /// Number of entries in the package
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }
}
