//! Shared-string table decoding

use std::io::{Read, Seek};

use quick_xml::Reader;
use quick_xml::events::Event;

use super::package::Package;
use super::parser_utils::{is_element, read_text_node};
use crate::error::Result;

/// Shared-strings entry inside the package
pub const SHARED_STRINGS_PATH: &str = "xl/sharedStrings.xml";

/// Ordered table of strings referenced by index from cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedStrings {
    strings: Vec<String>,
}

impl SharedStrings {
    /// Decode the package's shared-string table.
    ///
    /// Workbooks without shared strings (all-numeric sheets) yield an empty table.
    pub fn decode<R: Read + Seek>(package: &mut Package<R>) -> Result<Self> {
        match package.read_optional(SHARED_STRINGS_PATH)? {
            Some(xml) => Self::parse(&xml),
            None => Ok(Self::default()),
        }
    }

    /// Parse a shared-strings document.
    ///
    /// Each `<si>` item becomes one string: the concatenation of every `<t>`
    /// fragment inside it, in document order.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        // Whitespace inside <t xml:space="preserve"> is significant
        reader.config_mut().trim_text(false);

        let mut strings = Vec::new();
        let mut current = String::new();
        let mut in_item = false;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) if is_element(&e, b"si") => {
                    in_item = true;
                    current.clear();
                }
                Event::Empty(e) if is_element(&e, b"si") => strings.push(String::new()),
                Event::Start(e) if in_item && is_element(&e, b"t") => {
                    current.push_str(&read_text_node(&mut reader)?);
                }
                Event::End(e) if e.local_name().as_ref() == b"si" => {
                    strings.push(std::mem::take(&mut current));
                    in_item = false;
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { strings })
    }

    /// String at a 0-based index, if in range
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    /// Decode a cell's raw shared-string reference, degrading to an empty
    /// string when the index is not numeric or out of range.
    pub fn resolve(&self, raw_index: &str) -> String {
        raw_index
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|idx| self.get(idx))
            .unwrap_or_default()
            .to_string()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl From<Vec<String>> for SharedStrings {
    fn from(strings: Vec<String>) -> Self {
        Self { strings }
    }
}
