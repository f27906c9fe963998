//! Lazy row decoding for worksheet XML

use quick_xml::Reader;
use quick_xml::events::Event;

use super::parser_utils::{attribute_value, is_element, read_text_node};
use super::shared_strings::SharedStrings;
use crate::error::{PrepError, Result};

/// Cell texts of one row, in column order.
///
/// Only cells present in the source are represented, so a missing column
/// shifts nothing and simply shortens the row; index defensively.
pub type Row = Vec<String>;

/// How a cell's raw value is to be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// `t="s"`: the value is an index into the shared-string table
    SharedString,
    /// Numbers, booleans, plain strings: passed through as text
    Literal,
}

impl CellKind {
    fn from_type_attr(t: Option<&str>) -> Self {
        match t {
            Some("s") => CellKind::SharedString,
            _ => CellKind::Literal,
        }
    }
}

/// A cell as stored in the sheet, before shared-string substitution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    pub kind: CellKind,
    /// Text of the `<v>` node, `None` when the cell has no value node
    pub value: Option<String>,
}

impl RawCell {
    /// Final cell text. Never fails: a bad shared-string reference becomes "".
    pub fn into_text(self, shared_strings: &SharedStrings) -> String {
        match (self.kind, self.value) {
            (_, None) => String::new(),
            (CellKind::SharedString, Some(raw)) => shared_strings.resolve(&raw),
            (CellKind::Literal, Some(text)) => text,
        }
    }
}

/// Rows of a sheet, produced on demand while the XML is parsed.
///
/// Single pass: once consumed, decode the sheet bytes again to restart.
/// Yields an error (and then stops) only if the XML itself is malformed.
pub struct SheetRows<'a> {
    reader: Reader<&'a [u8]>,
    shared_strings: &'a SharedStrings,
    buf: Vec<u8>,
    finished: bool,
}

enum Step {
    Row,
    EmptyRow,
    Skip,
    Done,
    Fail(PrepError),
}

/// Start decoding the rows of a worksheet document
pub fn decode_rows<'a>(sheet_xml: &'a [u8], shared_strings: &'a SharedStrings) -> SheetRows<'a> {
    let mut reader = Reader::from_reader(sheet_xml);
    reader.config_mut().trim_text(false);
    SheetRows {
        reader,
        shared_strings,
        buf: Vec::new(),
        finished: false,
    }
}

impl Iterator for SheetRows<'_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let step = match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(e)) if is_element(&e, b"row") => Step::Row,
                Ok(Event::Empty(e)) if is_element(&e, b"row") => Step::EmptyRow,
                Ok(Event::Eof) => Step::Done,
                Ok(_) => Step::Skip,
                Err(e) => Step::Fail(e.into()),
            };
            self.buf.clear();

            match step {
                Step::Row => {
                    let row = read_row(&mut self.reader, self.shared_strings);
                    if row.is_err() {
                        self.finished = true;
                    }
                    return Some(row);
                }
                Step::EmptyRow => return Some(Ok(Row::new())),
                Step::Skip => {}
                Step::Done => self.finished = true,
                Step::Fail(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
        None
    }
}

/// Read the cells of a `<row>` whose start tag was just consumed
fn read_row(reader: &mut Reader<&[u8]>, shared_strings: &SharedStrings) -> Result<Row> {
    let mut row = Row::new();
    let mut buf = Vec::new();
    loop {
        // (has a body, type attribute)
        let cell_start = match reader.read_event_into(&mut buf)? {
            Event::Start(e) if is_element(&e, b"c") => Some((true, attribute_value(&e, b"t")?)),
            Event::Empty(e) if is_element(&e, b"c") => Some((false, attribute_value(&e, b"t")?)),
            Event::End(e) if e.local_name().as_ref() == b"row" => break,
            Event::Eof => {
                return Err(PrepError::InvalidStructure(
                    "unexpected end of sheet inside <row>".to_string(),
                ));
            }
            _ => None,
        };
        buf.clear();

        if let Some((has_body, type_attr)) = cell_start {
            let kind = CellKind::from_type_attr(type_attr.as_deref());
            let value = if has_body { read_cell_value(reader)? } else { None };
            row.push(RawCell { kind, value }.into_text(shared_strings));
        }
    }
    Ok(row)
}

/// Read the `<v>` text of a `<c>` whose start tag was just consumed
fn read_cell_value(reader: &mut Reader<&[u8]>) -> Result<Option<String>> {
    let mut value = None;
    let mut buf = Vec::new();
    loop {
        let at_value = match reader.read_event_into(&mut buf)? {
            Event::Start(e) if is_element(&e, b"v") => true,
            Event::Empty(e) if is_element(&e, b"v") => {
                value = Some(String::new());
                false
            }
            Event::End(e) if e.local_name().as_ref() == b"c" => break,
            Event::Eof => break,
            _ => false,
        };
        buf.clear();

        if at_value {
            value = Some(read_text_node(reader)?);
        }
    }
    Ok(value)
}
