//! Sheet name resolution through the workbook relationship graph
//!
//! Sheets are never addressed by name inside the package. The workbook
//! descriptor maps each sheet name to a relationship id, and the workbook
//! relationship manifest maps that id to an entry path relative to the
//! workbook directory:
//!
//! ```text
//! "Annual Data" --(xl/workbook.xml)--> rId3 --(xl/_rels/workbook.xml.rels)--> worksheets/sheet3.xml
//! ```

use std::collections::HashMap;
use std::io::{Read, Seek};

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;

use super::package::Package;
use super::parser_utils::{attribute_value, is_element};
use crate::error::{PrepError, Result};

/// Workbook descriptor entry
pub const WORKBOOK_PATH: &str = "xl/workbook.xml";
/// Workbook-level relationship manifest
pub const WORKBOOK_RELS_PATH: &str = "xl/_rels/workbook.xml.rels";
/// Directory that workbook relationship targets are relative to
pub const WORKBOOK_ROOT: &str = "xl/";

/// Relationship id to target path, scoped to the workbook
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    targets: HashMap<String, String>,
}

impl Relationships {
    /// Parse a `.rels` manifest
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut targets = HashMap::new();
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) | Event::Empty(e) if is_element(&e, b"Relationship") => {
                    let id = attribute_value(&e, b"Id")?;
                    let target = attribute_value(&e, b"Target")?;
                    if let (Some(id), Some(target)) = (id, target) {
                        // Ids are unique; keep the first if a producer repeats one
                        targets.entry(id).or_insert(target);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { targets })
    }

    /// Target path for a relationship id, as written in the manifest
    pub fn target(&self, id: &str) -> Option<&str> {
        self.targets.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// A sheet as listed in the workbook descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetDescriptor {
    pub name: String,
    pub rel_id: String,
}

/// Parse the ordered sheet list from the workbook descriptor
pub fn parse_sheet_descriptors(xml: &[u8]) -> Result<Vec<SheetDescriptor>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut sheets = Vec::new();
    let mut saw_sheets_node = false;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => {
                if is_element(&e, b"sheets") {
                    saw_sheets_node = true;
                } else if is_element(&e, b"sheet") {
                    let name = attribute_value(&e, b"name")?.unwrap_or_default();
                    let rel_id = attribute_value(&e, b"id")?.unwrap_or_default();
                    sheets.push(SheetDescriptor { name, rel_id });
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_sheets_node {
        return Err(PrepError::InvalidStructure(
            "workbook does not contain a <sheets> node".to_string(),
        ));
    }

    Ok(sheets)
}

/// Two-stage lookup table built once per package: name -> id -> path
#[derive(Debug, Clone)]
pub struct WorkbookIndex {
    sheets: Vec<SheetDescriptor>,
    relationships: Relationships,
}

impl WorkbookIndex {
    pub fn new(sheets: Vec<SheetDescriptor>, relationships: Relationships) -> Self {
        Self {
            sheets,
            relationships,
        }
    }

    /// Build the index from the workbook descriptor and manifest in a package
    pub fn load<R: Read + Seek>(package: &mut Package<R>) -> Result<Self> {
        let sheets = parse_sheet_descriptors(&package.read(WORKBOOK_PATH)?)?;
        let relationships = Relationships::parse(&package.read(WORKBOOK_RELS_PATH)?)?;
        debug!(
            sheets = sheets.len(),
            relationships = relationships.len(),
            "loaded workbook index"
        );
        Ok(Self::new(sheets, relationships))
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }

    /// Resolve a sheet name to its internal entry path
    pub fn sheet_path(&self, sheet_name: &str) -> Result<String> {
        // First match wins when a workbook repeats a name
        let sheet = self
            .sheets
            .iter()
            .find(|s| s.name == sheet_name)
            .ok_or_else(|| PrepError::SheetNotFound(sheet_name.to_string()))?;

        let target = self.relationships.target(&sheet.rel_id).ok_or_else(|| {
            PrepError::RelationshipNotFound {
                rel_id: sheet.rel_id.clone(),
                sheet: sheet_name.to_string(),
            }
        })?;

        Ok(normalize_target(target))
    }
}

/// Resolve a sheet name to its internal entry path within a package
pub fn resolve_sheet_path<R: Read + Seek>(
    package: &mut Package<R>,
    sheet_name: &str,
) -> Result<String> {
    WorkbookIndex::load(package)?.sheet_path(sheet_name)
}

/// Root a relationship target under the workbook directory.
///
/// Package-absolute targets (leading `/`) are taken from the package root.
pub fn normalize_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else if target.starts_with(WORKBOOK_ROOT) {
        target.to_string()
    } else {
        format!("{WORKBOOK_ROOT}{target}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>
<sheet name="Notes" sheetId="1" r:id="rId1"/>
<sheet name="Annual Data" sheetId="2" r:id="rId2"/>
<sheet name="Monthly Data" sheetId="3" r:id="rId9"/>
<sheet name="Annual Data" sheetId="4" r:id="rId3"/>
</sheets>
</workbook>"#;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="xl/worksheets/sheet4.xml"/>
<Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
</Relationships>"#;

    fn index() -> WorkbookIndex {
        WorkbookIndex::new(
            parse_sheet_descriptors(WORKBOOK.as_bytes()).unwrap(),
            Relationships::parse(RELS.as_bytes()).unwrap(),
        )
    }

    #[test]
    fn test_parse_relationships() {
        let rels = Relationships::parse(RELS.as_bytes()).unwrap();
        assert_eq!(rels.len(), 4);
        assert_eq!(rels.target("rId2"), Some("worksheets/sheet2.xml"));
        assert_eq!(rels.target("rId4"), Some("sharedStrings.xml"));
        assert_eq!(rels.target("rId5"), None);
    }

    #[test]
    fn test_parse_sheet_descriptors_in_order() {
        let sheets = parse_sheet_descriptors(WORKBOOK.as_bytes()).unwrap();
        let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Notes", "Annual Data", "Monthly Data", "Annual Data"]);
        assert_eq!(sheets[1].rel_id, "rId2");
    }

    #[test]
    fn test_sheet_path_first_match_wins() {
        assert_eq!(index().sheet_path("Annual Data").unwrap(), "xl/worksheets/sheet2.xml");
        assert_eq!(index().sheet_path("Notes").unwrap(), "xl/worksheets/sheet1.xml");
    }

    #[test]
    fn test_sheet_name_match_is_exact() {
        let err = index().sheet_path("annual data").unwrap_err();
        assert!(matches!(err, PrepError::SheetNotFound(ref n) if n == "annual data"));
    }

    #[test]
    fn test_missing_relationship() {
        let err = index().sheet_path("Monthly Data").unwrap_err();
        match err {
            PrepError::RelationshipNotFound { rel_id, sheet } => {
                assert_eq!(rel_id, "rId9");
                assert_eq!(sheet, "Monthly Data");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_normalize_target() {
        assert_eq!(normalize_target("worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(normalize_target("xl/worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(normalize_target("/xl/worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
    }

    #[test]
    fn test_workbook_without_sheets_node() {
        let xml = br#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"/>"#;
        assert!(matches!(
            parse_sheet_descriptors(xml),
            Err(PrepError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_prefixed_workbook() {
        let xml = br#"<x:workbook xmlns:x="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><x:sheets><x:sheet name="Annual Data" sheetId="1" r:id="rId1"/></x:sheets></x:workbook>"#;
        let sheets = parse_sheet_descriptors(xml).unwrap();
        assert_eq!(
            sheets,
            vec![SheetDescriptor {
                name: "Annual Data".to_string(),
                rel_id: "rId1".to_string(),
            }]
        );
    }
}
