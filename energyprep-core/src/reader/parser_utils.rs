//! Common parsing utilities shared by the package decoders

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::Result;

/// Read text content from an XML node, up to its closing tag
pub fn read_text_node<R: std::io::BufRead>(reader: &mut Reader<R>) -> Result<String> {
    let mut buf = Vec::new();
    let mut text = String::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(e) => text.push_str(e.unescape()?.as_ref()),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
            Event::End(_) => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}

/// Look up an attribute by its local name, ignoring any namespace prefix
pub fn attribute_value(element: &BytesStart<'_>, local_name: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == local_name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Whether an element's local name (prefix stripped) matches
pub fn is_element(element: &BytesStart<'_>, local_name: &[u8]) -> bool {
    element.local_name().as_ref() == local_name
}
