//! # XML Bodies
//!
//! Converts a resolved map into an indented XML document with `quick-xml`.
//!
//! Each map key becomes an element. Lists repeat the element once per item,
//! nested maps nest, `null` becomes an empty element. A single-key map therefore
//! yields one root element.

use crate::error::{AppError, AppResult};
use crate::value::{stringify, ResolvedValue};
use indexmap::IndexMap;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Renders `map` as an XML document with a UTF-8 declaration.
pub fn map_to_xml(map: &IndexMap<String, ResolvedValue>) -> AppResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    for (key, value) in map {
        write_element(&mut writer, key, value)?;
    }
    String::from_utf8(writer.into_inner()).map_err(|e| AppError::Xml(e.to_string()))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> AppResult<()> {
    writer
        .write_event(event)
        .map_err(|e| AppError::Xml(e.to_string()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &ResolvedValue) -> AppResult<()> {
    match value {
        ResolvedValue::List(items) => {
            for item in items {
                write_element(writer, name, item)?;
            }
            Ok(())
        }
        ResolvedValue::Map(children) => {
            write(writer, Event::Start(BytesStart::new(name)))?;
            for (key, child) in children {
                write_element(writer, key, child)?;
            }
            write(writer, Event::End(BytesEnd::new(name)))
        }
        ResolvedValue::Null => write(writer, Event::Empty(BytesStart::new(name))),
        primitive => {
            write(writer, Event::Start(BytesStart::new(name)))?;
            write(writer, Event::Text(BytesText::new(&stringify(primitive))))?;
            write(writer, Event::End(BytesEnd::new(name)))
        }
    }
}
