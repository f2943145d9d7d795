use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

use crate::core::{FacturaError, Node};

fn xml_io(e: std::io::Error) -> FacturaError {
    FacturaError::Xml(format!("XML write error: {e}"))
}

/// XML 1.0 `Name` production, restricted to what element and attribute
/// names in this format need.
fn check_name(name: &str) -> Result<(), FacturaError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == ':')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(FacturaError::Xml(format!("'{name}' is not a valid XML name")))
    }
}

/// Indented UTF-8 writer over an in-memory buffer.
pub(crate) struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl std::fmt::Debug for XmlWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlWriter").finish_non_exhaustive()
    }
}

impl XmlWriter {
    pub fn new() -> Result<Self, FacturaError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    pub fn into_string(self) -> Result<String, FacturaError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| FacturaError::Xml(format!("XML UTF-8 error: {e}")))
    }

    /// Write `node` and its subtree. Attributes keep their given order.
    pub fn node(&mut self, node: &Node) -> Result<&mut Self, FacturaError> {
        check_name(&node.name)?;
        let mut start = BytesStart::new(node.name.as_str());
        for (k, v) in &node.attributes {
            check_name(k)?;
            start.push_attribute((k.as_str(), v.as_str()));
        }

        if node.children.is_empty() && node.text.is_none() {
            self.writer
                .write_event(Event::Empty(start))
                .map_err(xml_io)?;
            return Ok(self);
        }

        self.writer
            .write_event(Event::Start(start))
            .map_err(xml_io)?;
        if let Some(text) = &node.text {
            self.writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(xml_io)?;
        }
        for child in &node.children {
            self.node(child)?;
        }
        self.writer
            .write_event(Event::End(BytesEnd::new(node.name.as_str())))
            .map_err(xml_io)?;
        Ok(self)
    }
}
