//! Thin indented XML writer over `quick-xml`.

use crate::error::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";
pub const WPML_NAMESPACE: &str = "http://www.dji.com/wpmz/1.0.3";

/// Streaming writer; element names are written exactly as given.
pub(crate) struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// Start a UTF-8 document with its declaration.
    pub fn new() -> Result<Self> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(Self { writer })
    }

    pub fn open(&mut self, name: &str) -> Result<()> {
        self.open_with(name, &[])
    }

    pub fn open_with(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for attribute in attributes {
            start.push_attribute(*attribute);
        }
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    pub fn close(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// `<name>text</name>`, with `text` escaped.
    pub fn element(&mut self, name: &str, text: &str) -> Result<()> {
        self.open(name)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    /// `<wpml:name>text</wpml:name>`
    pub fn wpml(&mut self, name: &str, text: impl AsRef<str>) -> Result<()> {
        self.element(&format!("wpml:{name}"), text.as_ref())
    }

    pub fn open_wpml(&mut self, name: &str) -> Result<()> {
        self.open(&format!("wpml:{name}"))
    }

    pub fn close_wpml(&mut self, name: &str) -> Result<()> {
        self.close(&format!("wpml:{name}"))
    }

    pub fn finish(self) -> Result<String> {
        Ok(String::from_utf8(self.writer.into_inner())?)
    }
}
