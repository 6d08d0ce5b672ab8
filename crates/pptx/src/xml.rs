//! Small wrapper around `quick_xml::Writer` for building OOXML parts.

use deck_core::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

pub(crate) const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_R: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub(crate) const NS_PKG_RELS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";

pub(crate) struct XmlBuilder {
    writer: Writer<Vec<u8>>,
}

impl XmlBuilder {
    /// Start a standalone UTF-8 document.
    pub fn new() -> Result<Self> {
        let mut builder = Self {
            writer: Writer::new(Vec::new()),
        };
        builder.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(builder)
    }

    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.write(Event::Start(elem))?;
        Ok(self)
    }

    pub fn end(&mut self, name: &str) -> Result<&mut Self> {
        self.write(Event::End(BytesEnd::new(name)))?;
        Ok(self)
    }

    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.write(Event::Empty(elem))?;
        Ok(self)
    }

    /// `<name>text</name>` with the text escaped.
    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self> {
        self.start(name, &[])?;
        self.write(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    /// `<a:solidFill><a:srgbClr val="RRGGBB"/></a:solidFill>`
    pub fn solid_fill(&mut self, hex: &str) -> Result<&mut Self> {
        self.start("a:solidFill", &[])?;
        self.empty("a:srgbClr", &[("val", hex)])?;
        self.end("a:solidFill")
    }

    pub fn finish(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner())
            .map_err(|e| Error::Xml(format!("Generated XML is not UTF-8: {}", e)))
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::Xml(e.to_string()))
    }
}

/// A relationships part (`*.rels`) listing `(id, type suffix, target)`.
///
/// Type suffixes are appended to the officeDocument relationships namespace.
pub(crate) fn relationships(rels: &[(&str, &str, &str)]) -> Result<String> {
    let mut xml = XmlBuilder::new()?;
    xml.start("Relationships", &[("xmlns", NS_PKG_RELS)])?;
    for &(id, kind, target) in rels {
        let rel_type = if kind.starts_with("http") {
            kind.to_string()
        } else {
            format!("{}/{}", NS_R, kind)
        };
        xml.empty(
            "Relationship",
            &[("Id", id), ("Type", rel_type.as_str()), ("Target", target)],
        )?;
    }
    xml.end("Relationships")?;
    xml.finish()
}
