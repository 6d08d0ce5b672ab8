//! Read access to Office Open XML packages, shared by the PPTX and DOCX
//! readers.

use deck_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// An opened OOXML zip container.
pub(crate) struct Package<R> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> Package<R> {
    pub fn open(reader: R) -> Result<Self> {
        let archive =
            ZipArchive::new(reader).map_err(|e| Error::Zip(format!("Not a zip package: {}", e)))?;
        Ok(Self { archive })
    }

    /// The named part as UTF-8 text.
    pub fn read_part(&mut self, name: &str) -> Result<String> {
        let mut part = self
            .archive
            .by_name(name)
            .map_err(|e| Error::Zip(format!("Missing part '{}': {}", name, e)))?;
        let mut xml = String::new();
        part.read_to_string(&mut xml)
            .map_err(|e| Error::Zip(format!("Cannot read part '{}': {}", name, e)))?;
        Ok(xml)
    }

    pub fn relationships(&mut self, rels_part: &str) -> Result<Vec<Relationship>> {
        let xml = self.read_part(rels_part)?;
        parse_relationships(&xml)
    }
}

/// One `<Relationship>` entry of a `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relationship {
    pub id: String,
    pub kind: String,
    pub target: String,
}

impl Relationship {
    /// True when the relationship type URI ends in `/<name>`.
    pub fn is(&self, name: &str) -> bool {
        self.kind
            .rsplit('/')
            .next()
            .is_some_and(|last| last == name)
    }

    /// Part name of the target, relative targets resolved against `base`.
    pub fn part_name(&self, base: &str) -> String {
        match self.target.strip_prefix('/') {
            Some(absolute) => absolute.to_string(),
            None => format!("{}/{}", base.trim_end_matches('/'), self.target),
        }
    }
}

pub(crate) fn parse_relationships(xml: &str) -> Result<Vec<Relationship>> {
    let mut reader = Reader::from_str(xml);
    let mut found = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if unprefixed(e.name().as_ref()) == b"Relationship" => {
                found.push(Relationship {
                    id: attribute(&e, b"Id"),
                    kind: attribute(&e, b"Type"),
                    target: attribute(&e, b"Target"),
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(format!("Bad relationships part: {}", e))),
            _ => {}
        }
    }

    Ok(found)
}

/// Attribute value by local key, empty when absent.
pub(crate) fn attribute(element: &BytesStart, key: &[u8]) -> String {
    element
        .attributes()
        .flatten()
        .find(|attr| unprefixed(attr.key.as_ref()) == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
        .unwrap_or_default()
}

/// Element name without its namespace prefix: `a:t` is `t`.
pub(crate) fn unprefixed(name: &[u8]) -> &[u8] {
    name.rsplit(|&b| b == b':').next().unwrap_or(name)
}

/// The number a part name or id ends with: `slides/slide12.xml` is 12.
pub(crate) fn trailing_number(name: &str) -> Option<usize> {
    let stem = name.strip_suffix(".xml").unwrap_or(name);
    let start = stem
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(idx, _)| idx)?;
    stem[start..].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unprefixed() {
        assert_eq!(unprefixed(b"w:p"), b"p");
        assert_eq!(unprefixed(b"Relationship"), b"Relationship");
    }

    #[test]
    fn test_trailing_number() {
        assert_eq!(trailing_number("slides/slide12.xml"), Some(12));
        assert_eq!(trailing_number("rId3"), Some(3));
        assert_eq!(trailing_number("theme/theme.xml"), None);
    }

    #[test]
    fn test_parse_relationships() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/>
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="/ppt/slideMasters/slideMaster1.xml"/>
</Relationships>"#;

        let rels = parse_relationships(xml).unwrap();
        assert_eq!(rels.len(), 2);
        assert!(rels[0].is("slide"));
        assert!(!rels[1].is("slide"));
        assert_eq!(rels[0].part_name("ppt"), "ppt/slides/slide1.xml");
        assert_eq!(rels[1].part_name("ppt"), "ppt/slideMasters/slideMaster1.xml");
    }
}
