//! A small read-only XML element tree.
//!
//! Slide, layout and master parts are parsed once into [`XmlNode`]s and then
//! walked by local name, which keeps the PresentationML readers free of
//! event-loop bookkeeping. Namespace prefixes are kept as written.

use super::escape::{resolve_reference, unescape_xml};
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use smallvec::SmallVec;

/// A child of an element: either a nested element or a run of text.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlChild {
    Element(XmlNode),
    Text(String),
}

/// An XML element with its attributes and children in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    /// Qualified name as written, e.g. `p:sp`
    pub name: String,
    pub attributes: SmallVec<[(String, String); 4]>,
    pub children: Vec<XmlChild>,
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| OoxmlError::Xml(e.to_string()))
}

fn open_element(e: &BytesStart<'_>) -> Result<XmlNode> {
    let mut node = XmlNode {
        name: utf8(e.name().as_ref())?.to_string(),
        ..Default::default()
    };
    for attr in e.attributes() {
        let attr = attr.map_err(|e| OoxmlError::Xml(e.to_string()))?;
        let key = utf8(attr.key.as_ref())?;
        let value = unescape_xml(utf8(&attr.value)?);
        node.attributes.push((key.to_string(), value));
    }
    Ok(node)
}

impl XmlNode {
    /// Parse the root element of an XML document.
    pub fn parse(xml: &[u8]) -> Result<XmlNode> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::new();
        let mut stack: Vec<XmlNode> = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => stack.push(open_element(e)?),
                Ok(Event::Empty(ref e)) => {
                    let node = open_element(e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(XmlChild::Element(node)),
                        None => return Ok(node),
                    }
                },
                Ok(Event::End(_)) => {
                    if let Some(node) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.children.push(XmlChild::Element(node)),
                            None => return Ok(node),
                        }
                    }
                },
                Ok(Event::Text(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        current.push_text(&unescape_xml(utf8(t.as_ref())?));
                    }
                },
                Ok(Event::CData(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        current.push_text(utf8(t.as_ref())?);
                    }
                },
                Ok(Event::GeneralRef(ref r)) => {
                    if let Some(current) = stack.last_mut() {
                        let name = utf8(r.as_ref())?;
                        match resolve_reference(name) {
                            Some(c) => current.push_text(c.encode_utf8(&mut [0; 4])),
                            None => current.push_text(&format!("&{};", name)),
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(format!("XML parsing error: {}", e))),
                _ => {},
            }
            buf.clear();
        }

        Err(OoxmlError::Xml("No root element found".to_string()))
    }

    /// Append text, merging with a preceding text child.
    fn push_text(&mut self, text: &str) {
        if let Some(XmlChild::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(XmlChild::Text(text.to_string()));
        }
    }

    /// The name without its namespace prefix.
    #[inline]
    pub fn local_name(&self) -> &str {
        local(&self.name)
    }

    /// Look up an attribute by its qualified name, falling back to the local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .or_else(|| self.attributes.iter().find(|(k, _)| local(k) == name))
            .map(|(_, v)| v.as_str())
    }

    /// Look up a namespace-prefixed attribute by local name, e.g. `r:id` via `"id"`.
    pub fn prefixed_attr(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.contains(':') && local(k) == local_name)
            .map(|(_, v)| v.as_str())
    }

    /// Parse an attribute as an integer.
    pub fn attr_i64(&self, name: &str) -> Option<i64> {
        self.attr(name)
            .and_then(|v| atoi_simd::parse::<i64, false, false>(v.as_bytes()).ok())
    }

    /// Parse an OOXML boolean attribute (`1`, `true`, `on`).
    pub fn attr_bool(&self, name: &str) -> Option<bool> {
        self.attr(name).map(|v| matches!(v, "1" | "true" | "on"))
    }

    /// Iterate over element children.
    pub fn elements(&self) -> impl Iterator<Item = &XmlNode> {
        self.children.iter().filter_map(|c| match c {
            XmlChild::Element(e) => Some(e),
            XmlChild::Text(_) => None,
        })
    }

    /// The first element child with the given local name.
    pub fn child(&self, local_name: &str) -> Option<&XmlNode> {
        self.elements().find(|e| e.local_name() == local_name)
    }

    /// All element children with the given local name.
    pub fn children_named<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.elements().filter(move |e| e.local_name() == local_name)
    }

    /// Descend through a path of local names.
    pub fn find(&self, path: &[&str]) -> Option<&XmlNode> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }

    /// Concatenated text content of this element and its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlChild::Text(t) => out.push_str(t),
                XmlChild::Element(e) => e.collect_text(out),
            }
        }
    }
}

#[inline]
fn local(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, l)| l)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld name="Intro">
    <p:spTree>
      <p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/></p:nvSpPr>
        <p:txBody><a:p><a:r><a:t>Q&amp;A &lt;now&gt;</a:t></a:r></a:p></p:txBody>
      </p:sp>
    </p:spTree>
  </p:cSld>
</p:sld>"#;

    #[test]
    fn test_parse_and_navigate() {
        let root = XmlNode::parse(SAMPLE).unwrap();
        assert_eq!(root.name, "p:sld");
        assert_eq!(root.local_name(), "sld");

        let c_sld = root.child("cSld").unwrap();
        assert_eq!(c_sld.attr("name"), Some("Intro"));

        let sp = c_sld.find(&["spTree", "sp"]).unwrap();
        let c_nv_pr = sp.find(&["nvSpPr", "cNvPr"]).unwrap();
        assert_eq!(c_nv_pr.attr_i64("id"), Some(2));
        assert_eq!(c_nv_pr.attr("name"), Some("Title 1"));

        let t = sp.find(&["txBody", "p", "r", "t"]).unwrap();
        assert_eq!(t.text(), "Q&A <now>");
    }

    #[test]
    fn test_empty_root_and_missing_root() {
        let root = XmlNode::parse(br#"<a:bodyPr wrap="none"/>"#).unwrap();
        assert_eq!(root.attr("wrap"), Some("none"));
        assert!(root.children.is_empty());

        assert!(XmlNode::parse(b"   ").is_err());
    }

    #[test]
    fn test_attr_local_fallback() {
        let root = XmlNode::parse(br#"<a:blip r:embed="rId2"/>"#).unwrap();
        assert_eq!(root.attr("r:embed"), Some("rId2"));
        assert_eq!(root.attr("embed"), Some("rId2"));
        assert_eq!(root.attr_bool("missing"), None);
    }

    #[test]
    fn test_attr_i64_signs() {
        let root = XmlNode::parse(br#"<a:off x="-12700" y="914400" z="1e3"/>"#).unwrap();
        assert_eq!(root.attr_i64("x"), Some(-12_700));
        assert_eq!(root.attr_i64("y"), Some(914_400));
        assert_eq!(root.attr_i64("z"), None);
    }
}
