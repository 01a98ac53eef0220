/// Presentation part - the main part in a .pptx package.
///
/// Corresponds to `/ppt/presentation.xml` in the package.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::part::Part;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

/// One `p:sldId` entry: the slide id and the relationship pointing at the slide part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideEntry {
    pub id: u32,
    pub r_id: String,
}

/// The main presentation part.
///
/// This part contains the presentation-level properties and references to slides,
/// slide masters, and the notes master.
pub struct PresentationPart<'a> {
    /// The underlying OPC part
    part: &'a dyn Part,
}

/// The `r:id` of an element, whatever prefix the relationships namespace is bound to.
fn r_id_of(e: &BytesStart<'_>) -> Result<Option<String>> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref().contains(&b':') && attr.key.local_name().as_ref() == b"id" {
            let rid = std::str::from_utf8(&attr.value).map_err(|e| OoxmlError::Xml(e.to_string()))?;
            return Ok(Some(rid.to_string()));
        }
    }
    Ok(None)
}

fn int_attr(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<i64>> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == name {
            let value = std::str::from_utf8(&attr.value).map_err(|e| OoxmlError::Xml(e.to_string()))?;
            return value
                .parse::<i64>()
                .map(Some)
                .map_err(|e| OoxmlError::Xml(format!("invalid {} value: {}", String::from_utf8_lossy(name), e)));
        }
    }
    Ok(None)
}

impl<'a> PresentationPart<'a> {
    /// Create a PresentationPart from an OPC Part.
    pub fn from_part(part: &'a dyn Part) -> Result<Self> {
        Ok(Self { part })
    }

    /// Get the XML bytes of the presentation.
    #[inline]
    fn xml_bytes(&self) -> &[u8] {
        self.part.blob()
    }

    /// Call `visit` on every start or empty element, stopping early when it returns `false`.
    fn scan<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(&BytesStart<'_>) -> Result<bool>,
    {
        let mut reader = Reader::from_reader(self.xml_bytes());
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    if !visit(&e)? {
                        break;
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }
        Ok(())
    }

    /// Get the slide size `(cx, cy)` in EMU.
    ///
    /// Returns None if the slide size is not defined.
    pub fn slide_size(&self) -> Result<Option<(i64, i64)>> {
        let mut size = None;
        self.scan(|e| {
            if e.local_name().as_ref() == b"sldSz" {
                if let (Some(cx), Some(cy)) = (int_attr(e, b"cx")?, int_attr(e, b"cy")?) {
                    size = Some((cx, cy));
                }
                return Ok(false);
            }
            Ok(true)
        })?;
        Ok(size)
    }

    /// Get the slide entries in presentation order.
    pub fn slide_entries(&self) -> Result<Vec<SlideEntry>> {
        let mut entries = Vec::new();
        self.scan(|e| {
            if e.local_name().as_ref() == b"sldId" {
                let id = int_attr(e, b"id")?
                    .and_then(|id| u32::try_from(id).ok())
                    .ok_or_else(|| OoxmlError::InvalidFormat("p:sldId without id".to_string()))?;
                if let Some(r_id) = r_id_of(e)? {
                    entries.push(SlideEntry { id, r_id });
                }
            }
            Ok(true)
        })?;
        Ok(entries)
    }

    /// Get the relationship IDs of all slide masters.
    pub fn slide_master_rids(&self) -> Result<Vec<String>> {
        let mut rids = Vec::new();
        self.scan(|e| {
            if e.local_name().as_ref() == b"sldMasterId" {
                if let Some(r_id) = r_id_of(e)? {
                    rids.push(r_id);
                }
            }
            Ok(true)
        })?;
        Ok(rids)
    }

    /// Get the relationship ID of the notes master, if the presentation has one.
    pub fn notes_master_rid(&self) -> Result<Option<String>> {
        let mut rid = None;
        self.scan(|e| {
            if e.local_name().as_ref() == b"notesMasterId" {
                rid = r_id_of(e)?;
                return Ok(false);
            }
            Ok(true)
        })?;
        Ok(rid)
    }

    /// Get the underlying OPC part.
    #[inline]
    pub fn part(&self) -> &'a dyn Part {
        self.part
    }
}

/// What [`rewrite_presentation_xml`] puts into the presentation part.
#[derive(Debug, Clone)]
pub struct PresentationUpdate<'a> {
    pub slides: &'a [SlideEntry],
    pub slide_size: (i64, i64),
    /// Written as a fresh `p:notesMasterIdLst` when set
    pub notes_master_r_id: Option<&'a str>,
}

fn qualified(prefix: &[u8], local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{}:{}", String::from_utf8_lossy(prefix), local)
    }
}

fn write_slide_list(writer: &mut Writer<Vec<u8>>, prefix: &[u8], slides: &[SlideEntry]) -> Result<()> {
    if slides.is_empty() {
        return Ok(());
    }
    let list = qualified(prefix, "sldIdLst");
    writer.write_event(Event::Start(BytesStart::new(list.as_str())))?;
    let item = qualified(prefix, "sldId");
    for entry in slides {
        let id = entry.id.to_string();
        let mut elem = BytesStart::new(item.as_str());
        elem.push_attribute(("id", id.as_str()));
        elem.push_attribute(("r:id", entry.r_id.as_str()));
        writer.write_event(Event::Empty(elem))?;
    }
    writer.write_event(Event::End(BytesEnd::new(list.as_str())))?;
    Ok(())
}

fn write_slide_size(
    writer: &mut Writer<Vec<u8>>,
    prefix: &[u8],
    (cx, cy): (i64, i64),
    original: Option<&BytesStart<'_>>,
) -> Result<()> {
    let name = qualified(prefix, "sldSz");
    let (cx, cy) = (cx.to_string(), cy.to_string());
    let mut elem = BytesStart::new(name.as_str());
    elem.push_attribute(("cx", cx.as_str()));
    elem.push_attribute(("cy", cy.as_str()));
    if let Some(original) = original {
        for attr in original.attributes().flatten() {
            if !matches!(attr.key.as_ref(), b"cx" | b"cy") {
                elem.push_attribute(attr);
            }
        }
    }
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

/// Rewrite presentation XML: regenerate `p:sldIdLst`, replace `p:sldSz`, and
/// (re)write `p:notesMasterIdLst`. Everything else passes through unchanged.
pub fn rewrite_presentation_xml(xml: &[u8], update: &PresentationUpdate<'_>) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + 256));

    let mut depth = 0usize;
    // Depth at which the element being dropped started
    let mut skipping: Option<usize> = None;
    let mut prefix: Vec<u8> = b"p".to_vec();
    let mut wrote_slides = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| OoxmlError::Xml(e.to_string()))?;

        if let Some(start_depth) = skipping {
            match &event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == start_depth {
                        skipping = None;
                    }
                },
                Event::Eof => break,
                _ => {},
            }
            continue;
        }

        match event {
            Event::Start(e) => {
                let local = e.local_name();
                if depth == 0 {
                    prefix = e.name().prefix().map(|p| p.as_ref().to_vec()).unwrap_or_default();
                }
                let is_dropped = depth == 1
                    && (local.as_ref() == b"sldIdLst"
                        || (local.as_ref() == b"notesMasterIdLst" && update.notes_master_r_id.is_some()));
                if is_dropped {
                    skipping = Some(depth);
                    depth += 1;
                    continue;
                }
                if depth == 1 && local.as_ref() == b"sldSz" {
                    // An sldSz with children is unusual; drop them with it.
                    if !wrote_slides {
                        write_slide_list(&mut writer, &prefix, update.slides)?;
                        wrote_slides = true;
                    }
                    write_slide_size(&mut writer, &prefix, update.slide_size, Some(&e))?;
                    skipping = Some(depth);
                    depth += 1;
                    continue;
                }
                depth += 1;
                writer.write_event(Event::Start(e))?;
            },
            Event::Empty(e) => {
                let local = e.local_name();
                if depth == 1 {
                    match local.as_ref() {
                        b"sldIdLst" => continue,
                        b"notesMasterIdLst" if update.notes_master_r_id.is_some() => continue,
                        b"sldSz" => {
                            if !wrote_slides {
                                write_slide_list(&mut writer, &prefix, update.slides)?;
                                wrote_slides = true;
                            }
                            write_slide_size(&mut writer, &prefix, update.slide_size, Some(&e))?;
                            continue;
                        },
                        _ => {},
                    }
                }
                writer.write_event(Event::Empty(e))?;
            },
            Event::End(e) => {
                depth -= 1;
                if depth == 0 && !wrote_slides {
                    write_slide_list(&mut writer, &prefix, update.slides)?;
                    write_slide_size(&mut writer, &prefix, update.slide_size, None)?;
                    wrote_slides = true;
                }
                let closes_master_list = depth == 1 && e.local_name().as_ref() == b"sldMasterIdLst";
                writer.write_event(Event::End(e))?;
                if closes_master_list {
                    if let Some(r_id) = update.notes_master_r_id {
                        let list = qualified(&prefix, "notesMasterIdLst");
                        let item = qualified(&prefix, "notesMasterId");
                        writer.write_event(Event::Start(BytesStart::new(list.as_str())))?;
                        let mut elem = BytesStart::new(item.as_str());
                        elem.push_attribute(("r:id", r_id));
                        writer.write_event(Event::Empty(elem))?;
                        writer.write_event(Event::End(BytesEnd::new(list.as_str())))?;
                    }
                }
            },
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::content_type as ct;
    use crate::ooxml::opc::{PackURI, XmlPart};

    const PRES: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<p:presentation xmlns:a="a" xmlns:r="r" xmlns:p="p">"#,
        r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#,
        r#"<p:sldIdLst><p:sldId id="256" r:id="rId7"/><p:sldId id="257" r:id="rId8"/></p:sldIdLst>"#,
        r#"<p:sldSz cx="9144000" cy="6858000" type="screen4x3"/><p:notesSz cx="6858000" cy="9144000"/>"#,
        r#"</p:presentation>"#
    );

    fn part(xml: &[u8]) -> XmlPart {
        XmlPart::new(
            PackURI::new("/ppt/presentation.xml").unwrap(),
            ct::PML_PRESENTATION_MAIN.to_string(),
            xml.to_vec(),
        )
    }

    #[test]
    fn test_read_presentation() {
        let part = part(PRES.as_bytes());
        let pres = PresentationPart::from_part(&part).unwrap();
        assert_eq!(pres.slide_size().unwrap(), Some((9_144_000, 6_858_000)));
        assert_eq!(pres.slide_master_rids().unwrap(), vec!["rId1".to_string()]);
        assert_eq!(
            pres.slide_entries().unwrap(),
            vec![
                SlideEntry { id: 256, r_id: "rId7".to_string() },
                SlideEntry { id: 257, r_id: "rId8".to_string() },
            ]
        );
        assert_eq!(pres.notes_master_rid().unwrap(), None);
    }

    #[test]
    fn test_rewrite_presentation() {
        let slides = [SlideEntry { id: 300, r_id: "rId9".to_string() }];
        let xml = rewrite_presentation_xml(
            PRES.as_bytes(),
            &PresentationUpdate {
                slides: &slides,
                slide_size: (12_192_000, 6_858_000),
                notes_master_r_id: Some("rId10"),
            },
        )
        .unwrap();

        let part = part(&xml);
        let pres = PresentationPart::from_part(&part).unwrap();
        assert_eq!(pres.slide_size().unwrap(), Some((12_192_000, 6_858_000)));
        assert_eq!(pres.slide_entries().unwrap(), slides.to_vec());
        assert_eq!(pres.notes_master_rid().unwrap().as_deref(), Some("rId10"));

        let text = String::from_utf8(xml).unwrap();
        // Schema order: masters, notes master, slides, size.
        let masters = text.find("sldMasterIdLst").unwrap();
        let notes = text.find("notesMasterIdLst").unwrap();
        let slides_at = text.find("sldIdLst").unwrap();
        let size = text.find("sldSz").unwrap();
        assert!(masters < notes && notes < slides_at && slides_at < size);
        assert!(text.contains(r#"type="screen4x3""#));
    }

    #[test]
    fn test_rewrite_without_slides_drops_list() {
        let xml = rewrite_presentation_xml(
            PRES.as_bytes(),
            &PresentationUpdate {
                slides: &[],
                slide_size: (9_144_000, 6_858_000),
                notes_master_r_id: None,
            },
        )
        .unwrap();
        let text = String::from_utf8(xml).unwrap();
        assert!(!text.contains("sldIdLst"));
        assert!(text.contains("notesSz"));
    }
}
