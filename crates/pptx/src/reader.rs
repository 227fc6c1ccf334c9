//! PPTX file reader.
//!
//! Reopens a saved package into the presentation object model, so the
//! written deck can be checked slide by slide.

use crate::template::{self, rel_type};
use couplesnap_core::{
    Emu, Error, Font, LayoutKind, Paragraph, PlaceholderKind, Points, Presentation, Result, Rgb,
    Slide, TextFrame,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Reader for PPTX (Office Open XML) files.
pub struct PptxReader;

impl PptxReader {
    /// Create a new PPTX reader.
    pub fn new() -> Self {
        Self
    }

    /// Open and read the PPTX file at `path`.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<Presentation> {
        let file = File::open(path.as_ref())?;
        self.read(BufReader::new(file))
    }

    /// Read a PPTX package from a reader.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<Presentation> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut presentation = Presentation::new();
        let pres_xml = self.read_file_from_archive(&mut archive, template::PRESENTATION_PART)?;
        let info = parse_presentation_xml(&pres_xml)?;
        if let Some((cx, cy)) = info.slide_size {
            presentation.set_slide_width(Emu(cx));
            presentation.set_slide_height(Emu(cy));
        }

        let slide_order = self.get_slide_order(&mut archive, &info.slide_rel_ids)?;
        for slide_path in &slide_order {
            let slide = self.parse_slide(&mut archive, slide_path)?;
            presentation.push_slide(slide);
        }

        log::debug!("Read {} slides", presentation.slide_count());
        Ok(presentation)
    }

    /// Get the ordered list of slide paths.
    ///
    /// `p:sldIdLst` defines the order. If it is missing, slides are sorted by
    /// the number in their relationship id or file name.
    fn get_slide_order<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_rel_ids: &[String],
    ) -> Result<Vec<String>> {
        let rels_content =
            self.read_file_from_archive(archive, template::PRESENTATION_RELS_PART)?;
        let rels = parse_relationships(&rels_content)?;

        let mut slides: Vec<(String, Option<usize>)> = Vec::new();
        for rel in rels.iter().filter(|r| r.rel_type == rel_type::SLIDE) {
            let full_path = resolve_part("ppt", &rel.target);
            let position = slide_rel_ids.iter().position(|id| *id == rel.id);
            let order_num = match position {
                Some(pos) => Some(pos),
                None if slide_rel_ids.is_empty() => {
                    extract_slide_number(&rel.id).or_else(|| extract_slide_number(&rel.target))
                }
                None => {
                    log::warn!("Slide {} is not listed in sldIdLst, skipping", rel.target);
                    continue;
                }
            };
            slides.push((full_path, order_num));
        }

        if slides.len() < slide_rel_ids.len() {
            return Err(Error::CorruptedFile(format!(
                "sldIdLst lists {} slides but only {} slide relationships exist",
                slide_rel_ids.len(),
                slides.len()
            )));
        }

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
    ) -> Result<Slide> {
        let layout = self.slide_layout(archive, slide_path)?;
        let content = self.read_file_from_archive(archive, slide_path)?;

        let mut slide = Slide::new(layout);
        for shape in extract_placeholders(&content)? {
            *slide.placeholder_mut(shape.idx)? = TextFrame::from_paragraphs(shape.paragraphs);
        }
        Ok(slide)
    }

    /// Resolve the layout a slide was created from via its relationships.
    fn slide_layout<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
    ) -> Result<LayoutKind> {
        let (dir, _) = split_part(slide_path);
        let rels_content = self.read_file_from_archive(archive, &rels_part_for(slide_path))?;
        let layout_rel = parse_relationships(&rels_content)?
            .into_iter()
            .find(|r| r.rel_type == rel_type::SLIDE_LAYOUT)
            .ok_or_else(|| {
                Error::CorruptedFile(format!("Slide '{}' has no layout relationship", slide_path))
            })?;

        let layout_path = resolve_part(dir, &layout_rel.target);
        let layout_xml = self.read_file_from_archive(archive, &layout_path)?;
        let layout_type = root_attribute(&layout_xml, b"type")?;
        layout_type
            .as_deref()
            .and_then(LayoutKind::from_ooxml_type)
            .ok_or_else(|| {
                Error::CorruptedFile(format!(
                    "Unsupported layout type {:?} in '{}'",
                    layout_type, layout_path
                ))
            })
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxReader {
    fn default() -> Self {
        Self::new()
    }
}

/// What `presentation.xml` tells us.
#[derive(Debug, Default)]
struct PresentationInfo {
    slide_size: Option<(i64, i64)>,
    slide_rel_ids: Vec<String>,
}

fn xml_error(context: &str, e: impl std::fmt::Display) -> Error {
    Error::XmlError(format!("Error parsing {}: {}", context, e))
}

fn attribute(e: &BytesStart, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| xml_error("attribute", err))?;
        if attr.key.as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|err| xml_error("attribute", err))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn parse_presentation_xml(xml: &str) -> Result<PresentationInfo> {
    let mut info = PresentationInfo::default();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                match local_name(e.name().as_ref()) {
                    b"sldId" => {
                        if let Some(id) = attribute(e, b"r:id")? {
                            info.slide_rel_ids.push(id);
                        }
                    }
                    b"sldSz" => {
                        let cx = attribute(e, b"cx")?.and_then(|v| v.parse().ok());
                        let cy = attribute(e, b"cy")?.and_then(|v| v.parse().ok());
                        if let (Some(cx), Some(cy)) = (cx, cy) {
                            info.slide_size = Some((cx, cy));
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error("presentation", e)),
            _ => {}
        }
    }

    Ok(info)
}

/// A `Relationship` entry from a `.rels` part.
#[derive(Debug)]
struct Relationship {
    id: String,
    rel_type: String,
    target: String,
}

fn parse_relationships(xml: &str) -> Result<Vec<Relationship>> {
    let mut rels = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                rels.push(Relationship {
                    id: attribute(e, b"Id")?.unwrap_or_default(),
                    rel_type: attribute(e, b"Type")?.unwrap_or_default(),
                    target: attribute(e, b"Target")?.unwrap_or_default(),
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error("relationships", e)),
            _ => {}
        }
    }

    Ok(rels)
}

/// Value of `key` on the document's root element.
fn root_attribute(xml: &str, key: &[u8]) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => return attribute(e, key),
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(xml_error("layout", e)),
            _ => {}
        }
    }
}

/// A placeholder shape parsed from slide XML.
#[derive(Debug, Default)]
struct ShapeInfo {
    placeholder: Option<(PlaceholderKind, u32)>,
    paragraphs: Vec<Paragraph>,
}

/// Parsed placeholder ready to be placed on a slide.
#[derive(Debug)]
struct PlaceholderShape {
    idx: u32,
    paragraphs: Vec<Paragraph>,
}

/// Extract placeholder shapes with their paragraphs from slide XML.
///
/// Whitespace inside `a:t` is significant and kept as-is. Shapes that are not
/// placeholders are ignored.
fn extract_placeholders(xml_content: &str) -> Result<Vec<PlaceholderShape>> {
    let mut shapes = Vec::new();
    let mut reader = Reader::from_str(xml_content);

    let mut current_shape: Option<ShapeInfo> = None;
    let mut current_paragraph: Option<Paragraph> = None;
    let mut in_run_props = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => current_shape = Some(ShapeInfo::default()),
                b"ph" => read_placeholder(e, current_shape.as_mut())?,
                b"p" if current_shape.is_some() => {
                    current_paragraph = Some(Paragraph::new(""));
                }
                b"rPr" | b"endParaRPr" => {
                    in_run_props = true;
                    read_run_props(e, current_paragraph.as_mut())?;
                }
                b"srgbClr" if in_run_props => read_color(e, current_paragraph.as_mut())?,
                b"t" => in_text = current_paragraph.is_some(),
                b"br" => push_line_break(current_paragraph.as_mut()),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"ph" => read_placeholder(e, current_shape.as_mut())?,
                b"rPr" | b"endParaRPr" => read_run_props(e, current_paragraph.as_mut())?,
                b"srgbClr" if in_run_props => read_color(e, current_paragraph.as_mut())?,
                b"br" => push_line_break(current_paragraph.as_mut()),
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_text {
                    if let Some(paragraph) = current_paragraph.as_mut() {
                        let text = e.unescape().map_err(|err| xml_error("slide text", err))?;
                        paragraph.text.push_str(&decode_control_chars(&text));
                    }
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => {
                    if let Some(shape) = current_shape.take() {
                        if let Some((_, idx)) = shape.placeholder {
                            shapes.push(PlaceholderShape {
                                idx,
                                paragraphs: shape.paragraphs,
                            });
                        }
                    }
                    current_paragraph = None;
                }
                b"p" => {
                    if let (Some(shape), Some(paragraph)) =
                        (current_shape.as_mut(), current_paragraph.take())
                    {
                        shape.paragraphs.push(paragraph);
                    }
                }
                b"rPr" | b"endParaRPr" => in_run_props = false,
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error("slide", e)),
            _ => {}
        }
    }

    Ok(shapes)
}

/// `a:br` is a soft line break inside the paragraph.
fn push_line_break(paragraph: Option<&mut Paragraph>) {
    if let Some(paragraph) = paragraph {
        paragraph.text.push('\u{000B}');
    }
}

/// Undo the `_xHHHH_` escaping of control characters in run text. Other
/// `_x..._` sequences are left alone.
fn decode_control_chars(text: &str) -> Cow<'_, str> {
    if !text.contains("_x") {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("_x") {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32)
            .filter(|c| c.is_control());
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &candidate[7..];
            }
            None => {
                out.push_str("_x");
                rest = &candidate[2..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn read_placeholder(e: &BytesStart, shape: Option<&mut ShapeInfo>) -> Result<()> {
    let Some(shape) = shape else {
        return Ok(());
    };
    let ph_type = attribute(e, b"type")?;
    let kind = PlaceholderKind::from_ooxml_type(ph_type.as_deref()).ok_or_else(|| {
        Error::CorruptedFile(format!("Unsupported placeholder type {:?}", ph_type))
    })?;
    let idx = match attribute(e, b"idx")? {
        Some(v) => v
            .parse()
            .map_err(|_| Error::CorruptedFile(format!("Invalid placeholder idx '{}'", v)))?,
        None => 0,
    };
    shape.placeholder = Some((kind, idx));
    Ok(())
}

/// Take `sz` and `b` from the first run that sets them.
fn read_run_props(e: &BytesStart, paragraph: Option<&mut Paragraph>) -> Result<()> {
    let Some(paragraph) = paragraph else {
        return Ok(());
    };
    let font: &mut Font = paragraph.font_mut();
    if font.size.is_none() {
        font.size = attribute(e, b"sz")?
            .and_then(|v| v.parse().ok())
            .map(Points::from_centipoints);
    }
    if font.bold.is_none() {
        font.bold = attribute(e, b"b")?.map(|v| v == "1" || v == "true");
    }
    Ok(())
}

fn read_color(e: &BytesStart, paragraph: Option<&mut Paragraph>) -> Result<()> {
    let Some(paragraph) = paragraph else {
        return Ok(());
    };
    if paragraph.font.color.is_none() {
        paragraph.font.color = attribute(e, b"val")?.as_deref().and_then(Rgb::from_hex);
    }
    Ok(())
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Split a part name into its directory and file name.
fn split_part(part: &str) -> (&str, &str) {
    part.rsplit_once('/').unwrap_or(("", part))
}

/// The `.rels` part that belongs to `part`.
fn rels_part_for(part: &str) -> String {
    let (dir, file) = split_part(part);
    if dir.is_empty() {
        format!("_rels/{}.rels", file)
    } else {
        format!("{}/_rels/{}.rels", dir, file)
    }
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_part(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    // Remove common extensions first
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_slide_number() {
        assert_eq!(extract_slide_number("rId1"), Some(1));
        assert_eq!(extract_slide_number("rId12"), Some(12));
        assert_eq!(extract_slide_number("slide1.xml"), Some(1));
        assert_eq!(extract_slide_number("slide123.xml"), Some(123));
        assert_eq!(extract_slide_number("nodigits"), None);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_resolve_part() {
        assert_eq!(resolve_part("ppt", "slides/slide1.xml"), "ppt/slides/slide1.xml");
        assert_eq!(
            resolve_part("ppt/slides", "../slideLayouts/slideLayout2.xml"),
            "ppt/slideLayouts/slideLayout2.xml"
        );
        assert_eq!(resolve_part("ppt", "/ppt/slides/slide2.xml"), "ppt/slides/slide2.xml");
        assert_eq!(rels_part_for("ppt/slides/slide4.xml"), "ppt/slides/_rels/slide4.xml.rels");
    }

    #[test]
    fn test_extract_placeholders_keeps_whitespace_and_empty_lines() {
        let xml = r#"<p:sld xmlns:p="p" xmlns:a="a"><p:cSld><p:spTree>
            <p:sp><p:nvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
              <p:txBody><a:p><a:r><a:rPr lang="en-US"/><a:t>Security &amp; Privacy</a:t></a:r></a:p></p:txBody></p:sp>
            <p:sp><p:nvSpPr><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr>
              <p:txBody><a:p><a:r><a:t>🔒 End-to-End</a:t></a:r></a:p><a:p><a:r><a:t>   • Forward secrecy</a:t></a:r></a:p><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>
            <p:sp><p:txBody><a:p><a:r><a:t>Not a placeholder</a:t></a:r></a:p></p:txBody></p:sp>
        </p:spTree></p:cSld></p:sld>"#;

        let shapes = extract_placeholders(xml).unwrap();
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].idx, 0);
        assert_eq!(shapes[0].paragraphs[0].text, "Security & Privacy");

        let body = TextFrame::from_paragraphs(shapes.into_iter().nth(1).unwrap().paragraphs);
        assert_eq!(body.text(), "🔒 End-to-End\n   • Forward secrecy\n");
    }

    #[test]
    fn test_extract_placeholders_reads_font() {
        let xml = r#"<p:sld xmlns:p="p" xmlns:a="a"><p:cSld><p:spTree>
            <p:sp><p:nvSpPr><p:nvPr><p:ph type="ctrTitle"/></p:nvPr></p:nvSpPr>
              <p:txBody><a:p><a:r><a:rPr lang="en-US" sz="6000" b="1"><a:solidFill><a:srgbClr val="007AFF"/></a:solidFill></a:rPr><a:t>CoupleSnap</a:t></a:r></a:p></p:txBody></p:sp>
        </p:spTree></p:cSld></p:sld>"#;

        let shapes = extract_placeholders(xml).unwrap();
        let font = shapes[0].paragraphs[0].font;
        assert_eq!(font.size, Some(Points(60)));
        assert_eq!(font.bold, Some(true));
        assert_eq!(font.color, Some(Rgb(0, 122, 255)));
    }

    #[test]
    fn test_extract_placeholders_reads_line_breaks() {
        let xml = r#"<p:sld xmlns:p="p" xmlns:a="a"><p:cSld><p:spTree>
            <p:sp><p:nvSpPr><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr>
              <p:txBody><a:p><a:r><a:t>one</a:t></a:r><a:br><a:rPr lang="en-US"/></a:br><a:r><a:t>two</a:t></a:r><a:br/><a:r><a:t>three</a:t></a:r></a:p></p:txBody></p:sp>
        </p:spTree></p:cSld></p:sld>"#;

        let shapes = extract_placeholders(xml).unwrap();
        assert_eq!(shapes[0].paragraphs[0].text, "one\u{000B}two\u{000B}three");
    }

    #[test]
    fn test_decode_control_chars() {
        assert_eq!(decode_control_chars("plain"), "plain");
        assert_eq!(decode_control_chars("a_x0001_b"), "a\u{0001}b");
        assert_eq!(decode_control_chars("bell_x0007_"), "bell\u{0007}");
        // Printable characters and malformed sequences stay literal.
        assert_eq!(decode_control_chars("_x0041_"), "_x0041_");
        assert_eq!(decode_control_chars("_x+001_"), "_x+001_");
        assert_eq!(decode_control_chars("snake_x_case"), "snake_x_case");
    }

    #[test]
    fn test_parse_presentation_xml() {
        let xml = r#"<p:presentation xmlns:p="p" xmlns:r="r"><p:sldIdLst><p:sldId id="257" r:id="rId3"/><p:sldId id="256" r:id="rId2"/></p:sldIdLst><p:sldSz cx="9144000" cy="6858000"/></p:presentation>"#;
        let info = parse_presentation_xml(xml).unwrap();
        assert_eq!(info.slide_rel_ids, vec!["rId3", "rId2"]);
        assert_eq!(info.slide_size, Some((9_144_000, 6_858_000)));
    }
}
