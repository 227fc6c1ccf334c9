//! PPTX package writer.

use crate::template::{self, content_type, rel_type};
use couplesnap_core::{Error, Font, LayoutKind, Paragraph, Placeholder, Presentation, Result, Slide};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::fs;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Id of the first slide in `p:sldIdLst`; lower values are reserved.
const FIRST_SLIDE_ID: usize = 256;

/// Writer for PPTX (Office Open XML) presentation packages.
pub struct PptxWriter;

impl PptxWriter {
    /// Create a new PPTX writer.
    pub fn new() -> Self {
        Self
    }

    /// Save `prs` to `path`, replacing any existing file.
    ///
    /// The package is written to a temporary file next to `path` and renamed
    /// into place once complete, so a failure never leaves a partial file.
    ///
    /// A symlink at `path` is followed, so the link's target is replaced. An
    /// existing file keeps its permissions; a new one gets the default
    /// `0o666` filtered by the process umask.
    pub fn save(&self, prs: &Presentation, path: impl AsRef<Path>) -> Result<()> {
        let requested = path.as_ref();
        let path = resolve_symlink(requested)?;
        if path != requested {
            log::debug!(
                "Following symlink {} to {}",
                requested.display(),
                path.display()
            );
        }
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix(".couplesnap-").suffix(".pptx.tmp");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Subject to the umask, like a plain create.
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        let mut staged = builder.tempfile_in(dir)?;
        log::debug!("Staging package at {}", staged.path().display());

        self.write(prs, staged.as_file_mut())?;
        if let Ok(existing) = fs::metadata(&path) {
            if existing.is_file() {
                staged.as_file().set_permissions(existing.permissions())?;
            }
        }
        staged.as_file().sync_all()?;
        staged.persist(&path).map_err(|e| Error::IoError(e.error))?;

        log::info!(
            "Saved {} slides to {}",
            prs.slide_count(),
            path.display()
        );
        Ok(())
    }

    /// Write `prs` as a complete package into `writer`.
    pub fn write<W: Write + Seek>(&self, prs: &Presentation, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let slide_count = prs.slide_count();

        add_part(&mut zip, "[Content_Types].xml", &content_types_xml(slide_count)?)?;
        add_part(&mut zip, "_rels/.rels", &package_rels_xml()?)?;
        add_part(&mut zip, template::CORE_PROPS_PART, &core_props_xml(prs)?)?;
        add_part(&mut zip, template::APP_PROPS_PART, &app_props_xml(prs)?)?;

        add_part(&mut zip, template::PRESENTATION_PART, &presentation_xml(prs)?)?;
        add_part(
            &mut zip,
            template::PRESENTATION_RELS_PART,
            &presentation_rels_xml(slide_count)?,
        )?;
        add_part(&mut zip, template::PRES_PROPS_PART, template::PRES_PROPS_XML.as_bytes())?;
        add_part(&mut zip, template::VIEW_PROPS_PART, template::VIEW_PROPS_XML.as_bytes())?;
        add_part(&mut zip, template::TABLE_STYLES_PART, template::TABLE_STYLES_XML.as_bytes())?;
        add_part(&mut zip, template::THEME_PART, template::theme_xml().as_bytes())?;

        add_part(
            &mut zip,
            template::SLIDE_MASTER_PART,
            template::slide_master_xml().as_bytes(),
        )?;
        add_part(&mut zip, template::SLIDE_MASTER_RELS_PART, &slide_master_rels_xml()?)?;

        for &layout in LayoutKind::ALL {
            add_part(
                &mut zip,
                &template::slide_layout_part(layout),
                template::slide_layout_xml(layout).as_bytes(),
            )?;
            add_part(
                &mut zip,
                &template::slide_layout_rels_part(layout),
                &relationships_xml(&[(
                    "rId1",
                    rel_type::SLIDE_MASTER,
                    "../slideMasters/slideMaster1.xml",
                )])?,
            )?;
        }

        for (idx, slide) in prs.slides().iter().enumerate() {
            let number = idx + 1;
            add_part(&mut zip, &template::slide_part(number), &slide_xml(slide)?)?;

            let layout_target = format!(
                "../slideLayouts/slideLayout{}.xml",
                slide.layout().index() + 1
            );
            add_part(
                &mut zip,
                &template::slide_rels_part(number),
                &relationships_xml(&[(
                    "rId1",
                    rel_type::SLIDE_LAYOUT,
                    layout_target.as_str(),
                )])?,
            )?;
        }

        zip.finish().map_err(zip_error)?;
        Ok(())
    }
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Follow a symlink at `path` to the file it names. Dangling links resolve
/// relative to the link's directory so the target gets created.
fn resolve_symlink(path: &Path) -> Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => match fs::canonicalize(path) {
            Ok(real) => Ok(real),
            Err(_) => {
                let target = fs::read_link(path)?;
                Ok(match path.parent() {
                    Some(parent) => parent.join(target),
                    None => target,
                })
            }
        },
        _ => Ok(path.to_path_buf()),
    }
}

/// Write one deflated part into the archive.
fn add_part<W: Write + Seek>(zip: &mut ZipWriter<W>, name: &str, content: &[u8]) -> Result<()> {
    log::debug!("Writing part {} ({} bytes)", name, content.len());
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(name, options).map_err(zip_error)?;
    zip.write_all(content)?;
    Ok(())
}

fn zip_error(e: ZipError) -> Error {
    match e {
        ZipError::Io(io) => Error::IoError(io),
        other => Error::ZipError(other.to_string()),
    }
}

fn xml_error(e: quick_xml::Error) -> Error {
    Error::XmlError(format!("Failed to write XML: {}", e))
}

/// Thin wrapper over the quick-xml event writer for building one part.
struct PartWriter {
    inner: Writer<Vec<u8>>,
}

impl PartWriter {
    fn new() -> Result<Self> {
        let mut inner = Writer::new(Vec::with_capacity(4096));
        inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_error)?;
        Ok(Self { inner })
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.inner.write_event(Event::Start(tag)).map_err(xml_error)
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.inner.write_event(Event::Empty(tag)).map_err(xml_error)
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.inner
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_error)
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.inner
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_error)
    }

    /// `<name>text</name>`
    fn element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(name, &[])?;
        self.text(text)?;
        self.end(name)
    }

    fn finish(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

fn content_types_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut w = PartWriter::new()?;
    w.start("Types", &[("xmlns", template::NS_CONTENT_TYPES)])?;
    w.empty(
        "Default",
        &[("Extension", "rels"), ("ContentType", content_type::RELATIONSHIPS)],
    )?;
    w.empty("Default", &[("Extension", "xml"), ("ContentType", content_type::XML)])?;

    let mut overrides: Vec<(String, &str)> = vec![
        (template::PRESENTATION_PART.to_string(), content_type::PRESENTATION),
        (template::SLIDE_MASTER_PART.to_string(), content_type::SLIDE_MASTER),
        (template::THEME_PART.to_string(), content_type::THEME),
        (template::PRES_PROPS_PART.to_string(), content_type::PRES_PROPS),
        (template::VIEW_PROPS_PART.to_string(), content_type::VIEW_PROPS),
        (template::TABLE_STYLES_PART.to_string(), content_type::TABLE_STYLES),
        (template::CORE_PROPS_PART.to_string(), content_type::CORE_PROPERTIES),
        (template::APP_PROPS_PART.to_string(), content_type::EXTENDED_PROPERTIES),
    ];
    for &layout in LayoutKind::ALL {
        overrides.push((template::slide_layout_part(layout), content_type::SLIDE_LAYOUT));
    }
    for number in 1..=slide_count {
        overrides.push((template::slide_part(number), content_type::SLIDE));
    }

    for (part, ct) in &overrides {
        let part_name = format!("/{}", part);
        w.empty("Override", &[("PartName", part_name.as_str()), ("ContentType", *ct)])?;
    }
    w.end("Types")?;
    Ok(w.finish())
}

/// A relationships part from `(id, type, target)` triples.
fn relationships_xml(rels: &[(&str, &str, &str)]) -> Result<Vec<u8>> {
    let mut w = PartWriter::new()?;
    w.start("Relationships", &[("xmlns", template::NS_PACKAGE_RELATIONSHIPS)])?;
    for &(id, kind, target) in rels {
        w.empty(
            "Relationship",
            &[("Id", id), ("Type", kind), ("Target", target)],
        )?;
    }
    w.end("Relationships")?;
    Ok(w.finish())
}

fn package_rels_xml() -> Result<Vec<u8>> {
    relationships_xml(&[
        ("rId1", rel_type::OFFICE_DOCUMENT, template::PRESENTATION_PART),
        ("rId2", rel_type::CORE_PROPERTIES, template::CORE_PROPS_PART),
        ("rId3", rel_type::EXTENDED_PROPERTIES, template::APP_PROPS_PART),
    ])
}

fn slide_master_rels_xml() -> Result<Vec<u8>> {
    relationships_xml(&[
        ("rId1", rel_type::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
        ("rId2", rel_type::SLIDE_LAYOUT, "../slideLayouts/slideLayout2.xml"),
        ("rId3", rel_type::THEME, "../theme/theme1.xml"),
    ])
}

/// Relationship id of the 1-based slide `number` in `presentation.xml.rels`.
/// `rId1` is the slide master.
fn slide_rel_id(number: usize) -> String {
    format!("rId{}", number + 1)
}

fn presentation_rels_xml(slide_count: usize) -> Result<Vec<u8>> {
    let slide_ids: Vec<String> = (1..=slide_count).map(slide_rel_id).collect();
    let slide_targets: Vec<String> = (1..=slide_count)
        .map(|n| format!("slides/slide{}.xml", n))
        .collect();
    let next = |offset: usize| format!("rId{}", slide_count + 2 + offset);
    let tail_ids: Vec<String> = (0..4).map(next).collect();

    let mut rels: Vec<(&str, &str, &str)> =
        vec![("rId1", rel_type::SLIDE_MASTER, "slideMasters/slideMaster1.xml")];
    for (id, target) in slide_ids.iter().zip(&slide_targets) {
        rels.push((id.as_str(), rel_type::SLIDE, target.as_str()));
    }
    rels.push((tail_ids[0].as_str(), rel_type::PRES_PROPS, "presProps.xml"));
    rels.push((tail_ids[1].as_str(), rel_type::VIEW_PROPS, "viewProps.xml"));
    rels.push((tail_ids[2].as_str(), rel_type::THEME, "theme/theme1.xml"));
    rels.push((tail_ids[3].as_str(), rel_type::TABLE_STYLES, "tableStyles.xml"));
    relationships_xml(&rels)
}

fn presentation_xml(prs: &Presentation) -> Result<Vec<u8>> {
    let mut w = PartWriter::new()?;
    w.start(
        "p:presentation",
        &[
            ("xmlns:a", template::NS_DRAWING),
            ("xmlns:r", template::NS_RELATIONSHIPS),
            ("xmlns:p", template::NS_PRESENTATION),
            ("saveSubsetFonts", "1"),
        ],
    )?;

    w.start("p:sldMasterIdLst", &[])?;
    w.empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?;
    w.end("p:sldMasterIdLst")?;

    if prs.slide_count() > 0 {
        w.start("p:sldIdLst", &[])?;
        for number in 1..=prs.slide_count() {
            let id = (FIRST_SLIDE_ID + number - 1).to_string();
            let rel_id = slide_rel_id(number);
            w.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel_id.as_str())])?;
        }
        w.end("p:sldIdLst")?;
    }

    let cx = prs.slide_width.0.to_string();
    let cy = prs.slide_height.0.to_string();
    w.empty("p:sldSz", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    w.empty("p:notesSz", &[("cx", "6858000"), ("cy", "9144000")])?;
    w.end("p:presentation")?;
    Ok(w.finish())
}

fn core_props_xml(prs: &Presentation) -> Result<Vec<u8>> {
    let title = prs
        .slides()
        .first()
        .map(Slide::title_text)
        .unwrap_or_default();

    let mut w = PartWriter::new()?;
    w.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    w.element("dc:title", &title)?;
    w.element("dc:creator", env!("CARGO_PKG_NAME"))?;
    w.element("cp:revision", "1")?;
    w.end("cp:coreProperties")?;
    Ok(w.finish())
}

fn app_props_xml(prs: &Presentation) -> Result<Vec<u8>> {
    let mut w = PartWriter::new()?;
    w.start(
        "Properties",
        &[(
            "xmlns",
            "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
        )],
    )?;
    w.element("Application", env!("CARGO_PKG_NAME"))?;
    w.element("Slides", &prs.slide_count().to_string())?;
    w.element("AppVersion", "1.0000")?;
    w.end("Properties")?;
    Ok(w.finish())
}

/// Generate the XML of one slide.
pub(crate) fn slide_xml(slide: &Slide) -> Result<Vec<u8>> {
    let mut w = PartWriter::new()?;
    w.start(
        "p:sld",
        &[
            ("xmlns:a", template::NS_DRAWING),
            ("xmlns:r", template::NS_RELATIONSHIPS),
            ("xmlns:p", template::NS_PRESENTATION),
        ],
    )?;
    w.start("p:cSld", &[])?;
    w.start("p:spTree", &[])?;

    // Group shape properties (required)
    w.start("p:nvGrpSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    w.empty("p:cNvGrpSpPr", &[])?;
    w.empty("p:nvPr", &[])?;
    w.end("p:nvGrpSpPr")?;
    w.start("p:grpSpPr", &[])?;
    w.start("a:xfrm", &[])?;
    w.empty("a:off", &[("x", "0"), ("y", "0")])?;
    w.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    w.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    w.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    w.end("a:xfrm")?;
    w.end("p:grpSpPr")?;

    // Shape id 1 is the group, placeholders follow from 2.
    for (i, placeholder) in slide.placeholders().iter().enumerate() {
        write_placeholder(&mut w, placeholder, i as u32 + 2)?;
    }

    w.end("p:spTree")?;
    w.end("p:cSld")?;
    w.start("p:clrMapOvr", &[])?;
    w.empty("a:masterClrMapping", &[])?;
    w.end("p:clrMapOvr")?;
    w.end("p:sld")?;
    Ok(w.finish())
}

fn write_placeholder(w: &mut PartWriter, placeholder: &Placeholder, shape_id: u32) -> Result<()> {
    let id = shape_id.to_string();
    let name = format!("{} {}", placeholder.kind.shape_name(), shape_id - 1);
    let idx = placeholder.idx.to_string();

    let mut ph_attrs: Vec<(&str, &str)> = Vec::with_capacity(2);
    if let Some(ph_type) = placeholder.kind.ooxml_type() {
        ph_attrs.push(("type", ph_type));
    }
    if placeholder.idx != 0 {
        ph_attrs.push(("idx", idx.as_str()));
    }

    w.start("p:sp", &[])?;
    w.start("p:nvSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", id.as_str()), ("name", name.as_str())])?;
    w.start("p:cNvSpPr", &[])?;
    w.empty("a:spLocks", &[("noGrp", "1")])?;
    w.end("p:cNvSpPr")?;
    w.start("p:nvPr", &[])?;
    w.empty("p:ph", &ph_attrs)?;
    w.end("p:nvPr")?;
    w.end("p:nvSpPr")?;
    w.empty("p:spPr", &[])?;

    w.start("p:txBody", &[])?;
    w.empty("a:bodyPr", &[])?;
    w.empty("a:lstStyle", &[])?;
    for paragraph in placeholder.text_frame.paragraphs() {
        write_paragraph(w, paragraph)?;
    }
    w.end("p:txBody")?;
    w.end("p:sp")
}

/// One `a:p`. Vertical tabs in the text become `a:br` line breaks between
/// runs; an empty paragraph only carries its end-of-paragraph properties.
fn write_paragraph(w: &mut PartWriter, paragraph: &Paragraph) -> Result<()> {
    w.start("a:p", &[])?;
    if paragraph.text.is_empty() {
        write_run_properties(w, "a:endParaRPr", &paragraph.font)?;
    } else {
        for (i, line) in paragraph.text.split('\u{000B}').enumerate() {
            if i > 0 {
                w.start("a:br", &[])?;
                write_run_properties(w, "a:rPr", &paragraph.font)?;
                w.end("a:br")?;
            }
            if line.is_empty() {
                continue;
            }
            w.start("a:r", &[])?;
            write_run_properties(w, "a:rPr", &paragraph.font)?;
            w.element("a:t", &escape_control_chars(line))?;
            w.end("a:r")?;
        }
    }
    w.end("a:p")
}

/// XML 1.0 cannot carry C0 control characters other than tab, newline and
/// carriage return. They are written as `_xHHHH_` the way Office does.
fn escape_control_chars(text: &str) -> Cow<'_, str> {
    let illegal = |c: char| c < '\u{0020}' && !matches!(c, '\t' | '\n' | '\r');
    if !text.chars().any(illegal) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if illegal(c) {
            out.push_str(&format!("_x{:04X}_", c as u32));
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

fn write_run_properties(w: &mut PartWriter, tag: &str, font: &Font) -> Result<()> {
    let size = font.size.map(|s| s.centipoints().to_string());
    let mut attrs: Vec<(&str, &str)> = vec![("lang", "en-US")];
    if let Some(sz) = size.as_deref() {
        attrs.push(("sz", sz));
    }
    if let Some(bold) = font.bold {
        attrs.push(("b", if bold { "1" } else { "0" }));
    }
    attrs.push(("dirty", "0"));

    match font.color {
        Some(color) => {
            let hex = color.hex();
            w.start(tag, &attrs)?;
            w.start("a:solidFill", &[])?;
            w.empty("a:srgbClr", &[("val", hex.as_str())])?;
            w.end("a:solidFill")?;
            w.end(tag)
        }
        None => w.empty(tag, &attrs),
    }
}
