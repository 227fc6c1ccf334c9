//! Fixed parts of the built-in presentation template.
//!
//! The slide master, both layouts, and the theme never change between runs,
//! so they ship as XML resources. Everything slide-dependent is generated in
//! [`crate::writer`].

use couplesnap_core::LayoutKind;

pub const NS_PRESENTATION: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const NS_PACKAGE_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";
pub const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// Relationship type URIs.
pub mod rel_type {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const EXTENDED_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
    pub const PRES_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
    pub const VIEW_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";
    pub const TABLE_STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";
}

/// Content type strings for `[Content_Types].xml`.
pub mod content_type {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
    pub const SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    pub const SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
    pub const PRES_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
    pub const VIEW_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml";
    pub const TABLE_STYLES: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
    pub const CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
    pub const EXTENDED_PROPERTIES: &str =
        "application/vnd.openxmlformats-officedocument.extended-properties+xml";
}

pub const PRESENTATION_PART: &str = "ppt/presentation.xml";
pub const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";
pub const SLIDE_MASTER_PART: &str = "ppt/slideMasters/slideMaster1.xml";
pub const SLIDE_MASTER_RELS_PART: &str = "ppt/slideMasters/_rels/slideMaster1.xml.rels";
pub const THEME_PART: &str = "ppt/theme/theme1.xml";
pub const PRES_PROPS_PART: &str = "ppt/presProps.xml";
pub const VIEW_PROPS_PART: &str = "ppt/viewProps.xml";
pub const TABLE_STYLES_PART: &str = "ppt/tableStyles.xml";
pub const CORE_PROPS_PART: &str = "docProps/core.xml";
pub const APP_PROPS_PART: &str = "docProps/app.xml";

/// Slide master with title and body placeholders and the text styles.
pub fn slide_master_xml() -> &'static str {
    include_str!("../resources/slideMaster1.xml")
}

/// Theme colors, fonts, and format scheme.
pub fn theme_xml() -> &'static str {
    include_str!("../resources/theme1.xml")
}

/// Layout part content for `layout`.
pub fn slide_layout_xml(layout: LayoutKind) -> &'static str {
    match layout {
        LayoutKind::Title => include_str!("../resources/slideLayout1.xml"),
        LayoutKind::TitleAndContent => include_str!("../resources/slideLayout2.xml"),
    }
}

/// Part name of the layout, e.g. `ppt/slideLayouts/slideLayout2.xml`.
pub fn slide_layout_part(layout: LayoutKind) -> String {
    format!("ppt/slideLayouts/slideLayout{}.xml", layout.index() + 1)
}

/// Relationship part of a layout.
pub fn slide_layout_rels_part(layout: LayoutKind) -> String {
    format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", layout.index() + 1)
}

/// Part name of the 1-based slide `number`.
pub fn slide_part(number: usize) -> String {
    format!("ppt/slides/slide{}.xml", number)
}

/// Relationship part of the 1-based slide `number`.
pub fn slide_rels_part(number: usize) -> String {
    format!("ppt/slides/_rels/slide{}.xml.rels", number)
}

pub const PRES_PROPS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:presentationPr xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"/>"#,
);

pub const VIEW_PROPS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:viewPr xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
    r#"<p:normalViewPr><p:restoredLeft sz="15620"/><p:restoredTop sz="94660"/></p:normalViewPr>"#,
    r#"<p:gridSpacing cx="76200" cy="76200"/>"#,
    r#"</p:viewPr>"#,
);

pub const TABLE_STYLES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<a:tblStyleLst xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"def="{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}"/>"#,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_parts() {
        assert_eq!(
            slide_layout_part(LayoutKind::Title),
            "ppt/slideLayouts/slideLayout1.xml"
        );
        assert_eq!(
            slide_layout_rels_part(LayoutKind::TitleAndContent),
            "ppt/slideLayouts/_rels/slideLayout2.xml.rels"
        );
        assert_eq!(slide_part(7), "ppt/slides/slide7.xml");
    }

    #[test]
    fn test_layout_resources_declare_their_type() {
        for &layout in LayoutKind::ALL {
            let xml = slide_layout_xml(layout);
            assert!(xml.contains(&format!(r#"type="{}""#, layout.ooxml_type())));
            assert!(xml.contains(&format!(r#"name="{}""#, layout.name())));
        }
        assert!(slide_master_xml().contains("<p:sldLayoutIdLst>"));
        assert!(theme_xml().contains("<a:clrScheme"));
    }
}
