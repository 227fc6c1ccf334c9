//! Domain types for the presentation object model.

use crate::error::{Error, Result};
use crate::units::{Emu, Points, Rgb};

/// A presentation document: page size plus slides in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    /// Page width.
    pub slide_width: Emu,

    /// Page height.
    pub slide_height: Emu,

    /// Slides in presentation order.
    slides: Vec<Slide>,
}

impl Presentation {
    /// Create an empty presentation with the default 10" x 7.5" page.
    pub fn new() -> Self {
        Self {
            slide_width: Emu::from_inches(10.0),
            slide_height: Emu::from_inches(7.5),
            slides: Vec::new(),
        }
    }

    /// Set the page width.
    pub fn set_slide_width(&mut self, width: Emu) {
        self.slide_width = width;
    }

    /// Set the page height.
    pub fn set_slide_height(&mut self, height: Emu) {
        self.slide_height = height;
    }

    /// Layouts available in the built-in template, by index.
    pub fn slide_layouts(&self) -> &'static [LayoutKind] {
        LayoutKind::ALL
    }

    /// Append a new slide built from the layout at `layout_index`.
    pub fn add_slide(&mut self, layout_index: usize) -> Result<&mut Slide> {
        let layout = LayoutKind::from_index(layout_index)
            .ok_or(Error::LayoutNotFound(layout_index))?;
        log::debug!(
            "Adding slide {} with layout '{}'",
            self.slides.len() + 1,
            layout.name()
        );
        Ok(self.push_slide(Slide::new(layout)))
    }

    /// Append an already populated slide.
    pub fn push_slide(&mut self, slide: Slide) -> &mut Slide {
        self.slides.push(slide);
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    /// Slides in presentation order.
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new()
    }
}

/// The slide layouts provided by the built-in template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    /// Centered title and subtitle.
    Title,
    /// Title above a single body placeholder.
    TitleAndContent,
}

impl LayoutKind {
    /// All layouts, in template order.
    pub const ALL: &'static [LayoutKind] = &[LayoutKind::Title, LayoutKind::TitleAndContent];

    /// Zero-based index of this layout in the template.
    pub fn index(self) -> usize {
        match self {
            Self::Title => 0,
            Self::TitleAndContent => 1,
        }
    }

    /// Look up a layout by template index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Display name, as written into the layout part.
    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "Title Slide",
            Self::TitleAndContent => "Title and Content",
        }
    }

    /// Value of the `p:sldLayout/@type` attribute.
    pub fn ooxml_type(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::TitleAndContent => "obj",
        }
    }

    /// Parse a `p:sldLayout/@type` attribute value.
    pub fn from_ooxml_type(value: &str) -> Option<Self> {
        match value {
            "title" => Some(Self::Title),
            "obj" => Some(Self::TitleAndContent),
            _ => None,
        }
    }

    /// Placeholders this layout exposes, as `(idx, kind)`.
    pub fn placeholders(self) -> &'static [(u32, PlaceholderKind)] {
        match self {
            Self::Title => &[
                (0, PlaceholderKind::CenteredTitle),
                (1, PlaceholderKind::Subtitle),
            ],
            Self::TitleAndContent => &[(0, PlaceholderKind::Title), (1, PlaceholderKind::Body)],
        }
    }
}

/// The role of a placeholder within its layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    CenteredTitle,
    Subtitle,
    Title,
    Body,
}

impl PlaceholderKind {
    /// Whether this placeholder holds the slide title.
    pub fn is_title(self) -> bool {
        matches!(self, Self::CenteredTitle | Self::Title)
    }

    /// Value of the `p:ph/@type` attribute. Body placeholders omit it.
    pub fn ooxml_type(self) -> Option<&'static str> {
        match self {
            Self::CenteredTitle => Some("ctrTitle"),
            Self::Subtitle => Some("subTitle"),
            Self::Title => Some("title"),
            Self::Body => None,
        }
    }

    /// Parse a `p:ph/@type` attribute; a missing type means body.
    pub fn from_ooxml_type(value: Option<&str>) -> Option<Self> {
        match value {
            Some("ctrTitle") => Some(Self::CenteredTitle),
            Some("subTitle") => Some(Self::Subtitle),
            Some("title") => Some(Self::Title),
            Some("body") | None => Some(Self::Body),
            _ => None,
        }
    }

    /// Shape name prefix used when writing the slide.
    pub fn shape_name(self) -> &'static str {
        match self {
            Self::CenteredTitle | Self::Title => "Title",
            Self::Subtitle => "Subtitle",
            Self::Body => "Content Placeholder",
        }
    }
}

/// A region of a slide that accepts text.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    /// Index matching the layout's placeholder.
    pub idx: u32,

    /// Placeholder role.
    pub kind: PlaceholderKind,

    /// Text content.
    pub text_frame: TextFrame,
}

/// A single slide.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    layout: LayoutKind,
    placeholders: Vec<Placeholder>,
}

impl Slide {
    /// Create a slide with the empty placeholders of `layout`.
    pub fn new(layout: LayoutKind) -> Self {
        let placeholders = layout
            .placeholders()
            .iter()
            .map(|&(idx, kind)| Placeholder {
                idx,
                kind,
                text_frame: TextFrame::new(),
            })
            .collect();
        Self {
            layout,
            placeholders,
        }
    }

    /// The layout this slide was created from.
    pub fn layout(&self) -> LayoutKind {
        self.layout
    }

    /// Placeholders in layout order.
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// The title text frame, if the layout has one.
    pub fn title(&self) -> Option<&TextFrame> {
        self.placeholders
            .iter()
            .find(|p| p.kind.is_title())
            .map(|p| &p.text_frame)
    }

    /// Mutable title text frame.
    pub fn title_mut(&mut self) -> Result<&mut TextFrame> {
        let layout = self.layout.name();
        self.placeholders
            .iter_mut()
            .find(|p| p.kind.is_title())
            .map(|p| &mut p.text_frame)
            .ok_or(Error::PlaceholderNotFound { layout, idx: 0 })
    }

    /// Text frame of the placeholder with `idx`.
    pub fn placeholder(&self, idx: u32) -> Option<&TextFrame> {
        self.placeholders
            .iter()
            .find(|p| p.idx == idx)
            .map(|p| &p.text_frame)
    }

    /// Mutable text frame of the placeholder with `idx`.
    pub fn placeholder_mut(&mut self, idx: u32) -> Result<&mut TextFrame> {
        let layout = self.layout.name();
        self.placeholders
            .iter_mut()
            .find(|p| p.idx == idx)
            .map(|p| &mut p.text_frame)
            .ok_or(Error::PlaceholderNotFound { layout, idx })
    }

    /// Title text, or an empty string when the slide has no title.
    pub fn title_text(&self) -> String {
        self.title().map(TextFrame::text).unwrap_or_default()
    }

    /// Text of the placeholder at idx 1 (subtitle or body).
    pub fn body_text(&self) -> Option<String> {
        self.placeholder(1).map(TextFrame::text)
    }
}

/// Ordered paragraphs inside a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFrame {
    paragraphs: Vec<Paragraph>,
}

impl TextFrame {
    /// A text frame holding one empty paragraph.
    pub fn new() -> Self {
        Self {
            paragraphs: vec![Paragraph::new("")],
        }
    }

    /// Build a frame from parsed paragraphs. An empty list yields one empty paragraph.
    pub fn from_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        if paragraphs.is_empty() {
            return Self::new();
        }
        Self { paragraphs }
    }

    /// Replace all content. Each `\n`-separated line becomes one paragraph,
    /// including empty lines.
    pub fn set_text(&mut self, text: &str) {
        self.paragraphs = text.split('\n').map(Paragraph::new).collect();
    }

    /// All paragraph text joined with `\n`.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Paragraphs in order.
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Paragraph at `index`.
    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs.get(index)
    }

    /// Mutable paragraph at `index`.
    pub fn paragraph_mut(&mut self, index: usize) -> Result<&mut Paragraph> {
        self.paragraphs
            .get_mut(index)
            .ok_or(Error::ParagraphNotFound(index))
    }
}

impl Default for TextFrame {
    fn default() -> Self {
        Self::new()
    }
}

/// One line of text with optional character formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    /// The text content, without line breaks.
    pub text: String,

    /// Formatting applied over the layout default.
    pub font: Font,
}

impl Paragraph {
    /// Create a paragraph with default formatting.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: Font::default(),
        }
    }

    /// Mutable formatting.
    pub fn font_mut(&mut self) -> &mut Font {
        &mut self.font
    }
}

/// Character formatting. `None` inherits from the layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Font {
    pub size: Option<Points>,
    pub bold: Option<bool>,
    pub color: Option<Rgb>,
}

impl Font {
    /// True when nothing overrides the layout default.
    pub fn is_inherited(&self) -> bool {
        self.size.is_none() && self.bold.is_none() && self.color.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_presentation_is_empty_with_default_size() {
        let prs = Presentation::new();
        assert_eq!(prs.slide_count(), 0);
        assert_eq!(prs.slide_width, Emu(9_144_000));
        assert_eq!(prs.slide_height, Emu(6_858_000));
        assert_eq!(prs.slide_layouts().len(), 2);
    }

    #[test]
    fn test_add_slide_unknown_layout() {
        let mut prs = Presentation::new();
        let err = prs.add_slide(6).unwrap_err();
        assert!(matches!(err, Error::LayoutNotFound(6)));
        assert_eq!(prs.slide_count(), 0);
    }

    #[test]
    fn test_layout_placeholders() {
        let mut prs = Presentation::new();
        let slide = prs.add_slide(0).unwrap();
        assert_eq!(slide.layout(), LayoutKind::Title);
        assert!(slide.placeholder_mut(1).is_ok());
        assert!(matches!(
            slide.placeholder_mut(2),
            Err(Error::PlaceholderNotFound { idx: 2, .. })
        ));

        let slide = prs.add_slide(1).unwrap();
        assert_eq!(slide.layout(), LayoutKind::TitleAndContent);
        assert_eq!(slide.placeholders()[1].kind, PlaceholderKind::Body);
    }

    #[test]
    fn test_set_text_splits_paragraphs() {
        let mut frame = TextFrame::new();
        frame.set_text("Frontend:\n• Expo Camera\n\nBackend:\n");

        let lines: Vec<&str> = frame.paragraphs().iter().map(|p| p.text.as_str()).collect();
        assert_eq!(lines, vec!["Frontend:", "• Expo Camera", "", "Backend:", ""]);
        assert_eq!(frame.text(), "Frontend:\n• Expo Camera\n\nBackend:\n");
    }

    #[test]
    fn test_paragraph_font() {
        let mut frame = TextFrame::new();
        frame.set_text("CoupleSnap");
        let font = frame.paragraph_mut(0).unwrap().font_mut();
        font.size = Some(Points(60));
        font.bold = Some(true);
        assert!(!frame.paragraphs()[0].font.is_inherited());
        assert!(matches!(frame.paragraph_mut(1), Err(Error::ParagraphNotFound(1))));
    }

    #[test]
    fn test_placeholder_type_round_trip() {
        for kind in [
            PlaceholderKind::CenteredTitle,
            PlaceholderKind::Subtitle,
            PlaceholderKind::Title,
            PlaceholderKind::Body,
        ] {
            assert_eq!(PlaceholderKind::from_ooxml_type(kind.ooxml_type()), Some(kind));
        }
        assert_eq!(PlaceholderKind::from_ooxml_type(Some("dt")), None);
    }
}
