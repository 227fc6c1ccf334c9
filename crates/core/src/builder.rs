//! Assembles the overview deck from the fixed outline.

use crate::error::Result;
use crate::outline::{self, SlideOutline, OUTLINE, TITLE_COLOR, TITLE_FONT_SIZE};
use crate::types::{LayoutKind, Presentation};

/// Builds the ten-slide CoupleSnap presentation in memory.
#[derive(Debug, Clone)]
pub struct DeckBuilder {
    slides: &'static [SlideOutline],
}

impl Default for DeckBuilder {
    fn default() -> Self {
        Self { slides: &OUTLINE }
    }
}

impl DeckBuilder {
    /// Create a builder for the standard outline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the presentation and append every slide in order.
    ///
    /// The first slide's title paragraph is set in the brand style; all
    /// other text keeps the layout defaults.
    pub fn build(&self) -> Result<Presentation> {
        let mut prs = Presentation::new();
        prs.set_slide_width(outline::slide_width());
        prs.set_slide_height(outline::slide_height());

        for (number, entry) in self.slides.iter().enumerate() {
            let slide = prs.add_slide(entry.layout.index())?;
            slide.title_mut()?.set_text(entry.title);
            slide.placeholder_mut(1)?.set_text(entry.body);

            if number == 0 && entry.layout == LayoutKind::Title {
                let font = slide.title_mut()?.paragraph_mut(0)?.font_mut();
                font.size = Some(TITLE_FONT_SIZE);
                font.bold = Some(true);
                font.color = Some(TITLE_COLOR);
            }
        }

        log::debug!("Built presentation with {} slides", prs.slide_count());
        Ok(prs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{Points, Rgb};

    #[test]
    fn test_build_has_ten_slides_in_order() {
        let prs = DeckBuilder::new().build().unwrap();
        assert_eq!(prs.slide_count(), 10);

        let titles: Vec<String> = prs.slides().iter().map(|s| s.title_text()).collect();
        let expected: Vec<&str> = OUTLINE.iter().map(|s| s.title).collect();
        assert_eq!(titles, expected);
    }

    #[test]
    fn test_build_layouts() {
        let prs = DeckBuilder::new().build().unwrap();
        assert_eq!(prs.slides()[0].layout(), LayoutKind::Title);
        for slide in &prs.slides()[1..] {
            assert_eq!(slide.layout(), LayoutKind::TitleAndContent);
        }
    }

    #[test]
    fn test_title_slide_formatting() {
        let prs = DeckBuilder::new().build().unwrap();
        let slide = &prs.slides()[0];
        assert_eq!(slide.title_text(), "CoupleSnap");
        assert_eq!(
            slide.body_text().as_deref(),
            Some("Photo-First Messaging for Couples")
        );

        let font = slide.title().unwrap().paragraph(0).unwrap().font;
        assert_eq!(font.size, Some(Points(60)));
        assert_eq!(font.bold, Some(true));
        assert_eq!(font.color, Some(Rgb(0, 122, 255)));
    }

    #[test]
    fn test_only_first_title_is_formatted() {
        let prs = DeckBuilder::new().build().unwrap();
        for slide in prs.slides() {
            for placeholder in &slide.placeholders()[1..] {
                assert!(placeholder
                    .text_frame
                    .paragraphs()
                    .iter()
                    .all(|p| p.font.is_inherited()));
            }
        }
        for slide in &prs.slides()[1..] {
            assert!(slide.title().unwrap().paragraphs()[0].font.is_inherited());
        }
    }

    #[test]
    fn test_bodies_match_outline_verbatim() {
        let prs = DeckBuilder::new().build().unwrap();
        for (slide, entry) in prs.slides().iter().zip(OUTLINE.iter()) {
            assert_eq!(slide.body_text().as_deref(), Some(entry.body));
        }
        let architecture = &prs.slides()[6];
        assert_eq!(architecture.title_text(), "System Architecture");
        assert_eq!(
            architecture.placeholder(1).unwrap().paragraphs()[0].text,
            "Client Layer:"
        );
    }
}
