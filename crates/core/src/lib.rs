//! Presentation object model, slide outline, and deck builder for the
//! CoupleSnap overview deck.

pub mod builder;
pub mod error;
pub mod outline;
pub mod types;
pub mod units;

pub use builder::DeckBuilder;
pub use error::{Error, Result};
pub use outline::{SlideOutline, OUTLINE, OUTPUT_FILE};
pub use types::{
    Font, LayoutKind, Paragraph, Placeholder, PlaceholderKind, Presentation, Slide, TextFrame,
};
pub use units::{Emu, Points, Rgb};
