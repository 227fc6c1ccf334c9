//! Error types for building and persisting presentations.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, writing, or reading a presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to create, write, or read a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The requested slide layout index is not part of the template.
    #[error("Slide layout {0} does not exist in the presentation template")]
    LayoutNotFound(usize),

    /// The slide's layout does not expose a placeholder with this index.
    #[error("Layout '{layout}' has no placeholder with idx {idx}")]
    PlaceholderNotFound { layout: &'static str, idx: u32 },

    /// The text frame has fewer paragraphs than requested.
    #[error("Text frame has no paragraph at index {0}")]
    ParagraphNotFound(usize),

    /// Invalid or corrupted file.
    #[error("Invalid or corrupted file: {0}")]
    CorruptedFile(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML writing or parsing error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),
}
