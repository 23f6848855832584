use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("Failed to load font: {0}")]
    FontError(String),

    #[error("Page {0} does not exist")]
    PageNotFound(u32),

    #[error("PDF operation failed: {0}")]
    OperationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}
