//! Error types for block conversion
//!
//! All of these are local and synchronous: they are raised where a block is found to be
//! unusable and are never worth retrying, since the input is already in memory. Callers that
//! handle several blocks at once get one result per block (see [`BlockError`]), so a single bad
//! block never takes its siblings down with it.

use thiserror::Error;

/// Failures turning server data into the block model.
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// The block's `content` names a kind this editor cannot display. Signals a model/version
    /// mismatch with the server.
    #[error("unsupported content kind `{0}`")]
    UnsupportedContentKind(String),

    /// A text element object with no recognized variant key, or with several of them.
    #[error("text element must carry exactly one variant, found {populated}")]
    InvalidTextElement { populated: usize },

    /// The block is valid JSON but not shaped like a block (missing `format`, a string where an
    /// object belongs).
    #[error("malformed block: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Failures reading a block back from the editable DOM.
#[derive(Error, Debug)]
pub enum HtmlParseError {
    /// The block root's `data-block-type` is missing or not one we know.
    #[error("unknown block type `{}`", .0.as_deref().unwrap_or("<missing>"))]
    UnknownBlockType(Option<String>),

    /// A paragraph block without exactly one paragraph container.
    #[error("paragraph block must contain exactly one paragraph container, found {found}")]
    MalformedParagraph { found: usize },

    /// A `formatted_text` span with no known `formatted_text_*` variant class. Carries the full
    /// class attribute.
    #[error("formatted text span has no known formatting class (class=\"{0}\")")]
    UnknownFormattingClass(String),
}

/// Why a single block was rejected, whichever direction it came from.
#[derive(Error, Debug)]
pub enum BlockError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Html(#[from] HtmlParseError),
}

/// Errors from the format layer ([`crate::folio::format`], [`crate::folio::registry`]).
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("format '{0}' not found")]
    FormatNotFound(String),

    #[error("{0}")]
    NotSupported(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTML error: {0}")]
    Html(#[from] HtmlParseError),

    #[error("serialization error: {0}")]
    SerializationError(String),
}
