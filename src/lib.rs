//! # folio
//!
//! Content-block model for the folio manuscript editor, and the converters between that model,
//! the JSON exchanged with the backing store, and the editable HTML shown in the browser.
//!
//! File Layout
//!
//!     src/folio
//!       ├── model.rs          The canonical block / inline tree (DocumentModel)
//!       ├── wire.rs           The tolerant JSON shape received from the server
//!       ├── normalize.rs      wire → model
//!       ├── html              model ⇄ editable HTML (serializer, parser, text normalization)
//!       ├── view.rs           Template context with the derived `*_extra` flags
//!       ├── format.rs         Format trait shared by all representations
//!       ├── formats           wire, html, template and text adapters for that trait
//!       └── registry.rs       Lookup of formats by name, format-to-format conversion
//!
//!     Round trip: wire → normalize → model → html::serializer → (user edits) → html::parser
//!     → model → wire::to_wire → server.
//!
//!     This is a pure lib: no code here prints, reads env vars or touches the filesystem. The
//!     folio-cli crate is the shell around it.

pub mod folio;

pub use folio::error::{BlockError, FormatError, HtmlParseError, NormalizeError};
pub use folio::format::{BlockFailure, Format, ParsedBlocks};
pub use folio::html::parser::{parse_block, parse_block_html, parse_blocks_html};
pub use folio::html::serializer::{serialize_block, serialize_blocks};
pub use folio::html::ParseOptions;
pub use folio::model::{
    BlockContent, ContentBlock, Format as InlineFormat, FormatFlags, Identifier, NoteType,
    NoteTypeFlags, Paragraph, TextElement,
};
pub use folio::normalize::{normalize, normalize_all};
pub use folio::registry::{Conversion, FormatRegistry};
pub use folio::view::{template_block, TemplateBlock};
pub use folio::wire::{to_wire, WireBlock};
