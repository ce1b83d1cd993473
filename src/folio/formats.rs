//! Format implementations
//!
//! Adapters that put each block representation behind the [`crate::folio::format::Format`]
//! trait.

pub mod html;
pub mod template;
pub mod text;
pub mod wire;

pub use html::HtmlFormat;
pub use template::TemplateFormat;
pub use text::TextFormat;
pub use wire::WireFormat;
