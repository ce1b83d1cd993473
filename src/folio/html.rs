//! Editable HTML representation of a block
//!
//! # DOM contract
//!
//! | Model node | HTML |
//! |------------|------|
//! | Block root | `<div class="content_block" data-block-type="paragraph" data-block-id="…">` |
//! | Paragraph | `<p class="paragraph">` (exactly one per block) |
//! | PlainText | text node |
//! | FormattedText | `<span class="formatted_text formatted_text_<format>">` |
//! | Link | `<a class="link" href="…">` |
//! | LineBreak | `<br>` |
//! | Note | `<span class="note note_<type>" data-note-type="…">` placeholder, ignored when parsing |
//!
//! Every model node maps to exactly one of these shapes, which is what lets
//! [`parser`] invert [`serializer`]. The parser recognizes elements by class, not by tag, so
//! whatever element the editing surface wraps formatting in keeps working as long as the
//! classes survive.

pub mod dom;
pub mod parser;
pub mod serializer;
pub mod text;

use crate::folio::model::{Format, NoteType};
use url::Url;

pub const BLOCK_TYPE_ATTR: &str = "data-block-type";
pub const BLOCK_ID_ATTR: &str = "data-block-id";
pub const NOTE_TYPE_ATTR: &str = "data-note-type";

pub const BLOCK_CLASS: &str = "content_block";
pub const PARAGRAPH_CLASS: &str = "paragraph";
pub const FORMATTED_TEXT_CLASS: &str = "formatted_text";
pub const LINK_CLASS: &str = "link";
pub const NOTE_CLASS: &str = "note";

/// `formatted_text_bold`, `formatted_text_none`, ...
pub fn format_class(format: &Format) -> String {
    format!("{}_{}", FORMATTED_TEXT_CLASS, format.as_str().to_lowercase())
}

/// `note_footnote`, `note_endnote`, ...
pub fn note_class(note_type: &NoteType) -> String {
    format!("{}_{}", NOTE_CLASS, note_type.as_str().to_lowercase())
}

/// Knobs for reading blocks back from HTML.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOptions {
    /// Document URL to resolve relative `href`s against, as a browser's `a.href` would. When
    /// unset the attribute is taken verbatim.
    pub base_url: Option<Url>,
}

impl ParseOptions {
    pub fn with_base_url(base_url: Url) -> Self {
        ParseOptions {
            base_url: Some(base_url),
        }
    }

    /// The url a link element points at.
    pub fn resolve_href(&self, href: &str) -> String {
        match &self.base_url {
            Some(base) => base
                .join(href)
                .map(|resolved| resolved.to_string())
                .unwrap_or_else(|_| href.to_string()),
            None => href.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_class_is_lowercase() {
        assert_eq!(format_class(&Format::Strikethrough), "formatted_text_strikethrough");
        assert_eq!(format_class(&Format::None), "formatted_text_none");
        assert_eq!(note_class(&NoteType::Footnote), "note_footnote");
    }

    #[test]
    fn test_href_verbatim_without_base() {
        let options = ParseOptions::default();
        assert_eq!(options.resolve_href("../chapter-2"), "../chapter-2");
        assert_eq!(options.resolve_href("http://x"), "http://x");
    }

    #[test]
    fn test_href_resolved_against_base() {
        let base = Url::parse("https://folio.example/projects/7/sections/intro").unwrap();
        let options = ParseOptions::with_base_url(base);
        assert_eq!(
            options.resolve_href("outro"),
            "https://folio.example/projects/7/sections/outro"
        );
        assert_eq!(options.resolve_href("http://x"), "http://x/");
    }
}
