//! Format trait definition
//!
//! Every representation a block can be read from or written to (server JSON, editable HTML,
//! template context, plain text) implements [`Format`], so callers can pick one by name through
//! [`crate::folio::registry::FormatRegistry`].
//!
//! Parsing works on a whole section at once but never fails as a whole because of one block: a
//! format parses what it can and reports the rest in [`ParsedBlocks::failures`]. Only input that
//! cannot be read at all (invalid JSON, for instance) is an `Err`.

use crate::folio::error::{BlockError, FormatError};
use crate::folio::model::ContentBlock;

/// Trait for block formats
///
/// Formats can support parsing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct Markdown;
///
/// impl Format for Markdown {
///     fn name(&self) -> &str {
///         "markdown"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, blocks: &[ContentBlock]) -> Result<String, FormatError> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "wire", "html")
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Whether this format supports parsing (source → blocks)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (blocks → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into blocks
    ///
    /// Default implementation returns NotSupported error.
    fn parse(&self, _source: &str) -> Result<ParsedBlocks, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize blocks into source text
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(&self, _blocks: &[ContentBlock]) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}

/// Outcome of parsing a section: the blocks that made it, and why the others did not.
#[derive(Debug, Default)]
pub struct ParsedBlocks {
    pub blocks: Vec<ContentBlock>,
    pub failures: Vec<BlockFailure>,
}

/// A block rejected while parsing. `index` is its position in the source section.
#[derive(Debug)]
pub struct BlockFailure {
    pub index: usize,
    pub error: BlockError,
}

impl ParsedBlocks {
    /// Splits per-block results, keeping source order on both sides.
    pub fn from_results<E, I>(results: I) -> Self
    where
        E: Into<BlockError>,
        I: IntoIterator<Item = Result<ContentBlock, E>>,
    {
        let mut parsed = ParsedBlocks::default();
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(block) => parsed.blocks.push(block),
                Err(error) => parsed.failures.push(BlockFailure {
                    index,
                    error: error.into(),
                }),
            }
        }
        parsed
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folio::error::{HtmlParseError, NormalizeError};
    use crate::folio::model::TextElement;

    struct Empty;

    impl Format for Empty {
        fn name(&self) -> &str {
            "empty"
        }
    }

    #[test]
    fn test_default_methods_refuse() {
        assert!(!Empty.supports_parsing());
        assert!(!Empty.supports_serialization());
        assert!(matches!(Empty.parse(""), Err(FormatError::NotSupported(_))));
        assert!(matches!(Empty.serialize(&[]), Err(FormatError::NotSupported(_))));
    }

    #[test]
    fn test_from_results_keeps_source_indexes() {
        let block = ContentBlock::paragraph(vec![TextElement::plain("ok")]);
        let parsed = ParsedBlocks::from_results(vec![
            Err(HtmlParseError::UnknownBlockType(None)),
            Ok(block.clone()),
            Err(HtmlParseError::MalformedParagraph { found: 0 }),
        ]);

        assert_eq!(parsed.blocks, vec![block]);
        assert_eq!(
            parsed.failures.iter().map(|f| f.index).collect::<Vec<_>>(),
            vec![0, 2]
        );
        assert!(!parsed.is_complete());
    }

    #[test]
    fn test_failure_keeps_error_kind() {
        let parsed = ParsedBlocks::from_results(vec![Err::<ContentBlock, _>(
            NormalizeError::UnsupportedContentKind("Table".into()),
        )]);
        assert!(matches!(
            parsed.failures[0].error,
            BlockError::Normalize(NormalizeError::UnsupportedContentKind(_))
        ));
    }
}
