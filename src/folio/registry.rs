//! Format registry for format discovery and selection
//!
//! Formats are registered and retrieved by name. [`FormatRegistry::convert`] chains a parse in
//! one format with a serialize in another, carrying per-block failures along.

use crate::folio::error::FormatError;
use crate::folio::format::{BlockFailure, Format, ParsedBlocks};
use crate::folio::formats::{HtmlFormat, TemplateFormat, TextFormat, WireFormat};
use crate::folio::html::ParseOptions;
use crate::folio::model::ContentBlock;
use std::collections::HashMap;

/// Registry of block formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::default();
/// let conversion = registry.convert(json, "wire", "html")?;
/// for failure in &conversion.failures {
///     eprintln!("block {}: {}", failure.index, failure.error);
/// }
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

/// Result of [`FormatRegistry::convert`]: the serialized blocks that parsed, and the ones that
/// did not.
#[derive(Debug)]
pub struct Conversion {
    pub output: String,
    pub failures: Vec<BlockFailure>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Parse source text using the specified format
    pub fn parse(&self, source: &str, format: &str) -> Result<ParsedBlocks, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_parsing() {
            return Err(FormatError::NotSupported(format!(
                "Format '{}' does not support parsing",
                format
            )));
        }
        fmt.parse(source)
    }

    /// Serialize blocks using the specified format
    pub fn serialize(&self, blocks: &[ContentBlock], format: &str) -> Result<String, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(FormatError::NotSupported(format!(
                "Format '{}' does not support serialization",
                format
            )));
        }
        fmt.serialize(blocks)
    }

    /// Parse `source` as `from` and write the blocks that parsed as `to`.
    ///
    /// Both formats are checked before anything is parsed.
    pub fn convert(&self, source: &str, from: &str, to: &str) -> Result<Conversion, FormatError> {
        let target = self.get(to)?;
        if !target.supports_serialization() {
            return Err(FormatError::NotSupported(format!(
                "Format '{}' does not support serialization",
                to
            )));
        }

        let parsed = self.parse(source, from)?;
        Ok(Conversion {
            output: target.serialize(&parsed.blocks)?,
            failures: parsed.failures,
        })
    }

    /// Create a registry with the built-in formats. `options` configures the html parser.
    pub fn with_defaults(options: ParseOptions) -> Self {
        let mut registry = Self::new();

        registry.register(WireFormat::default());
        registry.register(HtmlFormat::new(options));
        registry.register(TemplateFormat);
        registry.register(TextFormat);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults(ParseOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folio::error::BlockError;
    use crate::folio::model::TextElement;

    struct TestFormat;
    impl Format for TestFormat {
        fn name(&self) -> &str {
            "test"
        }
        fn description(&self) -> &str {
            "Test format"
        }
        fn supports_parsing(&self) -> bool {
            true
        }
        fn supports_serialization(&self) -> bool {
            true
        }
        fn parse(&self, source: &str) -> Result<ParsedBlocks, FormatError> {
            Ok(ParsedBlocks {
                blocks: vec![ContentBlock::paragraph(vec![TextElement::plain(source)])],
                failures: Vec::new(),
            })
        }
        fn serialize(&self, _blocks: &[ContentBlock]) -> Result<String, FormatError> {
            Ok("test output".to_string())
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = FormatRegistry::new();
        assert_eq!(registry.formats.len(), 0);
    }

    #[test]
    fn test_registry_register() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        assert!(registry.has("test"));
        assert!(!registry.has("nonexistent"));
        assert_eq!(registry.list_formats(), vec!["test"]);
    }

    #[test]
    fn test_registry_get() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        assert_eq!(registry.get("test").unwrap().name(), "test");
        match registry.get("nonexistent") {
            Err(FormatError::FormatNotFound(name)) => assert_eq!(name, "nonexistent"),
            _ => panic!("Expected FormatNotFound error"),
        }
    }

    #[test]
    fn test_registry_parse_and_serialize() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        let parsed = registry.parse("input", "test").unwrap();
        assert_eq!(parsed.blocks[0].plain_text(), "input");
        assert_eq!(registry.serialize(&parsed.blocks, "test").unwrap(), "test output");
    }

    #[test]
    fn test_registry_replace_format() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);
        registry.register(TestFormat);

        assert_eq!(registry.list_formats().len(), 1);
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = FormatRegistry::default();
        assert_eq!(
            registry.list_formats(),
            vec!["html", "template", "text", "wire"]
        );
    }

    #[test]
    fn test_serialize_only_format_cannot_parse() {
        let registry = FormatRegistry::default();
        assert!(matches!(
            registry.parse("x", "text"),
            Err(FormatError::NotSupported(_))
        ));
    }

    #[test]
    fn test_convert_wire_to_html() {
        let registry = FormatRegistry::default();
        let source = r#"[{"id": "b1", "content": {"Paragraph": {"contents": [
            {"FormattedText": {"contents": [{"PlainText": {"value": "hi"}}], "format": "Bold", "format_extra": {"Bold": true}}}
        ]}}}]"#;

        let conversion = registry.convert(source, "wire", "html").unwrap();
        assert!(conversion.failures.is_empty());
        assert_eq!(
            conversion.output,
            r#"<div class="content_block" data-block-type="paragraph" data-block-id="b1"><p class="paragraph"><span class="formatted_text formatted_text_bold">hi</span></p></div>"#
        );
    }

    #[test]
    fn test_convert_carries_failures() {
        let registry = FormatRegistry::default();
        let source = r#"<div data-block-type="paragraph"><p class="paragraph">a</p></div><div data-block-type="quote"></div>"#;

        let conversion = registry.convert(source, "html", "text").unwrap();
        assert_eq!(conversion.output, "a");
        assert_eq!(conversion.failures.len(), 1);
        assert_eq!(conversion.failures[0].index, 1);
        assert!(matches!(conversion.failures[0].error, BlockError::Html(_)));
    }

    #[test]
    fn test_convert_checks_target_first() {
        let registry = FormatRegistry::default();
        assert!(matches!(
            registry.convert("{not json", "wire", "missing"),
            Err(FormatError::FormatNotFound(_))
        ));
    }
}
