//! Editable HTML format

use crate::folio::error::FormatError;
use crate::folio::format::{Format, ParsedBlocks};
use crate::folio::html::parser::parse_blocks_html;
use crate::folio::html::serializer::serialize_blocks;
use crate::folio::html::ParseOptions;
use crate::folio::model::ContentBlock;

/// Block roots in the editing surface's DOM contract (see [`crate::folio::html`]).
#[derive(Debug, Clone, Default)]
pub struct HtmlFormat {
    options: ParseOptions,
}

impl HtmlFormat {
    pub fn new(options: ParseOptions) -> Self {
        HtmlFormat { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "Editable HTML block markup"
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<ParsedBlocks, FormatError> {
        Ok(ParsedBlocks::from_results(parse_blocks_html(
            source,
            &self.options,
        )))
    }

    fn serialize(&self, blocks: &[ContentBlock]) -> Result<String, FormatError> {
        serialize_blocks(blocks)
    }
}
