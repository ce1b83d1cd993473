//! Plain text format (serialization only)

use crate::folio::error::FormatError;
use crate::folio::format::Format;
use crate::folio::model::ContentBlock;

/// Text of each block, blocks separated by a blank line. Notes are left out.
#[derive(Debug, Clone, Default)]
pub struct TextFormat;

impl Format for TextFormat {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Plain text projection of the blocks"
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, blocks: &[ContentBlock]) -> Result<String, FormatError> {
        Ok(blocks
            .iter()
            .map(ContentBlock::plain_text)
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}
