//! Template context format (serialization only)

use crate::folio::error::FormatError;
use crate::folio::format::Format;
use crate::folio::model::ContentBlock;
use crate::folio::view::{template_block, TemplateBlock};

/// Pretty JSON array of [`TemplateBlock`]s, ready to hand to a keyed template renderer.
#[derive(Debug, Clone, Default)]
pub struct TemplateFormat;

impl Format for TemplateFormat {
    fn name(&self) -> &str {
        "template"
    }

    fn description(&self) -> &str {
        "Template context with derived formatting flags"
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, blocks: &[ContentBlock]) -> Result<String, FormatError> {
        let view: Vec<TemplateBlock> = blocks.iter().map(template_block).collect();
        Ok(serde_json::to_string_pretty(&view)?)
    }
}
