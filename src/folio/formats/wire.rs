//! Server JSON format
//!
//! Parsing accepts a single block object or an array of blocks, in the tolerant shape described
//! in [`crate::folio::wire`], and normalizes each one. A block that does not decode is reported
//! at its index like any other rejected block. Serialization always writes an array of canonical
//! blocks.

use crate::folio::error::{FormatError, NormalizeError};
use crate::folio::format::{Format, ParsedBlocks};
use crate::folio::model::ContentBlock;
use crate::folio::normalize::normalize;
use crate::folio::wire::{blocks_from_json, to_wire, WireBlock};

#[derive(Debug, Clone, Default)]
pub struct WireFormat {
    pretty: bool,
}

impl WireFormat {
    pub fn new(pretty: bool) -> Self {
        WireFormat { pretty }
    }
}

impl Format for WireFormat {
    fn name(&self) -> &str {
        "wire"
    }

    fn description(&self) -> &str {
        "Block JSON exchanged with the persistence endpoints"
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<ParsedBlocks, FormatError> {
        let results = blocks_from_json(source)?.into_iter().map(|decoded| {
            decoded
                .map_err(NormalizeError::from)
                .and_then(|block| normalize(&block))
        });
        Ok(ParsedBlocks::from_results(results))
    }

    fn serialize(&self, blocks: &[ContentBlock]) -> Result<String, FormatError> {
        let wire: Vec<WireBlock> = blocks.iter().map(to_wire).collect();
        let json = if self.pretty {
            serde_json::to_string_pretty(&wire)?
        } else {
            serde_json::to_string(&wire)?
        };
        Ok(json)
    }
}
