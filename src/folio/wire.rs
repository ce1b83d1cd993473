//! The JSON shape exchanged with the persistence endpoints.
//!
//! The server encodes a text element as an object with one optional key per variant and relies
//! on exactly one of them being set. It may also send the derived `format_extra` /
//! `note_type_extra` records, omit empty sequences, or (from newer versions) name block content
//! kinds this editor does not know. The types here accept all of that as-is; turning it into the
//! strict [`crate::folio::model`] tree, and rejecting what cannot be represented, is the job of
//! [`crate::folio::normalize`].
//!
//! The opposite direction, [`to_wire`], always produces the canonical shape: one key per element
//! and no derived fields.

use crate::folio::model::{
    BlockContent, ContentBlock, FormatFlags, Identifier, NoteTypeFlags, TextElement,
};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

pub const PARAGRAPH_KEY: &str = "Paragraph";

/// A block as received from (or sent to) the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireBlock {
    #[serde(default)]
    pub id: Option<Identifier>,
    #[serde(default)]
    pub revision_id: Option<Identifier>,
    pub content: WireContent,
    #[serde(default)]
    pub css_class: Option<Vec<String>>,
}

impl WireBlock {
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }
}

/// Reads a section payload: either one block object or an array of them.
///
/// Only invalid JSON fails the whole payload. Each block is decoded on its own, so a block with
/// the wrong shape yields an error in its slot and its siblings still come through.
pub fn blocks_from_json(
    source: &str,
) -> Result<Vec<Result<WireBlock, serde_json::Error>>, serde_json::Error> {
    let items = match serde_json::from_str::<Value>(source)? {
        Value::Array(items) => items,
        single => vec![single],
    };
    Ok(items.into_iter().map(serde_json::from_value).collect())
}

/// Single-key content object. Unknown kinds are kept so the normalizer can name them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub enum WireContent {
    Paragraph(WireParagraph),
    Unsupported { kind: String, payload: Value },
}

impl TryFrom<Map<String, Value>> for WireContent {
    type Error = serde_json::Error;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        let foreign = map.keys().find(|key| *key != PARAGRAPH_KEY).cloned();
        if let Some(kind) = foreign {
            let payload = map.remove(&kind).unwrap_or(Value::Null);
            return Ok(WireContent::Unsupported { kind, payload });
        }

        match map.remove(PARAGRAPH_KEY) {
            Some(payload) => Ok(WireContent::Paragraph(serde_json::from_value(payload)?)),
            None => Ok(WireContent::Unsupported {
                kind: String::new(),
                payload: Value::Null,
            }),
        }
    }
}

impl Serialize for WireContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            WireContent::Paragraph(paragraph) => map.serialize_entry(PARAGRAPH_KEY, paragraph)?,
            WireContent::Unsupported { kind, payload } => map.serialize_entry(kind, payload)?,
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireParagraph {
    #[serde(default)]
    pub contents: Vec<WireTextElement>,
}

/// One inline element in the server's optional-key encoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireTextElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_text: Option<WirePlainText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_text: Option<WireFormattedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<WireLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<WireNote>,
    /// Only a non-null value marks a break; `null` means absent, as for the other keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_break: Option<WireLineBreak>,
}

impl WireTextElement {
    /// How many variant keys are set. Anything but 1 is malformed.
    pub fn populated(&self) -> usize {
        [
            self.plain_text.is_some(),
            self.formatted_text.is_some(),
            self.link.is_some(),
            self.note.is_some(),
            self.line_break.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    pub fn plain(value: impl Into<String>) -> Self {
        WireTextElement {
            plain_text: Some(WirePlainText {
                value: value.into(),
            }),
            ..Default::default()
        }
    }

    pub fn formatted(format: impl Into<String>, contents: Vec<WireTextElement>) -> Self {
        WireTextElement {
            formatted_text: Some(WireFormattedText {
                contents,
                format: format.into(),
                format_extra: None,
            }),
            ..Default::default()
        }
    }

    pub fn link(url: impl Into<String>, text: Option<Vec<WireTextElement>>) -> Self {
        WireTextElement {
            link: Some(WireLink {
                url: url.into(),
                text,
            }),
            ..Default::default()
        }
    }

    pub fn note(note_type: impl Into<String>, content: Vec<WireTextElement>) -> Self {
        WireTextElement {
            note: Some(WireNote {
                content,
                note_type: note_type.into(),
                note_type_extra: None,
            }),
            ..Default::default()
        }
    }

    pub fn line_break() -> Self {
        WireTextElement {
            line_break: Some(WireLineBreak {}),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WirePlainText {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFormattedText {
    #[serde(default)]
    pub contents: Vec<WireTextElement>,
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_extra: Option<FormatFlags>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireLink {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub text: Option<Vec<WireTextElement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireNote {
    #[serde(default)]
    pub content: Vec<WireTextElement>,
    pub note_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_type_extra: Option<NoteTypeFlags>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireLineBreak {}

/// Converts a model block into the payload sent back to the server.
pub fn to_wire(block: &ContentBlock) -> WireBlock {
    let content = match &block.content {
        BlockContent::Paragraph(paragraph) => WireContent::Paragraph(WireParagraph {
            contents: elements_to_wire(&paragraph.contents),
        }),
    };

    WireBlock {
        id: block.id.clone(),
        revision_id: block.revision_id.clone(),
        content,
        css_class: block.css_class.clone(),
    }
}

fn elements_to_wire(elements: &[TextElement]) -> Vec<WireTextElement> {
    elements.iter().map(element_to_wire).collect()
}

fn element_to_wire(element: &TextElement) -> WireTextElement {
    match element {
        TextElement::PlainText { value } => WireTextElement::plain(value.as_str()),
        TextElement::FormattedText { contents, format } => {
            WireTextElement::formatted(format.as_str(), elements_to_wire(contents))
        }
        TextElement::Link { url, text } => {
            WireTextElement::link(url.as_str(), text.as_deref().map(elements_to_wire))
        }
        TextElement::Note { content, note_type } => {
            WireTextElement::note(note_type.as_str(), elements_to_wire(content))
        }
        TextElement::LineBreak {} => WireTextElement::line_break(),
    }
}
