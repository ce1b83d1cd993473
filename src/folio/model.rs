//! The canonical content-block tree.
//!
//! A [`ContentBlock`] is one paragraph-level unit of a section. Its inline text is a tree of
//! [`TextElement`]s: formatting and links nest freely, so a bold span may sit inside a link inside
//! an italic span.
//!
//! # Derived flags
//!
//! The server and the template renderer both know a "flag record" mirror of the canonical
//! format / note type strings (`format_extra`, `note_type_extra`). Those records are never stored
//! here. They are computed on demand by [`Format::flags`] and [`NoteType::flags`], so they cannot
//! go stale, and they only get materialized when the tree is handed to a template (see
//! [`crate::folio::view`]).
//!
//! # JSON
//!
//! Every type serializes with serde's externally tagged encoding, which is the exact payload
//! exchanged with the persistence endpoints:
//!
//! ```text
//! {"id":"b1","revision_id":null,"css_class":null,
//!  "content":{"Paragraph":{"contents":[{"PlainText":{"value":"x"}},{"LineBreak":{}}]}}}
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Inline formatting kind carried by [`TextElement::FormattedText`].
///
/// Serialized as its canonical string. Strings the editor does not know are kept in
/// [`Format::Other`] so that content coming from a newer server survives a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Format {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Superscript,
    Subscript,
    None,
    Other(String),
}

impl Format {
    /// Every recognized format, in the order the HTML parser checks marker classes.
    pub const KNOWN: [Format; 7] = [
        Format::Bold,
        Format::Italic,
        Format::Underline,
        Format::Strikethrough,
        Format::Superscript,
        Format::Subscript,
        Format::None,
    ];

    /// The canonical string, e.g. `"Bold"`.
    pub fn as_str(&self) -> &str {
        match self {
            Format::Bold => "Bold",
            Format::Italic => "Italic",
            Format::Underline => "Underline",
            Format::Strikethrough => "Strikethrough",
            Format::Superscript => "Superscript",
            Format::Subscript => "Subscript",
            Format::None => "None",
            Format::Other(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Format::Other(_))
    }

    /// The derived flag record: the single flag named after this format, or no flag at all for
    /// an unrecognized format.
    pub fn flags(&self) -> FormatFlags {
        let mut flags = FormatFlags::default();
        match self {
            Format::Bold => flags.bold = true,
            Format::Italic => flags.italic = true,
            Format::Underline => flags.underline = true,
            Format::Strikethrough => flags.strikethrough = true,
            Format::Superscript => flags.superscript = true,
            Format::Subscript => flags.subscript = true,
            Format::None => flags.none = true,
            Format::Other(_) => {}
        }
        flags
    }
}

impl From<&str> for Format {
    fn from(name: &str) -> Self {
        Format::KNOWN
            .iter()
            .find(|known| known.as_str() == name)
            .cloned()
            .unwrap_or_else(|| Format::Other(name.to_string()))
    }
}

impl From<String> for Format {
    fn from(name: String) -> Self {
        match Format::from(name.as_str()) {
            Format::Other(_) => Format::Other(name),
            known => known,
        }
    }
}

impl From<Format> for String {
    fn from(format: Format) -> Self {
        match format {
            Format::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// Boolean mirror of a [`Format`], as consumed by declarative templates.
///
/// Only set flags are serialized, so `Format::Bold` becomes `{"Bold": true}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FormatFlags {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub superscript: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub subscript: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub none: bool,
}

/// Footnote or endnote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NoteType {
    Footnote,
    Endnote,
    Other(String),
}

impl NoteType {
    pub fn as_str(&self) -> &str {
        match self {
            NoteType::Footnote => "Footnote",
            NoteType::Endnote => "Endnote",
            NoteType::Other(name) => name,
        }
    }

    pub fn flags(&self) -> NoteTypeFlags {
        NoteTypeFlags {
            footnote: matches!(self, NoteType::Footnote),
            endnote: matches!(self, NoteType::Endnote),
        }
    }
}

impl From<String> for NoteType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Footnote" => NoteType::Footnote,
            "Endnote" => NoteType::Endnote,
            _ => NoteType::Other(name),
        }
    }
}

impl From<&str> for NoteType {
    fn from(name: &str) -> Self {
        NoteType::from(name.to_string())
    }
}

impl From<NoteType> for String {
    fn from(note_type: NoteType) -> Self {
        match note_type {
            NoteType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean mirror of a [`NoteType`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NoteTypeFlags {
    #[serde(default, skip_serializing_if = "is_false")]
    pub footnote: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub endnote: bool,
}

/// One node of a block's inline tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TextElement {
    PlainText {
        value: String,
    },
    FormattedText {
        contents: Vec<TextElement>,
        format: Format,
    },
    /// `text: None` is a bare link with no rendered text.
    Link {
        url: String,
        text: Option<Vec<TextElement>>,
    },
    Note {
        content: Vec<TextElement>,
        note_type: NoteType,
    },
    LineBreak {},
}

impl TextElement {
    pub fn plain(value: impl Into<String>) -> Self {
        TextElement::PlainText {
            value: value.into(),
        }
    }

    pub fn formatted(format: Format, contents: Vec<TextElement>) -> Self {
        TextElement::FormattedText { contents, format }
    }

    pub fn link(url: impl Into<String>, text: Option<Vec<TextElement>>) -> Self {
        TextElement::Link {
            url: url.into(),
            text,
        }
    }

    pub fn note(note_type: NoteType, content: Vec<TextElement>) -> Self {
        TextElement::Note { content, note_type }
    }

    pub fn line_break() -> Self {
        TextElement::LineBreak {}
    }

    pub fn is_line_break(&self) -> bool {
        matches!(self, TextElement::LineBreak {})
    }

    /// Derived `format_extra` of a formatted span; `None` for every other variant.
    pub fn format_extra(&self) -> Option<FormatFlags> {
        match self {
            TextElement::FormattedText { format, .. } => Some(format.flags()),
            _ => None,
        }
    }

    /// Derived `note_type_extra` of a note; `None` for every other variant.
    pub fn note_type_extra(&self) -> Option<NoteTypeFlags> {
        match self {
            TextElement::Note { note_type, .. } => Some(note_type.flags()),
            _ => None,
        }
    }

    /// Nested elements of composite nodes. A bare link has none.
    pub fn children(&self) -> &[TextElement] {
        match self {
            TextElement::FormattedText { contents, .. } => contents,
            TextElement::Link {
                text: Some(text), ..
            } => text,
            TextElement::Note { content, .. } => content,
            _ => &[],
        }
    }

    fn push_plain_text(&self, out: &mut String) {
        match self {
            TextElement::PlainText { value } => out.push_str(value),
            TextElement::LineBreak {} => out.push('\n'),
            TextElement::Note { .. } => {}
            other => {
                for child in other.children() {
                    child.push_plain_text(out);
                }
            }
        }
    }
}

/// Paragraph content: a flat run of inline elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub contents: Vec<TextElement>,
}

/// Content kinds a block may hold. Only paragraphs exist today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockContent {
    Paragraph(Paragraph),
}

/// Opaque server-issued identifier.
///
/// Accepts either a JSON string or an integer and always serializes as a string, so ids read
/// back from a `data-block-id` attribute compare equal to the ones received from the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(id: impl Into<String>) -> Self {
        Identifier(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Identifier(text),
            Raw::Signed(number) => Identifier(number.to_string()),
            Raw::Unsigned(number) => Identifier(number.to_string()),
        })
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(id: &str) -> Self {
        Identifier::new(id)
    }
}

/// A persisted (or about to be persisted) unit of section content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// `None` until the block is first saved.
    #[serde(default)]
    pub id: Option<Identifier>,
    #[serde(default)]
    pub revision_id: Option<Identifier>,
    pub content: BlockContent,
    #[serde(default)]
    pub css_class: Option<Vec<String>>,
}

impl ContentBlock {
    /// A new, unsaved paragraph block.
    pub fn paragraph(contents: Vec<TextElement>) -> Self {
        ContentBlock {
            id: None,
            revision_id: None,
            content: BlockContent::Paragraph(Paragraph { contents }),
            css_class: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<Identifier>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_revision(mut self, revision_id: impl Into<Identifier>) -> Self {
        self.revision_id = Some(revision_id.into());
        self
    }

    pub fn with_css_class(mut self, classes: Vec<String>) -> Self {
        self.css_class = Some(classes);
        self
    }

    /// Data attribute value naming this block's kind in the editable DOM.
    pub fn block_type(&self) -> &'static str {
        match self.content {
            BlockContent::Paragraph(_) => "paragraph",
        }
    }

    pub fn paragraph_contents(&self) -> &[TextElement] {
        match &self.content {
            BlockContent::Paragraph(paragraph) => &paragraph.contents,
        }
    }

    /// Text projection of the block: line breaks become `\n`, notes are left out.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for element in self.paragraph_contents() {
            element.push_plain_text(&mut out);
        }
        out
    }
}

impl From<String> for Identifier {
    fn from(id: String) -> Self {
        Identifier(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_flags_set_single_flag() {
        let flags = Format::Bold.flags();
        assert!(flags.bold);
        assert_eq!(
            flags,
            FormatFlags {
                bold: true,
                ..Default::default()
            }
        );
        assert!(Format::None.flags().none);
    }

    #[test]
    fn test_unrecognized_format_sets_no_flag() {
        let format = Format::from("Blink");
        assert_eq!(format, Format::Other("Blink".to_string()));
        assert_eq!(format.flags(), FormatFlags::default());
        assert!(!format.is_known());
    }

    #[test]
    fn test_format_string_round_trip() {
        for format in Format::KNOWN {
            let name: String = format.clone().into();
            assert_eq!(Format::from(name), format);
        }
    }

    #[test]
    fn test_flags_serialize_only_set_keys() {
        assert_eq!(
            serde_json::to_value(Format::Bold.flags()).unwrap(),
            json!({"Bold": true})
        );
        assert_eq!(
            serde_json::to_value(NoteType::Endnote.flags()).unwrap(),
            json!({"Endnote": true})
        );
    }

    #[test]
    fn test_text_element_json_shape() {
        let element = TextElement::formatted(
            Format::Italic,
            vec![TextElement::plain("hi"), TextElement::line_break()],
        );
        assert_eq!(
            serde_json::to_value(&element).unwrap(),
            json!({"FormattedText": {
                "contents": [{"PlainText": {"value": "hi"}}, {"LineBreak": {}}],
                "format": "Italic"
            }})
        );
    }

    #[test]
    fn test_bare_link_serializes_null_text() {
        let element = TextElement::link("http://x", None);
        assert_eq!(
            serde_json::to_value(&element).unwrap(),
            json!({"Link": {"url": "http://x", "text": null}})
        );
    }

    #[test]
    fn test_identifier_accepts_numbers() {
        let block: ContentBlock = serde_json::from_value(json!({
            "id": 42,
            "revision_id": "r7",
            "content": {"Paragraph": {"contents": []}}
        }))
        .unwrap();
        assert_eq!(block.id, Some(Identifier::new("42")));
        assert_eq!(block.revision_id, Some(Identifier::new("r7")));
        assert_eq!(block.css_class, None);
    }

    #[test]
    fn test_plain_text_projection() {
        let block = ContentBlock::paragraph(vec![
            TextElement::plain("a "),
            TextElement::formatted(Format::Bold, vec![TextElement::plain("b")]),
            TextElement::line_break(),
            TextElement::link("http://x", Some(vec![TextElement::plain("c")])),
            TextElement::note(NoteType::Footnote, vec![TextElement::plain("hidden")]),
        ]);
        assert_eq!(block.plain_text(), "a b\nc");
    }

    #[test]
    fn test_derived_extras_only_on_matching_variant() {
        let span = TextElement::formatted(Format::Underline, vec![]);
        assert_eq!(span.format_extra().map(|f| f.underline), Some(true));
        assert_eq!(span.note_type_extra(), None);

        let note = TextElement::note(NoteType::Footnote, vec![]);
        assert_eq!(note.note_type_extra().map(|f| f.footnote), Some(true));
        assert_eq!(TextElement::plain("x").format_extra(), None);
    }
}
