//! Template context for read-only rendering.
//!
//! Keyed templates dispatch on which variant key is present and test formatting with
//! `format_extra.Bold`-style lookups instead of string comparisons. This module builds that
//! context from a model block: same one-key-per-element shape as the wire payload, with every
//! `format_extra` / `note_type_extra` filled in from the canonical strings.

use crate::folio::model::{
    BlockContent, ContentBlock, FormatFlags, Identifier, NoteTypeFlags, TextElement,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateBlock {
    pub id: Option<Identifier>,
    pub revision_id: Option<Identifier>,
    pub content: TemplateContent,
    pub css_class: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TemplateContent {
    Paragraph { contents: Vec<TemplateElement> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TemplateElement {
    PlainText {
        value: String,
    },
    FormattedText {
        contents: Vec<TemplateElement>,
        format: String,
        format_extra: FormatFlags,
    },
    Link {
        url: String,
        text: Option<Vec<TemplateElement>>,
    },
    Note {
        content: Vec<TemplateElement>,
        note_type: String,
        note_type_extra: NoteTypeFlags,
    },
    LineBreak {},
}

pub fn template_block(block: &ContentBlock) -> TemplateBlock {
    let content = match &block.content {
        BlockContent::Paragraph(paragraph) => TemplateContent::Paragraph {
            contents: template_elements(&paragraph.contents),
        },
    };

    TemplateBlock {
        id: block.id.clone(),
        revision_id: block.revision_id.clone(),
        content,
        css_class: block.css_class.clone(),
    }
}

fn template_elements(elements: &[TextElement]) -> Vec<TemplateElement> {
    elements.iter().map(template_element).collect()
}

fn template_element(element: &TextElement) -> TemplateElement {
    match element {
        TextElement::PlainText { value } => TemplateElement::PlainText {
            value: value.clone(),
        },
        TextElement::FormattedText { contents, format } => TemplateElement::FormattedText {
            contents: template_elements(contents),
            format: format.as_str().to_string(),
            format_extra: format.flags(),
        },
        TextElement::Link { url, text } => TemplateElement::Link {
            url: url.clone(),
            text: text.as_deref().map(template_elements),
        },
        TextElement::Note { content, note_type } => TemplateElement::Note {
            content: template_elements(content),
            note_type: note_type.as_str().to_string(),
            note_type_extra: note_type.flags(),
        },
        TextElement::LineBreak {} => TemplateElement::LineBreak {},
    }
}
