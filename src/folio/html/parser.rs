//! HTML parsing (editable DOM → block model)
//!
//! Inverse of [`super::serializer`]. The editing surface is under user control, so the parser is
//! strict about what would lose content and lenient about the rest:
//!
//! - a block root must name a known `data-block-type` and hold exactly one paragraph container;
//! - a `formatted_text` span must name a known variant class, otherwise the block is refused
//!   rather than saved without its formatting;
//! - anything else the surface leaves behind (unclassed wrappers, note placeholders, comments)
//!   contributes nothing.
//!
//! Traversal is depth-first, left to right. Each DOM node yields a sequence of elements, since a
//! single element may carry several marker classes.

use super::dom;
use super::text::normalize_text;
use super::{
    format_class, ParseOptions, BLOCK_ID_ATTR, BLOCK_TYPE_ATTR, FORMATTED_TEXT_CLASS,
    LINK_CLASS, NOTE_CLASS, PARAGRAPH_CLASS,
};
use crate::folio::error::HtmlParseError;
use crate::folio::model::{
    BlockContent, ContentBlock, Format, Identifier, Paragraph, TextElement,
};
use markup5ever_rcdom::{Handle, NodeData};
use tracing::debug;

const PARAGRAPH_BLOCK: &str = "paragraph";

/// Rebuilds a block from its root element.
///
/// The result carries the `data-block-id` of the root (if any). `revision_id` is stamped by
/// the server and `css_class` is not editable here, so both come back as `None`.
pub fn parse_block(root: &Handle, options: &ParseOptions) -> Result<ContentBlock, HtmlParseError> {
    let block_type = dom::attribute(root, BLOCK_TYPE_ATTR);
    if block_type.as_deref() != Some(PARAGRAPH_BLOCK) {
        return Err(HtmlParseError::UnknownBlockType(block_type));
    }

    let containers = dom::descendants(root, |node| dom::has_class(node, PARAGRAPH_CLASS));
    let container = match containers.as_slice() {
        [container] => container,
        _ => {
            return Err(HtmlParseError::MalformedParagraph {
                found: containers.len(),
            })
        }
    };

    let mut contents = parse_children(container, options)?;
    // The last break before the caret is an editing artifact.
    if contents.last().is_some_and(TextElement::is_line_break) {
        contents.pop();
    }

    let id = dom::attribute(root, BLOCK_ID_ATTR)
        .filter(|id| !id.is_empty())
        .map(Identifier::from);
    debug!(id = ?id, elements = contents.len(), "parsed paragraph block");

    Ok(ContentBlock {
        id,
        revision_id: None,
        content: BlockContent::Paragraph(Paragraph { contents }),
        css_class: None,
    })
}

/// Parses an HTML string and rebuilds the first block root found in it.
pub fn parse_block_html(source: &str, options: &ParseOptions) -> Result<ContentBlock, HtmlParseError> {
    let dom = dom::parse_html(source);
    let root = block_roots(&dom.document)
        .into_iter()
        .next()
        .ok_or(HtmlParseError::UnknownBlockType(None))?;
    parse_block(&root, options)
}

/// Parses an HTML string holding several block roots, one result per root in document order.
pub fn parse_blocks_html(
    source: &str,
    options: &ParseOptions,
) -> Vec<Result<ContentBlock, HtmlParseError>> {
    let dom = dom::parse_html(source);
    block_roots(&dom.document)
        .iter()
        .map(|root| parse_block(root, options))
        .collect()
}

fn block_roots(document: &Handle) -> Vec<Handle> {
    dom::outermost(document, |node| {
        dom::attribute(node, BLOCK_TYPE_ATTR).is_some()
    })
}

fn parse_children(node: &Handle, options: &ParseOptions) -> Result<Vec<TextElement>, HtmlParseError> {
    let mut elements = Vec::new();
    for child in node.children.borrow().iter() {
        elements.extend(parse_node(child, options)?);
    }
    Ok(elements)
}

fn parse_node(node: &Handle, options: &ParseOptions) -> Result<Vec<TextElement>, HtmlParseError> {
    match &node.data {
        NodeData::Text { contents } => {
            let value = normalize_text(&contents.borrow());
            if value.is_empty() {
                Ok(Vec::new())
            } else {
                Ok(vec![TextElement::PlainText { value }])
            }
        }
        NodeData::Element { .. } => parse_element(node, options),
        _ => Ok(Vec::new()),
    }
}

/// Applies each element rule independently: line break, formatted text, link.
fn parse_element(node: &Handle, options: &ParseOptions) -> Result<Vec<TextElement>, HtmlParseError> {
    let mut produced = Vec::new();
    let classes = dom::class_list(node);
    let has = |class: &str| classes.iter().any(|candidate| candidate == class);

    if dom::is_element_named(node, "br") {
        produced.push(TextElement::line_break());
    }

    if has(FORMATTED_TEXT_CLASS) {
        let format = resolve_format(&classes).ok_or_else(|| {
            HtmlParseError::UnknownFormattingClass(dom::attribute(node, "class").unwrap_or_default())
        })?;
        produced.push(TextElement::FormattedText {
            contents: parse_children(node, options)?,
            format,
        });
    }

    if has(LINK_CLASS) {
        let url = dom::attribute(node, "href")
            .map(|href| options.resolve_href(&href))
            .unwrap_or_default();
        let text = parse_children(node, options)?;
        produced.push(TextElement::Link {
            url,
            text: if text.is_empty() { None } else { Some(text) },
        });
    }

    if produced.is_empty() && has(NOTE_CLASS) {
        debug!("skipping note markup");
    }

    Ok(produced)
}

/// First known variant class present, checked in [`Format::KNOWN`] order.
fn resolve_format(classes: &[String]) -> Option<Format> {
    Format::KNOWN
        .iter()
        .find(|format| {
            let wanted = format_class(format);
            classes.iter().any(|class| *class == wanted)
        })
        .cloned()
}
