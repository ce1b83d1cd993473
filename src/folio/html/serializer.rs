//! HTML serialization (block model → editable DOM)
//!
//! Pipeline: ContentBlock → RcDom element tree → HTML string. Escaping of text and attribute
//! values is left to html5ever's serializer.

use super::{
    format_class, note_class, BLOCK_CLASS, BLOCK_ID_ATTR, BLOCK_TYPE_ATTR, FORMATTED_TEXT_CLASS,
    LINK_CLASS, NOTE_CLASS, NOTE_TYPE_ATTR, PARAGRAPH_CLASS,
};
use crate::folio::error::FormatError;
use crate::folio::model::{ContentBlock, TextElement};
use html5ever::{
    ns, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute, LocalName,
    QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::default::Default;
use std::rc::Rc;

/// Serialize one block to its editable HTML.
pub fn serialize_block(block: &ContentBlock) -> Result<String, FormatError> {
    serialize_node(&build_block(block))
}

/// Serialize a section, block roots back to back.
pub fn serialize_blocks(blocks: &[ContentBlock]) -> Result<String, FormatError> {
    let mut html = String::new();
    for block in blocks {
        html.push_str(&serialize_block(block)?);
    }
    Ok(html)
}

/// Build the DOM tree for a block. The returned handle is the block root.
pub fn build_block(block: &ContentBlock) -> Handle {
    let mut class = BLOCK_CLASS.to_string();
    for extra in block.css_class.iter().flatten() {
        class.push(' ');
        class.push_str(extra);
    }

    let mut attrs = vec![("class", class.as_str()), (BLOCK_TYPE_ATTR, block.block_type())];
    if let Some(id) = &block.id {
        attrs.push((BLOCK_ID_ATTR, id.as_str()));
    }

    let root = create_element("div", attrs);
    let paragraph = create_element("p", vec![("class", PARAGRAPH_CLASS)]);
    root.children.borrow_mut().push(paragraph.clone());

    for element in block.paragraph_contents() {
        add_inline_to_node(&paragraph, element);
    }

    root
}

/// Append the DOM shape of one inline element (and its subtree) to `parent`.
fn add_inline_to_node(parent: &Handle, element: &TextElement) {
    let node = match element {
        TextElement::PlainText { value } => create_text(value),
        TextElement::FormattedText { contents, format } => {
            let class = format!("{} {}", FORMATTED_TEXT_CLASS, format_class(format));
            let span = create_element("span", vec![("class", class.as_str())]);
            for child in contents {
                add_inline_to_node(&span, child);
            }
            span
        }
        TextElement::Link { url, text } => {
            let anchor = create_element("a", vec![("class", LINK_CLASS), ("href", url.as_str())]);
            for child in text.iter().flatten() {
                add_inline_to_node(&anchor, child);
            }
            anchor
        }
        TextElement::Note { content, note_type } => {
            // Placeholder only: the parser does not read notes back.
            let class = format!("{} {}", NOTE_CLASS, note_class(note_type));
            let span = create_element(
                "span",
                vec![("class", class.as_str()), (NOTE_TYPE_ATTR, note_type.as_str())],
            );
            for child in content {
                add_inline_to_node(&span, child);
            }
            span
        }
        TextElement::LineBreak {} => create_element("br", vec![]),
    };
    parent.children.borrow_mut().push(node);
}

fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

fn serialize_node(node: &Handle) -> Result<String, FormatError> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    let serializable = SerializableHandle::from(node.clone());
    serialize(&mut output, &serializable, opts).map_err(|e| {
        FormatError::SerializationError(format!("HTML serialization failed: {}", e))
    })?;

    String::from_utf8(output)
        .map_err(|e| FormatError::SerializationError(format!("UTF-8 conversion failed: {}", e)))
}
