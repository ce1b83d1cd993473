//! Read-only helpers over an html5ever `RcDom`.

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parses an HTML string (a fragment or a full page) into a DOM tree.
pub fn parse_html(source: &str) -> RcDom {
    parse_document(RcDom::default(), ParseOpts::default()).one(source)
}

pub fn is_element_named(node: &Handle, tag: &str) -> bool {
    matches!(&node.data, NodeData::Element { name, .. } if &*name.local == tag)
}

/// Value of an attribute, `None` when absent or when `node` is not an element.
pub fn attribute(node: &Handle, attr: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|candidate| &*candidate.name.local == attr)
            .map(|found| String::from(&*found.value)),
        _ => None,
    }
}

pub fn class_list(node: &Handle) -> Vec<String> {
    attribute(node, "class")
        .map(|classes| {
            classes
                .split_ascii_whitespace()
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub fn has_class(node: &Handle, class: &str) -> bool {
    class_list(node).iter().any(|candidate| candidate == class)
}

/// Every descendant of `root` (not `root` itself) matching `predicate`, in document order.
pub fn descendants<F>(root: &Handle, predicate: F) -> Vec<Handle>
where
    F: Fn(&Handle) -> bool,
{
    let mut found = Vec::new();
    collect(root, &predicate, true, &mut found);
    found
}

/// Like [`descendants`], but does not look inside a node once it matched.
pub fn outermost<F>(root: &Handle, predicate: F) -> Vec<Handle>
where
    F: Fn(&Handle) -> bool,
{
    let mut found = Vec::new();
    collect(root, &predicate, false, &mut found);
    found
}

fn collect<F>(node: &Handle, predicate: &F, descend_into_matches: bool, found: &mut Vec<Handle>)
where
    F: Fn(&Handle) -> bool,
{
    for child in node.children.borrow().iter() {
        let matched = predicate(child);
        if matched {
            found.push(child.clone());
        }
        if !matched || descend_into_matches {
            collect(child, predicate, descend_into_matches, found);
        }
    }
}
