//! Server block → model block.
//!
//! Walks the wire tree once and rebuilds it as a [`ContentBlock`]. Every node of the output is
//! freshly allocated, nothing is borrowed from the input. Server data is trusted as already
//! normalized: unlike the HTML path, trailing line breaks are kept and text is not touched.
//!
//! The canonical `format` / `note_type` string is the only source of truth. When the server also
//! sent the derived flag record, it is checked against the string and, if the two disagree,
//! reported and dropped.

use crate::folio::error::NormalizeError;
use crate::folio::model::{
    BlockContent, ContentBlock, Format, NoteType, Paragraph, TextElement,
};
use crate::folio::wire::{WireBlock, WireContent, WireTextElement};
use tracing::warn;

/// Converts one wire block into the block model.
pub fn normalize(block: &WireBlock) -> Result<ContentBlock, NormalizeError> {
    let paragraph = match &block.content {
        WireContent::Paragraph(paragraph) => paragraph,
        WireContent::Unsupported { kind, .. } => {
            return Err(NormalizeError::UnsupportedContentKind(kind.clone()))
        }
    };

    Ok(ContentBlock {
        id: block.id.clone(),
        revision_id: block.revision_id.clone(),
        content: BlockContent::Paragraph(Paragraph {
            contents: normalize_elements(&paragraph.contents)?,
        }),
        css_class: block.css_class.clone(),
    })
}

/// Normalizes a whole section, one result per block, in order.
pub fn normalize_all(blocks: &[WireBlock]) -> Vec<Result<ContentBlock, NormalizeError>> {
    blocks.iter().map(normalize).collect()
}

fn normalize_elements(elements: &[WireTextElement]) -> Result<Vec<TextElement>, NormalizeError> {
    elements.iter().map(normalize_element).collect()
}

fn normalize_element(element: &WireTextElement) -> Result<TextElement, NormalizeError> {
    let populated = element.populated();
    if populated != 1 {
        return Err(NormalizeError::InvalidTextElement { populated });
    }

    if let Some(plain) = &element.plain_text {
        return Ok(TextElement::plain(plain.value.as_str()));
    }

    if let Some(formatted) = &element.formatted_text {
        let format = Format::from(formatted.format.as_str());
        if let Some(extra) = formatted.format_extra {
            if extra != format.flags() {
                warn!(
                    format = %format,
                    server_extra = ?extra,
                    "format_extra disagrees with format, keeping format"
                );
            }
        }
        return Ok(TextElement::FormattedText {
            contents: normalize_elements(&formatted.contents)?,
            format,
        });
    }

    if let Some(link) = &element.link {
        let text = match &link.text {
            Some(text) => Some(normalize_elements(text)?),
            None => None,
        };
        return Ok(TextElement::Link {
            url: link.url.clone(),
            text,
        });
    }

    if let Some(note) = &element.note {
        let note_type = NoteType::from(note.note_type.as_str());
        if let Some(extra) = note.note_type_extra {
            if extra != note_type.flags() {
                warn!(
                    note_type = %note_type,
                    server_extra = ?extra,
                    "note_type_extra disagrees with note_type, keeping note_type"
                );
            }
        }
        return Ok(TextElement::Note {
            content: normalize_elements(&note.content)?,
            note_type,
        });
    }

    Ok(TextElement::line_break())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folio::model::{FormatFlags, Identifier};
    use crate::folio::wire::{to_wire, WireParagraph};
    use serde_json::json;

    fn paragraph(contents: Vec<WireTextElement>) -> WireBlock {
        WireBlock {
            id: Some(Identifier::new("b1")),
            revision_id: Some(Identifier::new("r1")),
            content: WireContent::Paragraph(WireParagraph { contents }),
            css_class: Some(vec!["lead".to_string()]),
        }
    }

    fn single(block: &ContentBlock) -> &TextElement {
        &block.paragraph_contents()[0]
    }

    #[test]
    fn test_format_extra_derived_when_absent() {
        let block = normalize(&paragraph(vec![WireTextElement::formatted(
            "Bold",
            vec![WireTextElement::plain("b")],
        )]))
        .unwrap();

        assert_eq!(
            single(&block).format_extra(),
            Some(FormatFlags {
                bold: true,
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_matching_server_extra_is_kept() {
        let wire: WireBlock = serde_json::from_value(json!({
            "content": {"Paragraph": {"contents": [
                {"FormattedText": {"contents": [], "format": "Italic", "format_extra": {"Italic": true}}}
            ]}}
        }))
        .unwrap();

        let block = normalize(&wire).unwrap();
        assert_eq!(
            single(&block).format_extra(),
            Some(FormatFlags {
                italic: true,
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_inconsistent_server_extra_never_wins() {
        let wire: WireBlock = serde_json::from_value(json!({
            "content": {"Paragraph": {"contents": [
                {"FormattedText": {"contents": [], "format": "Bold", "format_extra": {"Italic": true}}}
            ]}}
        }))
        .unwrap();

        let block = normalize(&wire).unwrap();
        let flags = single(&block).format_extra().unwrap();
        assert!(flags.bold);
        assert!(!flags.italic);
    }

    #[test]
    fn test_unrecognized_format_derives_no_flag() {
        let block = normalize(&paragraph(vec![WireTextElement::formatted("Blink", vec![])])).unwrap();
        assert_eq!(single(&block).format_extra(), Some(FormatFlags::default()));
        assert_eq!(
            single(&block),
            &TextElement::formatted(Format::Other("Blink".into()), vec![])
        );
    }

    #[test]
    fn test_note_type_extra_derived() {
        let block = normalize(&paragraph(vec![WireTextElement::note(
            "Footnote",
            vec![WireTextElement::plain("see")],
        )]))
        .unwrap();

        let flags = single(&block).note_type_extra().unwrap();
        assert!(flags.footnote);
        assert!(!flags.endnote);
    }

    #[test]
    fn test_bare_link_stays_bare() {
        let block = normalize(&paragraph(vec![
            WireTextElement::link("http://a", None),
            WireTextElement::link("http://b", Some(vec![WireTextElement::plain("b")])),
        ]))
        .unwrap();

        assert_eq!(
            block.paragraph_contents(),
            &[
                TextElement::link("http://a", None),
                TextElement::link("http://b", Some(vec![TextElement::plain("b")])),
            ]
        );
    }

    #[test]
    fn test_trailing_line_break_is_kept() {
        let block = normalize(&paragraph(vec![
            WireTextElement::plain("x"),
            WireTextElement::line_break(),
        ]))
        .unwrap();

        assert_eq!(
            block.paragraph_contents(),
            &[TextElement::plain("x"), TextElement::line_break()]
        );
    }

    #[test]
    fn test_block_fields_are_carried_over() {
        let block = normalize(&paragraph(vec![])).unwrap();
        assert_eq!(block.id, Some(Identifier::new("b1")));
        assert_eq!(block.revision_id, Some(Identifier::new("r1")));
        assert_eq!(block.css_class, Some(vec!["lead".to_string()]));
    }

    #[test]
    fn test_unsupported_content_kind() {
        let wire = WireBlock::from_json(r#"{"content": {"Table": {"rows": []}}}"#).unwrap();
        match normalize(&wire) {
            Err(NormalizeError::UnsupportedContentKind(kind)) => assert_eq!(kind, "Table"),
            other => panic!("expected UnsupportedContentKind, got {:?}", other),
        }
    }

    #[test]
    fn test_element_with_two_variants_is_rejected() {
        let wire: WireBlock = serde_json::from_value(json!({
            "content": {"Paragraph": {"contents": [
                {"PlainText": {"value": "x"}, "LineBreak": {}}
            ]}}
        }))
        .unwrap();

        assert!(matches!(
            normalize(&wire),
            Err(NormalizeError::InvalidTextElement { populated: 2 })
        ));
    }

    #[test]
    fn test_empty_element_is_rejected() {
        let wire: WireBlock = serde_json::from_value(json!({
            "content": {"Paragraph": {"contents": [{}]}}
        }))
        .unwrap();

        assert!(matches!(
            normalize(&wire),
            Err(NormalizeError::InvalidTextElement { populated: 0 })
        ));
    }

    #[test]
    fn test_normalize_all_isolates_failures() {
        let good = paragraph(vec![WireTextElement::plain("ok")]);
        let bad = WireBlock::from_json(r#"{"content": {"Table": {}}}"#).unwrap();

        let results = normalize_all(&[good.clone(), bad, good]);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_normalize_inverts_to_wire() {
        let block = ContentBlock::paragraph(vec![
            TextElement::formatted(
                Format::Italic,
                vec![TextElement::link(
                    "http://x",
                    Some(vec![TextElement::formatted(
                        Format::Bold,
                        vec![TextElement::plain("hi")],
                    )]),
                )],
            ),
            TextElement::note(NoteType::Endnote, vec![TextElement::plain("n")]),
            TextElement::line_break(),
        ])
        .with_id("b9");

        assert_eq!(normalize(&to_wire(&block)).unwrap(), block);
    }
}
