//! XML bodies, flattened onto the canonical field map.
//!
//! The root element only delimits the document; its children map to keys.
//! Every occurrence of an element appends to its key, starting with the
//! first one, so one and many occurrences read the same way.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::FieldMap;
use crate::error::DecodeError;

/// An element whose end tag has not been seen yet.
struct Open {
    name: String,
    text: String,
    has_children: bool,
}

/// Flatten an XML document body.
pub fn flatten(body: &[u8]) -> Result<FieldMap, DecodeError> {
    let mut reader = Reader::from_reader(body);
    let mut fields = FieldMap::new();
    let mut stack: Vec<Open> = Vec::new();
    let mut seen_root = false;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => {
                let name = element_name(&start)?;
                enter(&mut stack, &mut seen_root)?;
                stack.push(Open {
                    name,
                    text: String::new(),
                    has_children: false,
                });
            }
            Event::Empty(start) => {
                let name = element_name(&start)?;
                enter(&mut stack, &mut seen_root)?;
                if !stack.is_empty() {
                    fields.append(key_for(&stack, &name), String::new());
                }
            }
            Event::Text(text) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&text.unescape().map_err(xml_error)?);
                }
            }
            Event::CData(data) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                let open = stack
                    .pop()
                    .ok_or_else(|| DecodeError::Xml("unexpected end tag".into()))?;
                // Leaves only; the root and grouping elements carry no value.
                if !stack.is_empty() && !open.has_children {
                    fields.append(key_for(&stack, &open.name), open.text.trim());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(DecodeError::Xml("unexpected end of document".into()));
    }
    if !seen_root {
        return Err(DecodeError::Xml("document has no root element".into()));
    }
    Ok(fields)
}

/// Record a new element under the current one, enforcing a single root.
fn enter(stack: &mut [Open], seen_root: &mut bool) -> Result<(), DecodeError> {
    match stack.last_mut() {
        Some(parent) => parent.has_children = true,
        None if *seen_root => return Err(DecodeError::Xml("multiple root elements".into())),
        None => *seen_root = true,
    }
    Ok(())
}

/// Dotted key of `name` nested in the open elements, root excluded.
fn key_for(stack: &[Open], name: &str) -> String {
    stack[1..]
        .iter()
        .map(|open| open.name.as_str())
        .chain(std::iter::once(name))
        .collect::<Vec<_>>()
        .join(".")
}

fn element_name(start: &BytesStart<'_>) -> Result<String, DecodeError> {
    std::str::from_utf8(start.local_name().as_ref())
        .map(str::to_string)
        .map_err(xml_error)
}

fn xml_error(e: impl std::fmt::Display) -> DecodeError {
    DecodeError::Xml(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &[u8] = br#"<?xml version="1.0"?>
<TestSchema>
    <id>123</id>
    <profile>
        <name>John &amp; Jane</name>
        <email><![CDATA[john@example.com]]></email>
    </profile>
    <verified>true</verified>
    <follow_ids>456</follow_ids>
    <follow_ids>789</follow_ids>
    <note/>
</TestSchema>"#;

    #[test]
    fn test_flatten_document() {
        let fields = flatten(DOCUMENT).unwrap();

        assert_eq!(fields.first("id"), Some("123"));
        assert_eq!(fields.first("profile.name"), Some("John & Jane"));
        assert_eq!(fields.first("profile.email"), Some("john@example.com"));
        assert_eq!(fields.first("verified"), Some("true"));
        assert_eq!(fields.first("note"), Some(""));
        assert_eq!(fields.get("profile"), None);
    }

    #[test]
    fn test_repeated_elements_keep_every_occurrence() {
        let fields = flatten(DOCUMENT).unwrap();
        assert_eq!(fields.get("follow_ids").unwrap(), ["456", "789"]);

        let single = flatten(b"<r><follow_ids>456</follow_ids></r>").unwrap();
        assert_eq!(single.get("follow_ids").unwrap(), ["456"]);
    }

    #[test]
    fn test_repeated_groups_append_per_leaf() {
        let fields =
            flatten(b"<order><item><sku>a</sku></item><item><sku>b</sku></item></order>").unwrap();
        assert_eq!(fields.get("item.sku").unwrap(), ["a", "b"]);
    }

    #[test]
    fn test_malformed_documents() {
        assert!(flatten(b"<r><id>1</name></r>").is_err());
        assert!(flatten(b"<r><id>1</id>").is_err());
        assert!(flatten(b"").is_err());
        assert!(flatten(b"<a/><b/>").is_err());
    }

    #[test]
    fn test_empty_root() {
        assert!(flatten(b"<r/>").unwrap().is_empty());
    }
}
