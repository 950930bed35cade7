// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Minimal XML element tree

use fluxion_grid_types::GridError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    /// Concatenated text content, trimmed
    pub text: String,
}

impl XmlElement {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}

fn malformed(e: impl std::fmt::Display) -> GridError {
    GridError::malformed(format!("invalid XML: {e}"))
}

fn open_element(start: &BytesStart<'_>) -> Result<XmlElement, GridError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(malformed)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(malformed)?.into_owned();
        attributes.push((key, value));
    }
    Ok(XmlElement {
        name,
        attributes,
        ..XmlElement::default()
    })
}

/// Parse a whole document and return its root element
pub fn parse_document(bytes: &[u8]) -> Result<XmlElement, GridError> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(malformed)? {
            Event::Start(start) => stack.push(open_element(&start)?),
            Event::Empty(start) => {
                let element = open_element(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape().map_err(malformed)?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| malformed("unbalanced closing tag"))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(malformed("unexpected end of document"));
    }
    root.ok_or_else(|| malformed("document has no root element"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_with_attributes_and_text() {
        let doc = br#"<?xml version="1.0" encoding="UTF-8"?>
            <liste>
              <donneesMarche date="2024-03-10">
                <type granularite="Global" perimetre="FR">
                  <valeur periode="0">61.2</valeur>
                  <valeur periode="1">ND</valeur>
                </type>
              </donneesMarche>
              <empty flag="a &amp; b"/>
            </liste>"#;

        let root = parse_document(doc).unwrap();
        assert_eq!(root.name, "liste");
        let market = root.children_named("donneesMarche").next().unwrap();
        assert_eq!(market.attr("date"), Some("2024-03-10"));

        let kind = &market.children[0];
        assert_eq!(kind.attr("perimetre"), Some("FR"));
        let values: Vec<_> = kind.children_named("valeur").map(|v| v.text.as_str()).collect();
        assert_eq!(values, vec!["61.2", "ND"]);

        let empty = root.children_named("empty").next().unwrap();
        assert_eq!(empty.attr("flag"), Some("a & b"));
    }

    #[test]
    fn test_truncated_document_is_malformed() {
        assert!(matches!(
            parse_document(b"<liste><donneesMarche>"),
            Err(GridError::Malformed(_))
        ));
        assert!(parse_document(b"").is_err());
    }
}
