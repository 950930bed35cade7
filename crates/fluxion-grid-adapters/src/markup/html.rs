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

//! HTML navigation and embedded JavaScript arrays

use fluxion_grid_types::GridError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

fn selector(css: &str) -> Result<Selector, GridError> {
    Selector::parse(css).map_err(|e| GridError::malformed(format!("bad selector '{css}': {e:?}")))
}

/// A parsed HTML document
#[derive(Debug)]
pub struct HtmlPage {
    document: Html,
}

impl HtmlPage {
    pub fn parse(text: &str) -> Self {
        Self {
            document: Html::parse_document(text),
        }
    }

    pub fn find_first(&self, css: &str) -> Result<Option<ElementRef<'_>>, GridError> {
        Ok(self.document.select(&selector(css)?).next())
    }

    /// First element matching `css`; absence means the page layout changed
    pub fn select_first(&self, css: &str) -> Result<ElementRef<'_>, GridError> {
        self.find_first(css)?
            .ok_or_else(|| GridError::malformed(format!("no element matches '{css}'")))
    }

    /// First `<tag>` after `anchor` in document order, descendants included
    pub fn next_element_after<'a>(
        &'a self,
        anchor: ElementRef<'a>,
        tag: &str,
    ) -> Result<ElementRef<'a>, GridError> {
        let all = selector("*")?;
        self.document
            .select(&all)
            .skip_while(|el| el.id() != anchor.id())
            .skip(1)
            .find(|el| el.value().name().eq_ignore_ascii_case(tag))
            .ok_or_else(|| {
                GridError::malformed(format!(
                    "no <{tag}> after <{}>",
                    anchor.value().name()
                ))
            })
    }
}

/// Next sibling element named `tag`
pub fn next_sibling_element<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name().eq_ignore_ascii_case(tag))
}

/// First descendant of `element` matching `css`
pub fn first_descendant<'a>(element: ElementRef<'a>, css: &str) -> Result<ElementRef<'a>, GridError> {
    element.select(&selector(css)?).next().ok_or_else(|| {
        GridError::malformed(format!(
            "<{}> has no descendant matching '{css}'",
            element.value().name()
        ))
    })
}

/// All text below `element`, concatenated
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Literal of `var <name> = [...]` in a script body
///
/// The literal runs to the last `]` on the assignment's line.
pub fn extract_js_array<'s>(script: &'s str, name: &str) -> Result<&'s str, GridError> {
    let pattern = format!(r"var\s+{}\s*=\s*(\[.*\])", regex::escape(name));
    let re = Regex::new(&pattern).map_err(|e| GridError::malformed(e.to_string()))?;
    re.captures(script)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| GridError::malformed(format!("script has no '{name}' array")))
}

/// Decode a JavaScript array literal as JSON
///
/// Accepts single-quoted strings, trailing commas and `undefined`.
pub fn decode_js_array(literal: &str) -> Result<Vec<Value>, GridError> {
    let trailing_comma = Regex::new(r",\s*([\]}])").map_err(|e| GridError::malformed(e.to_string()))?;
    let undefined = Regex::new(r"\bundefined\b").map_err(|e| GridError::malformed(e.to_string()))?;

    let text = literal.replace('\'', "\"");
    let text = trailing_comma.replace_all(&text, "$1");
    let text = undefined.replace_all(&text, "null");

    match serde_json::from_str(&text) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(other) => Err(GridError::malformed(format!("expected an array, got {other}"))),
        Err(e) => Err(GridError::malformed(format!("invalid array literal: {e}"))),
    }
}
