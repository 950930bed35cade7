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

//! Locale-aware number parsing

use serde_json::Value;

/// Placeholders sources emit instead of a number
pub const NO_DATA_SENTINELS: &[&str] = &["", "-", "ND", "N/A", "NA", "null", "None", "NaN"];

/// How a source writes decimals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalStyle {
    /// "1234.5"
    Point,
    /// "1234,5"; a '.' next to a ',' is a grouping separator
    Comma,
    /// "1,234.5"; ',' is a grouping separator
    PointGrouped,
}

/// Parse a source number, `None` for sentinels and garbage
pub fn parse_decimal(raw: &str, style: DecimalStyle) -> Option<f64> {
    let trimmed = raw.trim();
    if NO_DATA_SENTINELS
        .iter()
        .any(|s| s.eq_ignore_ascii_case(trimmed))
    {
        return None;
    }

    let canonical: String = match style {
        DecimalStyle::Point => trimmed.to_owned(),
        DecimalStyle::Comma if trimmed.contains(',') => {
            trimmed.replace('.', "").replace(',', ".")
        }
        DecimalStyle::Comma => trimmed.to_owned(),
        DecimalStyle::PointGrouped => trimmed.replace(',', ""),
    };

    canonical
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Number from a JSON value that may hold either a number or a string
pub fn json_number(value: &Value, style: DecimalStyle) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_decimal(s, style),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}
