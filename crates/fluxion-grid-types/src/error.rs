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

//! Error types for grid data parsing

use crate::generation::GenerationType;
use crate::zone::ZoneKey;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// A raw label found in the payload has no mapping; the source schema changed
    #[error("Unknown generation type: {label}")]
    UnmappedKey { label: String },

    #[error("missing required generation type: {kind}")]
    MissingRequired { kind: GenerationType },

    #[error("total generation {total:.1} MW below plausibility floor {floor:.1} MW")]
    BelowFloor { total: f64, floor: f64 },

    #[error("No valid data was returned")]
    NoValidData,

    #[error("feed {index} has {actual} samples, expected {expected}")]
    FeedLengthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("flow direction cannot be determined from indicator '{indicator}'")]
    DirectionAmbiguous { indicator: String },

    #[error("{0}")]
    Unsupported(String),

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("config error: {0}")]
    Config(String),
}

impl GridError {
    /// Record-level rejection by the validation gate; the rest of a batch survives it
    pub fn is_validation_rejection(&self) -> bool {
        matches!(self, Self::MissingRequired { .. } | Self::BelowFloor { .. })
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }
}

/// The structured error surfaced to the harness by every adapter
#[derive(Debug, Error)]
#[error("{parser}{}: {source}", zone_label(.zone_key))]
pub struct ParserError {
    /// Adapter identifier, e.g. "FO"
    pub parser: &'static str,
    pub zone_key: Option<ZoneKey>,
    pub source: GridError,
}

fn zone_label(zone_key: &Option<ZoneKey>) -> String {
    zone_key
        .as_ref()
        .map(|z| format!(" [{z}]"))
        .unwrap_or_default()
}

impl ParserError {
    pub fn new(parser: &'static str, zone_key: Option<ZoneKey>, source: GridError) -> Self {
        Self {
            parser,
            zone_key,
            source,
        }
    }

    pub fn kind(&self) -> &GridError {
        &self.source
    }
}

pub type ParserResult<T> = std::result::Result<T, ParserError>;

/// Attach the adapter id and zone to a core error
pub trait ParserResultExt<T> {
    fn for_parser(self, parser: &'static str, zone_key: Option<&ZoneKey>) -> ParserResult<T>;
}

impl<T> ParserResultExt<T> for Result<T, GridError> {
    fn for_parser(self, parser: &'static str, zone_key: Option<&ZoneKey>) -> ParserResult<T> {
        self.map_err(|e| ParserError::new(parser, zone_key.cloned(), e))
    }
}
