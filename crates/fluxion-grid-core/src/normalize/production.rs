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

use crate::decimal::{DecimalStyle, json_number};
use crate::mapping::{GenerationMapping, IgnoreList};
use crate::timestamps::parse_local_iso;
use chrono_tz::Tz;
use fluxion_grid_types::{GenerationType, GridError, ProductionMix, ProductionRecord, ZoneKey};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Layout of a flat key -> value production payload
///
/// Several zones may be multiplexed into one key space; each zone owns the
/// keys ending in its discriminator, e.g. "VandSev_E" is hydro for the zone
/// whose discriminator is "Sev_E".
#[derive(Debug, Clone, Copy)]
pub struct FlatProductionSchema {
    pub timestamp_key: &'static str,
    pub timezone: Tz,
    pub decimal: DecimalStyle,
    pub mapping: GenerationMapping,
    pub ignore: IgnoreList,
    /// Types reported as explicit zero unless the payload says otherwise
    pub seeded: &'static [GenerationType],
    /// Discriminators of every zone in the key space
    pub discriminators: &'static [&'static str],
    pub source: &'static str,
}

/// Raw label of `key` if it belongs to the zone with discriminator `wanted`
///
/// When discriminators overlap ("S_E" is a suffix of "VS_E") the longest one
/// that matches owns the key.
pub fn strip_zone_suffix<'k>(key: &'k str, wanted: &str, all: &[&str]) -> Option<&'k str> {
    let owner = all
        .iter()
        .copied()
        .chain(std::iter::once(wanted))
        .filter(|d| !d.is_empty() && key.ends_with(d))
        .max_by_key(|d| d.len())?;
    if owner != wanted {
        return None;
    }
    key.strip_suffix(wanted)
}

/// Build one production record from a flat payload
pub fn normalize_flat_production(
    payload: &Map<String, Value>,
    schema: &FlatProductionSchema,
    zone_key: &ZoneKey,
    discriminator: &str,
) -> Result<ProductionRecord, GridError> {
    let mut datetime = None;
    let mut production = ProductionMix::seeded(schema.seeded);
    let mut storage = ProductionMix::new();

    for (key, value) in payload {
        if key == schema.timestamp_key {
            let raw = value.as_str().ok_or_else(|| {
                GridError::malformed(format!("'{key}' is not a timestamp string"))
            })?;
            datetime = Some(parse_local_iso(raw, schema.timezone)?);
            continue;
        }
        if schema.ignore.matches(key) {
            continue;
        }
        let Some(label) = strip_zone_suffix(key, discriminator, schema.discriminators) else {
            continue;
        };

        let kind = schema.mapping.resolve(label)?;
        let Some(mw) = json_number(value, schema.decimal) else {
            debug!("Skipping '{}' for {}: no usable value {}", key, zone_key, value);
            continue;
        };
        if kind.is_storage() {
            storage.add(kind, Some(mw));
        } else {
            production.add(kind, Some(mw));
        }
    }

    let datetime = datetime.ok_or_else(|| {
        GridError::malformed(format!("missing timestamp key '{}'", schema.timestamp_key))
    })?;

    Ok(ProductionRecord {
        zone_key: zone_key.clone(),
        datetime,
        production,
        storage,
        source: schema.source.to_owned(),
    })
}

/// One row of a long-format generation table
#[derive(Debug, Clone, PartialEq)]
pub struct FuelRow {
    pub timestamp: String,
    pub fuel: String,
    pub mw: Option<f64>,
}

/// Group rows by timestamp into records, in order of first appearance
pub fn normalize_grouped_production(
    rows: &[FuelRow],
    mapping: &GenerationMapping,
    timezone: Tz,
    zone_key: &ZoneKey,
    source: &str,
) -> Result<Vec<ProductionRecord>, GridError> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut records: Vec<ProductionRecord> = Vec::new();

    for row in rows {
        let kind = mapping.resolve(&row.fuel)?;
        let slot = match index.get(row.timestamp.as_str()) {
            Some(&i) => i,
            None => {
                records.push(ProductionRecord {
                    zone_key: zone_key.clone(),
                    datetime: parse_local_iso(&row.timestamp, timezone)?,
                    production: ProductionMix::new(),
                    storage: ProductionMix::new(),
                    source: source.to_owned(),
                });
                index.insert(row.timestamp.as_str(), records.len() - 1);
                records.len() - 1
            }
        };

        let record = &mut records[slot];
        if kind.is_storage() {
            record.storage.add(kind, row.mw);
        } else {
            record.production.add(kind, row.mw);
        }
    }

    Ok(records)
}
