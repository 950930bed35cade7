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

use crate::timestamps::parse_utc_iso;
use fluxion_grid_types::{ConsumptionForecastPoint, GridError, ZoneKey};
use tracing::debug;

/// One point per row, in row order
///
/// A row without a load keeps its slot with a null value.

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    /// UTC timestamp as sent by the source
    pub utc_timestamp: String,
    pub load_mw: Option<f64>,
}

pub fn normalize_forecast(
    rows: &[ForecastRow],
    zone_key: &ZoneKey,
    source: &str,
) -> Result<Vec<ConsumptionForecastPoint>, GridError> {
    let mut points = Vec::with_capacity(rows.len());
    for row in rows {
        if row.load_mw.is_none() {
            debug!("Forecast row {} has no load", row.utc_timestamp);
        }
        points.push(ConsumptionForecastPoint {
            zone_key: zone_key.clone(),
            datetime: parse_utc_iso(&row.utc_timestamp)?,
            value: row.load_mw,
            source: source.to_owned(),
        });
    }
    Ok(points)
}
