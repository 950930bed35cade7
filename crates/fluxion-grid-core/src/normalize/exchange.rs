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

use crate::timestamps::clock_time_on;
use chrono::NaiveDate;
use chrono_tz::Tz;
use fluxion_grid_types::{ExchangeFlowSample, GridError};

/// Join an interface chart's load array with its clock-label array
///
/// Null loads (the chart leaves one at the end while a sample is pending) are
/// dropped first; the remaining loads and labels must then pair up exactly.
pub fn pair_interface_samples(
    loads: &[Option<f64>],
    times: &[String],
    day: NaiveDate,
    timezone: Tz,
) -> Result<Vec<ExchangeFlowSample>, GridError> {
    let loads: Vec<f64> = loads.iter().flatten().copied().collect();
    if loads.len() != times.len() {
        return Err(GridError::malformed(format!(
            "{} load values for {} timestamps",
            loads.len(),
            times.len()
        )));
    }

    loads
        .into_iter()
        .zip(times)
        .map(|(value, label)| Ok(ExchangeFlowSample::new(value, clock_time_on(day, label, timezone)?)))
        .collect()
}
