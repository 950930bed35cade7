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

//! Record normalizer: raw payloads to candidate records
//!
//! No state survives a call, so normalizing the same payload twice yields
//! identical records.

pub mod exchange;
pub mod forecast;
pub mod price;
pub mod production;

pub use exchange::pair_interface_samples;
pub use forecast::{ForecastRow, normalize_forecast};
pub use price::{PeriodSeries, normalize_period_prices};
pub use production::{
    FlatProductionSchema, FuelRow, normalize_flat_production, normalize_grouped_production,
    strip_zone_suffix,
};
