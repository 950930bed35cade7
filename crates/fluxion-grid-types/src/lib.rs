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

//! Shared value types for grid data adapters
//!
//! Every record produced by an adapter is a transient value object: it is
//! built during a single fetch call and handed to the caller, nothing here
//! carries identity across calls.

pub mod error;
pub mod generation;
pub mod policy;
pub mod records;
pub mod zone;

pub use error::{GridError, ParserError, ParserResult, ParserResultExt};
pub use generation::GenerationType;
pub use policy::{RefetchFrequency, ValidationPolicy};
pub use records::{
    ConsumptionForecastPoint, ExchangeFlowRecord, ExchangeFlowSample, Fetched, PricePoint,
    ProductionMix, ProductionRecord,
};
pub use zone::{SortedZonePair, ZoneKey};
