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

//! Source adapters for grid data
//!
//! Fetches production, price, exchange and load-forecast data from utility
//! endpoints and runs it through the `fluxion-grid-core` pipeline.

pub mod clock;
pub mod config;
pub mod logging;
pub mod markup;
pub mod registry;
pub mod sources;
pub mod transport;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{GridConfig, load_config};
pub use registry::{GridParsers, Operation, SourceInfo, check_tables, sources};
pub use sources::{
    ConsumptionForecastSource, ExchangeSource, FaroeParser, PjmParser, PriceSource,
    ProductionSource, RteParser,
};
pub use transport::{HttpSession, ReplayTransport, Request, Response, Transport};
