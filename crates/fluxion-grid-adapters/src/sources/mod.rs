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

//! Per-source adapters
//!
//! Each adapter is invoked independently with a borrowed transport and returns
//! normalized records or a `ParserError` naming itself.

pub mod faroe;
pub mod pjm;
pub mod rte;

use crate::transport::{Request, Response, Transport};
use chrono::{DateTime, Utc};
use fluxion_grid_types::{
    ConsumptionForecastPoint, ExchangeFlowRecord, Fetched, GridError, ParserResult, PricePoint,
    ProductionRecord, ZoneKey,
};

pub use faroe::FaroeParser;
pub use pjm::PjmParser;
pub use rte::RteParser;

pub trait ProductionSource {
    fn fetch_production(
        &self,
        transport: &dyn Transport,
        zone_key: &ZoneKey,
        target: Option<DateTime<Utc>>,
    ) -> ParserResult<Fetched<ProductionRecord>>;
}

pub trait PriceSource {
    fn fetch_price(
        &self,
        transport: &dyn Transport,
        zone_key: &ZoneKey,
        target: Option<DateTime<Utc>>,
    ) -> ParserResult<Fetched<PricePoint>>;
}

pub trait ExchangeSource {
    /// Net flow relative to the sorted pair, whatever the argument order
    fn fetch_exchange(
        &self,
        transport: &dyn Transport,
        zone_key1: &ZoneKey,
        zone_key2: &ZoneKey,
        target: Option<DateTime<Utc>>,
    ) -> ParserResult<Fetched<ExchangeFlowRecord>>;
}

pub trait ConsumptionForecastSource {
    fn fetch_consumption_forecast(
        &self,
        transport: &dyn Transport,
        zone_key: &ZoneKey,
        target: Option<DateTime<Utc>>,
    ) -> ParserResult<Vec<ConsumptionForecastPoint>>;
}

/// Live-only operations refuse a target time before any I/O
pub(crate) fn reject_historical(target: Option<DateTime<Utc>>) -> Result<(), GridError> {
    match target {
        Some(_) => Err(GridError::unsupported(
            "This parser is not yet able to parse past dates",
        )),
        None => Ok(()),
    }
}

/// Send and insist on a 2xx
pub(crate) fn fetch(transport: &dyn Transport, request: &Request) -> Result<Response, GridError> {
    transport.send(request)?.error_for_status()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_historical_requests_are_unsupported() {
        assert!(reject_historical(None).is_ok());
        let past = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            reject_historical(Some(past)),
            Err(GridError::Unsupported(_))
        ));
    }
}
