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

//! Supported sources, their operations and refetch hints
//!
//! `GridParsers` routes a request to the adapter registered for the zone
//! (or sorted pair) it names.

use crate::clock::{Clock, SystemClock};
use crate::config::GridConfig;
use crate::sources::{
    ConsumptionForecastSource, ExchangeSource, FaroeParser, PjmParser, PriceSource,
    ProductionSource, RteParser, faroe, pjm, rte,
};
use crate::transport::Transport;
use chrono::{DateTime, Utc};
use fluxion_grid_core::IgnoreList;
use fluxion_grid_types::{
    ConsumptionForecastPoint, ExchangeFlowRecord, Fetched, GridError, ParserError, ParserResult,
    PricePoint, ProductionRecord, RefetchFrequency, SortedZonePair, ZoneKey,
};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

const REGISTRY: &str = "registry";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Production,
    Price,
    Exchange,
    ConsumptionForecast,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Production => "production",
            Self::Price => "price",
            Self::Exchange => "exchange",
            Self::ConsumptionForecast => "consumption forecast",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Capability {
    pub operation: Operation,
    /// Zone keys, or sorted pair keys for exchanges
    pub keys: &'static [&'static str],
    pub refetch: Option<RefetchFrequency>,
    /// Accepts a target time in the past
    pub historical: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct SourceInfo {
    pub parser: &'static str,
    pub source: &'static str,
    pub capabilities: &'static [Capability],
}

impl SourceInfo {
    pub fn capability(&self, operation: Operation) -> Option<&Capability> {
        self.capabilities.iter().find(|c| c.operation == operation)
    }
}

const FAROE_ZONES: &[&str] = &["FO", "FO-MI", "FO-SI"];
const PJM_EXCHANGES: &[&str] = &[
    "US-NY->US-PJM",
    "US-MIDA-PJM->US-NY-NYIS",
    "US-MISO->US-PJM",
    "US-MIDA-PJM->US-MIDW-MISO",
];

const SOURCES: &[SourceInfo] = &[
    SourceInfo {
        parser: faroe::PARSER,
        source: faroe::SOURCE,
        capabilities: &[Capability {
            operation: Operation::Production,
            keys: FAROE_ZONES,
            refetch: None,
            historical: false,
        }],
    },
    SourceInfo {
        parser: pjm::PARSER,
        source: pjm::SOURCE,
        capabilities: &[
            Capability {
                operation: Operation::Production,
                keys: pjm::ZONES,
                refetch: Some(pjm::PRODUCTION_REFETCH),
                historical: true,
            },
            Capability {
                operation: Operation::ConsumptionForecast,
                keys: pjm::ZONES,
                refetch: None,
                historical: false,
            },
            Capability {
                operation: Operation::Exchange,
                keys: PJM_EXCHANGES,
                refetch: None,
                historical: false,
            },
            Capability {
                operation: Operation::Price,
                keys: pjm::ZONES,
                refetch: None,
                historical: false,
            },
        ],
    },
    SourceInfo {
        parser: rte::PARSER,
        source: rte::SOURCE,
        capabilities: &[Capability {
            operation: Operation::Price,
            keys: &["GB"],
            refetch: Some(rte::PRICE_REFETCH),
            historical: true,
        }],
    },
];

pub fn sources() -> &'static [SourceInfo] {
    SOURCES
}

/// Source registered for `operation` on `key`
pub fn lookup(operation: Operation, key: &str) -> Option<&'static SourceInfo> {
    SOURCES.iter().find(|s| {
        s.capability(operation)
            .is_some_and(|c| c.keys.contains(&key))
    })
}

/// Consistency of the static tables, for start-up
pub fn check_tables() -> Result<(), GridError> {
    faroe::MAPPING.check(&faroe::IGNORED)?;
    pjm::FUEL_MAPPING.check(&IgnoreList::EMPTY)?;

    for zone in FAROE_ZONES {
        faroe::zone(&ZoneKey::new(*zone))?;
    }
    for key in PJM_EXCHANGES {
        if !pjm::EXCHANGES.iter().any(|spec| spec.sorted_key == *key) {
            return Err(GridError::Config(format!("exchange {key} has no route")));
        }
    }
    for spec in pjm::EXCHANGES {
        let sorted = SortedZonePair::new(spec.native.0, spec.native.1).key();
        if sorted != spec.sorted_key {
            return Err(GridError::Config(format!(
                "exchange {} is registered unsorted (expected {sorted})",
                spec.sorted_key
            )));
        }
    }
    Ok(())
}

fn unsupported(operation: Operation, key: &str, zone_key: Option<&ZoneKey>) -> ParserError {
    ParserError::new(
        REGISTRY,
        zone_key.cloned(),
        GridError::unsupported(format!("no source provides {operation} for {key}")),
    )
}

/// Every adapter, built once from config
#[derive(Debug, Clone)]
pub struct GridParsers {
    faroe: FaroeParser,
    pjm: PjmParser,
    rte: RteParser,
}

impl GridParsers {
    pub fn new(config: &GridConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            faroe: FaroeParser::new(&config.endpoints),
            pjm: PjmParser::new(config, Arc::clone(&clock)),
            rte: RteParser::new(&config.endpoints, clock),
        }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(config, Arc::new(SystemClock))
    }

    fn route(
        operation: Operation,
        key: &str,
        zone_key: Option<&ZoneKey>,
    ) -> ParserResult<&'static SourceInfo> {
        let info = lookup(operation, key).ok_or_else(|| unsupported(operation, key, zone_key))?;
        debug!("{} for {} -> {}", operation, key, info.parser);
        Ok(info)
    }

    pub fn production(
        &self,
        transport: &dyn Transport,
        zone_key: &ZoneKey,
        target: Option<DateTime<Utc>>,
    ) -> ParserResult<Fetched<ProductionRecord>> {
        let info = Self::route(Operation::Production, zone_key.as_str(), Some(zone_key))?;
        match info.parser {
            faroe::PARSER => self.faroe.fetch_production(transport, zone_key, target),
            pjm::PARSER => self.pjm.fetch_production(transport, zone_key, target),
            _ => Err(unsupported(Operation::Production, zone_key.as_str(), Some(zone_key))),
        }
    }

    pub fn price(
        &self,
        transport: &dyn Transport,
        zone_key: &ZoneKey,
        target: Option<DateTime<Utc>>,
    ) -> ParserResult<Fetched<PricePoint>> {
        let info = Self::route(Operation::Price, zone_key.as_str(), Some(zone_key))?;
        match info.parser {
            pjm::PARSER => self.pjm.fetch_price(transport, zone_key, target),
            rte::PARSER => self.rte.fetch_price(transport, zone_key, target),
            _ => Err(unsupported(Operation::Price, zone_key.as_str(), Some(zone_key))),
        }
    }

    pub fn exchange(
        &self,
        transport: &dyn Transport,
        zone_key1: &ZoneKey,
        zone_key2: &ZoneKey,
        target: Option<DateTime<Utc>>,
    ) -> ParserResult<Fetched<ExchangeFlowRecord>> {
        let key = SortedZonePair::new(zone_key1.clone(), zone_key2.clone()).key();
        let info = Self::route(Operation::Exchange, &key, None)?;
        match info.parser {
            pjm::PARSER => self.pjm.fetch_exchange(transport, zone_key1, zone_key2, target),
            _ => Err(unsupported(Operation::Exchange, &key, None)),
        }
    }

    pub fn consumption_forecast(
        &self,
        transport: &dyn Transport,
        zone_key: &ZoneKey,
        target: Option<DateTime<Utc>>,
    ) -> ParserResult<Vec<ConsumptionForecastPoint>> {
        let info = Self::route(Operation::ConsumptionForecast, zone_key.as_str(), Some(zone_key))?;
        match info.parser {
            pjm::PARSER => self
                .pjm
                .fetch_consumption_forecast(transport, zone_key, target),
            _ => Err(unsupported(
                Operation::ConsumptionForecast,
                zone_key.as_str(),
                Some(zone_key),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ReplayTransport;

    #[test]
    fn test_static_tables() {
        check_tables().unwrap();
    }

    #[test]
    fn test_refetch_hints() {
        let pjm = lookup(Operation::Production, "US-PJM").unwrap();
        assert_eq!(
            pjm.capability(Operation::Production).unwrap().refetch,
            Some(RefetchFrequency::days(1))
        );
        let gb = lookup(Operation::Price, "GB").unwrap();
        assert_eq!(gb.source, "rte-france.com");
        assert!(gb.capability(Operation::Price).unwrap().historical);
        assert!(
            lookup(Operation::Production, "FO-SI")
                .unwrap()
                .capability(Operation::Production)
                .unwrap()
                .refetch
                .is_none()
        );
    }

    #[test]
    fn test_unknown_routes_fail_before_io() {
        let parsers = GridParsers::from_config(&GridConfig::default());
        let transport = ReplayTransport::new();

        let err = parsers
            .production(&transport, &ZoneKey::new("DK-DK1"), None)
            .unwrap_err();
        assert_eq!(err.parser, "registry");
        assert!(matches!(err.kind(), GridError::Unsupported(_)));

        let err = parsers
            .exchange(&transport, &ZoneKey::new("US-PJM"), &ZoneKey::new("US-SE"), None)
            .unwrap_err();
        assert!(err.to_string().contains("US-PJM->US-SE"));
        assert_eq!(transport.request_count(), 0);
    }
}
