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

//! Faroe Islands realtime production (SEV)
//!
//! One JSON object carries every zone; keys end in the zone's discriminator
//! ("VandSev_E" is hydro energy for the whole grid, "VandH_E" for the
//! Main Island, "VandS_E" for Suðuroy). Values use decimal commas.

use super::{ProductionSource, fetch, reject_historical};
use crate::config::Endpoints;
use crate::transport::{Request, Transport};
use chrono::{DateTime, Utc};
use fluxion_grid_core::normalize::{FlatProductionSchema, normalize_flat_production};
use fluxion_grid_core::{DecimalStyle, GenerationMapping, IgnoreList, validate};
use fluxion_grid_types::{
    Fetched, GenerationType, GridError, ParserResult, ParserResultExt, ProductionRecord,
    ValidationPolicy, ZoneKey,
};
use serde_json::{Map, Value};
use tracing::{info, warn};

pub const PARSER: &str = "FO";
pub const SOURCE: &str = "sev.fo";

pub const MAPPING: GenerationMapping = GenerationMapping::new(
    "sev.fo",
    &[
        ("Vand", GenerationType::Hydro),
        ("Olie", GenerationType::Oil),
        ("Diesel", GenerationType::Oil),
        ("Vind", GenerationType::Wind),
        ("Sol", GenerationType::Solar),
        ("Biogas", GenerationType::Biomass),
        ("Tidal", GenerationType::Unknown),
    ],
);

/// Aggregates and test channels; "VnVand" is the hydro subtotal
pub const IGNORED: IgnoreList = IgnoreList::new(&["Sum", "Test", "VnVand"]);

pub const SCHEMA: FlatProductionSchema = FlatProductionSchema {
    timestamp_key: "tiden",
    timezone: chrono_tz::Atlantic::Faroe,
    decimal: DecimalStyle::Comma,
    mapping: MAPPING,
    ignore: IGNORED,
    seeded: &[
        GenerationType::Biomass,
        GenerationType::Coal,
        GenerationType::Gas,
        GenerationType::Geothermal,
        GenerationType::Nuclear,
        GenerationType::Solar,
        GenerationType::Unknown,
    ],
    discriminators: &["Sev_E", "H_E", "S_E"],
    source: SOURCE,
};

#[derive(Debug, Clone, Copy)]
pub struct FaroeZone {
    pub zone_key: &'static str,
    pub discriminator: &'static str,
    pub policy: ValidationPolicy,
}

pub const ZONES: &[FaroeZone] = &[
    FaroeZone {
        zone_key: "FO",
        discriminator: "Sev_E",
        policy: ValidationPolicy::new(&[GenerationType::Hydro], 10.0),
    },
    FaroeZone {
        zone_key: "FO-MI",
        discriminator: "H_E",
        policy: ValidationPolicy::new(&[GenerationType::Hydro], 9.0),
    },
    FaroeZone {
        zone_key: "FO-SI",
        discriminator: "S_E",
        policy: ValidationPolicy::new(&[GenerationType::Hydro], 1.0),
    },
];

pub fn zone(zone_key: &ZoneKey) -> Result<&'static FaroeZone, GridError> {
    ZONES
        .iter()
        .find(|z| z.zone_key == zone_key.as_str())
        .ok_or_else(|| GridError::unsupported(format!("zone {zone_key} is not served by {SOURCE}")))
}

#[derive(Debug, Clone)]
pub struct FaroeParser {
    base_url: String,
}

impl FaroeParser {
    pub fn new(endpoints: &Endpoints) -> Self {
        Self {
            base_url: endpoints.sev_base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn realtime_url(&self) -> String {
        format!("{}/api/realtimemap/now", self.base_url)
    }

    fn fetch_snapshot(
        &self,
        transport: &dyn Transport,
        zone_key: &ZoneKey,
        target: Option<DateTime<Utc>>,
    ) -> Result<ProductionRecord, GridError> {
        let zone = zone(zone_key)?;
        reject_historical(target)?;

        let payload: Map<String, Value> =
            fetch(transport, &Request::get(self.realtime_url()))?.json()?;
        let record = normalize_flat_production(&payload, &SCHEMA, zone_key, zone.discriminator)?;

        match validate(record, &zone.policy) {
            Ok(record) => {
                info!(
                    "📊 {}: {:.1} MW at {}",
                    zone_key,
                    record.production.total(),
                    record.datetime
                );
                Ok(record)
            }
            Err(e) if e.is_validation_rejection() => {
                warn!("Rejected {} snapshot: {}", zone_key, e);
                Err(GridError::NoValidData)
            }
            Err(e) => Err(e),
        }
    }
}

impl ProductionSource for FaroeParser {
    fn fetch_production(
        &self,
        transport: &dyn Transport,
        zone_key: &ZoneKey,
        target: Option<DateTime<Utc>>,
    ) -> ParserResult<Fetched<ProductionRecord>> {
        self.fetch_snapshot(transport, zone_key, target)
            .map(Fetched::Single)
            .for_parser(PARSER, Some(zone_key))
    }
}
