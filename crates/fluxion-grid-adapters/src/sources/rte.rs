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

//! Day-ahead prices from RTE eco2mix market data
//!
//! The market document holds one `donneesMarche` block per day; each block
//! lists price curves per market area (`perimetre`) with hourly `valeur`
//! entries indexed by `periode`.

use super::{PriceSource, fetch};
use crate::clock::Clock;
use crate::config::Endpoints;
use crate::markup::{XmlElement, parse_document};
use crate::transport::{Request, Transport};
use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use fluxion_grid_core::normalize::{PeriodSeries, normalize_period_prices};
use fluxion_grid_core::timestamps::parse_local_iso;
use fluxion_grid_core::{DecimalStyle, PeriodLength};
use fluxion_grid_types::{
    Fetched, GridError, ParserResult, ParserResultExt, PricePoint, RefetchFrequency, ZoneKey,
};
use std::sync::Arc;
use tracing::{info, warn};

pub const PARSER: &str = "GB";
pub const SOURCE: &str = "rte-france.com";
pub const TIMEZONE: Tz = chrono_tz::Europe::Paris;
pub const PRICE_REFETCH: RefetchFrequency = RefetchFrequency::days(1);

const DAY_BLOCK: &str = "donneesMarche";
const GLOBAL_GRANULARITY: &str = "Global";

/// Price curves of `zone_key` in a market document, one series per day
pub fn market_series(root: &XmlElement, zone_key: &ZoneKey) -> Result<Vec<PeriodSeries>, GridError> {
    let mut series = Vec::new();
    for day in root.children_named(DAY_BLOCK) {
        let date = day
            .attr("date")
            .ok_or_else(|| GridError::malformed("market day without a date"))?;
        let start = parse_local_iso(date, TIMEZONE)?;

        for curve in &day.children {
            if curve.attr("granularite") != Some(GLOBAL_GRANULARITY)
                || curve.attr("perimetre") != Some(zone_key.as_str())
            {
                continue;
            }
            let entries = curve
                .children
                .iter()
                .map(|value| {
                    let period = value
                        .attr("periode")
                        .and_then(|p| p.trim().parse::<i64>().ok())
                        .ok_or_else(|| {
                            GridError::malformed(format!("bad periode on {date} value '{}'", value.text))
                        })?;
                    Ok((period, value.text.clone()))
                })
                .collect::<Result<Vec<_>, GridError>>()?;
            series.push(PeriodSeries { start, entries });
        }
    }
    Ok(series)
}

#[derive(Debug, Clone)]
pub struct RteParser {
    base_url: String,
    clock: Arc<dyn Clock>,
}

impl RteParser {
    pub fn new(endpoints: &Endpoints, clock: Arc<dyn Clock>) -> Self {
        Self {
            base_url: endpoints.rte_base_url.trim_end_matches('/').to_owned(),
            clock,
        }
    }

    fn day_ahead_prices(
        &self,
        transport: &dyn Transport,
        zone_key: &ZoneKey,
        target: Option<DateTime<Utc>>,
    ) -> Result<Vec<PricePoint>, GridError> {
        let to = target
            .unwrap_or_else(|| self.clock.now())
            .with_timezone(&TIMEZONE);
        let from = to - TimeDelta::days(1);

        let request = Request::get(format!("{}/curves/getDonneesMarche", self.base_url))
            .query("dateDeb", from.format("%d/%m/%Y").to_string())
            .query("dateFin", to.format("%d/%m/%Y").to_string())
            .query("mode", "NORM");
        let response = fetch(transport, &request)?;
        let root = parse_document(&response.body)?;

        let series = market_series(&root, zone_key)?;
        let prices = normalize_period_prices(
            &series,
            PeriodLength::Hour,
            DecimalStyle::Point,
            zone_key,
            "EUR",
            SOURCE,
        )?;

        if prices.is_empty() {
            warn!("No {} prices for {} between {} and {}", SOURCE, zone_key, from, to);
        } else {
            info!("💶 {}: {} day-ahead prices", zone_key, prices.len());
        }
        Ok(prices)
    }
}

impl PriceSource for RteParser {
    fn fetch_price(
        &self,
        transport: &dyn Transport,
        zone_key: &ZoneKey,
        target: Option<DateTime<Utc>>,
    ) -> ParserResult<Fetched<PricePoint>> {
        self.day_ahead_prices(transport, zone_key, target)
            .map(Fetched::Series)
            .for_parser(PARSER, Some(zone_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::transport::ReplayTransport;
    use chrono::TimeZone;

    const URL: &str = "http://eco2mix.rte-france.com/curves/getDonneesMarche";

    const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <liste>
          <donneesMarche date="2024-03-10">
            <type granularite="Global" perimetre="GB">
              <valeur periode="0">71.5</valeur>
              <valeur periode="1">ND</valeur>
              <valeur periode="2">69.0</valeur>
            </type>
            <type granularite="Global" perimetre="FR">
              <valeur periode="0">55.0</valeur>
            </type>
            <type granularite="Horaire" perimetre="GB">
              <valeur periode="0">999</valeur>
            </type>
          </donneesMarche>
          <donneesMarche date="2024-03-11">
            <type granularite="Global" perimetre="GB">
              <valeur periode="0">80.25</valeur>
            </type>
          </donneesMarche>
        </liste>"#;

    fn parser() -> RteParser {
        let now = Utc.with_ymd_and_hms(2024, 3, 11, 9, 0, 0).unwrap();
        RteParser::new(&Endpoints::default(), Arc::new(FixedClock(now)))
    }

    #[test]
    fn test_prices_for_requested_area_only() {
        let transport = ReplayTransport::new().respond(URL, 200, DOCUMENT);
        let prices = parser()
            .fetch_price(&transport, &ZoneKey::new("GB"), None)
            .unwrap()
            .into_vec();

        let values: Vec<f64> = prices.iter().map(|p| p.price).collect();
        assert_eq!(values, vec![71.5, 69.0, 80.25]);
        assert_eq!(prices[1].datetime.to_rfc3339(), "2024-03-10T02:00:00+01:00");
        assert_eq!(prices[2].datetime.to_rfc3339(), "2024-03-11T00:00:00+01:00");
        assert!(prices.iter().all(|p| p.currency == "EUR"));

        let request = &transport.requests()[0];
        assert_eq!(request.query_value("dateDeb"), Some("10/03/2024"));
        assert_eq!(request.query_value("dateFin"), Some("11/03/2024"));
    }

    #[test]
    fn test_historical_window_follows_target() {
        let transport = ReplayTransport::new().respond(URL, 200, "<liste/>");
        let target = Utc.with_ymd_and_hms(2023, 12, 31, 23, 30, 0).unwrap();
        let prices = parser()
            .fetch_price(&transport, &ZoneKey::new("GB"), Some(target))
            .unwrap();

        assert!(prices.is_empty());
        let request = &transport.requests()[0];
        assert_eq!(request.query_value("dateDeb"), Some("31/12/2023"));
        assert_eq!(request.query_value("dateFin"), Some("01/01/2024"));
    }

    #[test]
    fn test_http_error_is_reported() {
        let transport = ReplayTransport::new().respond(URL, 503, "");
        let err = parser()
            .fetch_price(&transport, &ZoneKey::new("GB"), None)
            .unwrap_err();
        assert!(matches!(err.kind(), GridError::HttpStatus { status: 503, .. }));
    }

    #[test]
    fn test_out_of_range_periode_fails() {
        let document = r#"<liste>
              <donneesMarche date="2024-03-10">
                <type granularite="Global" perimetre="GB">
                  <valeur periode="-3000000000">71.5</valeur>
                </type>
              </donneesMarche>
            </liste>"#;
        let transport = ReplayTransport::new().respond(URL, 200, document);
        let err = parser()
            .fetch_price(&transport, &ZoneKey::new("GB"), None)
            .unwrap_err();
        assert!(matches!(err.kind(), GridError::Malformed(_)));
    }
}
