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

//! PJM Interconnection
//!
//! Production and load forecast come from the Data Miner API, exchanges and
//! the real-time LMP are scraped from pjm.com pages.

use super::{
    ConsumptionForecastSource, ExchangeSource, PriceSource, ProductionSource, fetch,
    reject_historical,
};
use crate::clock::Clock;
use crate::config::GridConfig;
use crate::markup::{
    HtmlPage, decode_js_array, element_text, extract_js_array, first_descendant,
    next_sibling_element,
};
use crate::transport::{Request, Transport};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use fluxion_grid_core::decimal::json_number;
use fluxion_grid_core::normalize::{
    ForecastRow, FuelRow, normalize_forecast, normalize_grouped_production,
    pair_interface_samples,
};
use fluxion_grid_core::timestamps::{parse_loose_timestamp, truncate_to_hour, truncate_to_second};
use fluxion_grid_core::{
    DecimalStyle, FlowSign, GenerationMapping, IndicatorTable, combine, orientation,
    parse_decimal, resolve_sign, validate_batch,
};
use fluxion_grid_types::{
    ConsumptionForecastPoint, ExchangeFlowRecord, ExchangeFlowSample, Fetched, GenerationType,
    GridError, ParserResult, ParserResultExt, PricePoint, ProductionRecord, RefetchFrequency,
    SortedZonePair, ValidationPolicy, ZoneKey,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const PARSER: &str = "US-PJM";
pub const SOURCE: &str = "pjm.com";
pub const TIMEZONE: Tz = chrono_tz::America::New_York;

/// Zone keys PJM is published under
pub const ZONES: &[&str] = &["US-PJM", "US-MIDA-PJM"];

pub const PRODUCTION_REFETCH: RefetchFrequency = RefetchFrequency::days(1);

/// Storage is grid batteries
pub const FUEL_MAPPING: GenerationMapping = GenerationMapping::new(
    "pjm gen_by_fuel",
    &[
        ("Coal", GenerationType::Coal),
        ("Gas", GenerationType::Gas),
        ("Hydro", GenerationType::Hydro),
        ("Multiple Fuels", GenerationType::Unknown),
        ("Nuclear", GenerationType::Nuclear),
        ("Oil", GenerationType::Oil),
        ("Other", GenerationType::Unknown),
        ("Other Renewables", GenerationType::Unknown),
        ("Solar", GenerationType::Solar),
        ("Storage", GenerationType::Battery),
        ("Wind", GenerationType::Wind),
    ],
);

/// PJM never runs without its thermal fleet; an hour below 10 GW is a partial publication
pub const POLICY: ValidationPolicy = ValidationPolicy::new(
    &[
        GenerationType::Coal,
        GenerationType::Gas,
        GenerationType::Nuclear,
    ],
    10_000.0,
);

const FORECAST_AREA: &str = "RTO_COMBINED";
const HIGHCHARTS_SCRIPT: &str =
    r#"script[type="text/javascript"][src="/assets/js/Highcharts/HighCharts/highcharts.js"]"#;

/// Arrow images on the interregional map, relative to MISO -> PJM
pub const MISO_ARROWS: IndicatorTable = IndicatorTable::new(&[
    ("/assets/images/mapImages/black-L.png", FlowSign::Negative),
    ("/assets/images/mapImages/black-R.png", FlowSign::Positive),
]);

/// Tie lines with an interface chart on pjm.com
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interface {
    Nyiso,
    Neptune,
    Linden,
    Hudson,
    Miso,
    OhioValley,
    Louisville,
    TennesseeValley,
    CplWest,
    Duke,
    CplEast,
}

impl Interface {
    pub const ALL: [Interface; 11] = [
        Self::Nyiso,
        Self::Neptune,
        Self::Linden,
        Self::Hudson,
        Self::Miso,
        Self::OhioValley,
        Self::Louisville,
        Self::TennesseeValley,
        Self::CplWest,
        Self::Duke,
        Self::CplEast,
    ];

    /// The four ties that make up the New York exchange
    pub const NEW_YORK: [Interface; 4] = [Self::Nyiso, Self::Neptune, Self::Linden, Self::Hudson];

    pub fn name(self) -> &'static str {
        match self {
            Self::Nyiso => "nyiso",
            Self::Neptune => "neptune",
            Self::Linden => "linden",
            Self::Hudson => "hudson",
            Self::Miso => "miso",
            Self::OhioValley => "ohio valley",
            Self::Louisville => "louisville",
            Self::TennesseeValley => "tennessee valley",
            Self::CplWest => "cpl west",
            Self::Duke => "duke",
            Self::CplEast => "cpl east",
        }
    }

    /// Value of the chart page's `open` parameter
    pub fn chart_key(self) -> &'static str {
        match self {
            Self::Nyiso => "NYIS|NYIS",
            Self::Neptune => "NEPTUNE|SAYR",
            Self::Linden => "LINDENVFT|LINDEN",
            Self::Hudson => "HUDSONTP|HTP",
            Self::Miso => "miso",
            Self::OhioValley => "DEOK|OVEC",
            Self::Louisville => "SOUTHIMP|LGEE",
            Self::TennesseeValley => "SOUTHIMP|TVA",
            Self::CplWest => "SOUTHIMP|CPLW",
            Self::Duke => "SOUTHIMP|DUKE",
            Self::CplEast => "SOUTHIMP|CPLE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeRoute {
    /// Sum of the New York interface charts
    NewYork,
    /// Single reading from the interregional map
    Miso,
}

#[derive(Debug, Clone, Copy)]
pub struct ExchangeSpec {
    pub sorted_key: &'static str,
    pub route: ExchangeRoute,
    /// Direction the source reports positive flow in
    pub native: (&'static str, &'static str),
}

/// Supported pairs; the renamed zones sort the other way round
pub const EXCHANGES: &[ExchangeSpec] = &[
    ExchangeSpec {
        sorted_key: "US-NY->US-PJM",
        route: ExchangeRoute::NewYork,
        native: ("US-NY", "US-PJM"),
    },
    ExchangeSpec {
        sorted_key: "US-MIDA-PJM->US-NY-NYIS",
        route: ExchangeRoute::NewYork,
        native: ("US-NY-NYIS", "US-MIDA-PJM"),
    },
    ExchangeSpec {
        sorted_key: "US-MISO->US-PJM",
        route: ExchangeRoute::Miso,
        native: ("US-MISO", "US-PJM"),
    },
    ExchangeSpec {
        sorted_key: "US-MIDA-PJM->US-MIDW-MISO",
        route: ExchangeRoute::Miso,
        native: ("US-MIDW-MISO", "US-MIDA-PJM"),
    },
];

pub fn exchange_spec(pair: &SortedZonePair) -> Result<&'static ExchangeSpec, GridError> {
    let key = pair.key();
    EXCHANGES
        .iter()
        .find(|spec| spec.sorted_key == key)
        .ok_or_else(|| GridError::unsupported(format!("exchange {key} is not implemented")))
}

fn served(zone_key: &ZoneKey) -> Result<(), GridError> {
    if ZONES.contains(&zone_key.as_str()) {
        Ok(())
    } else {
        Err(GridError::unsupported(format!(
            "zone {zone_key} is not served by {SOURCE}"
        )))
    }
}

fn fetch_api_rows<T: DeserializeOwned>(
    transport: &dyn Transport,
    request: &Request,
) -> Result<Vec<T>, GridError> {
    let rows: Vec<T> = fetch(transport, request)?.json()?;
    debug!("{} rows from {}", rows.len(), request.url);
    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct GenByFuelRow {
    datetime_beginning_ept: String,
    fuel_type: String,
    #[serde(default)]
    mw: Value,
}

#[derive(Debug, Deserialize)]
struct LoadForecastRow {
    forecast_datetime_beginning_utc: String,
    #[serde(default)]
    forecast_load_mw: Value,
}

/// MISO map reading before orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MisoReading {
    pub magnitude: f64,
    pub indicator: FlowSign,
    pub datetime: DateTime<Tz>,
}

#[derive(Debug, Clone)]
pub struct PjmParser {
    web_base_url: String,
    api_base_url: String,
    api_key: Option<String>,
    clock: Arc<dyn Clock>,
}

impl PjmParser {
    pub fn new(config: &GridConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            web_base_url: config.endpoints.pjm_web_base_url.trim_end_matches('/').to_owned(),
            api_base_url: config.endpoints.pjm_api_base_url.trim_end_matches('/').to_owned(),
            api_key: config.pjm.resolved_api_key(),
            clock,
        }
    }

    fn api_request(&self, kind: &str) -> Result<Request, GridError> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            GridError::Config("PJM Data Miner API key is not configured (pjm.api_key or PJM_API_KEY)".into())
        })?;
        Ok(Request::get(format!("{}/{kind}", self.api_base_url))
            .header("Ocp-Apim-Subscription-Key", key)
            .header("Origin", "http://dataminer2.pjm.com")
            .header("Referer", "http://dataminer2.pjm.com/")
            .query("download", "true")
            .query("startRow", "1"))
    }

    fn production(
        &self,
        transport: &dyn Transport,
        zone_key: &ZoneKey,
        target: Option<DateTime<Utc>>,
    ) -> Result<Vec<ProductionRecord>, GridError> {
        served(zone_key)?;
        let target = target.unwrap_or_else(|| self.clock.now());
        let hour = truncate_to_hour(target.with_timezone(&TIMEZONE));
        let request = self
            .api_request("gen_by_fuel")?
            .query("fields", "datetime_beginning_ept,fuel_type,mw")
            .query(
                "datetime_beginning_ept",
                hour.format("%Y-%m-%dT%H:00:00.0000000").to_string(),
            );

        let rows: Vec<GenByFuelRow> = fetch_api_rows(transport, &request)?;
        if rows.is_empty() {
            warn!("No generation published for {} at {}", zone_key, hour);
            return Err(GridError::NoValidData);
        }

        let rows: Vec<FuelRow> = rows
            .into_iter()
            .map(|row| FuelRow {
                mw: json_number(&row.mw, DecimalStyle::Point),
                timestamp: row.datetime_beginning_ept,
                fuel: row.fuel_type,
            })
            .collect();
        let records =
            normalize_grouped_production(&rows, &FUEL_MAPPING, TIMEZONE, zone_key, SOURCE)?;
        let accepted = validate_batch(records, &POLICY)?;
        info!("📊 {}: {} production records from {}", zone_key, accepted.len(), SOURCE);
        Ok(accepted)
    }

    fn consumption_forecast(
        &self,
        transport: &dyn Transport,
        zone_key: &ZoneKey,
        target: Option<DateTime<Utc>>,
    ) -> Result<Vec<ConsumptionForecastPoint>, GridError> {
        served(zone_key)?;
        reject_historical(target)?;
        let request = self
            .api_request("load_frcstd_7_day")?
            .query("forecast_area", FORECAST_AREA);

        let rows: Vec<LoadForecastRow> = fetch_api_rows(transport, &request)?;
        let rows: Vec<ForecastRow> = rows
            .into_iter()
            .map(|row| ForecastRow {
                load_mw: json_number(&row.forecast_load_mw, DecimalStyle::Point),
                utc_timestamp: row.forecast_datetime_beginning_utc,
            })
            .collect();
        let points = normalize_forecast(&rows, zone_key, SOURCE)?;
        info!("📈 {}: {} forecast points", zone_key, points.len());
        Ok(points)
    }

    /// Today's 5-minute samples of one interface chart
    pub fn fetch_interface(
        &self,
        transport: &dyn Transport,
        interface: Interface,
    ) -> Result<Vec<ExchangeFlowSample>, GridError> {
        let day = self.clock.now().with_timezone(&TIMEZONE).date_naive();
        self.interface_samples(transport, interface, day)
    }

    fn interface_samples(
        &self,
        transport: &dyn Transport,
        interface: Interface,
        day: NaiveDate,
    ) -> Result<Vec<ExchangeFlowSample>, GridError> {
        let request = Request::get(format!("{}/Charts/InterfaceChart.aspx", self.web_base_url))
            .query("open", interface.chart_key());
        let page = HtmlPage::parse(&fetch(transport, &request)?.text());

        let library = page.select_first(HIGHCHARTS_SCRIPT)?;
        let script = next_sibling_element(library, "script").ok_or_else(|| {
            GridError::malformed(format!("{} chart has no data script", interface.name()))
        })?;
        let script = element_text(script);

        // One series per chart, wrapped in an outer array
        let series = decode_js_array(extract_js_array(&script, "load")?)?;
        let loads: Vec<Option<f64>> = series
            .first()
            .and_then(Value::as_array)
            .ok_or_else(|| GridError::malformed(format!("{} chart has no load series", interface.name())))?
            .iter()
            .map(|v| json_number(v, DecimalStyle::Point))
            .collect();

        let times = decode_js_array(extract_js_array(&script, "timeArray")?)?
            .into_iter()
            .map(|v| match v {
                Value::String(s) => Ok(s),
                other => Err(GridError::malformed(format!("time label {other} is not a string"))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let samples = pair_interface_samples(&loads, &times, day, TIMEZONE)?;
        debug!("{}: {} samples", interface.name(), samples.len());
        Ok(samples)
    }

    /// Current MISO tie flow with its arrow indicator
    pub fn miso_reading(&self, transport: &dyn Transport) -> Result<MisoReading, GridError> {
        let request = Request::get(format!(
            "{}/markets-and-operations/interregional-map.aspx",
            self.web_base_url
        ));
        let page = HtmlPage::parse(&fetch(transport, &request)?.text());

        let flow = page.select_first("div#body_0_flow1.flow")?;
        let text: String = element_text(flow).split_whitespace().collect();
        let actual = text.split('/').next().unwrap_or_default();
        let magnitude = parse_decimal(actual, DecimalStyle::PointGrouped)
            .ok_or_else(|| GridError::malformed(format!("unreadable MISO flow '{text}'")))?;

        let arrow = first_descendant(flow, "img")?;
        let src = arrow
            .value()
            .attr("src")
            .ok_or_else(|| GridError::malformed("MISO flow arrow has no src"))?;
        let indicator = MISO_ARROWS.resolve(src)?;

        let stamp = element_text(page.select_first("div#body_0_divTimeStamp")?);
        let datetime = parse_loose_timestamp(&stamp, TIMEZONE)?;

        Ok(MisoReading {
            magnitude,
            indicator,
            datetime,
        })
    }

    fn exchange(
        &self,
        transport: &dyn Transport,
        zone_key1: &ZoneKey,
        zone_key2: &ZoneKey,
        target: Option<DateTime<Utc>>,
    ) -> Result<Fetched<ExchangeFlowRecord>, GridError> {
        reject_historical(target)?;
        let pair = SortedZonePair::new(zone_key1.clone(), zone_key2.clone());
        let spec = exchange_spec(&pair)?;

        match spec.route {
            ExchangeRoute::NewYork => {
                let sign = orientation(&pair, spec.native.0, spec.native.1)?;
                let day = self.clock.now().with_timezone(&TIMEZONE).date_naive();
                let feeds = Interface::NEW_YORK
                    .iter()
                    .map(|interface| self.interface_samples(transport, *interface, day))
                    .collect::<Result<Vec<_>, _>>()?;
                let alignment = combine(&feeds)?;
                info!(
                    "🔌 {}: {} samples ({} dropped)",
                    pair,
                    alignment.samples.len(),
                    alignment.dropped
                );

                Ok(Fetched::Series(
                    alignment
                        .samples
                        .into_iter()
                        .map(|sample| ExchangeFlowRecord {
                            sorted_zone_keys: pair.clone(),
                            datetime: sample.datetime,
                            net_flow: sign.apply(sample.value),
                            source: SOURCE.to_owned(),
                        })
                        .collect(),
                ))
            }
            ExchangeRoute::Miso => {
                let reading = self.miso_reading(transport)?;
                let sign = resolve_sign(&pair, spec.native, reading.indicator)?;
                Ok(Fetched::Single(ExchangeFlowRecord {
                    sorted_zone_keys: pair,
                    datetime: reading.datetime,
                    net_flow: sign.apply(reading.magnitude),
                    source: SOURCE.to_owned(),
                }))
            }
        }
    }

    fn realtime_price(
        &self,
        transport: &dyn Transport,
        zone_key: &ZoneKey,
        target: Option<DateTime<Utc>>,
    ) -> Result<PricePoint, GridError> {
        served(zone_key)?;
        reject_historical(target)?;
        let request = Request::get(format!("{}/markets-and-operations.aspx", self.web_base_url));
        let page = HtmlPage::parse(&fetch(transport, &request)?.text());

        let label = page.select_first("span.rtolmpico")?;
        let value = element_text(page.next_element_after(label, "h2")?);
        let price = value
            .split_once('$')
            .and_then(|(_, amount)| parse_decimal(amount, DecimalStyle::PointGrouped))
            .ok_or_else(|| GridError::malformed(format!("unreadable LMP '{}'", value.trim())))?;

        Ok(PricePoint {
            zone_key: zone_key.clone(),
            datetime: truncate_to_second(self.clock.now().with_timezone(&TIMEZONE)),
            currency: "USD".to_owned(),
            price,
            source: SOURCE.to_owned(),
        })
    }
}

impl ProductionSource for PjmParser {
    fn fetch_production(
        &self,
        transport: &dyn Transport,
        zone_key: &ZoneKey,
        target: Option<DateTime<Utc>>,
    ) -> ParserResult<Fetched<ProductionRecord>> {
        self.production(transport, zone_key, target)
            .map(Fetched::Series)
            .for_parser(PARSER, Some(zone_key))
    }
}

impl ConsumptionForecastSource for PjmParser {
    fn fetch_consumption_forecast(
        &self,
        transport: &dyn Transport,
        zone_key: &ZoneKey,
        target: Option<DateTime<Utc>>,
    ) -> ParserResult<Vec<ConsumptionForecastPoint>> {
        self.consumption_forecast(transport, zone_key, target)
            .for_parser(PARSER, Some(zone_key))
    }
}

impl ExchangeSource for PjmParser {
    fn fetch_exchange(
        &self,
        transport: &dyn Transport,
        zone_key1: &ZoneKey,
        zone_key2: &ZoneKey,
        target: Option<DateTime<Utc>>,
    ) -> ParserResult<Fetched<ExchangeFlowRecord>> {
        self.exchange(transport, zone_key1, zone_key2, target)
            .for_parser(PARSER, None)
    }
}

impl PriceSource for PjmParser {
    fn fetch_price(
        &self,
        transport: &dyn Transport,
        zone_key: &ZoneKey,
        target: Option<DateTime<Utc>>,
    ) -> ParserResult<Fetched<PricePoint>> {
        self.realtime_price(transport, zone_key, target)
            .map(Fetched::Single)
            .for_parser(PARSER, Some(zone_key))
    }
}
