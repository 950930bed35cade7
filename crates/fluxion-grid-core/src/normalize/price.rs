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

use crate::decimal::{DecimalStyle, parse_decimal};
use crate::timestamps::{PeriodLength, period_start};
use chrono::DateTime;
use chrono_tz::Tz;
use fluxion_grid_types::{GridError, PricePoint, ZoneKey};
use std::collections::BTreeMap;
use tracing::debug;

/// Prices indexed by period from a reference instant
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSeries {
    pub start: DateTime<Tz>,
    /// (period index, raw value)
    pub entries: Vec<(i64, String)>,
}

/// One price point per instant, ordered by time
///
/// Placeholder values are skipped. When two series cover the same instant the
/// later one wins. A period index that maps to no valid instant fails the
/// whole series.
pub fn normalize_period_prices(
    series: &[PeriodSeries],
    length: PeriodLength,
    decimal: DecimalStyle,
    zone_key: &ZoneKey,
    currency: &str,
    source: &str,
) -> Result<Vec<PricePoint>, GridError> {
    let mut by_instant: BTreeMap<DateTime<Tz>, f64> = BTreeMap::new();

    for s in series {
        for (period, raw) in &s.entries {
            let Some(price) = parse_decimal(raw, decimal) else {
                debug!("Skipping period {} from {}: '{}'", period, s.start, raw);
                continue;
            };
            by_instant.insert(period_start(s.start, *period, length)?, price);
        }
    }

    Ok(by_instant
        .into_iter()
        .map(|(datetime, price)| PricePoint {
            zone_key: zone_key.clone(),
            datetime,
            currency: currency.to_owned(),
            price,
            source: source.to_owned(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamps::parse_local_iso;
    use chrono_tz::Europe::Paris;

    fn series(day: &str, entries: &[(i64, &str)]) -> PeriodSeries {
        PeriodSeries {
            start: parse_local_iso(day, Paris).unwrap(),
            entries: entries.iter().map(|(p, v)| (*p, (*v).to_string())).collect(),
        }
    }

    #[test]
    fn test_hourly_periods() {
        let prices = normalize_period_prices(
            &[series("2024-01-15", &[(0, "50.1"), (1, "ND"), (2, "48")])],
            PeriodLength::Hour,
            DecimalStyle::Point,
            &ZoneKey::new("FR"),
            "EUR",
            "rte-france.com",
        )
        .unwrap();
        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].datetime.to_rfc3339(), "2024-01-15T00:00:00+01:00");
        assert_eq!(prices[1].datetime.to_rfc3339(), "2024-01-15T02:00:00+01:00");
        assert!((prices[1].price - 48.0).abs() < f64::EPSILON);
        assert_eq!(prices[0].currency, "EUR");
    }

    #[test]
    fn test_later_series_overwrites_same_instant() {
        let prices = normalize_period_prices(
            &[
                series("2024-01-15", &[(24, "10")]),
                series("2024-01-16", &[(0, "20")]),
            ],
            PeriodLength::Hour,
            DecimalStyle::Point,
            &ZoneKey::new("FR"),
            "EUR",
            "rte-france.com",
        )
        .unwrap();
        assert_eq!(prices.len(), 1);
        assert!((prices[0].price - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_out_of_range_period_is_malformed() {
        let result = normalize_period_prices(
            &[series("2024-01-15", &[(0, "50.1"), (-3_000_000_000, "48")])],
            PeriodLength::Hour,
            DecimalStyle::Point,
            &ZoneKey::new("FR"),
            "EUR",
            "rte-france.com",
        );
        assert!(matches!(result, Err(GridError::Malformed(_))));
    }
}
