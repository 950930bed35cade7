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

use crate::generation::GenerationType;
use crate::zone::{SortedZonePair, ZoneKey};
use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Power per generation type in MW
///
/// `Some(0.0)` means the source reported the type as absent, `None` means the
/// type was named but no value came with it. Only the validation gate turns
/// `None` into `Some(0.0)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProductionMix(BTreeMap<GenerationType, Option<f64>>);

impl ProductionMix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mix with an explicit zero for every given type
    pub fn seeded(kinds: &[GenerationType]) -> Self {
        Self(kinds.iter().map(|k| (*k, Some(0.0))).collect())
    }

    /// Accumulate a contribution for `kind`; repeated keys add up, never overwrite
    pub fn add(&mut self, kind: GenerationType, value: Option<f64>) {
        match self.0.entry(kind) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(value);
            }
            btree_map::Entry::Occupied(mut slot) => {
                let merged = match (*slot.get(), value) {
                    (Some(a), Some(b)) => Some(a + b),
                    (existing, None) => existing,
                    (None, Some(b)) => Some(b),
                };
                slot.insert(merged);
            }
        }
    }

    /// Overwrite the entry for `kind`
    pub fn set(&mut self, kind: GenerationType, value: Option<f64>) {
        self.0.insert(kind, value);
    }

    /// Reported value, `None` when absent or null
    pub fn value(&self, kind: GenerationType) -> Option<f64> {
        self.0.get(&kind).copied().flatten()
    }

    pub fn contains(&self, kind: GenerationType) -> bool {
        self.0.contains_key(&kind)
    }

    /// Sum of all reported values, nulls count as zero
    pub fn total(&self) -> f64 {
        self.0.values().map(|v| v.unwrap_or(0.0)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GenerationType, Option<f64>)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&GenerationType, &mut Option<f64>)> {
        self.0.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Generation snapshot for one zone at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRecord {
    pub zone_key: ZoneKey,
    pub datetime: DateTime<Tz>,
    pub production: ProductionMix,
    pub storage: ProductionMix,
    pub source: String,
}

/// Market price for one zone at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub zone_key: ZoneKey,
    pub datetime: DateTime<Tz>,
    pub currency: String,
    pub price: f64,
    pub source: String,
}

/// Forecast load in MW; `None` where the source published no figure
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionForecastPoint {
    pub zone_key: ZoneKey,
    pub datetime: DateTime<Tz>,
    pub value: Option<f64>,
    pub source: String,
}

/// One sample of one physical interconnector feed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeFlowSample {
    pub value: f64,
    pub datetime: DateTime<Tz>,
}

impl ExchangeFlowSample {
    pub fn new(value: f64, datetime: DateTime<Tz>) -> Self {
        Self { value, datetime }
    }
}

/// Net flow between two zones, signed relative to the sorted pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeFlowRecord {
    pub sorted_zone_keys: SortedZonePair,
    pub datetime: DateTime<Tz>,
    pub net_flow: f64,
    pub source: String,
}

/// Output of a fetch: a point-in-time query yields one record, a ranged one a series
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Single(T),
    Series(Vec<T>),
}

impl<T> Fetched<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Single(record) => vec![record],
            Self::Series(records) => records,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Series(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the single record, if this is one
    pub fn as_single(&self) -> Option<&T> {
        match self {
            Self::Single(record) => Some(record),
            Self::Series(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_add_accumulates_repeated_types() {
        let mut mix = ProductionMix::new();
        mix.add(GenerationType::Hydro, Some(120.5));
        mix.add(GenerationType::Hydro, Some(30.2));
        assert!((mix.value(GenerationType::Hydro).unwrap() - 150.7).abs() < 1e-9);
    }

    #[test]
    fn test_null_does_not_erase_reported_value() {
        let mut mix = ProductionMix::new();
        mix.add(GenerationType::Wind, Some(4.0));
        mix.add(GenerationType::Wind, None);
        assert_eq!(mix.value(GenerationType::Wind), Some(4.0));

        let mut mix = ProductionMix::new();
        mix.add(GenerationType::Wind, None);
        assert!(mix.contains(GenerationType::Wind));
        assert_eq!(mix.value(GenerationType::Wind), None);
        mix.add(GenerationType::Wind, Some(2.0));
        assert_eq!(mix.value(GenerationType::Wind), Some(2.0));
    }

    #[test]
    fn test_seeded_mix_holds_explicit_zeros() {
        let mix = ProductionMix::seeded(&[GenerationType::Coal, GenerationType::Gas]);
        assert_eq!(mix.value(GenerationType::Coal), Some(0.0));
        assert!(!mix.contains(GenerationType::Hydro));
        assert!(mix.total().abs() < f64::EPSILON);
    }

    #[test]
    fn test_record_serializes_with_zone_aware_datetime() {
        let record = PricePoint {
            zone_key: ZoneKey::new("FR"),
            datetime: chrono_tz::Europe::Paris
                .with_ymd_and_hms(2024, 7, 1, 13, 0, 0)
                .unwrap(),
            currency: "EUR".to_string(),
            price: 42.5,
            source: "rte-france.com".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["zoneKey"], "FR");
        assert_eq!(json["datetime"], "2024-07-01T13:00:00+02:00");
    }

    #[test]
    fn test_fetched_into_vec() {
        assert_eq!(Fetched::Single(1).into_vec(), vec![1]);
        assert_eq!(Fetched::Series(vec![1, 2]).len(), 2);
        assert!(Fetched::<u8>::Series(vec![]).is_empty());
    }
}
