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

//! Plausibility gate for production records
//!
//! Price, forecast and exchange records have no equivalent check.

use fluxion_grid_types::{GridError, ProductionMix, ProductionRecord, ValidationPolicy};
use tracing::{debug, warn};

/// Negative readings down to this magnitude (MW) are metering noise and read as zero
pub const NEGATIVE_NOISE_MW: f64 = 5.0;

/// Accept, repair or reject one production record
///
/// Repairs: small negative readings become zero. Rejections: a required type
/// missing or null, or a total below the floor. Larger negative readings are
/// kept as reported.
/// Nulls left on an accepted record are coerced to zero; this is the only
/// place that happens.
pub fn validate(
    mut record: ProductionRecord,
    policy: &ValidationPolicy,
) -> Result<ProductionRecord, GridError> {
    repair_negative_noise(&mut record.production);

    for kind in policy.required {
        let mix = if kind.is_storage() {
            &record.storage
        } else {
            &record.production
        };
        if mix.value(*kind).is_none() {
            return Err(GridError::MissingRequired { kind: *kind });
        }
    }

    let total = record.production.total();
    if total < policy.floor {
        return Err(GridError::BelowFloor {
            total,
            floor: policy.floor,
        });
    }

    coerce_nulls(&mut record.production);
    coerce_nulls(&mut record.storage);
    Ok(record)
}

/// Validate every record of a batch, dropping the rejected ones
///
/// Only fails when nothing survives; the last rejection is logged.
pub fn validate_batch(
    records: Vec<ProductionRecord>,
    policy: &ValidationPolicy,
) -> Result<Vec<ProductionRecord>, GridError> {
    let mut accepted = Vec::with_capacity(records.len());
    for record in records {
        let (zone, datetime) = (record.zone_key.clone(), record.datetime);
        match validate(record, policy) {
            Ok(record) => accepted.push(record),
            Err(e) if e.is_validation_rejection() => {
                warn!("Dropping {} record at {}: {}", zone, datetime, e);
            }
            Err(e) => return Err(e),
        }
    }

    if accepted.is_empty() {
        return Err(GridError::NoValidData);
    }
    Ok(accepted)
}

fn repair_negative_noise(mix: &mut ProductionMix) {
    for (kind, value) in mix.iter_mut() {
        match *value {
            Some(v) if v < 0.0 && v > -NEGATIVE_NOISE_MW => {
                debug!("Zeroing {:.2} MW of negative noise for {}", v, kind);
                *value = Some(0.0);
            }
            Some(v) if v < 0.0 => {
                warn!("Keeping negative reading of {:.1} MW for {}", v, kind);
            }
            _ => {}
        }
    }
}

fn coerce_nulls(mix: &mut ProductionMix) {
    for (_, value) in mix.iter_mut() {
        value.get_or_insert(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fluxion_grid_types::{GenerationType, ZoneKey};

    const HYDRO_FLOOR_10: ValidationPolicy = ValidationPolicy::new(&[GenerationType::Hydro], 10.0);

    fn record(entries: &[(GenerationType, Option<f64>)]) -> ProductionRecord {
        let mut production = ProductionMix::new();
        for (kind, value) in entries {
            production.set(*kind, *value);
        }
        ProductionRecord {
            zone_key: ZoneKey::new("FO"),
            datetime: chrono_tz::Atlantic::Faroe
                .with_ymd_and_hms(2024, 1, 15, 12, 0, 0)
                .unwrap(),
            production,
            storage: ProductionMix::new(),
            source: "sev.fo".to_string(),
        }
    }

    #[test]
    fn test_accepts_plausible_record() {
        let r = record(&[
            (GenerationType::Hydro, Some(8.0)),
            (GenerationType::Wind, Some(4.0)),
            (GenerationType::Solar, None),
        ]);
        let accepted = validate(r, &HYDRO_FLOOR_10).unwrap();
        assert!(accepted.production.total() >= 10.0);
        assert_eq!(accepted.production.value(GenerationType::Solar), Some(0.0));
    }

    #[test]
    fn test_rejects_missing_required() {
        let r = record(&[(GenerationType::Wind, Some(40.0))]);
        assert_eq!(
            validate(r, &HYDRO_FLOOR_10),
            Err(GridError::MissingRequired {
                kind: GenerationType::Hydro
            })
        );

        let r = record(&[(GenerationType::Hydro, None), (GenerationType::Wind, Some(40.0))]);
        assert!(matches!(
            validate(r, &HYDRO_FLOOR_10),
            Err(GridError::MissingRequired { .. })
        ));
    }

    #[test]
    fn test_rejects_below_floor() {
        let r = record(&[(GenerationType::Hydro, Some(0.0)), (GenerationType::Oil, Some(0.0))]);
        assert!(matches!(
            validate(r, &HYDRO_FLOOR_10),
            Err(GridError::BelowFloor { .. })
        ));
    }

    #[test]
    fn test_zero_is_a_present_value() {
        let policy = ValidationPolicy::new(&[GenerationType::Hydro], 1.0);
        let r = record(&[(GenerationType::Hydro, Some(0.0)), (GenerationType::Oil, Some(3.0))]);
        assert!(validate(r, &policy).is_ok());
    }

    #[test]
    fn test_negative_noise_is_zeroed() {
        let r = record(&[
            (GenerationType::Hydro, Some(12.0)),
            (GenerationType::Solar, Some(-0.4)),
        ]);
        let accepted = validate(r, &HYDRO_FLOOR_10).unwrap();
        assert_eq!(accepted.production.value(GenerationType::Solar), Some(0.0));
    }

    #[test]
    fn test_large_negative_passes_through() {
        let r = record(&[
            (GenerationType::Hydro, Some(120.0)),
            (GenerationType::Solar, Some(-50.0)),
        ]);
        let accepted = validate(r, &HYDRO_FLOOR_10).unwrap();
        assert_eq!(accepted.production.value(GenerationType::Solar), Some(-50.0));
        assert!((accepted.production.total() - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_batch_drops_rejected_records() {
        let good = record(&[(GenerationType::Hydro, Some(20.0))]);
        let bad = record(&[(GenerationType::Hydro, Some(1.0))]);
        let accepted = validate_batch(vec![good.clone(), bad], &HYDRO_FLOOR_10).unwrap();
        assert_eq!(accepted, vec![good]);
    }

    #[test]
    fn test_batch_with_nothing_valid() {
        let bad = record(&[(GenerationType::Hydro, Some(1.0))]);
        assert_eq!(
            validate_batch(vec![bad], &HYDRO_FLOOR_10),
            Err(GridError::NoValidData)
        );
        assert_eq!(
            validate_batch(vec![], &HYDRO_FLOOR_10),
            Err(GridError::NoValidData)
        );
    }
}
