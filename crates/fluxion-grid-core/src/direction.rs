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

//! Sign/direction resolver
//!
//! Net flow is always reported relative to the sorted zone pair: positive means
//! power moving from the pair's first zone to its second. Sources report in
//! their own orientation, sometimes with a separate direction indicator (an
//! arrow image), and both are folded into one sign here.

use fluxion_grid_types::{GridError, SortedZonePair};
use std::ops::Mul;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowSign {
    Positive,
    Negative,
}

impl FlowSign {
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }

    pub fn apply(self, magnitude: f64) -> f64 {
        magnitude * self.multiplier()
    }
}

impl Mul for FlowSign {
    type Output = FlowSign;

    fn mul(self, rhs: FlowSign) -> FlowSign {
        if self == rhs {
            Self::Positive
        } else {
            Self::Negative
        }
    }
}

/// Known direction indicators of a source and the sign each one stands for
#[derive(Debug, Clone, Copy)]
pub struct IndicatorTable {
    entries: &'static [(&'static str, FlowSign)],
}

impl IndicatorTable {
    pub const fn new(entries: &'static [(&'static str, FlowSign)]) -> Self {
        Self { entries }
    }

    /// Unknown indicators are an error; direction is never guessed
    pub fn resolve(&self, indicator: &str) -> Result<FlowSign, GridError> {
        let indicator = indicator.trim();
        self.entries
            .iter()
            .find(|(known, _)| *known == indicator)
            .map(|(_, sign)| *sign)
            .ok_or_else(|| GridError::DirectionAmbiguous {
                indicator: indicator.to_owned(),
            })
    }
}

/// Sign that turns a value in the source's native orientation `(from, to)`
/// into one relative to `pair`
pub fn orientation(pair: &SortedZonePair, from: &str, to: &str) -> Result<FlowSign, GridError> {
    if !(pair.contains(from) && pair.contains(to)) || from == to {
        return Err(GridError::unsupported(format!(
            "orientation {from}->{to} does not describe {pair}"
        )));
    }
    if pair.is_reversed(from, to) {
        Ok(FlowSign::Negative)
    } else {
        Ok(FlowSign::Positive)
    }
}

/// Combine the source indicator with the orientation correction
pub fn resolve_sign(
    pair: &SortedZonePair,
    native_order: (&str, &str),
    indicator: FlowSign,
) -> Result<FlowSign, GridError> {
    Ok(indicator * orientation(pair, native_order.0, native_order.1)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARROWS: IndicatorTable = IndicatorTable::new(&[
        ("/img/black-L.png", FlowSign::Negative),
        ("/img/black-R.png", FlowSign::Positive),
    ]);

    #[test]
    fn test_indicator_lookup() {
        assert_eq!(ARROWS.resolve("/img/black-L.png"), Ok(FlowSign::Negative));
        assert_eq!(ARROWS.resolve(" /img/black-R.png "), Ok(FlowSign::Positive));
    }

    #[test]
    fn test_unknown_indicator_is_fatal() {
        assert_eq!(
            ARROWS.resolve("/img/black-U.png"),
            Err(GridError::DirectionAmbiguous {
                indicator: "/img/black-U.png".to_string()
            })
        );
    }

    #[test]
    fn test_native_order_matching_sorted_pair_keeps_sign() {
        let pair = SortedZonePair::new("US-PJM", "US-MISO");
        let sign = resolve_sign(&pair, ("US-MISO", "US-PJM"), FlowSign::Positive).unwrap();
        assert!((sign.apply(100.0) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_renamed_zones_flip_the_sign() {
        // Same physical link under the newer names sorts the other way round
        let pair = SortedZonePair::new("US-MIDW-MISO", "US-MIDA-PJM");
        assert_eq!(pair.key(), "US-MIDA-PJM->US-MIDW-MISO");
        let sign = resolve_sign(&pair, ("US-MIDW-MISO", "US-MIDA-PJM"), FlowSign::Positive).unwrap();
        assert!((sign.apply(100.0) + 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_indicator_and_orientation_compose() {
        let pair = SortedZonePair::new("US-MIDA-PJM", "US-MIDW-MISO");
        let sign = resolve_sign(&pair, ("US-MIDW-MISO", "US-MIDA-PJM"), FlowSign::Negative).unwrap();
        assert_eq!(sign, FlowSign::Positive);
    }

    #[test]
    fn test_orientation_for_foreign_zone_is_rejected() {
        let pair = SortedZonePair::new("US-MISO", "US-PJM");
        assert!(matches!(
            orientation(&pair, "US-NY", "US-PJM"),
            Err(GridError::Unsupported(_))
        ));
    }
}
