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
use std::fmt;
use std::time::Duration;

/// Plausibility rules for a zone's production records
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationPolicy {
    /// Types that must be present with a value
    pub required: &'static [GenerationType],
    /// Minimum total generation (MW)
    pub floor: f64,
}

impl ValidationPolicy {
    pub const fn new(required: &'static [GenerationType], floor: f64) -> Self {
        Self { required, floor }
    }
}

/// Minimum interval between two invocations of an operation
///
/// Metadata for the scheduling harness, never enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefetchFrequency(Duration);

impl RefetchFrequency {
    pub const fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    pub const fn days(days: u64) -> Self {
        Self::from_secs(days * 86_400)
    }

    pub const fn as_duration(&self) -> Duration {
        self.0
    }
}

impl fmt::Display for RefetchFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0.as_secs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days() {
        assert_eq!(
            RefetchFrequency::days(1).as_duration(),
            Duration::from_secs(86_400)
        );
    }
}
