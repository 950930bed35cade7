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

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Zone identifier (e.g. "FO", "US-MIDA-PJM")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneKey(String);

impl ZoneKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ZoneKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl AsRef<str> for ZoneKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Two zones in lexicographic order, rendered as "A->B"
///
/// A positive net flow on an exchange record keyed by this pair always means
/// power moving from `first` to `second`, whatever order the caller asked in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortedZonePair {
    first: ZoneKey,
    second: ZoneKey,
}

impl SortedZonePair {
    pub fn new(a: impl Into<ZoneKey>, b: impl Into<ZoneKey>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }

    pub fn first(&self) -> &ZoneKey {
        &self.first
    }

    pub fn second(&self) -> &ZoneKey {
        &self.second
    }

    /// True when `(from, to)` runs against the sorted order
    pub fn is_reversed(&self, from: &str, to: &str) -> bool {
        from == self.second.as_str() && to == self.first.as_str() && from != to
    }

    pub fn contains(&self, zone: &str) -> bool {
        self.first.as_str() == zone || self.second.as_str() == zone
    }

    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl From<ZoneKey> for String {
    fn from(key: ZoneKey) -> Self {
        key.0
    }
}

impl From<String> for ZoneKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for SortedZonePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.first, self.second)
    }
}

impl Serialize for SortedZonePair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
