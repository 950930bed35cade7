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

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical generation types shared by all sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationType {
    Biomass,
    Coal,
    Gas,
    Geothermal,
    Hydro,
    Nuclear,
    Oil,
    Solar,
    Wind,
    Unknown,
    /// Battery storage, reported under a record's storage mix
    Battery,
}

impl GenerationType {
    /// Get config string value (lowercase)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Biomass => "biomass",
            Self::Coal => "coal",
            Self::Gas => "gas",
            Self::Geothermal => "geothermal",
            Self::Hydro => "hydro",
            Self::Nuclear => "nuclear",
            Self::Oil => "oil",
            Self::Solar => "solar",
            Self::Wind => "wind",
            Self::Unknown => "unknown",
            Self::Battery => "battery",
        }
    }

    /// List all canonical types
    pub fn all() -> &'static [GenerationType] {
        &[
            Self::Biomass,
            Self::Coal,
            Self::Gas,
            Self::Geothermal,
            Self::Hydro,
            Self::Nuclear,
            Self::Oil,
            Self::Solar,
            Self::Wind,
            Self::Unknown,
            Self::Battery,
        ]
    }

    /// Storage types go to `ProductionRecord::storage`, not `production`
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Battery)
    }
}

impl fmt::Display for GenerationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown generation type: '{s}'"))
    }
}
