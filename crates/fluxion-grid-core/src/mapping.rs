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

//! Source vocabulary to canonical generation types

use fluxion_grid_types::{GenerationType, GridError};
use std::collections::HashSet;

/// Static label table of one source
///
/// Many labels may map to the same type. A label that appears in a payload but
/// not in the table is an error, never a silent drop.
#[derive(Debug, Clone, Copy)]
pub struct GenerationMapping {
    name: &'static str,
    entries: &'static [(&'static str, GenerationType)],
}

impl GenerationMapping {
    pub const fn new(name: &'static str, entries: &'static [(&'static str, GenerationType)]) -> Self {
        Self { name, entries }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn lookup(&self, label: &str) -> Option<GenerationType> {
        self.entries
            .iter()
            .find(|(raw, _)| *raw == label)
            .map(|(_, kind)| *kind)
    }

    /// Like `lookup`, but an unmapped label is an `UnmappedKey` error
    pub fn resolve(&self, label: &str) -> Result<GenerationType, GridError> {
        self.lookup(label).ok_or_else(|| GridError::UnmappedKey {
            label: label.to_string(),
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(raw, _)| *raw)
    }

    /// Start-up sanity check: labels are non-empty and unique, and none of
    /// them would be swallowed by the ignore list before reaching the table
    pub fn check(&self, ignore: &IgnoreList) -> Result<(), GridError> {
        let mut seen = HashSet::new();
        for label in self.labels() {
            if label.trim().is_empty() {
                return Err(GridError::Config(format!("{}: empty label", self.name)));
            }
            if !seen.insert(label) {
                return Err(GridError::Config(format!(
                    "{}: duplicate label '{label}'",
                    self.name
                )));
            }
            if ignore.matches(label) {
                return Err(GridError::Config(format!(
                    "{}: label '{label}' is shadowed by the ignore list",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// Markers of keys that carry no generation data (sums, test columns, aggregates)
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreList(&'static [&'static str]);

impl IgnoreList {
    pub const EMPTY: IgnoreList = IgnoreList(&[]);

    pub const fn new(markers: &'static [&'static str]) -> Self {
        Self(markers)
    }

    /// Substring match on the raw key
    pub fn matches(&self, key: &str) -> bool {
        self.0.iter().any(|marker| key.contains(marker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: GenerationMapping = GenerationMapping::new(
        "test",
        &[
            ("Vand", GenerationType::Hydro),
            ("Olie", GenerationType::Oil),
            ("Diesel", GenerationType::Oil),
            ("Tidal", GenerationType::Unknown),
        ],
    );

    #[test]
    fn test_every_table_label_resolves() {
        for label in TABLE.labels() {
            assert!(TABLE.lookup(label).is_some(), "{label} did not resolve");
        }
    }

    #[test]
    fn test_many_to_one() {
        assert_eq!(TABLE.lookup("Olie"), Some(GenerationType::Oil));
        assert_eq!(TABLE.lookup("Diesel"), Some(GenerationType::Oil));
    }

    #[test]
    fn test_unmapped_label_is_an_error() {
        assert_eq!(
            TABLE.resolve("Kol"),
            Err(GridError::UnmappedKey {
                label: "Kol".to_string()
            })
        );
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(TABLE.lookup("vand"), None);
    }

    #[test]
    fn test_check_accepts_clean_table() {
        assert!(TABLE.check(&IgnoreList::new(&["Sum", "Test"])).is_ok());
    }

    #[test]
    fn test_check_rejects_duplicates_and_shadowed_labels() {
        const DUPES: GenerationMapping = GenerationMapping::new(
            "dupes",
            &[("Vand", GenerationType::Hydro), ("Vand", GenerationType::Oil)],
        );
        assert!(matches!(
            DUPES.check(&IgnoreList::EMPTY),
            Err(GridError::Config(_))
        ));
        assert!(matches!(
            TABLE.check(&IgnoreList::new(&["Vand"])),
            Err(GridError::Config(_))
        ));
    }

    #[test]
    fn test_ignore_list_matches_substrings() {
        let ignore = IgnoreList::new(&["Sum", "VnVand"]);
        assert!(ignore.matches("SumSev_E"));
        assert!(ignore.matches("VnVandSev_E"));
        assert!(!ignore.matches("VandSev_E"));
    }
}
