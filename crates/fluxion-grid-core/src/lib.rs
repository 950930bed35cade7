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

//! Normalization and validation pipeline for grid data
//!
//! Raw payloads go through the key mapper and the record normalizer, production
//! records then pass the validation gate. Exchange flows take a separate path
//! through the multi-feed aligner and the direction resolver.
//!
//! Everything in this crate is pure and synchronous; transport and markup
//! parsing live in `fluxion-grid-adapters`.

pub mod aligner;
pub mod decimal;
pub mod direction;
pub mod mapping;
pub mod normalize;
pub mod timestamps;
pub mod validation;

pub use aligner::{Alignment, combine};
pub use decimal::{DecimalStyle, parse_decimal};
pub use direction::{FlowSign, IndicatorTable, orientation, resolve_sign};
pub use mapping::{GenerationMapping, IgnoreList};
pub use timestamps::PeriodLength;
pub use validation::{validate, validate_batch};
