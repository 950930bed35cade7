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

//! Adapters over a real HTTP session against a mock server

use chrono::{TimeZone, Utc};
use fluxion_grid_adapters::{FixedClock, GridConfig, GridParsers, HttpSession, load_config};
use fluxion_grid_types::{GenerationType, GridError, ZoneKey};
use mockito::{Matcher, Server};
use std::io::Write;
use std::sync::Arc;

fn parsers(config: &GridConfig) -> GridParsers {
    let now = Utc.with_ymd_and_hms(2024, 1, 15, 17, 42, 13).unwrap();
    GridParsers::new(config, Arc::new(FixedClock(now)))
}

#[test]
fn test_faroe_over_http() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/api/realtimemap/now")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(include_str!("fixtures/sev_realtime.json"))
        .create();

    let mut config = GridConfig::default();
    config.endpoints.sev_base_url = server.url();
    let session = HttpSession::new(&config.http).unwrap();

    let record = parsers(&config)
        .production(&session, &ZoneKey::new("FO-MI"), None)
        .unwrap()
        .into_vec()
        .remove(0);

    assert_eq!(record.production.value(GenerationType::Hydro), Some(15.9));
    mock.assert();
}

#[test]
fn test_pjm_api_key_header_and_status() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/api/v1/gen_by_fuel")
        .match_header("ocp-apim-subscription-key", "from-file")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("startRow".into(), "1".into()),
            Matcher::UrlEncoded(
                "datetime_beginning_ept".into(),
                "2024-01-15T12:00:00.0000000".into(),
            ),
        ]))
        .with_status(500)
        .create();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[endpoints]\npjm_api_base_url = \"{}/api/v1\"\n\n[pjm]\napi_key = \"from-file\"",
        server.url()
    )
    .unwrap();
    let config = load_config(file.path()).unwrap();
    let session = HttpSession::new(&config.http).unwrap();

    let err = parsers(&config)
        .production(&session, &ZoneKey::new("US-PJM"), None)
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        GridError::HttpStatus { status: 500, .. }
    ));
    mock.assert();
}
