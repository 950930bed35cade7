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

//! Adapter configuration (TOML)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

const PJM_API_KEY_ENV: &str = "PJM_API_KEY";

fn default_timeout_secs() -> u64 {
    20
}

fn default_user_agent() -> String {
    format!("fluxion-grid/{}", env!("CARGO_PKG_VERSION"))
}

fn default_sev_base_url() -> String {
    "https://www.sev.fo".to_owned()
}

fn default_pjm_web_base_url() -> String {
    "http://www.pjm.com".to_owned()
}

fn default_pjm_api_base_url() -> String {
    "https://api.pjm.com/api/v1".to_owned()
}

fn default_rte_base_url() -> String {
    "http://eco2mix.rte-france.com".to_owned()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub endpoints: Endpoints,

    #[serde(default)]
    pub pjm: PjmConfig,
}

/// HTTP session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Base URLs of each source, overridable for testing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_sev_base_url")]
    pub sev_base_url: String,

    /// Markets page, interface charts and the interregional map
    #[serde(default = "default_pjm_web_base_url")]
    pub pjm_web_base_url: String,

    /// Data Miner API
    #[serde(default = "default_pjm_api_base_url")]
    pub pjm_api_base_url: String,

    #[serde(default = "default_rte_base_url")]
    pub rte_base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            sev_base_url: default_sev_base_url(),
            pjm_web_base_url: default_pjm_web_base_url(),
            pjm_api_base_url: default_pjm_api_base_url(),
            rte_base_url: default_rte_base_url(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PjmConfig {
    /// Data Miner subscription key; falls back to `PJM_API_KEY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl PjmConfig {
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(PJM_API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

impl GridConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse grid config")
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize grid config")
    }
}

/// Load config from `path`, defaults when the file does not exist
pub fn load_config(path: &Path) -> Result<GridConfig> {
    if !path.exists() {
        warn!("Config {} not found, using defaults", path.display());
        return Ok(GridConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = GridConfig::from_toml_str(&content)
        .with_context(|| format!("Invalid config in {}", path.display()))?;
    info!("Loaded grid config from {}", path.display());
    Ok(config)
}
