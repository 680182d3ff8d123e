use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context};
use serde::Deserialize;
use shared::protocol::DEFAULT_UPSTREAM_BASE_URL;
use url::Url;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub upstream_base_url: String,
    pub cors_permissive: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3000".into(),
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.into(),
            cors_permissive: true,
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new("server.toml"), |key| std::env::var(key).ok())
}

/// Defaults, then `server.toml`, then environment. Later `APP__*` names win over the short ones.
pub fn load_settings_from(config_path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            if let Some(v) = file_cfg.get("bind_addr").and_then(toml::Value::as_str) {
                settings.server_bind = v.to_string();
            }
            if let Some(v) = file_cfg
                .get("upstream_base_url")
                .and_then(toml::Value::as_str)
            {
                settings.upstream_base_url = v.to_string();
            }
            if let Some(v) = file_cfg.get("cors_permissive").and_then(toml::Value::as_bool) {
                settings.cors_permissive = v;
            }
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("WORLD_BANK_URL") {
        settings.upstream_base_url = v;
    }
    if let Some(v) = env("APP__UPSTREAM_BASE_URL") {
        settings.upstream_base_url = v;
    }

    if let Some(v) = env("APP__CORS_PERMISSIVE") {
        if let Some(parsed) = parse_flag(&v) {
            settings.cors_permissive = parsed;
        }
    }

    settings
}

pub fn prepare_upstream_base_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Settings::default().upstream_base_url);
    }

    let url = Url::parse(raw).with_context(|| format!("invalid upstream base url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("upstream base url '{raw}' must use http or https");
    }

    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
