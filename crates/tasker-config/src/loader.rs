// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-based loader.
//!
//! Merge order, later wins: compiled defaults, `/etc/tasker/tasker.toml`,
//! `~/.config/tasker/tasker.toml`, `./tasker.toml`, `TASKER_*` env vars.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TaskerConfig;

/// Config sections that env vars may address, used to split `TASKER_<SECTION>_<KEY>`.
const SECTIONS: &[&str] = &["service", "server", "storage", "scoring", "metrics"];

/// Config files in merge order (lowest precedence first).
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/tasker/tasker.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("tasker/tasker.toml"));
    }
    paths.push(PathBuf::from("tasker.toml"));
    paths
}

/// Build the Figment for the full hierarchy without extracting it.
pub fn build_figment() -> Figment {
    config_paths()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(TaskerConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// Load configuration from the full hierarchy with env var overrides.
pub fn load_config() -> Result<TaskerConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<TaskerConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TaskerConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TaskerConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TaskerConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Map `TASKER_SERVER_API_KEY` to `server.api_key`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// keys that themselves contain underscores survive intact.
fn env_provider() -> Env {
    Env::prefixed("TASKER_").map(|key| {
        let key_str = key.as_str();
        SECTIONS
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| key_str.to_string())
            .into()
    })
}
