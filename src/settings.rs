use anyhow::{Context, Result};
use directories_next::BaseDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::quiz::shuffle;
use crate::registry::REGISTRY_FILE_NAME;
use crate::source::google::ServiceAccountKey;


pub const CONFIG_FILE: &str = "sheet-quiz.toml";
pub const ENV_PREFIX: &str = "SHEET_QUIZ_";
/// Inline service account key, as exported for hosted deployments.
pub const CREDENTIALS_ENV: &str = "GOOGLE_CREDENTIALS";

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Google,
    Workbook,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub port: u16,
    pub bind_address: String,
    pub source: SourceKind,
    pub credentials: Option<PathBuf>,
    pub workbook_root: Option<PathBuf>,
    pub registry_path: Option<PathBuf>,
    pub shuffle_passes: usize,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            port: 3000,
            bind_address: "0.0.0.0".to_owned(),
            source: SourceKind::Google,
            credentials: None,
            workbook_root: None,
            registry_path: None,
            shuffle_passes: shuffle::DEFAULT_PASSES,
            log_level: "info".to_owned(),
        }
    }
}

fn default_registry_path() -> PathBuf {
    match BaseDirs::new() {
        Some(dirs) => dirs.data_dir().join("sheet-quiz").join(REGISTRY_FILE_NAME),
        None => PathBuf::from("data").join(REGISTRY_FILE_NAME),
    }
}

impl Settings {
    /// Defaults, then `sheet-quiz.toml`, then `PORT`, then `SHEET_QUIZ_*`.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::raw().only(&["PORT"]))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load() -> Result<Settings> {
        Self::figment()
            .extract()
            .context("could not load settings")
    }

    pub fn registry_path(&self) -> PathBuf {
        self.registry_path
            .clone()
            .unwrap_or_else(default_registry_path)
    }

    pub fn service_account_key(&self) -> Result<ServiceAccountKey> {
        if let Ok(json) = std::env::var(CREDENTIALS_ENV) {
            return ServiceAccountKey::from_json(&json)
                .with_context(|| format!("invalid {} variable", CREDENTIALS_ENV));
        }
        let path = self.credentials.as_ref().with_context(|| {
            format!(
                "no service account key configured: set {}CREDENTIALS or {}",
                ENV_PREFIX, CREDENTIALS_ENV
            )
        })?;
        ServiceAccountKey::from_file(path)
            .with_context(|| format!("invalid service account key {}", path.display()))
    }

    pub fn workbook_root(&self) -> Result<PathBuf> {
        self.workbook_root.clone().with_context(|| {
            format!(
                "workbook source selected but {}WORKBOOK_ROOT is not set",
                ENV_PREFIX
            )
        })
    }
}
