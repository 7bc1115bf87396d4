use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use platform_db::DatabaseSettings;

const DEFAULT_APP_ENV: &str = "development";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub app_env: String,
    pub database: DatabaseSettings,
    pub cors_allowed_origins: Vec<String>,
}

/// Load `.env.{APP_ENV}` then `.env` from the working directory. Neither
/// overrides the process environment, so the environment-specific file wins
/// over `.env`. Returns the files that were read.
pub fn load_env_files() -> Result<Vec<PathBuf>> {
    let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_APP_ENV.into());
    load_env_files_in(Path::new("."), &app_env)
}

fn load_env_files_in(dir: &Path, app_env: &str) -> Result<Vec<PathBuf>> {
    let mut loaded = Vec::new();
    for name in [format!(".env.{app_env}"), ".env".to_string()] {
        let path = dir.join(name);
        match dotenvy::from_path(&path) {
            Ok(()) => loaded.push(path),
            Err(err) if err.not_found() => {}
            Err(err) => {
                return Err(err).with_context(|| format!("invalid env file {}", path.display()));
            }
        }
    }
    Ok(loaded)
}

impl AppConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn is_development(&self) -> bool {
        self.app_env == DEFAULT_APP_ENV
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let app_env = lookup("APP_ENV").unwrap_or_else(|| DEFAULT_APP_ENV.into());
        let database =
            DatabaseSettings::from_lookup(&lookup).context("database configuration")?;
        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        Ok(Self {
            app_env,
            database,
            cors_allowed_origins,
        })
    }
}
