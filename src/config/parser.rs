use crate::config::types::{Config, StoreBackend};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variables that override the configuration file
pub const ENV_TARGET_URL: &str = "TARGET_URL";
pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub const ENV_SUPABASE_KEY: &str = "SUPABASE_KEY";
pub const ENV_IGNORE_PATTERNS: &str = "IGNORE_PATTERNS";
pub const ENV_DATABASE_PATH: &str = "DATABASE_PATH";

/// Reads and parses a configuration file without validating it
///
/// # Returns
///
/// * `Ok((Config, String))` - The parsed config and the SHA-256 of the file
/// * `Err(ConfigError)` - The file could not be read or parsed
pub fn read_config_file(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok((config, hash_content(&content)))
}

/// Builds the configuration a run actually uses
///
/// 1. Loads a `.env` file from the working directory when present
/// 2. Reads the TOML file if a path is given, otherwise starts from defaults
/// 3. Applies environment overrides
/// 4. Applies `target`, the command-line target URL, when given
/// 5. Validates the result
///
/// # Returns
///
/// * `Ok((Config, Option<String>))` - The config and the file hash, if a file was read
/// * `Err(ConfigError)` - Missing credentials, bad URL, unreadable file, ...
pub fn load_effective_config(
    path: Option<&Path>,
    target: Option<&str>,
) -> Result<(Config, Option<String>), ConfigError> {
    if let Ok(env_file) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", env_file.display());
    }

    let (mut config, hash) = match path {
        Some(path) => {
            let (config, hash) = read_config_file(path)?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());
    if let Some(target) = target {
        config.target.url = target.trim().to_string();
    }
    validate(&config)?;

    Ok((config, hash))
}

/// Applies overrides from a key lookup (normally the process environment)
///
/// Empty values are ignored. `SUPABASE_URL`/`SUPABASE_KEY` fill the remote
/// store credentials. `DATABASE_PATH` sets the SQLite path, and selects the
/// SQLite backend only when the file names no backend and no remote
/// credentials are configured.
/// `IGNORE_PATTERNS` is a comma-separated list.
pub fn apply_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(url) = get(ENV_TARGET_URL) {
        config.target.url = url;
    }

    if let Some(url) = get(ENV_SUPABASE_URL) {
        config.store.url = url;
    }

    if let Some(key) = get(ENV_SUPABASE_KEY) {
        config.store.key = key;
    }

    if let Some(path) = get(ENV_DATABASE_PATH) {
        config.store.database_path = path;
        if config.store.backend.is_none()
            && config.store.url.is_empty()
            && config.store.key.is_empty()
        {
            config.store.backend = Some(StoreBackend::Sqlite);
        }
    }

    if let Some(patterns) = get(ENV_IGNORE_PATTERNS) {
        config.sitemap.ignore_patterns = patterns
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
    }
}

fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
