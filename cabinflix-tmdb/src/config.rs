use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::LookupError;

pub const API_KEY_ENV: &str = "TMDB_API_KEY";

pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 250;

/// Settings for talking to TMDB.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub language: String,
    /// Minimum gap between two API requests.
    pub request_delay: Duration,
}

/// Where a setting's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line.
    Flag,
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Hard-coded default value.
    Default,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag => write!(f, "command line"),
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of each TMDB setting.
#[derive(Debug)]
pub struct ConfigSources {
    pub api_key: ConfigSource,
    pub language: ConfigSource,
    pub request_delay: ConfigSource,
}

/// The `[tmdb]` part of the shared config file. Other tables belong to
/// other components and are ignored here.
#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct ConfigFile {
    pub tmdb: Option<TmdbSection>,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct TmdbSection {
    pub api_key: Option<String>,
    pub language: Option<String>,
    pub request_delay_ms: Option<u64>,
}

impl TmdbConfig {
    /// Load settings from the environment and config file.
    ///
    /// Priority: env vars > config file > defaults. The API key is required.
    pub fn load() -> Result<Self, LookupError> {
        let file = load_config_file();
        Self::resolve(
            std::env::var(API_KEY_ENV).ok(),
            file.as_ref().and_then(|f| f.tmdb.as_ref()),
        )
    }

    /// Resolve settings from an environment API key and a `[tmdb]` table.
    pub fn resolve(
        env_api_key: Option<String>,
        section: Option<&TmdbSection>,
    ) -> Result<Self, LookupError> {
        let api_key = env_api_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| section.and_then(|s| s.api_key.clone()))
            .ok_or_else(|| {
                LookupError::Config(format!(
                    "Missing API key. Set {API_KEY_ENV} env var or add api_key to the [tmdb] section of the config file"
                ))
            })?;

        let language = section
            .and_then(|s| s.language.clone())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        let delay_ms = section
            .and_then(|s| s.request_delay_ms)
            .unwrap_or(DEFAULT_REQUEST_DELAY_MS);

        Ok(Self {
            api_key,
            language,
            request_delay: Duration::from_millis(delay_ms),
        })
    }

    /// Replace the API key with an explicit value (e.g., from CLI args).
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key {
            self.api_key = key;
        }
        self
    }
}

/// Return the path to the config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cabinflix").join("config.toml"))
}

/// Parse config file text.
pub fn parse_config(contents: &str) -> Result<ConfigFile, LookupError> {
    toml::from_str(contents)
        .map_err(|e| LookupError::Config(format!("Failed to parse config file: {e}")))
}

/// Read the config file at `path`. A missing file reads as empty.
pub fn read_config_file(path: &Path) -> Result<ConfigFile, LookupError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(e.into()),
    }
}

/// Read the config file at its standard location.
///
/// Unreadable or malformed files are logged and treated as absent.
pub fn load_config_file() -> Option<ConfigFile> {
    let path = config_path()?;
    match read_config_file(&path) {
        Ok(file) => Some(file),
        Err(e) => {
            log::warn!("Ignoring config file {}: {}", path.display(), e);
            None
        }
    }
}

/// Determine where each TMDB setting is coming from.
pub fn config_sources(api_key_flag: bool) -> ConfigSources {
    let file = load_config_file();
    let section = file.as_ref().and_then(|f| f.tmdb.as_ref());

    let api_key = if api_key_flag {
        ConfigSource::Flag
    } else if std::env::var(API_KEY_ENV).is_ok_and(|k| !k.trim().is_empty()) {
        ConfigSource::EnvVar(API_KEY_ENV)
    } else if section.and_then(|s| s.api_key.as_ref()).is_some() {
        ConfigSource::ConfigFile
    } else {
        ConfigSource::Missing
    };

    let language = if section.and_then(|s| s.language.as_ref()).is_some() {
        ConfigSource::ConfigFile
    } else {
        ConfigSource::Default
    };

    let request_delay = if section.and_then(|s| s.request_delay_ms).is_some() {
        ConfigSource::ConfigFile
    } else {
        ConfigSource::Default
    };

    ConfigSources {
        api_key,
        language,
        request_delay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn env_key_beats_file() {
        let section = TmdbSection {
            api_key: Some("from-file".into()),
            ..TmdbSection::default()
        };
        let cfg = TmdbConfig::resolve(Some("from-env".into()), Some(&section)).unwrap();
        assert_eq!(cfg.api_key, "from-env");
    }

    #[test]
    fn file_values_and_defaults_ignore_other_tables() {
        let file = parse_config(
            r#"
[tmdb]
api_key = "abc"
request_delay_ms = 500

[catalog]
database = "/tmp/movies.db"
"#,
        )
        .unwrap();
        let cfg = TmdbConfig::resolve(None, file.tmdb.as_ref()).unwrap();
        assert_eq!(cfg.api_key, "abc");
        assert_eq!(cfg.language, DEFAULT_LANGUAGE);
        assert_eq!(cfg.request_delay, Duration::from_millis(500));
    }

    #[test]
    fn missing_key_is_config_error() {
        let err = TmdbConfig::resolve(Some("  ".into()), None).unwrap_err();
        assert!(matches!(err, LookupError::Config(_)));
    }

    #[test]
    fn flag_overrides_key() {
        let cfg = TmdbConfig::resolve(Some("env".into()), None)
            .unwrap()
            .with_api_key(Some("flag".into()));
        assert_eq!(cfg.api_key, "flag");
    }

    #[test]
    fn missing_file_reads_empty() {
        let tmp = TempDir::new().unwrap();
        let file = read_config_file(&tmp.path().join("config.toml")).unwrap();
        assert!(file.tmdb.is_none());
    }

    #[test]
    fn malformed_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[tmdb\napi_key = ").unwrap();
        assert!(matches!(
            read_config_file(&path),
            Err(LookupError::Config(_))
        ));
    }
}
