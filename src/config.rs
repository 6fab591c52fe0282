use std::{env, path::PathBuf, time::Duration};

use directories::BaseDirs;
use lazy_static::lazy_static;
use serde::Deserialize;
use tracing::debug;

const CONFIG: &str = include_str!("../.config/config.json5");

const DEFAULT_APP_NAME: &str = "BD Counsels";
const DEFAULT_APP_VERSION: &str = "1.0.0";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
}

/// Where the seat-matrix CSV is looked up
#[derive(Clone, Debug, Deserialize, Default)]
pub struct SourceConfig {
    /// URL or directory relative candidates resolve against
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub candidates: Vec<String>,
    #[serde(default)]
    pub timeout_secs: u64,
}

impl SourceConfig {
    /// HTTP timeout; `None` when disabled with 0
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct TableConfig {
    #[serde(default)]
    pub page_size: usize,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AnnouncementConfig {
    #[serde(default)]
    pub show_on_start: bool,
}

#[derive(Clone, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct EndpointSet {
    pub api_url: String,
    pub static_url: String,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct Endpoints {
    #[serde(default)]
    pub development: EndpointSet,
    #[serde(default)]
    pub production: EndpointSet,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub announcement: AnnouncementConfig,
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default)]
    pub app: AppInfo,
}

/// Build profile the endpoint set is chosen for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Production
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

/// Endpoints and identity after environment overrides are applied
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeEnv {
    pub environment: Environment,
    pub api_url: String,
    pub static_url: String,
    pub app_name: String,
    pub app_version: String,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    /// Layer the embedded defaults, a user file and `SEATMATRIX_*` variables
    ///
    /// An explicit `config_path` must exist. Without one,
    /// `~/.seatmatrix-config.json5` is read when present.
    pub fn from_path(config_path: Option<&PathBuf>) -> Result<Self, config::ConfigError> {
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5));

        builder = match config_path {
            Some(p) => builder.add_source(
                config::File::from(expand_tilde(p))
                    .format(config::FileFormat::Json5)
                    .required(true),
            ),
            None => builder.add_source(
                config::File::from(default_home_config_path())
                    .format(config::FileFormat::Json5)
                    .required(false),
            ),
        };

        builder = builder.add_source(
            config::Environment::with_prefix(PROJECT_NAME.as_str())
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut cfg: Self = builder.build()?.try_deserialize()?;
        cfg.fill_defaults();
        debug!("Loaded configuration: {:?}", cfg);
        Ok(cfg)
    }

    /// Embedded defaults only, without user file or environment
    pub fn embedded() -> Result<Self, config::ConfigError> {
        let mut cfg: Self = config::Config::builder()
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5))
            .build()?
            .try_deserialize()?;
        cfg.config.data_dir = get_data_dir();
        cfg.config.config_dir = get_config_dir();
        cfg.fill_defaults();
        Ok(cfg)
    }

    fn fill_defaults(&mut self) {
        if self.table.page_size == 0 {
            self.table.page_size = crate::core::DEFAULT_PAGE_SIZE;
        }
        if self
            .source
            .base
            .as_deref()
            .is_some_and(|b| b.trim().is_empty())
        {
            self.source.base = None;
        }
    }

    /// Candidate list with `extra` locations tried first
    pub fn candidates(&self, extra: &[String]) -> Vec<String> {
        extra
            .iter()
            .chain(self.source.candidates.iter())
            .cloned()
            .collect()
    }

    pub fn keybindings_path(&self) -> PathBuf {
        self.config.config_dir.join("keybindings.json")
    }

    /// Resolve endpoints for this build, honouring the override variables
    pub fn runtime_env(&self) -> RuntimeEnv {
        self.runtime_env_with(Environment::current(), |key| env::var(key).ok())
    }

    /// As [`Config::runtime_env`] with an explicit environment and lookup
    ///
    /// Blank override values count as unset.
    pub fn runtime_env_with(
        &self,
        environment: Environment,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> RuntimeEnv {
        let endpoints = match environment {
            Environment::Development => &self.endpoints.development,
            Environment::Production => &self.endpoints.production,
        };
        let var = |suffix: &str| {
            lookup(&format!("{}_{}", PROJECT_NAME.as_str(), suffix)).filter(|v| !v.trim().is_empty())
        };
        let or_default = |value: &str, default: &str| {
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };

        RuntimeEnv {
            environment,
            api_url: var("API_URL").unwrap_or_else(|| endpoints.api_url.clone()),
            static_url: var("STATIC_URL").unwrap_or_else(|| endpoints.static_url.clone()),
            app_name: var("APP_NAME").unwrap_or_else(|| or_default(&self.app.name, DEFAULT_APP_NAME)),
            app_version: var("APP_VERSION")
                .unwrap_or_else(|| or_default(&self.app.version, DEFAULT_APP_VERSION)),
        }
    }
}

fn expand_tilde(path: &PathBuf) -> PathBuf {
    if let Some(s) = path.to_str()
        && s.starts_with('~')
        && let Some(base) = BaseDirs::new()
    {
        return base.home_dir().join(s.trim_start_matches('~').trim_start_matches(['/', '\\']));
    }
    path.clone()
}

fn default_home_config_path() -> PathBuf {
    let file = format!(".{}-config.json5", env!("CARGO_PKG_NAME"));
    match BaseDirs::new() {
        Some(base) => base.home_dir().join(file),
        None => PathBuf::from(file),
    }
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else {
        PathBuf::from(".").join(".config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_embedded_defaults() {
        let cfg = Config::embedded().unwrap();
        assert_eq!(cfg.table.page_size, 50);
        assert_eq!(cfg.source.candidates.len(), 4);
        assert_eq!(cfg.source.candidates[0], "/public/data/Seat_Matric.csv");
        assert_eq!(cfg.source.base.as_deref(), Some("."));
        assert_eq!(cfg.source.timeout(), Some(Duration::from_secs(30)));
        assert!(cfg.announcement.show_on_start);
    }

    #[test]
    fn test_user_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".json5").tempfile().unwrap();
        writeln!(
            file,
            "{{ table: {{ page_size: 25 }}, source: {{ base: 'https://example.org/', timeout_secs: 0 }} }}"
        )
        .unwrap();

        let cfg = Config::from_path(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(cfg.table.page_size, 25);
        assert_eq!(cfg.source.base.as_deref(), Some("https://example.org/"));
        assert_eq!(cfg.source.timeout(), None);
        // Untouched keys keep their embedded values
        assert_eq!(cfg.source.candidates.len(), 4);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let path = PathBuf::from("/definitely/not/here/seatmatrix.json5");
        assert!(Config::from_path(Some(&path)).is_err());
    }

    #[test]
    fn test_candidates_prepend_extra() {
        let cfg = Config::embedded().unwrap();
        let all = cfg.candidates(&["https://host/x.csv".to_string()]);
        assert_eq!(all.len(), 5);
        assert_eq!(all[0], "https://host/x.csv");
        assert_eq!(all[1], "/public/data/Seat_Matric.csv");
    }

    #[test]
    fn test_runtime_env_selects_profile() {
        let cfg = Config::embedded().unwrap();

        let dev = cfg.runtime_env_with(Environment::Development, |_| None);
        assert_eq!(dev.api_url, "http://127.0.0.1:8000/");
        assert_eq!(dev.static_url, "http://127.0.0.1:8000/static/");
        assert_eq!(dev.app_name, "BD Counsels");

        let prod = cfg.runtime_env_with(Environment::Production, |_| None);
        assert_eq!(prod.api_url, "https://bd-counselling-backend.onrender.com/");
        assert_eq!(prod.app_version, "1.0.0");
    }

    #[test]
    fn test_runtime_env_overrides() {
        let cfg = Config::embedded().unwrap();
        let vars: HashMap<String, String> = [
            ("SEATMATRIX_API_URL", "https://api.test/"),
            ("SEATMATRIX_STATIC_URL", "  "),
            ("SEATMATRIX_APP_NAME", "Counsel"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let env = cfg.runtime_env_with(Environment::Production, |k| vars.get(k).cloned());
        assert_eq!(env.api_url, "https://api.test/");
        // Blank override falls back to the profile value
        assert_eq!(env.static_url, "https://bd-counselling-backend.onrender.com/static/");
        assert_eq!(env.app_name, "Counsel");
        assert_eq!(env.app_version, "1.0.0");
    }
}
