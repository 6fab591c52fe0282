//! Backend health probe, environment report and the diagnostic probe file

use crate::config::RuntimeEnv;
use chrono::{DateTime, Local, Utc};
use color_eyre::Result;
use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// File the diagnostic probe writes into the data directory
pub const PROBE_FILE: &str = "debug_probe.json";

/// Body returned by `GET {api_url}health/`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthBody {
    pub status: String,
    pub message: String,
}

/// Result of one health check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthState {
    Checking,
    Reachable(HealthBody),
    Unreachable(String),
}

impl HealthState {
    pub fn describe(&self) -> String {
        match self {
            Self::Checking => "Checking...".to_string(),
            Self::Reachable(body) => format!("Backend: {} - {}", body.status, body.message),
            Self::Unreachable(reason) => format!("Backend Error: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub url: String,
    pub state: HealthState,
    pub checked_at: DateTime<Local>,
}

/// Payload of the diagnostic probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRecord {
    pub test: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// Service behind the status page
pub struct StatusService;

impl StatusService {
    pub fn health_url(api_url: &str) -> String {
        if api_url.ends_with('/') {
            format!("{}health/", api_url)
        } else {
            format!("{}/health/", api_url)
        }
    }

    /// Probe the backend health endpoint; never fails, only reports
    pub fn check_health(api_url: &str, timeout: Option<Duration>) -> HealthReport {
        let url = Self::health_url(api_url);
        info!("Checking backend health at {}", url);
        let state = match Self::fetch_health(&url, timeout) {
            Ok(body) => HealthState::Reachable(body),
            Err(e) => {
                warn!("Backend health check failed: {}", e);
                HealthState::Unreachable(e.to_string())
            }
        };
        HealthReport {
            url,
            state,
            checked_at: Local::now(),
        }
    }

    fn fetch_health(url: &str, timeout: Option<Duration>) -> Result<HealthBody> {
        let client = HttpClient::builder().timeout(timeout).build()?;
        let body = client.get(url).send()?.error_for_status()?.json::<HealthBody>()?;
        Ok(body)
    }

    /// Write the diagnostic probe file and return its path
    pub fn write_probe(data_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(data_dir)?;
        let record = ProbeRecord {
            test: "data".to_string(),
            timestamp: Utc::now().timestamp_millis(),
        };
        let path = data_dir.join(PROBE_FILE);
        std::fs::write(&path, serde_json::to_string(&record)?)?;
        info!("Wrote diagnostic probe to {}", path.display());
        Ok(path)
    }

    /// Label/value pairs describing the running environment
    pub fn environment_info(env: &RuntimeEnv, source: Option<&str>) -> Vec<(String, String)> {
        let cwd = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let terminal = std::env::var("TERM").unwrap_or_else(|_| "unknown".to_string());

        vec![
            ("Application".to_string(), format!("{} {}", env.app_name, env.app_version)),
            ("Build".to_string(), env.environment.label().to_string()),
            (
                "Platform".to_string(),
                format!("{} ({})", std::env::consts::OS, std::env::consts::ARCH),
            ),
            ("Terminal".to_string(), terminal),
            ("Working directory".to_string(), cwd),
            ("API URL".to_string(), env.api_url.clone()),
            ("Static URL".to_string(), env.static_url.clone()),
            (
                "Seat matrix source".to_string(),
                source.unwrap_or("not loaded").to_string(),
            ),
        ]
    }
}
