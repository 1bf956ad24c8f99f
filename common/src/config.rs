//! Configuration parsing – reads a KEY=VALUE file (`lotwatch.conf`).
//!
//! The backend base URL is resolved once at start-up with the precedence
//! command-line flag > `LOTWATCH_BACKEND_URL` > config file > built-in default.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Environment variable that overrides `BACKEND_URL` from the file.
pub const BACKEND_URL_ENV: &str = "LOTWATCH_BACKEND_URL";

const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the recognition backend, without trailing slash.
    pub backend_url: String,
    /// Per-request timeout for every HTTP call (seconds).
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Default config path.
    pub fn default_path() -> &'static str {
        "/etc/lotwatch/lotwatch.conf"
    }

    /// Replace the backend URL, normalising away trailing slashes.
    pub fn with_backend_url(mut self, url: &str) -> Self {
        self.backend_url = normalize_url(url);
        self
    }
}

/// Load the configuration used by the binary, reading
/// `LOTWATCH_BACKEND_URL` from the process environment.
pub fn resolve(path: Option<&Path>, flag: Option<&str>) -> Result<Config> {
    resolve_with(path, flag, std::env::var(BACKEND_URL_ENV).ok())
}

/// Resolve the backend URL with the precedence flag > `env` > file > default.
///
/// With `path = None` the default path is tried and silently skipped when
/// absent; an explicitly requested file must exist. Blank `flag` or `env`
/// values are ignored.
pub fn resolve_with(
    path: Option<&Path>,
    flag: Option<&str>,
    env: Option<String>,
) -> Result<Config> {
    let config = load_or_default(path, Path::new(Config::default_path()))?;
    Ok(apply_overrides(config, flag, env.as_deref()))
}

fn load_or_default(path: Option<&Path>, default: &Path) -> Result<Config> {
    match path {
        Some(p) => load(p),
        None if default.exists() => load(default),
        None => Ok(Config::default()),
    }
}

fn apply_overrides(config: Config, flag: Option<&str>, env: Option<&str>) -> Config {
    let blank = |v: &&str| v.trim().is_empty();
    match flag.filter(|v| !blank(v)).or(env.filter(|v| !blank(v))) {
        Some(url) => config.with_backend_url(url),
        None => config,
    }
}

/// Parse a `KEY=VALUE` configuration file.
///
/// Lines starting with `#` are comments.  Values may be optionally
/// double-quoted.  Unknown keys are silently ignored.
pub fn load(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read config: {}", path.display()))?;

    let config = from_text(&text)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

fn from_text(text: &str) -> Result<Config> {
    let map = parse_conf(text);
    let get = |key: &str| -> Option<String> { map.get(key).cloned().filter(|v| !v.is_empty()) };

    let request_timeout_secs = match get("REQUEST_TIMEOUT_SECS") {
        Some(v) => v
            .parse::<u64>()
            .with_context(|| format!("REQUEST_TIMEOUT_SECS is not a number: {v}"))
            .and_then(|secs| {
                anyhow::ensure!(secs > 0, "REQUEST_TIMEOUT_SECS must be at least 1");
                Ok(secs)
            })?,
        None => DEFAULT_TIMEOUT_SECS,
    };

    Ok(Config {
        backend_url: normalize_url(&get("BACKEND_URL").unwrap_or_else(|| DEFAULT_BACKEND_URL.into())),
        request_timeout_secs,
    })
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Parse `KEY=VALUE` lines into a map, stripping optional double-quotes.
fn parse_conf(text: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, val)) = line.split_once('=') {
            let key = key.trim();
            let val = val.trim().trim_matches('"');
            map.insert(key.to_string(), val.to_string());
        }
    }
    map
}

// ─── tests ───────────────────────────────────────────────────────────────
