use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::time::Duration;

use crate::analysis::ast::parser::ParseLimits;

#[derive(Debug, Clone)]
pub struct Config {
    pub max_source_bytes: usize,
    pub max_nesting_depth: usize,
    pub timeout: Duration,
    pub ignore_globs: Option<GlobSet>,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let limits = ParseLimits::default();
        Self {
            max_source_bytes: limits.max_source_bytes,
            max_nesting_depth: limits.max_nesting_depth,
            timeout: Duration::from_secs(5),
            // None means: do not ignore anything
            ignore_globs: None,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    pub fn parse_limits(&self) -> ParseLimits {
        ParseLimits {
            max_source_bytes: self.max_source_bytes,
            max_nesting_depth: self.max_nesting_depth,
        }
    }
}

fn build_globs<'a>(patterns: impl Iterator<Item = &'a str>, warnings: &mut Vec<String>) -> Option<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns.map(str::trim).filter(|s| !s.is_empty()) {
        match Glob::new(pat) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => warnings.push(format!("ignoring invalid glob '{pat}': {e}")),
        }
    }
    builder.build().ok()
}

fn env_number(key: &str, warnings: &mut Vec<String>) -> Option<u64> {
    let val = std::env::var(key).ok()?;
    match val.trim().parse::<u64>() {
        Ok(n) => Some(n),
        Err(_) => {
            warnings.push(format!("ignoring non-numeric environment override {key}={val}"));
            None
        }
    }
}

/// Layer defaults, environment overrides and the optional JSON config file,
/// logging any ignored values through `tracing`.
pub fn load_config() -> Result<Config> {
    let (cfg, warnings) = load_config_with_warnings()?;
    for warning in &warnings {
        tracing::warn!("{warning}");
    }
    Ok(cfg)
}

/// Same as [`load_config`], but hands ignored values back to the caller
/// instead of logging them. Lets a binary read its log settings from the
/// config before installing a subscriber.
///
/// The file comes from `CODE_OPTIMIZER_CONFIG`, falling back to
/// `.code-optimizer.json` in the working directory. A missing file is fine;
/// an unreadable or malformed one is an error. Values in the file win over
/// the environment.
pub fn load_config_with_warnings() -> Result<(Config, Vec<String>)> {
    let mut cfg = Config::default();
    let mut warnings = Vec::new();

    if let Some(n) = env_number("CODE_OPTIMIZER_MAX_SOURCE_BYTES", &mut warnings) {
        cfg.max_source_bytes = n as usize;
    }
    if let Some(n) = env_number("CODE_OPTIMIZER_MAX_DEPTH", &mut warnings) {
        cfg.max_nesting_depth = n as usize;
    }
    if let Some(n) = env_number("CODE_OPTIMIZER_TIMEOUT_MS", &mut warnings) {
        cfg.timeout = Duration::from_millis(n);
    }
    if let Ok(val) = std::env::var("CODE_OPTIMIZER_IGNORE_GLOBS") {
        cfg.ignore_globs = build_globs(val.split(','), &mut warnings);
    }
    if let Ok(val) = std::env::var("CODE_OPTIMIZER_LOG_FORMAT") {
        cfg.log_format = LogFormat::from_name(&val);
    }

    let explicit = std::env::var("CODE_OPTIMIZER_CONFIG").ok();
    let cfg_path = explicit
        .clone()
        .unwrap_or_else(|| ".code-optimizer.json".to_string());
    let text = match std::fs::read_to_string(&cfg_path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && explicit.is_none() => return Ok((cfg, warnings)),
        Err(e) => return Err(e).with_context(|| format!("failed to read config file {cfg_path}")),
    };
    let json: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("invalid JSON in config file {cfg_path}"))?;
    apply_json(&mut cfg, &json, &mut warnings);
    tracing::debug!(path = %cfg_path, "loaded config file");

    Ok((cfg, warnings))
}

fn apply_json(cfg: &mut Config, json: &serde_json::Value, warnings: &mut Vec<String>) {
    if let Some(n) = json.get("max_source_bytes").and_then(|v| v.as_u64()) {
        cfg.max_source_bytes = n as usize;
    }
    if let Some(n) = json.get("max_nesting_depth").and_then(|v| v.as_u64()) {
        cfg.max_nesting_depth = n as usize;
    }
    if let Some(n) = json.get("timeout_ms").and_then(|v| v.as_u64()) {
        cfg.timeout = Duration::from_millis(n);
    }
    if let Some(name) = json.get("log_format").and_then(|v| v.as_str()) {
        cfg.log_format = LogFormat::from_name(name);
    }
    if let Some(globs) = json.get("ignore_globs").and_then(|v| v.as_array()) {
        cfg.ignore_globs = build_globs(globs.iter().filter_map(|v| v.as_str()), warnings);
    }
}

pub fn should_ignore_path(cfg: &Config, path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    let p = std::path::Path::new(path);
    cfg.ignore_globs
        .as_ref()
        .map(|set| set.is_match(p))
        .unwrap_or(false)
}
