use std::{
    fs,
    path::Path,
};

use anyhow::Context;
use serde::Deserialize;

use crate::schedule::{DailySchedule, Granularity};

pub const DEFAULT_CONFIG_FILE: &str = "scheduler.toml";
const ENV_PREFIX: &str = "SCHEDULER__";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    pub port: u16,
    pub day_start: String,
    pub day_end: String,
    pub granularity: Granularity,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".into(),
            port: 8080,
            day_start: "09:00".into(),
            day_end: "17:00".into(),
            granularity: Granularity::Hourly,
            log_filter: "info".into(),
        }
    }
}

/// Shape of `scheduler.toml`; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    bind_addr: Option<String>,
    port: Option<u16>,
    day_start: Option<String>,
    day_end: Option<String>,
    granularity: Option<Granularity>,
    log_filter: Option<String>,
}

impl Settings {
    /// Builds the fixed daily schedule these settings describe
    pub fn schedule(&self) -> crate::Result<DailySchedule> {
        DailySchedule::from_bounds(&self.day_start, &self.day_end, self.granularity)
    }

    fn apply_file(&mut self, file_cfg: FileSettings) {
        if let Some(v) = file_cfg.bind_addr {
            self.bind_addr = v;
        }
        if let Some(v) = file_cfg.port {
            self.port = v;
        }
        if let Some(v) = file_cfg.day_start {
            self.day_start = v;
        }
        if let Some(v) = file_cfg.day_end {
            self.day_end = v;
        }
        if let Some(v) = file_cfg.granularity {
            self.granularity = v;
        }
        if let Some(v) = file_cfg.log_filter {
            self.log_filter = v;
        }
    }

    /// Applies `SCHEDULER__*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(v) = var("BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Some(v) = var("PORT") {
            self.port = v
                .parse()
                .with_context(|| format!("{ENV_PREFIX}PORT must be a port number, got '{v}'"))?;
        }
        if let Some(v) = var("DAY_START") {
            self.day_start = v;
        }
        if let Some(v) = var("DAY_END") {
            self.day_end = v;
        }
        if let Some(v) = var("GRANULARITY") {
            self.granularity = match v.as_str() {
                "hourly" => Granularity::Hourly,
                "half-hour" => Granularity::HalfHour,
                other => anyhow::bail!("{ENV_PREFIX}GRANULARITY must be 'hourly' or 'half-hour', got '{other}'"),
            };
        }
        if let Some(v) = var("LOG_FILTER") {
            self.log_filter = v;
        }
        Ok(())
    }
}

/// Loads settings: defaults, then the TOML file, then environment variables.
///
/// An explicitly named file must exist; the default `scheduler.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match path {
        Some(p) => (p, true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
            settings.apply_file(file_cfg);
        }
        Err(err) if required || err.kind() != std::io::ErrorKind::NotFound => {
            return Err(err).with_context(|| format!("failed to read config file '{}'", path.display()));
        }
        Err(_) => {}
    }

    settings.apply_env(|key| std::env::var(key).ok())?;
    Ok(settings)
}
