use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::log_warn;

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct CollectorSettings {
    /// How long a single report key press waits for a second press before
    /// copying the text report.
    pub report_delay_ms: u64,
    /// Host name used in report headings ("NVDA Add-ons").
    pub host_name: String,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            report_delay_ms: 505,
            host_name: "NVDA".into(),
        }
    }
}

impl CollectorSettings {
    pub fn report_delay(&self) -> Duration {
        Duration::from_millis(self.report_delay_ms)
    }
}

pub struct SettingsStore {
    path: Option<PathBuf>,
    data: CollectorSettings,
}

impl SettingsStore {
    /// Load settings from `path`, falling back to defaults when the file is
    /// missing or does not parse.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!("Ignoring unreadable settings in {}: {err}", path.display());
                CollectorSettings::default()
            })
        } else {
            CollectorSettings::default()
        };

        Ok(Self {
            path: Some(path),
            data,
        })
    }

    /// Defaults only; `update` keeps changes in memory.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: CollectorSettings::default(),
        }
    }

    pub fn settings(&self) -> &CollectorSettings {
        &self.data
    }

    pub fn update(&mut self, settings: CollectorSettings) -> Result<()> {
        self.persist(&settings)?;
        self.data = settings;
        Ok(())
    }

    pub fn reload(&mut self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        self.data = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))?;
        Ok(())
    }

    fn persist(&self, data: &CollectorSettings) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write settings to {}", path.display()))
    }
}
