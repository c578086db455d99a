//! Glue between the accessibility host and the collector.
//!
//! The host feeds [`HostEvent`]s in one at a time; anything user-visible goes
//! back out through a [`HostSurface`]. [`HostAdapter::run_lines`] drives the
//! whole thing from a JSON-lines stream for standalone use.

use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::collector::Collector;
use crate::gesture::{ReportAction, ReportGesture};
use crate::models::InstalledAddon;
use crate::report::{self, Reporter};
use crate::settings::CollectorSettings;
use crate::{log_debug, log_info, log_warn};

const ENABLE_LOGS: bool = true;

const REPORT_FAILED_MESSAGE: &str = "Could not build the application version report.";

/// What the host knows about the foreground process's app module.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppModuleInfo {
    pub app_name: Option<String>,
    pub product_name: Option<String>,
    pub product_version: Option<String>,
    #[serde(rename = "is64BitProcess")]
    pub is_64bit_process: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostEvent {
    AppSwitch(AppModuleInfo),
    StartupCompleted {
        #[serde(default)]
        foreground: Option<AppModuleInfo>,
        #[serde(default)]
        addons: Vec<InstalledAddon>,
    },
    AddonsEnumerated {
        addons: Vec<InstalledAddon>,
    },
    ReportKeyPress {
        at_ms: u64,
    },
    Tick {
        at_ms: u64,
    },
    ShowState {
        #[serde(default)]
        message: Option<String>,
    },
}

/// The host's clipboard and presentation facilities.
pub trait HostSurface {
    fn copy_to_clipboard(&mut self, text: &str) -> Result<()>;
    fn show_browseable(&mut self, content: &str, title: &str) -> Result<()>;
    fn announce(&mut self, message: &str) -> Result<()>;
}

/// Writes every surface action as one JSON object per line.
pub struct JsonLinesSurface<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, value: serde_json::Value) -> Result<()> {
        serde_json::to_writer(&mut self.out, &value)?;
        self.out.write_all(b"\n")?;
        self.out.flush().context("failed to flush host surface output")
    }
}

impl<W: Write> HostSurface for JsonLinesSurface<W> {
    fn copy_to_clipboard(&mut self, text: &str) -> Result<()> {
        self.emit(json!({ "action": "copyToClipboard", "text": text }))
    }

    fn show_browseable(&mut self, content: &str, title: &str) -> Result<()> {
        self.emit(json!({ "action": "showBrowseable", "title": title, "content": content }))
    }

    fn announce(&mut self, message: &str) -> Result<()> {
        self.emit(json!({ "action": "announce", "message": message }))
    }
}

pub struct HostAdapter {
    collector: Collector,
    reporter: Reporter,
    gesture: ReportGesture,
}

impl HostAdapter {
    pub fn new(settings: &CollectorSettings, collector: Collector) -> Self {
        Self {
            collector,
            reporter: Reporter::new(settings.host_name.clone()),
            gesture: ReportGesture::new(settings.report_delay()),
        }
    }

    pub fn collector(&self) -> &Collector {
        &self.collector
    }

    /// Mutable access for the save cycle, which clears the dirty flags.
    pub fn collector_mut(&mut self) -> &mut Collector {
        &mut self.collector
    }

    pub fn handle_event(&mut self, event: HostEvent, surface: &mut dyn HostSurface) -> Result<()> {
        match event {
            HostEvent::AppSwitch(info) => {
                self.observe_app(&info);
            }
            HostEvent::StartupCompleted { foreground, addons } => {
                log_debug!("Collecting the initial app and {} add-ons.", addons.len());
                if let Some(info) = foreground {
                    self.observe_app(&info);
                }
                self.collector.on_addons_enumerated(&addons);
            }
            HostEvent::AddonsEnumerated { addons } => {
                let added = self.collector.on_addons_enumerated(&addons);
                log_debug!("{added} of {} add-ons were new to the cache.", addons.len());
            }
            HostEvent::ReportKeyPress { at_ms } => {
                let at = Duration::from_millis(at_ms);
                if let Some(action) = self.gesture.poll(at) {
                    self.perform(action, surface)?;
                }
                if let Some(action) = self.gesture.press(at) {
                    self.perform(action, surface)?;
                }
            }
            HostEvent::Tick { at_ms } => {
                if let Some(action) = self.gesture.poll(Duration::from_millis(at_ms)) {
                    self.perform(action, surface)?;
                }
            }
            HostEvent::ShowState { message } => {
                let dump = report::state_dump(self.collector.store(), message.as_deref());
                surface.show_browseable(&dump, report::STATE_REPORT_TITLE)?;
            }
        }
        Ok(())
    }

    /// Parse and handle one JSON line. Malformed lines are logged and skipped.
    pub fn handle_line(&mut self, line: &str, surface: &mut dyn HostSurface) -> Result<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        match serde_json::from_str::<HostEvent>(line) {
            Ok(event) => self.handle_event(event, surface),
            Err(err) => {
                log_warn!("Skipping malformed host event ({err}): {line}");
                Ok(())
            }
        }
    }

    /// Handle every line of `input`. Lines that are not UTF-8 are logged and
    /// skipped; only read failures end the session early.
    pub fn run_lines<R: BufRead>(
        &mut self,
        mut input: R,
        surface: &mut dyn HostSurface,
    ) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = input
                .read_until(b'\n', &mut buf)
                .context("failed to read host event")?;
            if read == 0 {
                break;
            }

            match std::str::from_utf8(&buf) {
                Ok(line) => self.handle_line(line, surface)?,
                Err(err) => {
                    log_warn!("Skipping host event that is not valid UTF-8 ({err})");
                }
            }
        }

        let store = self.collector.store();
        log_info!(
            "Event stream ended with {} apps and {} add-ons cached (records dirty: {}, dates dirty: {})",
            store.apps().count(),
            store.addons().count(),
            store.records_dirty(),
            store.timestamps_dirty()
        );
        Ok(())
    }

    fn observe_app(&mut self, info: &AppModuleInfo) {
        self.collector.on_application_observed(
            info.app_name.as_deref(),
            info.product_name.as_deref(),
            info.product_version.as_deref(),
            info.is_64bit_process,
        );
    }

    fn perform(&self, action: ReportAction, surface: &mut dyn HostSurface) -> Result<()> {
        let store = self.collector.store();
        let rendered = match action {
            ReportAction::CopyText => self.reporter.text_report(store),
            ReportAction::ShowHtml => self.reporter.html_report(store),
        };

        let content = match rendered {
            Ok(content) => content,
            Err(err) => {
                log_warn!("Failed to build the version report: {err}");
                return surface.announce(REPORT_FAILED_MESSAGE);
            }
        };

        match action {
            ReportAction::CopyText => {
                surface.copy_to_clipboard(&content)?;
                surface.announce(report::COPIED_MESSAGE)
            }
            ReportAction::ShowHtml => surface.show_browseable(&content, report::HTML_REPORT_TITLE),
        }
    }
}
