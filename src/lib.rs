mod utils;

pub mod collector;
pub mod error;
pub mod gesture;
pub mod host;
pub mod models;
pub mod report;
pub mod settings;

use std::io;
use std::path::PathBuf;

use anyhow::Result;

pub use collector::{normalize, Collector, Observation, RecordStore};
pub use error::{CollectorError, CollectorResult};
pub use host::{AppModuleInfo, HostAdapter, HostEvent, HostSurface, JsonLinesSurface};
pub use models::{AddonExtra, ApplicationRecord, InstalledAddon};
pub use report::Reporter;
pub use settings::{CollectorSettings, SettingsStore};

/// Run the collector over host events read as JSON lines from stdin.
///
/// The optional first argument is the path of a JSON settings file.
pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Version collector starting up...");

    let settings = match std::env::args().nth(1) {
        Some(path) => SettingsStore::new(PathBuf::from(path))?,
        None => SettingsStore::in_memory(),
    };

    let mut adapter = HostAdapter::new(settings.settings(), Collector::new(RecordStore::new()));
    let mut surface = JsonLinesSurface::new(io::stdout().lock());
    adapter.run_lines(io::stdin().lock(), &mut surface)
}
