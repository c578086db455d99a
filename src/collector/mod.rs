//! Event-facing side of the record cache.
//!
//! The [`Collector`] owns the [`RecordStore`] and turns host notifications into
//! store observations. Failures for a single notification are logged and
//! dropped; they never reach the host and never touch the store.

pub mod normalize;
pub mod store;

pub use normalize::{normalize, normalize_at};
pub use store::{Observation, RecordStore};

use chrono::{DateTime, Utc};

use crate::models::{ApplicationRecord, InstalledAddon};
use crate::{log_debug, log_warn};

const ENABLE_LOGS: bool = true;

pub struct Collector {
    store: RecordStore,
    /// The foreground application from the previous switch notification.
    current_app: Option<ApplicationRecord>,
}

impl Collector {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            current_app: None,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Mutable access for the save cycle, which clears the dirty flags.
    pub fn store_mut(&mut self) -> &mut RecordStore {
        &mut self.store
    }

    pub fn current_app(&self) -> Option<&ApplicationRecord> {
        self.current_app.as_ref()
    }

    pub fn on_application_observed(
        &mut self,
        short_name: Option<&str>,
        long_name: Option<&str>,
        version: Option<&str>,
        is_64bit: Option<bool>,
    ) -> Option<Observation> {
        self.on_application_observed_at(short_name, long_name, version, is_64bit, Utc::now())
    }

    /// Record a foreground-application switch.
    ///
    /// Returns `None` when the notification was dropped, either because it did
    /// not identify an application or because the foreground app did not change.
    pub fn on_application_observed_at(
        &mut self,
        short_name: Option<&str>,
        long_name: Option<&str>,
        version: Option<&str>,
        is_64bit: Option<bool>,
        seen_at: DateTime<Utc>,
    ) -> Option<Observation> {
        let record = match normalize_at(short_name, long_name, version, is_64bit, seen_at) {
            Ok(record) => record,
            Err(err) => {
                log_debug!(
                    "Couldn't get module info for {:?}/{:?} ({err}).",
                    short_name,
                    long_name
                );
                return None;
            }
        };

        if self.current_app.as_ref() == Some(&record) {
            return None;
        }
        self.current_app = Some(record.clone());

        self.observe_logged(record)
    }

    pub fn on_addons_enumerated(&mut self, addons: &[InstalledAddon]) -> usize {
        self.on_addons_enumerated_at(addons, Utc::now())
    }

    /// Record every installed add-on as if it had just been seen.
    ///
    /// Returns how many add-ons were new to the cache.
    pub fn on_addons_enumerated_at(
        &mut self,
        addons: &[InstalledAddon],
        seen_at: DateTime<Utc>,
    ) -> usize {
        addons
            .iter()
            .filter_map(|addon| self.observe_logged(addon.to_record(seen_at)))
            .filter(|observation| matches!(observation, Observation::Inserted(_)))
            .count()
    }

    fn observe_logged(&mut self, record: ApplicationRecord) -> Option<Observation> {
        let name = record.name.clone();
        match self.store.observe(record) {
            Ok(observation) => Some(observation),
            Err(err) => {
                log_warn!("Failed to record {name}: {err}");
                None
            }
        }
    }
}
