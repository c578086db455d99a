//! In-memory record cache with identity-based deduplication.
//!
//! Records keep their insertion order for the lifetime of the session; nothing
//! is ever removed. Two dirty flags tell a future save cycle whether new records
//! or only timestamps changed since the last save.

use chrono::Utc;

use crate::error::{CollectorError, CollectorResult};
use crate::log_debug;
use crate::models::ApplicationRecord;

const ENABLE_LOGS: bool = true;

/// What [`RecordStore::observe`] did with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Inserted(usize),
    Refreshed(usize),
}

#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<ApplicationRecord>,
    records_dirty: bool,
    timestamps_dirty: bool,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the first record with the same identity as `record`.
    pub fn lookup(&self, record: &ApplicationRecord) -> Option<usize> {
        self.records.iter().position(|cached| cached == record)
    }

    pub fn contains(&self, record: &ApplicationRecord) -> bool {
        self.lookup(record).is_some()
    }

    /// Append `record` to the cache.
    ///
    /// Unless the caller has already checked, an existing record with the same
    /// identity is reported as `DuplicateRecord` and nothing is added.
    pub fn insert(
        &mut self,
        record: ApplicationRecord,
        already_checked_absent: bool,
    ) -> CollectorResult<usize> {
        if !already_checked_absent && self.contains(&record) {
            return Err(CollectorError::DuplicateRecord { name: record.name });
        }

        log_debug!(
            "Added an {} to the cache: {}.",
            if record.is_addon { "add-on" } else { "app" },
            record.name
        );

        self.records.push(record);
        self.records_dirty = true;
        Ok(self.records.len() - 1)
    }

    /// Refresh the last-seen time of a cached record from a new sighting.
    ///
    /// `known_index` skips the lookup; it must point at a record with the same
    /// identity. A missing first-seen time is backfilled with now.
    pub fn touch(
        &mut self,
        record: &ApplicationRecord,
        known_index: Option<usize>,
    ) -> CollectorResult<()> {
        let index = known_index
            .filter(|&i| self.records.get(i).is_some_and(|cached| cached == record))
            .or_else(|| self.lookup(record))
            .ok_or_else(|| CollectorError::RecordNotFound {
                name: record.name.clone(),
            })?;

        let cached = &mut self.records[index];
        cached.last_seen = record.last_seen;
        if cached.first_seen.is_none() {
            cached.first_seen = Some(Utc::now());
        }
        self.timestamps_dirty = true;
        Ok(())
    }

    /// Insert a never-seen identity or refresh the timestamps of a known one.
    ///
    /// Repeated observations of one identity never grow the cache.
    pub fn observe(&mut self, record: ApplicationRecord) -> CollectorResult<Observation> {
        match self.lookup(&record) {
            Some(index) => {
                self.touch(&record, Some(index))?;
                Ok(Observation::Refreshed(index))
            }
            None => self.insert(record, true).map(Observation::Inserted),
        }
    }

    pub fn get(&self, index: usize) -> Option<&ApplicationRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every record in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ApplicationRecord> + '_ {
        self.records.iter()
    }

    /// Plain applications in insertion order.
    pub fn apps(&self) -> impl Iterator<Item = &ApplicationRecord> + '_ {
        self.records.iter().filter(|record| !record.is_addon)
    }

    /// Add-ons in insertion order.
    pub fn addons(&self) -> impl Iterator<Item = &ApplicationRecord> + '_ {
        self.records.iter().filter(|record| record.is_addon)
    }

    /// New records were added since the last save.
    pub fn records_dirty(&self) -> bool {
        self.records_dirty
    }

    /// Timestamps of existing records changed since the last save.
    pub fn timestamps_dirty(&self) -> bool {
        self.timestamps_dirty
    }

    /// Clear both dirty flags after the caller has saved the cache.
    pub fn mark_saved(&mut self) {
        self.records_dirty = false;
        self.timestamps_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::normalize::normalize_at;
    use crate::models::AddonExtra;
    use chrono::{DateTime, TimeZone};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn app(name: &str, secs: i64) -> ApplicationRecord {
        ApplicationRecord::application(name, Some("1.0".into()), Some(true), at(secs))
    }

    #[test]
    fn test_empty_store() {
        let store = RecordStore::new();

        assert!(store.is_empty());
        assert!(!store.records_dirty());
        assert!(!store.timestamps_dirty());
        assert_eq!(store.lookup(&app("Notepad", 0)), None);
    }

    #[test]
    fn test_observe_twice_keeps_one_record() {
        let mut store = RecordStore::new();

        assert_eq!(store.observe(app("Notepad", 0)).unwrap(), Observation::Inserted(0));
        assert_eq!(store.observe(app("Notepad", 60)).unwrap(), Observation::Refreshed(0));

        assert_eq!(store.len(), 1);
        let cached = store.get(0).unwrap();
        assert_eq!(cached.last_seen, at(60));
        assert_eq!(cached.first_seen, Some(at(0)));
    }

    #[test]
    fn test_first_seen_is_not_overwritten() {
        let mut store = RecordStore::new();
        store.observe(app("Notepad", 0)).unwrap();

        let mut later = app("Notepad", 120);
        later.first_seen = Some(at(100));
        store.observe(later).unwrap();

        assert_eq!(store.get(0).unwrap().first_seen, Some(at(0)));
    }

    #[test]
    fn test_missing_first_seen_is_backfilled() {
        let mut store = RecordStore::new();
        let mut record = app("Notepad", 0);
        record.first_seen = None;
        store.insert(record, false).unwrap();

        store.observe(app("Notepad", 30)).unwrap();

        let cached = store.get(0).unwrap();
        assert!(cached.first_seen.is_some());
        assert_eq!(cached.last_seen, at(30));
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut store = RecordStore::new();
        store.observe(app("Alpha", 0)).unwrap();
        store.observe(app("Beta", 1)).unwrap();
        store.observe(app("Alpha", 2)).unwrap();

        let names: Vec<&str> = store.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_version_change_creates_new_record() {
        let mut store = RecordStore::new();
        store.observe(app("Notepad", 0)).unwrap();

        let mut bumped = app("Notepad", 10);
        bumped.version = Some("2.0".into());
        assert_eq!(store.observe(bumped).unwrap(), Observation::Inserted(1));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_dirty_flags() {
        let mut store = RecordStore::new();

        store.observe(app("Notepad", 0)).unwrap();
        assert!(store.records_dirty());
        assert!(!store.timestamps_dirty());

        store.mark_saved();
        store.observe(app("Notepad", 5)).unwrap();
        assert!(!store.records_dirty());
        assert!(store.timestamps_dirty());

        store.observe(app("Calculator", 6)).unwrap();
        assert!(store.records_dirty());
        assert!(store.timestamps_dirty());
    }

    #[test]
    fn test_unchecked_duplicate_insert_is_rejected() {
        let mut store = RecordStore::new();
        store.insert(app("Notepad", 0), false).unwrap();
        store.mark_saved();

        let err = store.insert(app("Notepad", 10), false).unwrap_err();

        assert_eq!(err, CollectorError::DuplicateRecord { name: "Notepad".into() });
        assert_eq!(store.len(), 1);
        assert!(!store.records_dirty());
    }

    #[test]
    fn test_touch_missing_record_fails_without_side_effects() {
        let mut store = RecordStore::new();
        store.observe(app("Notepad", 0)).unwrap();
        store.mark_saved();

        let err = store.touch(&app("Calculator", 10), None).unwrap_err();

        assert_eq!(err, CollectorError::RecordNotFound { name: "Calculator".into() });
        assert!(!store.timestamps_dirty());
        assert_eq!(store.get(0).unwrap().last_seen, at(0));
    }

    #[test]
    fn test_touch_with_stale_index_falls_back_to_lookup() {
        let mut store = RecordStore::new();
        store.observe(app("Alpha", 0)).unwrap();
        store.observe(app("Beta", 0)).unwrap();

        store.touch(&app("Beta", 50), Some(0)).unwrap();

        assert_eq!(store.get(0).unwrap().last_seen, at(0));
        assert_eq!(store.get(1).unwrap().last_seen, at(50));
    }

    #[test]
    fn test_partitions_filter_by_addon_flag() {
        let mut store = RecordStore::new();
        store.observe(app("Notepad", 0)).unwrap();
        store.observe(ApplicationRecord::addon(
            "Clip Contents",
            Some("2.0".into()),
            AddonExtra {
                internal_id: "clipContentsDesigner".into(),
                author: "Noelia Ruiz".into(),
                enabled: true,
            },
            at(1),
        ))
        .unwrap();
        store.observe(app("Calculator", 2)).unwrap();

        let apps: Vec<&str> = store.apps().map(|r| r.name.as_str()).collect();
        let addons: Vec<&str> = store.addons().map(|r| r.name.as_str()).collect();
        assert_eq!(apps, vec!["Notepad", "Calculator"]);
        assert_eq!(addons, vec!["Clip Contents"]);

        // Views are restartable.
        assert_eq!(store.apps().count(), 2);
    }

    #[test]
    fn test_explorer_scenario() {
        let mut store = RecordStore::new();
        let observe = |store: &mut RecordStore, secs| {
            let record = normalize_at(
                Some("explorer"),
                Some("Windows Explorer"),
                Some("10.0.19041"),
                Some(true),
                at(secs),
            )
            .unwrap();
            store.observe(record).unwrap()
        };

        observe(&mut store, 0);
        observe(&mut store, 45);

        assert_eq!(store.len(), 1);
        let cached = store.get(0).unwrap();
        assert_eq!(cached.name, "Windows Explorer");
        assert_eq!(cached.version.as_deref(), Some("10.0.19041"));
        assert_eq!(cached.last_seen, at(45));
        assert_eq!(cached.first_seen, Some(at(0)));
    }
}
