//! Application and add-on records kept by the record cache.
//!
//! A record's identity is its `(name, version, is_native_width_64, is_addon)`
//! tuple. Timestamps and the add-on payload ride along but never take part in
//! equality, so a version bump produces a second record rather than
//! overwriting the first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CollectorError, CollectorResult};

/// Host-side details carried by add-on records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddonExtra {
    /// The add-on's internal identifier, as opposed to its display summary.
    pub internal_id: String,
    pub author: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub name: String,
    pub version: Option<String>,
    pub is_native_width_64: Option<bool>,
    pub last_seen: DateTime<Utc>,
    pub first_seen: Option<DateTime<Utc>>,
    pub is_addon: bool,
    pub extra: Option<AddonExtra>,
}

impl ApplicationRecord {
    /// A plain application record first and last seen at `seen_at`.
    pub fn application(
        name: impl Into<String>,
        version: Option<String>,
        is_native_width_64: Option<bool>,
        seen_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            is_native_width_64,
            last_seen: seen_at,
            first_seen: Some(seen_at),
            is_addon: false,
            extra: None,
        }
    }

    /// An add-on record. Add-ons always report as the non-64-bit class.
    pub fn addon(
        name: impl Into<String>,
        version: Option<String>,
        extra: AddonExtra,
        seen_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            is_native_width_64: Some(false),
            last_seen: seen_at,
            first_seen: Some(seen_at),
            is_addon: true,
            extra: Some(extra),
        }
    }

    /// Whether this add-on is currently enabled in the host.
    pub fn is_addon_enabled(&self) -> CollectorResult<bool> {
        if !self.is_addon {
            return Err(CollectorError::InvalidAccessor {
                field: "isAddonEnabled",
                name: self.name.clone(),
                reason: "record is not an add-on",
            });
        }

        self.extra
            .as_ref()
            .map(|extra| extra.enabled)
            .ok_or_else(|| CollectorError::InvalidAccessor {
                field: "isAddonEnabled",
                name: self.name.clone(),
                reason: "add-on carries no host details",
            })
    }
}

impl PartialEq for ApplicationRecord {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.version == other.version
            && self.is_native_width_64 == other.is_native_width_64
            && self.is_addon == other.is_addon
    }
}

impl Eq for ApplicationRecord {}
