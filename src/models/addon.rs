use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{AddonExtra, ApplicationRecord};

/// An add-on as enumerated by the host at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstalledAddon {
    /// The manifest summary shown to users.
    pub display_name: String,
    #[serde(default)]
    pub version: Option<String>,
    pub internal_id: String,
    #[serde(default)]
    pub author: String,
    pub enabled: bool,
}

impl InstalledAddon {
    pub fn to_record(&self, seen_at: DateTime<Utc>) -> ApplicationRecord {
        ApplicationRecord::addon(
            self.display_name.clone(),
            self.version.clone().filter(|v| !v.is_empty()),
            AddonExtra {
                internal_id: self.internal_id.clone(),
                author: self.author.clone(),
                enabled: self.enabled,
            },
            seen_at,
        )
    }
}
