use chrono::{DateTime, Utc};

use crate::error::{CollectorError, CollectorResult};
use crate::models::ApplicationRecord;

/// Build the canonical record for a raw application observation, stamped now.
///
/// `short_name` is the technical module name, `long_name` the product name.
/// See [`normalize_at`] for the resolution rules.
pub fn normalize(
    short_name: Option<&str>,
    long_name: Option<&str>,
    version: Option<&str>,
    is_64bit: Option<bool>,
) -> CollectorResult<ApplicationRecord> {
    normalize_at(short_name, long_name, version, is_64bit, Utc::now())
}

/// Same as [`normalize`] with an explicit observation time.
///
/// - No long name: the title-cased short name, or `InvalidIdentity` when that
///   is missing too.
/// - Long name containing the short name (case-insensitive): the long name.
/// - Otherwise: `"{Short} ({long})"`.
///
/// An empty version is treated as unknown.
pub fn normalize_at(
    short_name: Option<&str>,
    long_name: Option<&str>,
    version: Option<&str>,
    is_64bit: Option<bool>,
    seen_at: DateTime<Utc>,
) -> CollectorResult<ApplicationRecord> {
    let short_name = short_name.filter(|s| !s.is_empty());
    let long_name = long_name.filter(|s| !s.is_empty());

    let name = match (short_name, long_name) {
        (None, None) => return Err(CollectorError::InvalidIdentity),
        (Some(short), None) => title_case(short),
        (None, Some(long)) => long.to_string(),
        (Some(short), Some(long)) => {
            if long.to_lowercase().contains(&short.to_lowercase()) {
                long.to_string()
            } else {
                format!("{} ({})", title_case(short), long)
            }
        }
    };

    let version = version.filter(|v| !v.is_empty()).map(str::to_string);

    Ok(ApplicationRecord::application(name, version, is_64bit, seen_at))
}

/// Upper-case the first character after an uncased one, lower-case the rest.
fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_word = false;

    for c in raw.chars() {
        if in_word {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        in_word = c.is_lowercase() || c.is_uppercase();
    }

    out
}
