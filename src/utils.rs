/// Utility functions
use crate::domain::LaunchRecord;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Launchpad id of Kennedy Space Center LC-39A
pub const KSC_LC39A_ID: &str = "5e9e4502f509094188566f88";

/// Image shown for missions without a patch
pub const DEFAULT_PATCH_URL: &str = "https://www.spacex.com/static/images/share.jpg";

/// Parse an ISO-8601 instant; naive timestamps are read as UTC
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }
    None
}

/// Human readable site for the hero footer
pub fn launch_site_label(record: &LaunchRecord) -> &str {
    if record.launchpad == KSC_LC39A_ID {
        "KSC LC-39A"
    } else if record.id.is_empty() && !record.launchpad.is_empty() {
        // placeholder records carry their site as text
        &record.launchpad
    } else {
        "Starbase TX"
    }
}

/// Patch image for a mission card
pub fn patch_or_default(record: &LaunchRecord) -> &str {
    record
        .patch_image_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_PATCH_URL)
}
