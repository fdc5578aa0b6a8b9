/// Domain models for the application
use crate::errors::ApiError;
use crate::utils::parse_instant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// One launch as normalized from the upstream feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub id: String,
    pub name: String,
    pub flight_number: Option<u32>,
    pub date_utc: String,
    /// `None` while the outcome is unknown or the launch is pending
    pub success: Option<bool>,
    pub launchpad: String,
    pub patch_image_url: Option<String>,
}

impl LaunchRecord {
    /// Parsed launch instant, `None` when `date_utc` is not a valid timestamp
    pub fn launch_time(&self) -> Option<DateTime<Utc>> {
        parse_instant(&self.date_utc)
    }
}

/// Launch collections exposed by the upstream API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchCategory {
    All,
    Past,
    Upcoming,
    Latest,
    Next,
}

impl LaunchCategory {
    /// Path segment under `/launches/`; the full collection has an empty segment
    pub fn path(self) -> &'static str {
        match self {
            LaunchCategory::All => "",
            LaunchCategory::Past => "past",
            LaunchCategory::Upcoming => "upcoming",
            LaunchCategory::Latest => "latest",
            LaunchCategory::Next => "next",
        }
    }
}

impl fmt::Display for LaunchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchCategory::All => f.write_str("all"),
            other => f.write_str(other.path()),
        }
    }
}

impl FromStr for LaunchCategory {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(LaunchCategory::All),
            "past" => Ok(LaunchCategory::Past),
            "upcoming" => Ok(LaunchCategory::Upcoming),
            "latest" => Ok(LaunchCategory::Latest),
            "next" => Ok(LaunchCategory::Next),
            other => Err(ApiError::InvalidInput(format!(
                "unknown launch category '{}'",
                other
            ))),
        }
    }
}

/// Outcome filter selected on the history panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCriterion {
    #[default]
    All,
    Success,
    Failed,
}

impl FilterCriterion {
    pub fn matches(self, record: &LaunchRecord) -> bool {
        match self {
            FilterCriterion::All => true,
            FilterCriterion::Success => record.success == Some(true),
            FilterCriterion::Failed => record.success == Some(false),
        }
    }
}

impl FromStr for FilterCriterion {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(FilterCriterion::All),
            "success" => Ok(FilterCriterion::Success),
            "failed" => Ok(FilterCriterion::Failed),
            other => Err(ApiError::InvalidInput(format!("unknown filter '{}'", other))),
        }
    }
}

/// Day/hour/minute/second split of a non-negative millisecond delta
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeRemaining {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeRemaining {
    pub fn from_millis(delta: u64) -> Self {
        Self {
            days: delta / MS_PER_DAY,
            hours: (delta % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (delta % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (delta % MS_PER_MINUTE) / MS_PER_SECOND,
        }
    }

    /// Milliseconds covered by the whole units; sub-second remainder is dropped
    #[cfg(test)]
    pub fn as_millis(&self) -> u64 {
        self.days * MS_PER_DAY
            + self.hours * MS_PER_HOUR
            + self.minutes * MS_PER_MINUTE
            + self.seconds * MS_PER_SECOND
    }
}

/// Result of the next-launch selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "launch", rename_all = "snake_case")]
pub enum NextLaunch {
    /// A launch taken from the upstream feed
    Real(LaunchRecord),
    /// Placeholder shown when the feed has nothing far enough ahead
    Synthetic(LaunchRecord),
}

impl NextLaunch {
    pub fn record(&self) -> &LaunchRecord {
        match self {
            NextLaunch::Real(record) | NextLaunch::Synthetic(record) => record,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, NextLaunch::Synthetic(_))
    }
}

/// Status badge shown on a mission card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    Standby,
    Success,
    Failed,
}

impl MissionStatus {
    pub fn of(record: &LaunchRecord, upcoming: bool) -> Self {
        if upcoming {
            return MissionStatus::Standby;
        }
        match record.success {
            Some(true) => MissionStatus::Success,
            Some(false) => MissionStatus::Failed,
            // Unknown outcome is not a failure; matches the filters, which
            // leave pending records out of both outcome views
            None => MissionStatus::Standby,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MissionStatus::Standby => ">> STANDBY",
            MissionStatus::Success => "SUCCESS",
            MissionStatus::Failed => "FAILED",
        }
    }
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub now: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(success: Option<bool>) -> LaunchRecord {
        LaunchRecord {
            id: "5eb87cd9ffd86e000604b32a".to_string(),
            name: "FalconSat".to_string(),
            flight_number: Some(1),
            date_utc: "2006-03-24T22:30:00.000Z".to_string(),
            success,
            launchpad: "5e9e4502f5090995de566f86".to_string(),
            patch_image_url: None,
        }
    }

    #[test]
    fn test_time_remaining_example() {
        let remaining = TimeRemaining::from_millis(90_000_500);
        assert_eq!(
            remaining,
            TimeRemaining {
                days: 1,
                hours: 1,
                minutes: 0,
                seconds: 0
            }
        );
    }

    #[test]
    fn test_time_remaining_reconstructs_within_a_second() {
        let samples = [
            0,
            1,
            999,
            1_000,
            59_999,
            60_000,
            3_599_999,
            3_600_000,
            86_399_999,
            86_400_000,
            90_000_500,
            123_456_789,
            9_876_543_210,
        ];
        for delta in samples {
            let rebuilt = TimeRemaining::from_millis(delta).as_millis();
            assert!(rebuilt <= delta, "delta {}", delta);
            assert!(rebuilt + 999 >= delta, "delta {}", delta);
        }

        let mut delta = 7;
        while delta < 400 * MS_PER_DAY {
            let rebuilt = TimeRemaining::from_millis(delta).as_millis();
            assert!(rebuilt <= delta && delta - rebuilt < MS_PER_SECOND);
            delta = delta * 3 + 11;
        }
    }

    #[test]
    fn test_time_remaining_units_stay_in_range() {
        let remaining = TimeRemaining::from_millis(MS_PER_DAY - 1);
        assert_eq!(
            remaining,
            TimeRemaining {
                days: 0,
                hours: 23,
                minutes: 59,
                seconds: 59
            }
        );
    }

    #[test]
    fn test_filter_predicates() {
        assert!(FilterCriterion::All.matches(&record(None)));
        assert!(FilterCriterion::Success.matches(&record(Some(true))));
        assert!(!FilterCriterion::Success.matches(&record(None)));
        assert!(FilterCriterion::Failed.matches(&record(Some(false))));
        assert!(!FilterCriterion::Failed.matches(&record(None)));
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("Success".parse::<FilterCriterion>().unwrap(), FilterCriterion::Success);
        assert_eq!("".parse::<FilterCriterion>().unwrap(), FilterCriterion::All);
        assert!("pending".parse::<FilterCriterion>().is_err());
    }

    #[test]
    fn test_category_paths() {
        assert_eq!(LaunchCategory::All.path(), "");
        assert_eq!("all".parse::<LaunchCategory>().unwrap(), LaunchCategory::All);
        assert_eq!("next".parse::<LaunchCategory>().unwrap(), LaunchCategory::Next);
        assert_eq!(LaunchCategory::Upcoming.to_string(), "upcoming");
        assert!("rockets".parse::<LaunchCategory>().is_err());
    }

    #[test]
    fn test_mission_status() {
        assert_eq!(MissionStatus::of(&record(Some(true)), true), MissionStatus::Standby);
        assert_eq!(MissionStatus::of(&record(Some(true)), false).label(), "SUCCESS");
        assert_eq!(MissionStatus::of(&record(Some(false)), false).label(), "FAILED");
        assert_eq!(MissionStatus::of(&record(None), false), MissionStatus::Standby);
    }

    #[test]
    fn test_next_launch_serializes_kind() {
        let next = NextLaunch::Synthetic(record(None));
        let json = serde_json::to_value(&next).unwrap();
        assert_eq!(json["kind"], "synthetic");
        assert_eq!(json["launch"]["name"], "FalconSat");
        assert!(next.is_synthetic());
    }
}
