//! Validated scalar values stored on a task.

use super::TaskDomainError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Canonical task description: trimmed, lowercased and non-empty.
///
/// Descriptions compare case-insensitively because the stored form is
/// always lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskDescription(String);

impl TaskDescription {
    /// Creates a canonical description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyDescription`] when the value is empty
    /// after trimming.
    pub fn new(value: impl AsRef<str>) -> Result<Self, TaskDomainError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyDescription);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Returns the description as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskDescription {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for TaskDescription {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskDescription> for String {
    fn from(description: TaskDescription) -> Self {
        description.0
    }
}

impl fmt::Display for TaskDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Task due date normalised to a UTC instant.
///
/// Serialises as RFC 3339 with millisecond precision and a `Z` suffix, for
/// example `2026-01-31T00:00:00.000Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DueDate(DateTime<Utc>);

impl DueDate {
    const NAIVE_DATE_TIME_FORMATS: [&'static str; 2] =
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    /// Parses a raw due date.
    ///
    /// Accepts RFC 3339 timestamps (converted to UTC), date-times without an
    /// offset (interpreted as UTC) and bare `YYYY-MM-DD` dates (UTC
    /// midnight).
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidDueDate`] when no accepted format
    /// matches.
    pub fn parse(raw: &str) -> Result<Self, TaskDomainError> {
        let value = raw.trim();
        if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
            return Ok(Self::from_datetime(instant.with_timezone(&Utc)));
        }
        for format in Self::NAIVE_DATE_TIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
                return Ok(Self::from_datetime(naive.and_utc()));
            }
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Self::from_datetime(naive.and_utc()))
            .ok_or_else(|| TaskDomainError::InvalidDueDate(raw.to_owned()))
    }

    /// Wraps an existing instant, truncated to millisecond precision.
    #[must_use]
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        Self(instant.trunc_subsecs(3))
    }

    /// Returns the wrapped instant.
    #[must_use]
    pub const fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Returns the canonical string form.
    #[must_use]
    pub fn to_canonical_string(self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl Serialize for DueDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical_string())
    }
}

impl<'de> Deserialize<'de> for DueDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
