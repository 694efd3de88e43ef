use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

const NULL_MARKER: &str = "null";

/// A calendar month (year + month, day pinned to the 1st) or the unset/open state.
///
/// The unset state is what `Default` returns, so a missing JSON field deserializes to it
/// when the field is marked `#[serde(default)]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MonthDate(Option<NaiveDate>);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0:?} is not a valid month date (expected MM-YYYY)")]
pub struct MonthDateFormatError(String);

impl MonthDate {
    pub fn new(year: i32, month: u32) -> Result<MonthDate, MonthDateFormatError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|date| Self(Some(date)))
            .ok_or_else(|| MonthDateFormatError(format!("{:02}-{:04}", month, year)))
    }

    pub fn unset() -> MonthDate {
        Self(None)
    }

    /// Parses the `MM-YYYY` wire form. An empty string or the `null` literal is the unset state.
    pub fn parse(text: &str) -> Result<MonthDate, MonthDateFormatError> {
        if text.is_empty() || text == NULL_MARKER {
            return Ok(Self::unset());
        }

        let invalid = || MonthDateFormatError(text.to_string());
        let bytes = text.as_bytes();
        let is_well_shaped = bytes.len() == 7
            && bytes[2] == b'-'
            && bytes[..2].iter().all(u8::is_ascii_digit)
            && bytes[3..].iter().all(u8::is_ascii_digit);

        if !is_well_shaped {
            return Err(invalid());
        }

        let month: u32 = text[..2].parse().map_err(|_| invalid())?;
        let year: i32 = text[3..].parse().map_err(|_| invalid())?;

        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Self::new(year, month).map_err(|_| invalid())
    }

    pub fn is_unset(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_naive_date(&self) -> Option<NaiveDate> {
        self.0
    }

    /// Orders two set months. Unset values have no ordering, so `None` is returned when
    /// either side is unset.
    pub fn try_cmp(&self, other: &MonthDate) -> Option<Ordering> {
        match (self.0, other.0) {
            (Some(left), Some(right)) => Some(left.cmp(&right)),
            _ => None,
        }
    }

    /// Inclusive number of calendar months from `self` to `until`.
    ///
    /// Returns `None` when either side is unset or `until` is before `self`.
    pub fn months_between(&self, until: &MonthDate) -> Option<i64> {
        let (from, until) = (self.0?, until.0?);
        let months = i64::from(until.year() - from.year()) * 12 + i64::from(until.month())
            - i64::from(from.month())
            + 1;

        if months < 1 {
            return None;
        }

        Some(months)
    }
}

impl From<NaiveDate> for MonthDate {
    fn from(date: NaiveDate) -> Self {
        Self(date.with_day(1))
    }
}

impl From<Option<NaiveDate>> for MonthDate {
    fn from(date: Option<NaiveDate>) -> Self {
        date.map(MonthDate::from).unwrap_or_default()
    }
}

impl fmt::Display for MonthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(date) => write!(f, "{:02}-{:04}", date.month(), date.year()),
            None => f.write_str(NULL_MARKER),
        }
    }
}

impl Serialize for MonthDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(_) => serializer.collect_str(self),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for MonthDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => MonthDate::parse(&text).map_err(serde::de::Error::custom),
            None => Ok(MonthDate::unset()),
        }
    }
}
