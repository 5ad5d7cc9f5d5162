//! Calendar-day keys.
//!
//! Camera recordings live in directories named `YYYYMMDDHH…`; the first eight
//! characters identify the day a directory belongs to. No timestamp metadata
//! is consulted.

use std::fmt;

use chrono::{Local, NaiveDate};
use serde::Serialize;

/// Length of the `YYYYMMDD` prefix.
pub const DAY_KEY_LEN: usize = 8;

/// Day identifier used to bucket recording directories.
///
/// Usually an eight-digit date, but a camera whose clips sit directly under
/// its root is bucketed under the camera's own name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DayKey(String);

impl DayKey {
    /// Key of a recording directory: the first eight characters of its name.
    /// Shorter names are used whole.
    pub fn from_dir_name(name: &str) -> Self {
        DayKey(name.chars().take(DAY_KEY_LEN).collect())
    }

    /// Explicit label, used verbatim.
    pub fn from_label(label: &str) -> Self {
        DayKey(label.to_string())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        DayKey(date.format("%Y%m%d").to_string())
    }

    /// The local calendar day, which cameras are still writing to.
    pub fn today() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
