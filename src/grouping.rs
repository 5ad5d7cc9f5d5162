// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Day grouping — buckets the children of one directory level by calendar day.
//!
//! ```text
//! cam1/
//!   2021051001/  ─┐
//!   2021051002/  ─┴─ 20210510
//!   2021051101/  ─── 20210511
//! ```
//!
//! If the level holds loose files instead, the whole directory becomes a
//! single bucket keyed by the caller's label (compatibility path). Scanning
//! stops at the first such file, so date directories sorting after it are
//! not bucketed at this level.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::ScanConfig;
use crate::day::DayKey;
use crate::error::{MergeError, Result};

/// Day → source directories contributing clips to that day, ascending by day.
pub type DayBuckets = BTreeMap<DayKey, Vec<PathBuf>>;

/// Whether `dir` has at least one direct child directory (ignored names excluded).
pub fn has_subdirectories(dir: &Path, scan: &ScanConfig) -> Result<bool> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() && !scan.is_ignored(&entry.file_name().to_string_lossy()) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Bucket the immediate children of `dir` by day.
///
/// `today` is never present in the result: that day is still being recorded.
/// Children are visited in name order.
pub fn group_by_day(
    dir: &Path,
    compat_label: &DayKey,
    today: &DayKey,
    scan: &ScanConfig,
) -> Result<DayBuckets> {
    if !dir.is_dir() {
        return Err(MergeError::InvalidInput { path: dir.to_path_buf() });
    }

    let mut children: Vec<(String, PathBuf)> = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| (e.file_name().to_string_lossy().into_owned(), e.path())))
        .collect::<std::io::Result<_>>()?;
    children.sort();

    let mut buckets = DayBuckets::new();
    for (name, path) in children {
        if scan.is_ignored(&name) {
            continue;
        }
        if path.is_file() {
            debug!(dir = ?dir, file = name, label = %compat_label, "Loose file, bucketing whole directory");
            buckets.insert(compat_label.clone(), vec![dir.to_path_buf()]);
            break;
        }
        if !path.is_dir() {
            continue;
        }
        buckets.entry(DayKey::from_dir_name(&name)).or_default().push(path);
    }

    if buckets.remove(today).is_some() {
        debug!(dir = ?dir, day = %today, "Skipping current day");
    }
    Ok(buckets)
}
