// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Run summary.

use std::path::PathBuf;

use serde::Serialize;

use crate::day::DayKey;

/// One (camera, day) merge that was produced or, in a dry run, planned.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MergedDay {
    pub camera: String,
    pub day: DayKey,
    pub output: PathBuf,
    pub clips: usize,
}

/// A (camera, day) whose sources were retained because merging failed.
#[derive(Debug, Clone, Serialize)]
pub struct FailedDay {
    pub camera: String,
    pub day: DayKey,
    pub error: String,
}

#[derive(Debug, Default, Serialize)]
pub struct MergeReport {
    pub merged: Vec<MergedDay>,
    pub planned: Vec<MergedDay>,
    pub failed: Vec<FailedDay>,
    /// Day buckets with no clips and nothing to recurse into.
    pub skipped: usize,
}

impl MergeReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a sub-run's results into this one.
    pub fn absorb(&mut self, other: MergeReport) {
        self.merged.extend(other.merged);
        self.planned.extend(other.planned);
        self.failed.extend(other.failed);
        self.skipped += other.skipped;
    }

    /// True when no day failed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total_clips(&self) -> usize {
        self.merged.iter().map(|m| m.clips).sum()
    }
}
