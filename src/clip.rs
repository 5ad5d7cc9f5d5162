// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Video clip discovery and ordering.
//!
//! Cameras name their clips `<prefix>_<n>.mp4`; `n` is the only ordering key
//! within a day.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{MergeError, Result};

/// A located clip and its parsed sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoClip {
    pub path: PathBuf,
    pub sequence: Option<u64>,
}

impl VideoClip {
    pub fn new(path: PathBuf) -> Self {
        let sequence = sequence_number(&path);
        Self { path, sequence }
    }
}

/// Parse the trailing `_`-delimited numeric token of a file stem.
///
/// `a_10.mp4` → `Some(10)`, `clip.mp4` → `None`, `00_12_x.mp4` → `None`.
/// Only unsigned values that fit in a `u64` are accepted; a negative or
/// wider suffix yields `None`.
pub fn sequence_number(path: &Path) -> Option<u64> {
    let stem = path.file_stem()?.to_str()?;
    stem.rsplit('_').next()?.parse().ok()
}

/// Collect the clips placed directly inside `dir` (non-recursive).
/// The extension is compared case-insensitively.
pub fn collect_clips(dir: &Path, extension: &str) -> Result<Vec<VideoClip>> {
    let mut clips = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(extension))
            .unwrap_or(false);
        if matches {
            clips.push(VideoClip::new(path));
        }
    }
    Ok(clips)
}

/// Sort clips ascending by sequence number (numeric, not lexicographic).
///
/// Fails on the first clip without a sequence number: its position in the
/// day cannot be determined.
pub fn order_clips(mut clips: Vec<VideoClip>) -> Result<Vec<VideoClip>> {
    if let Some(bad) = clips.iter().find(|c| c.sequence.is_none()) {
        warn!(clip = ?bad.path, "Clip name carries no sequence number");
        return Err(MergeError::UnorderedClip { path: bad.path.clone() });
    }
    // Ties are not expected within a day; break them by path for stable output.
    clips.sort_by(|a, b| a.sequence.cmp(&b.sequence).then_with(|| a.path.cmp(&b.path)));
    Ok(clips)
}
