// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Day merger: turns one camera's recording tree into one video per day.
//!
//! For each directory level:
//!  1. Bucket the children by day (see [`crate::grouping`]).
//!  2. For every day, gather the clips sitting directly in its directories.
//!  3. A day with no clips whose directories hold sub-directories is one
//!     level too shallow (day → hour → clips): recurse into it with the day
//!     as the parent label.
//!  4. Otherwise order the clips, write a play-list next to the target,
//!     run the [`ConcatEngine`] and, only if it succeeded, delete the
//!     directories the clips came from.
//!
//! Output layout: `{output_root}/{camera}/{parent_label}/{day}.mp4`.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::clip::{self, VideoClip};
use crate::config::ScanConfig;
use crate::day::DayKey;
use crate::engine::ConcatEngine;
use crate::error::{MergeError, Result};
use crate::grouping;
use crate::playlist;
use crate::report::{FailedDay, MergeReport, MergedDay};

pub struct DayMerger<E> {
    engine: E,
    scan: ScanConfig,
    /// Day excluded everywhere; fixed for the whole run.
    today: DayKey,
    dry_run: bool,
}

impl<E: ConcatEngine> DayMerger<E> {
    pub fn new(engine: E, scan: ScanConfig, today: DayKey) -> Self {
        Self { engine, scan, today, dry_run: false }
    }

    /// Plan only: no directories, play-lists, engine runs or deletions.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn scan_config(&self) -> &ScanConfig {
        &self.scan
    }

    pub fn today(&self) -> &DayKey {
        &self.today
    }

    /// Merge every complete day found under `source`.
    ///
    /// Returns [`MergeError::InvalidInput`] without touching the filesystem if
    /// `source` is not a directory. Per-day merge failures are recorded in the
    /// report; only scan-phase I/O errors are returned.
    pub fn merge_dirs(
        &self,
        source: &Path,
        output_root: &Path,
        camera_label: &str,
        parent_label: &str,
    ) -> Result<MergeReport> {
        if !source.is_dir() {
            error!(path = ?source, "Not a directory");
            return Err(MergeError::InvalidInput { path: source.to_path_buf() });
        }

        if !self.dry_run && !output_root.exists() {
            info!(path = ?output_root, "Output directory missing, creating it");
            std::fs::create_dir_all(output_root)?;
        }

        let buckets = grouping::group_by_day(
            source,
            &DayKey::from_label(camera_label),
            &self.today,
            &self.scan,
        )?;
        info!(camera = camera_label, dir = ?source, days = buckets.len(), "Grouped by day");

        let mut report = MergeReport::new();
        for (day, nodes) in buckets {
            let mut clips: Vec<VideoClip> = Vec::new();
            for node in &nodes {
                clips.extend(clip::collect_clips(node, &self.scan.video_extension)?);
            }
            info!(camera = camera_label, day = %day, sources = nodes.len(), clips = clips.len(), "Day scanned");

            if clips.is_empty() {
                let mut recursed = false;
                for node in &nodes {
                    // A compatibility bucket is `source` itself; descending would loop.
                    if node.as_path() == source {
                        continue;
                    }
                    if grouping::has_subdirectories(node, &self.scan)? {
                        info!(camera = camera_label, day = %day, dir = ?node, "No clips at this level, descending");
                        report.absorb(self.merge_dirs(node, output_root, camera_label, day.as_str())?);
                        recursed = true;
                    }
                }
                if !recursed {
                    info!(camera = camera_label, day = %day, "Nothing to merge");
                    report.skipped += 1;
                }
                continue;
            }

            match self.merge_day(&day, clips, output_root, camera_label, parent_label) {
                Ok(merged) if self.dry_run => report.planned.push(merged),
                Ok(merged) => report.merged.push(merged),
                Err(e) => {
                    error!(camera = camera_label, day = %day, error = %e, "Day not merged, sources kept");
                    report.failed.push(FailedDay {
                        camera: camera_label.to_string(),
                        day,
                        error: e.to_string(),
                    });
                }
            }
        }
        Ok(report)
    }

    fn merge_day(
        &self,
        day: &DayKey,
        clips: Vec<VideoClip>,
        output_root: &Path,
        camera_label: &str,
        parent_label: &str,
    ) -> Result<MergedDay> {
        let clips = clip::order_clips(clips)?;
        let merge_dir = merge_output_dir(output_root, camera_label, parent_label);
        let target = merge_dir.join(format!("{day}.{}", self.scan.video_extension));
        let merged = MergedDay {
            camera: camera_label.to_string(),
            day: day.clone(),
            output: target.clone(),
            clips: clips.len(),
        };

        if self.dry_run {
            info!(camera = camera_label, day = %day, clips = clips.len(), output = ?target, "Would merge");
            return Ok(merged);
        }

        std::fs::create_dir_all(&merge_dir)?;
        let list_path = merge_dir.join(playlist::playlist_name(day.as_str()));
        playlist::write_playlist(&list_path, &clips)?;
        info!(camera = camera_label, day = %day, clips = clips.len(), playlist = ?list_path, "Play-list written");

        let had_output = target.exists();
        match self.engine.concat(&list_path, &target) {
            Ok(()) => {
                if self.scan.keep_sources {
                    info!(day = %day, "Keeping source directories");
                } else {
                    self.remove_sources(&list_path, &merge_dir);
                }
                remove_playlist(&list_path);
                info!(camera = camera_label, day = %day, output = ?target, "Day merged");
                Ok(merged)
            }
            Err(e) => {
                remove_playlist(&list_path);
                if had_output {
                    warn!(output = ?target, "Merge failed, previous output left in place");
                } else if target.exists() {
                    warn!(output = ?target, "Removing partial output");
                    if let Err(e) = std::fs::remove_file(&target) {
                        warn!(output = ?target, error = %e, "Failed to remove partial output");
                    }
                }
                Err(e)
            }
        }
    }

    /// Delete the directories the play-list's clips live in. Best-effort.
    fn remove_sources(&self, list_path: &Path, merge_dir: &Path) {
        let dirs = match playlist::source_dirs(list_path) {
            Ok(dirs) => dirs,
            Err(e) => {
                warn!(playlist = ?list_path, error = %e, "Cannot read play-list back, sources kept");
                return;
            }
        };
        let merge_dir = std::fs::canonicalize(merge_dir).unwrap_or_else(|_| merge_dir.to_path_buf());

        for dir in dirs {
            if !dir.exists() {
                continue;
            }
            if merge_dir.starts_with(&dir) {
                warn!(dir = ?dir, "Source directory contains the merge output, not removing");
                continue;
            }
            info!(dir = ?dir, "Removing merged source directory");
            if let Err(e) = std::fs::remove_dir_all(&dir) {
                warn!(dir = ?dir, error = %e, "Failed to remove source directory");
            }
        }
    }
}

/// `{output_root}/{camera}/{parent_label}`; an empty label collapses to the camera directory.
pub fn merge_output_dir(output_root: &Path, camera_label: &str, parent_label: &str) -> PathBuf {
    let dir = output_root.join(camera_label);
    if parent_label.is_empty() {
        dir
    } else {
        dir.join(parent_label)
    }
}

fn remove_playlist(path: &Path) {
    info!(playlist = ?path, "Removing play-list");
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(playlist = ?path, error = %e, "Failed to remove play-list");
        }
    }
}
