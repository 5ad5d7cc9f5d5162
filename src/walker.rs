// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Camera walker: every child of the input root is one camera's tree.

use std::path::Path;

use tracing::{info, warn};

use crate::engine::ConcatEngine;
use crate::error::{MergeError, Result};
use crate::merger::DayMerger;
use crate::report::MergeReport;

/// Run the day merger once per camera directory under `input_root`.
///
/// A non-directory entry is reported and skipped; it does not stop the other
/// cameras. Cameras are visited in name order.
pub fn merge_cameras<E: ConcatEngine>(
    merger: &DayMerger<E>,
    input_root: &Path,
    output_root: &Path,
) -> Result<MergeReport> {
    if !input_root.is_dir() {
        return Err(MergeError::InvalidInput { path: input_root.to_path_buf() });
    }

    let mut cameras: Vec<_> = std::fs::read_dir(input_root)?
        .map(|entry| entry.map(|e| (e.file_name().to_string_lossy().into_owned(), e.path())))
        .collect::<std::io::Result<_>>()?;
    cameras.sort();

    let mut report = MergeReport::new();
    for (name, path) in cameras {
        if merger.scan_config().is_ignored(&name) {
            continue;
        }
        info!(camera = name, "Merging camera recordings");
        match merger.merge_dirs(&path, output_root, &name, "") {
            Ok(r) => report.absorb(r),
            Err(MergeError::InvalidInput { path }) => {
                warn!(path = ?path, "Skipping non-directory entry in input root");
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        merged = report.merged.len(),
        planned = report.planned.len(),
        failed = report.failed.len(),
        skipped = report.skipped,
        clips = report.total_clips(),
        "All cameras processed"
    );
    Ok(report)
}
