//! Play-list files for the ffmpeg concat demuxer.
//!
//! One directive per line, no trailing newline:
//!
//! ```text
//! file /abs/path/cam1/2021051001/00_1.mp4
//! file /abs/path/cam1/2021051002/00_2.mp4
//! ```

use std::path::{Path, PathBuf};

use crate::clip::VideoClip;
use crate::error::Result;

pub const DIRECTIVE: &str = "file ";

/// Play-list file name for `day` inside the merge output directory.
pub fn playlist_name(day: &str) -> String {
    format!("{day}_video_list.txt")
}

/// Absolute path of `path` with forward-slash separators.
pub fn absolute_slash_path(path: &Path) -> Result<String> {
    let resolved = std::fs::canonicalize(path)?;
    let text = resolved.to_string_lossy().replace('\\', "/");
    // Windows verbatim prefix is not understood by the concat demuxer.
    Ok(text.strip_prefix("//?/").map(str::to_string).unwrap_or(text))
}

/// Render the play-list body for already ordered clips.
pub fn render(clips: &[VideoClip]) -> Result<String> {
    let lines = clips
        .iter()
        .map(|c| absolute_slash_path(&c.path).map(|p| format!("{DIRECTIVE}{p}")))
        .collect::<Result<Vec<_>>>()?;
    Ok(lines.join("\n"))
}

/// Write the play-list for `clips` to `path`.
pub fn write_playlist(path: &Path, clips: &[VideoClip]) -> Result<()> {
    std::fs::write(path, render(clips)?)?;
    Ok(())
}

/// Clip paths listed in a play-list, in order.
pub fn read_entries(path: &Path) -> Result<Vec<PathBuf>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| PathBuf::from(l.strip_prefix(DIRECTIVE).unwrap_or(l)))
        .collect())
}

/// Parent directories of every listed clip, first occurrence order, no duplicates.
pub fn source_dirs(path: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    for clip in read_entries(path)? {
        if let Some(parent) = clip.parent() {
            if !dirs.iter().any(|d| d == parent) {
                dirs.push(parent.to_path_buf());
            }
        }
    }
    Ok(dirs)
}
