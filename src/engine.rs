//! External concatenation engine.
//!
//! The merger only needs "concatenate the clips listed in this play-list into
//! that file". `FfmpegEngine` does it with the concat demuxer:
//!
//! ```text
//! ffmpeg -loglevel quiet -y -f concat -safe 0 -i <list> -c:v copy -c:a aac -strict -2 <target>
//! ```
//!
//! Video is stream-copied; audio is re-encoded because camera audio codecs
//! are not accepted by the mp4 muxer.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::config::FfmpegConfig;
use crate::error::{MergeError, Result};

/// Concatenates the media listed in a play-list file into one output file.
///
/// Implementations must block until the output is complete and return an
/// error if it was not produced.
pub trait ConcatEngine {
    fn concat(&self, playlist: &Path, target: &Path) -> Result<()>;
}

/// Runs the ffmpeg binary as a child process.
pub struct FfmpegEngine {
    config: FfmpegConfig,
}

impl FfmpegEngine {
    pub fn new(config: FfmpegConfig) -> Self {
        Self { config }
    }

    /// Build the full command line for one merge.
    pub fn command(&self, playlist: &Path, target: &Path) -> Command {
        let mut cmd = Command::new(&self.config.binary);
        cmd.args(["-loglevel", self.config.loglevel.as_str()]);
        if self.config.overwrite {
            cmd.arg("-y");
        }
        cmd.args(["-f", "concat", "-safe", "0", "-i"])
            .arg(playlist)
            .args(["-c:v", "copy", "-c:a", self.config.audio_codec.as_str()])
            .args(&self.config.extra_args)
            .arg(target)
            .stdin(Stdio::null());
        cmd
    }
}

impl ConcatEngine for FfmpegEngine {
    fn concat(&self, playlist: &Path, target: &Path) -> Result<()> {
        let day = target
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut cmd = self.command(playlist, target);
        debug!(command = ?cmd, "Invoking ffmpeg");

        let output = cmd.output().map_err(|e| MergeError::MergeInvocation {
            day: day.clone(),
            reason: format!("cannot run '{}': {e}", self.config.binary),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MergeError::MergeInvocation {
                day,
                reason: format!("ffmpeg exited with {}: {}", output.status, stderr.trim()),
            });
        }

        info!(output = ?target, "ffmpeg merge complete");
        Ok(())
    }
}
