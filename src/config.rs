use serde::{Deserialize, Serialize};
use crate::error::{MergeError, Result};

/// Top-level configuration, optionally loaded from a TOML file.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MergeConfig {
    /// External concatenation engine settings.
    #[serde(default)]
    pub ffmpeg: FfmpegConfig,
    /// Input tree scanning settings.
    #[serde(default)]
    pub scan: ScanConfig,
}

/// How the ffmpeg concat demuxer is invoked.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FfmpegConfig {
    /// Executable name (resolved through `PATH`) or absolute path.
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Codec the audio streams are re-encoded to.
    /// Camera audio (pcm_alaw) cannot be stream-copied into mp4.
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,
    #[serde(default = "default_loglevel")]
    pub loglevel: String,
    /// Pass `-y` so an existing day file is replaced.
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
    /// Appended after the codec options, before the target path.
    #[serde(default = "default_extra_args")]
    pub extra_args: Vec<String>,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            audio_codec: default_audio_codec(),
            loglevel: default_loglevel(),
            overwrite: default_overwrite(),
            extra_args: default_extra_args(),
        }
    }
}

/// Input tree scanning parameters.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScanConfig {
    /// Clip file extension, without the leading dot.
    #[serde(default = "default_video_extension")]
    pub video_extension: String,
    /// Entry names skipped everywhere (NAS / Finder metadata).
    #[serde(default = "default_ignored_names")]
    pub ignored_names: Vec<String>,
    /// Never delete source directories after a successful merge.
    #[serde(default)]
    pub keep_sources: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            video_extension: default_video_extension(),
            ignored_names: default_ignored_names(),
            keep_sources: false,
        }
    }
}

impl ScanConfig {
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored_names.iter().any(|n| n == name)
    }
}

fn default_binary() -> String { "ffmpeg".into() }
fn default_audio_codec() -> String {
    if cfg!(windows) { "flac".into() } else { "aac".into() }
}
fn default_loglevel() -> String { "quiet".into() }
fn default_overwrite() -> bool { true }
fn default_extra_args() -> Vec<String> { vec!["-strict".into(), "-2".into()] }
fn default_video_extension() -> String { "mp4".into() }
fn default_ignored_names() -> Vec<String> { vec![".DS_Store".into(), "@eaDir".into()] }

impl MergeConfig {
    /// Load configuration from a TOML file at `path`.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MergeError::Config(format!("Cannot read config file: {e}")))?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: MergeConfig = toml::from_str(content)
            .map_err(|e| MergeError::Config(format!("Invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ffmpeg.binary.trim().is_empty() {
            return Err(MergeError::Config("ffmpeg.binary must not be empty".into()));
        }
        if self.ffmpeg.audio_codec.trim().is_empty() {
            return Err(MergeError::Config("ffmpeg.audio_codec must not be empty".into()));
        }
        if self.scan.video_extension.is_empty() {
            return Err(MergeError::Config("scan.video_extension must not be empty".into()));
        }
        if self.scan.video_extension.starts_with('.') {
            return Err(MergeError::Config(
                "scan.video_extension must not start with '.'".into(),
            ));
        }
        Ok(())
    }
}
