//! Output encoding parameters.
//!
//! Reels are short, low-bitrate and mono so encodes stay fast and files stay
//! small enough to download over a phone connection.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default video codec (H.264)
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
/// Default audio codec
pub const DEFAULT_AUDIO_CODEC: &str = "aac";
/// Default encoding preset
pub const DEFAULT_PRESET: &str = "ultrafast";
/// Default pixel format, required for broad mp4 player support
pub const DEFAULT_PIX_FMT: &str = "yuv420p";
/// Default target and max video bitrate
pub const DEFAULT_VIDEO_BITRATE: &str = "500k";
/// Default rate-control buffer size
pub const DEFAULT_BUFSIZE: &str = "1000k";
/// Default audio bitrate
pub const DEFAULT_AUDIO_BITRATE: &str = "64k";
/// Default audio channel count (mono)
pub const DEFAULT_AUDIO_CHANNELS: u8 = 1;
/// Default output frame rate
pub const DEFAULT_FPS: u32 = 15;

/// Video encoding configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EncodingConfig {
    #[serde(default = "default_video_codec")]
    pub codec: String,

    #[serde(default = "default_preset")]
    pub preset: String,

    #[serde(default = "default_pix_fmt")]
    pub pix_fmt: String,

    /// Target video bitrate (`-b:v`)
    #[serde(default = "default_video_bitrate")]
    pub video_bitrate: String,

    /// Peak video bitrate (`-maxrate`)
    #[serde(default = "default_video_bitrate")]
    pub max_rate: String,

    #[serde(default = "default_bufsize")]
    pub bufsize: String,

    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,

    #[serde(default = "default_audio_channels")]
    pub audio_channels: u8,

    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Stop at the shortest mapped stream
    #[serde(default = "default_true")]
    pub shortest: bool,

    /// Additional FFmpeg output arguments
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_video_codec() -> String {
    DEFAULT_VIDEO_CODEC.to_string()
}
fn default_preset() -> String {
    DEFAULT_PRESET.to_string()
}
fn default_pix_fmt() -> String {
    DEFAULT_PIX_FMT.to_string()
}
fn default_video_bitrate() -> String {
    DEFAULT_VIDEO_BITRATE.to_string()
}
fn default_bufsize() -> String {
    DEFAULT_BUFSIZE.to_string()
}
fn default_audio_codec() -> String {
    DEFAULT_AUDIO_CODEC.to_string()
}
fn default_audio_bitrate() -> String {
    DEFAULT_AUDIO_BITRATE.to_string()
}
fn default_audio_channels() -> u8 {
    DEFAULT_AUDIO_CHANNELS
}
fn default_fps() -> u32 {
    DEFAULT_FPS
}
fn default_true() -> bool {
    true
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            codec: default_video_codec(),
            preset: default_preset(),
            pix_fmt: default_pix_fmt(),
            video_bitrate: default_video_bitrate(),
            max_rate: default_video_bitrate(),
            bufsize: default_bufsize(),
            audio_codec: default_audio_codec(),
            audio_bitrate: default_audio_bitrate(),
            audio_channels: default_audio_channels(),
            fps: default_fps(),
            shortest: true,
            extra_args: Vec::new(),
        }
    }
}

impl EncodingConfig {
    /// Convert to FFmpeg output arguments.
    pub fn to_ffmpeg_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.shortest {
            args.push("-shortest".to_string());
        }

        args.extend_from_slice(&[
            "-c:v".to_string(),
            self.codec.clone(),
            "-c:a".to_string(),
            self.audio_codec.clone(),
            "-pix_fmt".to_string(),
            self.pix_fmt.clone(),
            "-b:v".to_string(),
            self.video_bitrate.clone(),
            "-maxrate".to_string(),
            self.max_rate.clone(),
            "-bufsize".to_string(),
            self.bufsize.clone(),
            "-b:a".to_string(),
            self.audio_bitrate.clone(),
            "-ac".to_string(),
            self.audio_channels.to_string(),
            "-r".to_string(),
            self.fps.to_string(),
            "-preset".to_string(),
            self.preset.clone(),
        ]);

        args.extend(self.extra_args.clone());

        args
    }
}
