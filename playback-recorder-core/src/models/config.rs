use serde::{Deserialize, Serialize};

use super::format::{AudioFormat, SampleFormat, DEFAULT_WINDOW_DURATION_SECS};

/// Intended use of the audio session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionCategory {
    Playback,
    Record,
    PlayAndRecord,
}

/// Routing and sharing options requested alongside the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionOptions {
    pub mix_with_others: bool,
    pub allow_bluetooth: bool,
    pub default_to_speaker: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            mix_with_others: true,
            allow_bluetooth: true,
            default_to_speaker: true,
        }
    }
}

/// Configuration for a playing recorder. Fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfiguration {
    /// Duration of one tap window in seconds (default: 0.1).
    pub window_duration_secs: f64,

    /// Format of the delivered microphone data (default: 16 kHz mono i16).
    pub target_format: AudioFormat,

    /// Session category requested on activation (default: play and record).
    pub session_category: SessionCategory,

    /// Session options requested on activation.
    pub session_options: SessionOptions,

    /// Emit windows at wall-clock rate (default: true). Backends that render
    /// faster than real time honor `false`.
    pub realtime_pacing: bool,
}

impl RecorderConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.window_duration_secs > 0.0 && self.window_duration_secs <= 1.0) {
            return Err(format!(
                "window duration must be in (0, 1] seconds, got {}",
                self.window_duration_secs
            ));
        }
        let target = &self.target_format;
        if target.sample_rate <= 0.0 {
            return Err("target sample rate must be positive".into());
        }
        if target.channels == 0 {
            return Err("target channel count must be positive".into());
        }
        if target.sample_format != SampleFormat::Int16 || !target.interleaved {
            return Err("target format must be interleaved 16-bit integer".into());
        }
        if self.frame_capacity() == 0 {
            return Err("window holds no target frames".into());
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| format!("invalid configuration: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Frames per converted chunk: target rate × window duration.
    pub fn frame_capacity(&self) -> usize {
        self.target_format.frames_for(self.window_duration_secs)
    }
}

impl Default for RecorderConfiguration {
    fn default() -> Self {
        Self {
            window_duration_secs: DEFAULT_WINDOW_DURATION_SECS,
            target_format: AudioFormat::TARGET,
            session_category: SessionCategory::PlayAndRecord,
            session_options: SessionOptions::default(),
            realtime_pacing: true,
        }
    }
}
