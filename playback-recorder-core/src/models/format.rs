use serde::{Deserialize, Serialize};

/// Sample rate of the delivered microphone data.
pub const TARGET_SAMPLE_RATE: f64 = 16_000.0;

/// Channel count of the delivered microphone data.
pub const TARGET_CHANNELS: u16 = 1;

/// Duration of one capture window in seconds.
pub const DEFAULT_WINDOW_DURATION_SECS: f64 = 0.1;

/// Sample representation of a PCM stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    Int16,
    Float32,
}

impl SampleFormat {
    pub fn bits_per_sample(self) -> u16 {
        match self {
            Self::Int16 => 16,
            Self::Float32 => 32,
        }
    }

    pub fn bytes_per_sample(self) -> u16 {
        self.bits_per_sample() / 8
    }
}

/// Description of a PCM sample stream.
///
/// Used both for the fixed output format and for the native format a source
/// window arrives in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFormat {
    pub sample_rate: f64,
    pub channels: u16,
    pub sample_format: SampleFormat,
    pub interleaved: bool,
}

impl AudioFormat {
    /// 16 kHz, mono, 16-bit signed integer, interleaved.
    pub const TARGET: AudioFormat = AudioFormat {
        sample_rate: TARGET_SAMPLE_RATE,
        channels: TARGET_CHANNELS,
        sample_format: SampleFormat::Int16,
        interleaved: true,
    };

    pub fn new(sample_rate: f64, channels: u16, sample_format: SampleFormat) -> Self {
        Self {
            sample_rate,
            channels,
            sample_format,
            interleaved: true,
        }
    }

    /// Same rate and sample representation, reduced to one channel.
    pub fn to_mono(self) -> Self {
        Self {
            channels: 1,
            ..self
        }
    }

    /// Whole frames that fit in `duration_secs` at this format's rate.
    ///
    /// Truncates, so a window never covers more than `duration_secs`. The
    /// epsilon absorbs float error such as `4409.9999` for 44.1 kHz.
    pub fn frames_for(&self, duration_secs: f64) -> usize {
        (self.sample_rate * duration_secs + 1e-9).floor() as usize
    }

    pub fn stream_description(&self) -> StreamDescription {
        let bytes_per_sample = self.sample_format.bytes_per_sample() as u32;
        // Non-interleaved buffers describe a single channel per frame.
        let bytes_per_frame = if self.interleaved {
            bytes_per_sample * self.channels as u32
        } else {
            bytes_per_sample
        };
        StreamDescription {
            sample_rate: self.sample_rate,
            format_id: "lpcm".into(),
            format_flags: FormatFlags {
                is_float: matches!(self.sample_format, SampleFormat::Float32),
                is_signed_integer: matches!(self.sample_format, SampleFormat::Int16),
                is_packed: true,
                is_non_interleaved: !self.interleaved,
            },
            bytes_per_packet: bytes_per_frame,
            frames_per_packet: 1,
            bytes_per_frame,
            channels_per_frame: self.channels as u32,
            bits_per_channel: self.sample_format.bits_per_sample() as u32,
        }
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::TARGET
    }
}

/// Flags of a linear PCM stream description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatFlags {
    pub is_float: bool,
    pub is_signed_integer: bool,
    pub is_packed: bool,
    pub is_non_interleaved: bool,
}

/// Structural, packet-oriented description of a PCM stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDescription {
    pub sample_rate: f64,
    pub format_id: String,
    pub format_flags: FormatFlags,
    pub bytes_per_packet: u32,
    pub frames_per_packet: u32,
    pub bytes_per_frame: u32,
    pub channels_per_frame: u32,
    pub bits_per_channel: u32,
}
