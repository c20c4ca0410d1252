use super::format::{AudioFormat, SampleFormat};

/// Interleaved raw samples in their native representation.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowSamples {
    Int16(Vec<i16>),
    Float32(Vec<f32>),
}

impl WindowSamples {
    pub fn sample_format(&self) -> SampleFormat {
        match self {
            Self::Int16(_) => SampleFormat::Int16,
            Self::Float32(_) => SampleFormat::Float32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Int16(s) => s.len(),
            Self::Float32(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalized f32 value of the sample at `index`.
    ///
    /// Integer samples are scaled by 1/32768 so full scale maps to [-1.0, 1.0).
    pub fn sample_f32(&self, index: usize) -> f32 {
        match self {
            Self::Int16(s) => s[index] as f32 / 32_768.0,
            Self::Float32(s) => s[index],
        }
    }

    /// Copy of the samples in `[start, end)`, keeping the representation.
    pub fn slice(&self, start: usize, end: usize) -> Self {
        match self {
            Self::Int16(s) => Self::Int16(s[start..end].to_vec()),
            Self::Float32(s) => Self::Float32(s[start..end].to_vec()),
        }
    }
}

/// One fixed-size slice of raw frames pulled from the audio graph.
///
/// Owned by the tap for the duration of one callback; never buffered across
/// windows.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureWindow {
    pub format: AudioFormat,
    pub samples: WindowSamples,
}

impl CaptureWindow {
    pub fn new(format: AudioFormat, samples: WindowSamples) -> Self {
        Self { format, samples }
    }

    pub fn frame_count(&self) -> usize {
        let channels = self.format.channels.max(1) as usize;
        self.samples.len() / channels
    }

    /// First channel as normalized f32, one sample per frame. Borrows the
    /// window; nothing is copied.
    pub fn first_channel(&self) -> impl Iterator<Item = f32> + '_ {
        let channels = self.format.channels.max(1) as usize;
        (0..self.frame_count()).map(move |frame| self.samples.sample_f32(frame * channels))
    }
}

/// One window converted to the target format (16-bit little-endian PCM).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConvertedChunk {
    bytes: Vec<u8>,
    frame_count: usize,
}

impl ConvertedChunk {
    /// Encode mono/interleaved i16 samples with `channels` samples per frame.
    pub fn from_samples(samples: &[i16], channels: u16) -> Self {
        let mut bytes = Vec::with_capacity(samples.len() * 2);
        for sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        Self {
            bytes,
            frame_count: samples.len() / channels.max(1) as usize,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A stored audio asset decoded into raw interleaved frames.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAsset {
    pub format: AudioFormat,
    pub samples: WindowSamples,
}

impl DecodedAsset {
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.format.channels.max(1) as usize
    }

    pub fn duration_secs(&self) -> f64 {
        if self.format.sample_rate <= 0.0 {
            return 0.0;
        }
        self.frame_count() as f64 / self.format.sample_rate
    }
}
