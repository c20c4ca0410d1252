//! WAV asset decoding via `hound`.

use std::path::Path;

use hound::{SampleFormat as WavSampleFormat, WavReader};

use playback_recorder_core::models::error::AssetError;
use playback_recorder_core::models::format::{AudioFormat, SampleFormat};
use playback_recorder_core::models::window::{DecodedAsset, WindowSamples};
use playback_recorder_core::traits::file_reader::AudioFileReader;

/// Decodes RIFF/WAV files into interleaved frames.
///
/// 16-bit integer and 32-bit float files keep their representation. 8-bit
/// integer files are widened to 16 bits; 24/32-bit integer files are
/// normalized to f32.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavFileReader;

impl AudioFileReader for WavFileReader {
    fn read(&self, path: &Path) -> Result<DecodedAsset, AssetError> {
        let reader = WavReader::open(path)
            .map_err(|e| AssetError::Open(format!("{}: {}", path.display(), e)))?;
        let spec = reader.spec();
        if spec.channels == 0 || spec.sample_rate == 0 {
            return Err(AssetError::UnsupportedFormat(format!(
                "{} Hz / {} ch",
                spec.sample_rate, spec.channels
            )));
        }

        let samples = match (spec.sample_format, spec.bits_per_sample) {
            (WavSampleFormat::Int, 16) => WindowSamples::Int16(
                reader
                    .into_samples::<i16>()
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| AssetError::Decode(e.to_string()))?,
            ),
            (WavSampleFormat::Int, 8) => WindowSamples::Int16(
                reader
                    .into_samples::<i8>()
                    .map(|s| s.map(|v| (v as i16) << 8))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| AssetError::Decode(e.to_string()))?,
            ),
            (WavSampleFormat::Int, bits @ (24 | 32)) => {
                let scale = 1.0 / (1u64 << (bits - 1)) as f32;
                WindowSamples::Float32(
                    reader
                        .into_samples::<i32>()
                        .map(|s| s.map(|v| v as f32 * scale))
                        .collect::<Result<Vec<_>, _>>()
                        .map_err(|e| AssetError::Decode(e.to_string()))?,
                )
            }
            (WavSampleFormat::Float, 32) => WindowSamples::Float32(
                reader
                    .into_samples::<f32>()
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| AssetError::Decode(e.to_string()))?,
            ),
            (format, bits) => {
                return Err(AssetError::UnsupportedFormat(format!(
                    "{:?} {}-bit",
                    format, bits
                )))
            }
        };

        let sample_format = match samples {
            WindowSamples::Int16(_) => SampleFormat::Int16,
            WindowSamples::Float32(_) => SampleFormat::Float32,
        };
        let asset = DecodedAsset {
            format: AudioFormat::new(spec.sample_rate as f64, spec.channels, sample_format),
            samples,
        };

        log::info!(
            "decoded {}: {:.2}s, {} Hz, {} ch, {:?}",
            path.display(),
            asset.duration_secs(),
            spec.sample_rate,
            spec.channels,
            sample_format
        );
        Ok(asset)
    }
}
