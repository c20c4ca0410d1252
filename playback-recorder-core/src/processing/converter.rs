use crate::models::error::ConversionError;
use crate::models::format::{AudioFormat, SampleFormat};
use crate::models::window::{CaptureWindow, ConvertedChunk, WindowSamples};
use crate::traits::sample_converter::SampleConverter;

/// Default sample converter: channel mapping, linear-interpolation
/// resampling and 16-bit quantization.
///
/// Stateless, so every window converts independently of the ones before it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearSampleConverter;

impl SampleConverter for LinearSampleConverter {
    fn convert(
        &self,
        window: &CaptureWindow,
        target: &AudioFormat,
        frame_capacity: usize,
    ) -> Result<ConvertedChunk, ConversionError> {
        let source = &window.format;
        if source.sample_rate <= 0.0 || source.channels == 0 {
            return Err(ConversionError::UnsupportedFormat(format!(
                "source {} Hz / {} ch",
                source.sample_rate, source.channels
            )));
        }
        if target.sample_format != SampleFormat::Int16 || !target.interleaved {
            return Err(ConversionError::UnsupportedFormat(
                "target must be interleaved 16-bit integer".into(),
            ));
        }
        if window.samples.sample_format() != source.sample_format {
            return Err(ConversionError::UnsupportedFormat(format!(
                "{:?} samples tagged as {:?}",
                window.samples.sample_format(),
                source.sample_format
            )));
        }
        if window.samples.is_empty() {
            return Ok(ConvertedChunk::default());
        }

        let produced_frames = output_frames(
            window.frame_count(),
            source.sample_rate,
            target.sample_rate,
            frame_capacity,
        );
        if produced_frames > frame_capacity {
            return Err(ConversionError::CapacityExceeded {
                produced: produced_frames,
                capacity: frame_capacity,
            });
        }

        // Integer passthrough keeps samples bit-exact.
        if let WindowSamples::Int16(samples) = &window.samples {
            if same_rate(source.sample_rate, target.sample_rate) && source.channels == target.channels {
                return Ok(ConvertedChunk::from_samples(samples, target.channels));
            }
        }

        let channels = map_channels(window, target.channels)?;
        let mut planes = Vec::with_capacity(channels.len());
        for plane in &channels {
            planes.push(resample(plane, source.sample_rate, target.sample_rate, produced_frames));
        }

        let mut interleaved = Vec::with_capacity(produced_frames * planes.len());
        for frame in 0..produced_frames {
            for plane in &planes {
                interleaved.push(quantize(plane[frame]));
            }
        }
        Ok(ConvertedChunk::from_samples(&interleaved, target.channels))
    }
}

fn same_rate(a: f64, b: f64) -> bool {
    (a - b).abs() < 0.01
}

/// Output frame count for a window of `frames` source frames.
///
/// A window spanning the whole chunk duration fills the chunk exactly, even
/// when the source rate does not divide into it (11025 Hz windows hold
/// 1102.5 frames' worth of time). Shorter windows scale by the rate ratio.
pub(crate) fn output_frames(
    frames: usize,
    source_rate: f64,
    target_rate: f64,
    frame_capacity: usize,
) -> usize {
    let full_window = (frame_capacity as f64 * source_rate / target_rate + 1e-9).floor() as usize;
    if frames == full_window {
        return frame_capacity;
    }
    resampled_len(frames, source_rate, target_rate)
}

/// Output frame count for `frames` resampled between the two rates.
pub(crate) fn resampled_len(frames: usize, source_rate: f64, target_rate: f64) -> usize {
    if same_rate(source_rate, target_rate) {
        return frames;
    }
    (frames as f64 * target_rate / source_rate).round() as usize
}

/// Split the window into one normalized plane per target channel.
///
/// Mono targets average all source channels; mono sources are duplicated
/// into every target channel; otherwise channel counts must match.
fn map_channels(window: &CaptureWindow, target_channels: u16) -> Result<Vec<Vec<f32>>, ConversionError> {
    let source_channels = window.format.channels as usize;
    let target_channels = target_channels as usize;
    let frames = window.frame_count();
    let samples = &window.samples;

    if target_channels == 1 {
        let scale = 1.0 / source_channels as f32;
        let mono = (0..frames)
            .map(|frame| {
                let base = frame * source_channels;
                (0..source_channels).map(|ch| samples.sample_f32(base + ch)).sum::<f32>() * scale
            })
            .collect();
        return Ok(vec![mono]);
    }

    if source_channels == 1 {
        let mono: Vec<f32> = (0..frames).map(|frame| samples.sample_f32(frame)).collect();
        return Ok(vec![mono; target_channels]);
    }

    if source_channels != target_channels {
        return Err(ConversionError::UnsupportedFormat(format!(
            "cannot map {} channels to {}",
            source_channels, target_channels
        )));
    }

    Ok((0..target_channels)
        .map(|ch| {
            (0..frames)
                .map(|frame| samples.sample_f32(frame * source_channels + ch))
                .collect()
        })
        .collect())
}

/// Linear interpolation resampling of one channel into exactly `output_count`
/// samples.
pub(crate) fn resample(samples: &[f32], source_rate: f64, target_rate: f64, output_count: usize) -> Vec<f32> {
    if same_rate(source_rate, target_rate) || samples.is_empty() {
        let mut out = samples.to_vec();
        out.resize(output_count, 0.0);
        return out;
    }

    let ratio = target_rate / source_rate;
    let mut output = vec![0.0f32; output_count];
    for (i, sample) in output.iter_mut().enumerate() {
        let source_index = i as f64 / ratio;
        let index = source_index as usize;
        let fraction = (source_index - index as f64) as f32;

        if index + 1 < samples.len() {
            *sample = samples[index] * (1.0 - fraction) + samples[index + 1] * fraction;
        } else if let Some(last) = samples.last() {
            *sample = samples.get(index).copied().unwrap_or(*last);
        }
    }
    output
}

/// Normalized f32 to i16, clamping out-of-range values.
pub(crate) fn quantize(sample: f32) -> i16 {
    (sample * 32_768.0).round().clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(format: AudioFormat, samples: WindowSamples) -> CaptureWindow {
        CaptureWindow::new(format, samples)
    }

    fn decode(chunk: &ConvertedChunk) -> Vec<i16> {
        chunk
            .as_bytes()
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect()
    }

    #[test]
    fn int16_target_rate_is_passthrough() {
        let samples: Vec<i16> = (0..1600).map(|i| (i % 200) as i16 - 100).collect();
        let src = window(AudioFormat::TARGET, WindowSamples::Int16(samples.clone()));

        let chunk = LinearSampleConverter.convert(&src, &AudioFormat::TARGET, 1600).unwrap();

        assert_eq!(chunk.len(), 3200);
        assert_eq!(chunk.frame_count(), 1600);
        assert_eq!(decode(&chunk), samples);
    }

    #[test]
    fn cd_rate_window_fills_one_chunk() {
        let src = window(
            AudioFormat::new(44_100.0, 1, SampleFormat::Float32),
            WindowSamples::Float32(vec![0.25; 4410]),
        );

        let chunk = LinearSampleConverter.convert(&src, &AudioFormat::TARGET, 1600).unwrap();

        assert_eq!(chunk.frame_count(), 1600);
        assert_eq!(chunk.len(), 3200);
        assert!(decode(&chunk).iter().all(|&s| s == 8192));
    }

    #[test]
    fn stereo_float_is_downmixed() {
        let src = window(
            AudioFormat::new(16_000.0, 2, SampleFormat::Float32),
            WindowSamples::Float32(vec![0.5, -0.5, 1.0, 0.0]),
        );

        let chunk = LinearSampleConverter.convert(&src, &AudioFormat::TARGET, 1600).unwrap();

        assert_eq!(decode(&chunk), vec![0, 16_384]);
    }

    #[test]
    fn upsampling_interpolates() {
        let src = window(
            AudioFormat::new(8_000.0, 1, SampleFormat::Float32),
            WindowSamples::Float32(vec![0.0, 0.5]),
        );

        let out = decode(&LinearSampleConverter.convert(&src, &AudioFormat::TARGET, 1600).unwrap());

        assert_eq!(out.len(), 4);
        assert_eq!(out[0], 0);
        assert_eq!(out[1], 8192);
        assert_eq!(out[2], 16_384);
    }

    #[test]
    fn full_scale_float_clamps() {
        assert_eq!(quantize(1.0), i16::MAX);
        assert_eq!(quantize(-1.0), i16::MIN);
        assert_eq!(quantize(3.0), i16::MAX);
        assert_eq!(quantize(-3.0), i16::MIN);
    }

    #[test]
    fn oversized_window_is_rejected() {
        let src = window(AudioFormat::TARGET, WindowSamples::Int16(vec![0; 1601]));

        let err = LinearSampleConverter.convert(&src, &AudioFormat::TARGET, 1600).unwrap_err();

        assert_eq!(
            err,
            ConversionError::CapacityExceeded {
                produced: 1601,
                capacity: 1600
            }
        );
    }

    #[test]
    fn mislabeled_samples_are_rejected() {
        let src = window(AudioFormat::TARGET, WindowSamples::Float32(vec![0.0; 4]));
        let result = LinearSampleConverter.convert(&src, &AudioFormat::TARGET, 1600);
        assert!(matches!(result, Err(ConversionError::UnsupportedFormat(_))));
    }

    #[test]
    fn empty_window_yields_empty_chunk() {
        let src = window(AudioFormat::TARGET, WindowSamples::Int16(Vec::new()));
        let chunk = LinearSampleConverter.convert(&src, &AudioFormat::TARGET, 1600).unwrap();
        assert!(chunk.is_empty());
    }

    #[test]
    fn mono_source_fills_stereo_target() {
        let target = AudioFormat::new(16_000.0, 2, SampleFormat::Int16);
        let src = window(
            AudioFormat::new(16_000.0, 1, SampleFormat::Float32),
            WindowSamples::Float32(vec![0.5, 0.25]),
        );

        let chunk = LinearSampleConverter.convert(&src, &target, 1600).unwrap();

        assert_eq!(chunk.frame_count(), 2);
        assert_eq!(decode(&chunk), vec![16_384, 16_384, 8192, 8192]);
    }

    #[test]
    fn full_window_fills_chunk_at_any_rate() {
        let capacity = AudioFormat::TARGET.frames_for(0.1);
        for rate in [8_000.0, 11_025.0, 16_000.0, 22_050.0, 32_000.0, 44_100.0, 48_000.0] {
            let window_frames = AudioFormat::new(rate, 1, SampleFormat::Int16).frames_for(0.1);
            assert_eq!(output_frames(window_frames, rate, 16_000.0, capacity), capacity, "{} Hz", rate);
            for short in [1, window_frames / 2, window_frames - 1] {
                assert!(output_frames(short, rate, 16_000.0, capacity) <= capacity, "{} Hz", rate);
            }
        }
    }

    #[test]
    fn low_rate_window_converts_to_full_chunk() {
        let src = window(
            AudioFormat::new(11_025.0, 1, SampleFormat::Int16),
            WindowSamples::Int16(vec![4096; 1102]),
        );

        let chunk = LinearSampleConverter.convert(&src, &AudioFormat::TARGET, 1600).unwrap();

        assert_eq!(chunk.len(), 3200);
        assert!(decode(&chunk).iter().all(|&s| s == 4096));
    }

    #[test]
    fn resampled_len_matches_window_ratio() {
        assert_eq!(resampled_len(4410, 44_100.0, 16_000.0), 1600);
        assert_eq!(resampled_len(4800, 48_000.0, 16_000.0), 1600);
        assert_eq!(resampled_len(2205, 22_050.0, 16_000.0), 1600);
    }
}
