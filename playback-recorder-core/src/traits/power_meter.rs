/// Loudness primitive: root-mean-square level of a stream of normalized
/// samples.
///
/// The decibel conversion and silence floor are applied by the capture
/// engine, not by implementations.
pub trait PowerMeter: Send + Sync {
    fn rms(&self, samples: &mut dyn Iterator<Item = f32>) -> f32;
}
