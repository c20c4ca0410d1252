use crate::models::window::CaptureWindow;
use crate::traits::power_meter::PowerMeter;

/// Power reported for a zero-level window; stands in for `log10(0)`.
pub const SILENCE_FLOOR_DB: f32 = -100.0;

/// Default power meter: plain root-mean-square.
#[derive(Debug, Clone, Copy, Default)]
pub struct RmsPowerMeter;

impl PowerMeter for RmsPowerMeter {
    fn rms(&self, samples: &mut dyn Iterator<Item = f32>) -> f32 {
        let (sum_sq, count) = samples.fold((0.0f32, 0usize), |(sum, n), s| (sum + s * s, n + 1));
        if count == 0 {
            return 0.0;
        }
        (sum_sq / count as f32).sqrt()
    }
}

/// Decibel conversion with the silence floor.
pub fn level_to_db(level: f32) -> f32 {
    if level > 0.0 {
        20.0 * level.log10()
    } else {
        SILENCE_FLOOR_DB
    }
}

/// Power of the window's first channel in decibels.
pub fn window_power(meter: &dyn PowerMeter, window: &CaptureWindow) -> f32 {
    level_to_db(meter.rms(&mut window.first_channel()))
}
