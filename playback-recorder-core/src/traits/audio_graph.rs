use std::sync::Arc;

use crate::models::error::GraphError;
use crate::models::format::AudioFormat;
use crate::models::window::{CaptureWindow, DecodedAsset};

/// Hook installed on the mix point, invoked once per window on the render
/// thread. The window is owned by the callback and dropped when it returns.
pub type TapCallback = Box<dyn FnMut(CaptureWindow) + Send + 'static>;

/// Push-style audio engine: an asset player feeding a mix point that can be
/// tapped.
///
/// Call order for a capture window:
/// `connect_player → install_tap → start → play` and
/// `stop → remove_tap → reset` to tear down.
pub trait AudioGraph: Send {
    /// Attach the player for `asset` and connect it to the mix point at
    /// `mix_format`.
    fn connect_player(
        &mut self,
        asset: Arc<DecodedAsset>,
        mix_format: AudioFormat,
    ) -> Result<(), GraphError>;

    /// Install a tap on the mix point delivering `buffer_size` frames per call.
    fn install_tap(&mut self, buffer_size: usize, tap: TapCallback) -> Result<(), GraphError>;

    /// Start rendering.
    fn start(&mut self) -> Result<(), GraphError>;

    /// Schedule the connected asset from its beginning and start playback.
    fn play(&mut self);

    /// Stop rendering. No tap invocation may happen after this returns.
    fn stop(&mut self);

    /// Remove the mix-point tap, if any.
    fn remove_tap(&mut self);

    /// Rewind the player and drop graph connections.
    fn reset(&mut self);
}
