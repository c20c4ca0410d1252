use std::path::Path;

use crate::models::error::AssetError;
use crate::models::window::DecodedAsset;

/// Decodes a stored audio asset into raw frames with their native format.
pub trait AudioFileReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<DecodedAsset, AssetError>;
}
