use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::audio::SampleBuffer;
use crate::audio_api::{AudioAsset, ProcessingFormat};
use crate::error::PlaybackError;

// Open the recorded WAV once, before the screen starts taking input
pub fn open_recording(path: &Path) -> Result<AudioAsset, PlaybackError> {
    let (buffer, wav) = SampleBuffer::load_wav(path).map_err(|source| PlaybackError::AssetOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let asset = AudioAsset {
        path: path.to_path_buf(),
        format: ProcessingFormat {
            sample_rate: wav.sample_rate,
            channels: wav.channels.min(2), // decoding keeps at most two
        },
        buffer: Arc::new(buffer),
    };
    info!(
        path = %path.display(),
        frames = asset.length(),
        sample_rate = wav.sample_rate,
        "audio has been set up"
    );
    Ok(asset)
}
