// Types shared between the control thread and the audio backend.

use std::path::PathBuf;
use std::sync::Arc;

pub use crate::audio::SampleBuffer;

// The format every connection in a graph is negotiated at
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProcessingFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

// The recorded clip, opened once and never touched again
#[derive(Clone, Debug)]
pub struct AudioAsset {
    pub path: PathBuf,
    pub format: ProcessingFormat,
    pub buffer: Arc<SampleBuffer>,
}

impl AudioAsset {
    // total length in sample frames
    pub fn length(&self) -> u64 {
        self.buffer.len() as u64
    }

    pub fn duration_secs(&self) -> f64 {
        if self.format.sample_rate == 0 {
            return 0.0;
        }
        self.length() as f64 / self.format.sample_rate as f64
    }
}

#[derive(Clone, Debug)]
pub enum AudioCommand {
    // The render thread can't touch the disk, so the decoded buffer is handed
    // over whole and the player starts from its first frame immediately.
    Schedule { buffer: Arc<SampleBuffer>, source_rate: u32 },

    // Silence the player node; the graph keeps running until the stream is dropped
    StopPlayer,
}
