use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;

// The source end of every graph: reads the scheduled buffer front to back
pub struct PlayerNode {
    buffer: Option<Arc<SampleBuffer>>,
    pos: f64,
    speed: f64, // source frames consumed per output frame
    active: bool,
    sample_time: Arc<AtomicU64>, // read by the control thread
}

impl PlayerNode {
    pub fn new(sample_time: Arc<AtomicU64>) -> Self {
        Self {
            buffer: None,
            pos: 0.0,
            speed: 1.0,
            active: false,
            sample_time,
        }
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn schedule(&mut self, buffer: Arc<SampleBuffer>, speed: f64) {
        self.active = !buffer.data.is_empty();
        self.buffer = Some(buffer);
        self.pos = 0.0;
        self.speed = speed.max(0.0);
        self.sample_time.store(0, Ordering::Relaxed);
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.buffer = None;
    }

    pub fn render_into(&mut self, out: &mut [StereoFrame]) {
        // we're at a certain playback position, it's our job to render the next block
        if !self.active {
            return;
        }
        let Some(buffer) = self.buffer.as_ref() else {
            self.active = false;
            return;
        };
        let data = &buffer.data;
        let len = data.len();

        for frame in out.iter_mut() {
            let i = self.pos as usize;
            if i >= len {
                self.active = false;
                break;
            }
            let frac = (self.pos - i as f64) as f32;
            let s0 = data[i];
            let s1 = data.get(i + 1).copied().unwrap_or(s0);
            *frame = frame.add(s0.lerp(s1, frac));
            self.pos += self.speed;
        }

        let played = (self.pos as u64).min(len as u64);
        self.sample_time.store(played, Ordering::Relaxed);
    }
}
