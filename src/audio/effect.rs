use super::frame::StereoFrame;
use crate::pipeline::effects::{EchoPreset, TimePitch};

// Every stage between the player and the output is one of these. They run on
// the audio thread, so all buffers are allocated up front in `new`.
pub trait Effect: Send {
    fn process(&mut self, buf: &mut [StereoFrame]);
}

// Grain length for the pitch shifter
const SHIFT_WINDOW_SECS: f32 = 0.05;

/// Delay-line pitch shifter: two read taps sweep through a short window at
/// `ratio` speed, half a window apart, each faded by a triangle so the pair
/// always sums to unity gain.
pub struct PitchShifter {
    line: Vec<StereoFrame>,
    write: usize,
    window: f32,
    delay: f32, // tap A, 0..window
    step: f32,  // 1 - ratio
}

impl PitchShifter {
    pub fn new(cents: f32, sample_rate: f32) -> Self {
        let window = (sample_rate * SHIFT_WINDOW_SECS).round().max(64.0);
        let ratio = 2f32.powf(cents / 1200.0);
        Self {
            line: vec![StereoFrame::zero(); window as usize + 2],
            write: 0,
            window,
            delay: 0.0,
            step: 1.0 - ratio,
        }
    }

    #[cfg(test)]
    pub fn ratio(&self) -> f32 {
        1.0 - self.step
    }

    // fractional read `delay` frames behind the write head
    fn read(&self, delay: f32) -> StereoFrame {
        let len = self.line.len();
        let mut pos = self.write as f32 - delay;
        if pos < 0.0 {
            pos += len as f32;
        }
        let i = (pos as usize) % len;
        let frac = pos - pos.floor();
        self.line[i].lerp(self.line[(i + 1) % len], frac)
    }

    fn fade(&self, delay: f32) -> f32 {
        1.0 - (2.0 * delay / self.window - 1.0).abs()
    }
}

impl Effect for PitchShifter {
    fn process(&mut self, buf: &mut [StereoFrame]) {
        let half = self.window * 0.5;
        for f in buf.iter_mut() {
            self.line[self.write] = *f;

            let a = self.delay;
            let b = (self.delay + half) % self.window;
            *f = self.read(a).scale(self.fade(a)).add(self.read(b).scale(self.fade(b)));

            self.write = (self.write + 1) % self.line.len();
            self.delay = (self.delay + self.step).rem_euclid(self.window);
        }
    }
}

/// The time/pitch stage. Rate is applied upstream by the player's read speed,
/// which also moves the pitch, so this stage shifts by the requested cents
/// minus whatever the rate change already did.
pub struct TimePitchNode {
    shifter: Option<PitchShifter>,
}

impl TimePitchNode {
    pub fn new(tp: TimePitch, sample_rate: f32) -> Self {
        let cents = correction_cents(tp);
        let shifter = if cents.abs() < 0.01 {
            None // nothing to do, stay transparent
        } else {
            Some(PitchShifter::new(cents, sample_rate))
        };
        Self { shifter }
    }

    #[cfg(test)]
    pub fn is_passthrough(&self) -> bool {
        self.shifter.is_none()
    }
}

pub fn correction_cents(tp: TimePitch) -> f32 {
    tp.pitch - 1200.0 * tp.rate.log2()
}

impl Effect for TimePitchNode {
    fn process(&mut self, buf: &mut [StereoFrame]) {
        if let Some(shifter) = self.shifter.as_mut() {
            shifter.process(buf);
        }
    }
}

//echo
pub struct MultiTapEcho {
    line: Vec<StereoFrame>,
    write: usize,
    taps: Vec<(usize, f32)>, // (delay in frames, gain)
}

impl MultiTapEcho {
    pub fn new(preset: EchoPreset, sample_rate: f32) -> Self {
        let frames = |secs: f32| ((secs * sample_rate).round() as usize).max(1);
        let taps: Vec<(usize, f32)> = preset
            .taps()
            .iter()
            .map(|t| (frames(t.delay_secs), t.gain))
            .collect();
        let longest = frames(preset.longest_delay_secs());
        Self {
            line: vec![StereoFrame::zero(); longest + 1],
            write: 0,
            taps,
        }
    }
}

impl Effect for MultiTapEcho {
    fn process(&mut self, buf: &mut [StereoFrame]) {
        let len = self.line.len();
        for f in buf.iter_mut() {
            self.line[self.write] = *f;
            let mut out = *f;
            for &(delay, gain) in &self.taps {
                let idx = (self.write + len - delay) % len;
                out = out.add(self.line[idx].scale(gain));
            }
            *f = out;
            self.write = (self.write + 1) % len;
        }
    }
}
