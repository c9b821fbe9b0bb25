// Freeverb-style reverb: eight parallel damped combs into four series
// allpasses, per channel, with the right channel detuned for width.

use super::effect::Effect;
use super::frame::StereoFrame;
use crate::pipeline::effects::ReverbPreset;

// tunings at 44.1kHz, mutually prime so the combs don't ring together
const COMB_TUNINGS: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];
const ALLPASS_TUNINGS: [usize; 4] = [556, 441, 341, 225];
const STEREO_SPREAD: usize = 23;
const REFERENCE_RATE: f32 = 44100.0;

const FIXED_GAIN: f32 = 0.015;
const SCALE_WET: f32 = 3.0;
const SCALE_ROOM: f32 = 0.28;
const OFFSET_ROOM: f32 = 0.7;
const SCALE_DAMP: f32 = 0.4;
const ALLPASS_FEEDBACK: f32 = 0.5;

fn scale_to_rate(samples: usize, sample_rate: f32) -> usize {
    ((samples as f32 * sample_rate / REFERENCE_RATE).round() as usize).max(1)
}

struct Comb {
    buf: Vec<f32>,
    idx: usize,
    feedback: f32,
    damp: f32,
    store: f32,
}

impl Comb {
    fn new(len: usize, feedback: f32, damp: f32) -> Self {
        Self { buf: vec![0.0; len], idx: 0, feedback, damp, store: 0.0 }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let out = self.buf[self.idx];
        self.store = out * (1.0 - self.damp) + self.store * self.damp;
        self.buf[self.idx] = input + self.store * self.feedback;
        self.idx = (self.idx + 1) % self.buf.len();
        out
    }
}

struct Allpass {
    buf: Vec<f32>,
    idx: usize,
}

impl Allpass {
    fn new(len: usize) -> Self {
        Self { buf: vec![0.0; len], idx: 0 }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buf[self.idx];
        self.buf[self.idx] = input + delayed * ALLPASS_FEEDBACK;
        self.idx = (self.idx + 1) % self.buf.len();
        delayed - input
    }
}

struct Tank {
    combs: Vec<Comb>,
    allpasses: Vec<Allpass>,
}

impl Tank {
    fn new(sample_rate: f32, spread: usize, feedback: f32, damp: f32) -> Self {
        Self {
            combs: COMB_TUNINGS
                .iter()
                .map(|&n| Comb::new(scale_to_rate(n + spread, sample_rate), feedback, damp))
                .collect(),
            allpasses: ALLPASS_TUNINGS
                .iter()
                .map(|&n| Allpass::new(scale_to_rate(n + spread, sample_rate)))
                .collect(),
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let mut out = self.combs.iter_mut().map(|c| c.process(input)).sum::<f32>();
        for ap in &mut self.allpasses {
            out = ap.process(out);
        }
        out
    }
}

pub struct Reverb {
    left: Tank,
    right: Tank,
    wet1: f32,
    wet2: f32,
    mix: f32, // 0..1
}

impl Reverb {
    pub fn new(preset: ReverbPreset, wet_dry_mix: f32, sample_rate: f32) -> Self {
        let (room, damping, width) = preset.params();
        let feedback = room * SCALE_ROOM + OFFSET_ROOM;
        let damp = damping * SCALE_DAMP;
        Self {
            left: Tank::new(sample_rate, 0, feedback, damp),
            right: Tank::new(sample_rate, STEREO_SPREAD, feedback, damp),
            wet1: width / 2.0 + 0.5,
            wet2: (1.0 - width) / 2.0,
            mix: (wet_dry_mix / 100.0).clamp(0.0, 1.0),
        }
    }
}

impl Effect for Reverb {
    fn process(&mut self, buf: &mut [StereoFrame]) {
        let dry = 1.0 - self.mix;
        let wet = self.mix * SCALE_WET;
        for f in buf.iter_mut() {
            let input = (f.left + f.right) * FIXED_GAIN;
            let l = self.left.process(input);
            let r = self.right.process(input);
            f.left = f.left * dry + (l * self.wet1 + r * self.wet2) * wet;
            f.right = f.right * dry + (r * self.wet1 + l * self.wet2) * wet;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn energy(buf: &[StereoFrame]) -> f32 {
        buf.iter().map(|f| f.left * f.left + f.right * f.right).sum()
    }

    #[test]
    fn impulse_comes_through_half_dry() {
        let mut reverb = Reverb::new(ReverbPreset::Cathedral, 50.0, 44100.0);
        let mut buf = vec![StereoFrame::zero(); 8];
        buf[0] = StereoFrame::mono(1.0);
        reverb.process(&mut buf);
        assert!((buf[0].left - 0.5).abs() < 1e-6);
        assert!((buf[0].right - 0.5).abs() < 1e-6);
    }

    #[test]
    fn tail_rings_then_decays() {
        let rate = 44100.0;
        let mut reverb = Reverb::new(ReverbPreset::Cathedral, 50.0, rate);
        let mut buf = vec![StereoFrame::zero(); 44100 * 3];
        buf[0] = StereoFrame::mono(1.0);
        reverb.process(&mut buf);

        let early = energy(&buf[4410..13230]);
        let late = energy(&buf[88200..97020]);
        assert!(early > 0.0);
        assert!(late < early);
        assert!(buf.iter().all(|f| f.left.is_finite() && f.right.is_finite()));
    }

    #[test]
    fn fully_dry_mix_is_transparent() {
        let mut reverb = Reverb::new(ReverbPreset::Cathedral, 0.0, 44100.0);
        let input: Vec<StereoFrame> = (0..2000).map(|i| StereoFrame::mono((i as f32 * 0.01).sin())).collect();
        let mut buf = input.clone();
        reverb.process(&mut buf);
        assert_eq!(buf, input);
    }
}
