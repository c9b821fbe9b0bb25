// The effect node catalog: every stage a graph can contain, with its fixed settings.

pub const UNITY_RATE: f32 = 1.0;
pub const NO_PITCH_SHIFT: f32 = 0.0;

// Accepted ranges for the time/pitch stage
pub const MIN_RATE: f32 = 1.0 / 32.0;
pub const MAX_RATE: f32 = 32.0;
pub const MIN_PITCH_CENTS: f32 = -2400.0;
pub const MAX_PITCH_CENTS: f32 = 2400.0;

// Reverb blend is not adjustable, percent wet
pub const REVERB_WET_DRY_MIX: f32 = 50.0;

/// Rate and pitch are independent: rate changes duration without changing
/// pitch, pitch (in cents) changes pitch without changing duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimePitch {
    pub rate: f32,
    pub pitch: f32,
}

impl Default for TimePitch {
    fn default() -> Self {
        Self { rate: UNITY_RATE, pitch: NO_PITCH_SHIFT }
    }
}

impl TimePitch {
    pub fn is_passthrough(&self) -> bool {
        self.rate == UNITY_RATE && self.pitch == NO_PITCH_SHIFT
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EchoTap {
    pub delay_secs: f32,
    pub gain: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EchoPreset {
    MultiEcho,
}

impl EchoPreset {
    pub fn taps(self) -> &'static [EchoTap] {
        match self {
            // four repeats, each quieter than the last
            EchoPreset::MultiEcho => &[
                EchoTap { delay_secs: 0.09, gain: 0.55 },
                EchoTap { delay_secs: 0.18, gain: 0.38 },
                EchoTap { delay_secs: 0.27, gain: 0.24 },
                EchoTap { delay_secs: 0.36, gain: 0.12 },
            ],
        }
    }

    pub fn longest_delay_secs(self) -> f32 {
        self.taps().iter().map(|t| t.delay_secs).fold(0.0, f32::max)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReverbPreset {
    Cathedral,
}

impl ReverbPreset {
    /// (room_size, damping, stereo width), all 0.0..=1.0
    pub fn params(self) -> (f32, f32, f32) {
        match self {
            ReverbPreset::Cathedral => (0.92, 0.25, 1.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GraphNode {
    TimePitch(TimePitch),
    Echo(EchoPreset),
    Reverb { preset: ReverbPreset, wet_dry_mix: f32 },
    Output,
}

impl GraphNode {
    pub fn echo() -> Self {
        GraphNode::Echo(EchoPreset::MultiEcho)
    }

    pub fn reverb() -> Self {
        GraphNode::Reverb {
            preset: ReverbPreset::Cathedral,
            wet_dry_mix: REVERB_WET_DRY_MIX,
        }
    }

    pub fn label(&self) -> String {
        match self {
            GraphNode::TimePitch(tp) if tp.is_passthrough() => "TimePitch(unity)".to_string(),
            GraphNode::TimePitch(tp) => format!("TimePitch(rate={}, pitch={})", tp.rate, tp.pitch),
            GraphNode::Echo(preset) => format!("Echo({:?})", preset),
            GraphNode::Reverb { preset, wet_dry_mix } => format!("Reverb({:?}, mix={})", preset, wet_dry_mix),
            GraphNode::Output => "Output".to_string(),
        }
    }
}
