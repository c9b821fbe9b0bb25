// The input plan:
//
// Effect buttons:
//   1   //  Slow      (half speed)
//   2   //  Fast      (1.5x speed)
//   3   //  Chipmunk  (pitch up)
//   4   //  Vader     (pitch down)
//   5   //  Echo
//   6   //  Reverb
//
// Transport:
//   Space   //  Stop
//   Enter   //  Dismiss the open dialog
//   Esc     //  Quit
//
// Same split as before: the middle layer owns play state and decides what is
// enabled, the TUI only draws the DisplayState it is handed each frame.

pub const NUM_EFFECT_BUTTONS: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectButton {
    Slow,
    Fast,
    Chipmunk,
    Vader,
    Echo,
    Reverb,
}

impl EffectButton {
    pub const ALL: [EffectButton; NUM_EFFECT_BUTTONS] = [
        EffectButton::Slow,
        EffectButton::Fast,
        EffectButton::Chipmunk,
        EffectButton::Vader,
        EffectButton::Echo,
        EffectButton::Reverb,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            EffectButton::Slow => "SNAIL",
            EffectButton::Fast => "RABBIT",
            EffectButton::Chipmunk => "CHIPMUNK",
            EffectButton::Vader => "VADER",
            EffectButton::Echo => "ECHO",
            EffectButton::Reverb => "REVERB",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    PlayEffect(EffectButton),
    Stop,
    DismissDialog,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    Playing,
    NotPlaying,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dialog {
    pub title: &'static str,
    pub message: String,
}

pub const DISMISS_LABEL: &str = "Dismiss";

#[derive(Clone, Debug)]
pub struct DisplayState {
    pub play_state: PlayState,
    pub effects_enabled: [bool; NUM_EFFECT_BUTTONS],
    pub stop_enabled: bool,
    pub last_effect: Option<EffectButton>,
    pub recording_name: String, // file name, or empty when nothing could be opened
    pub duration_secs: f64,
    pub remaining_secs: Option<f64>, // countdown to the completion timer
    pub chain: Option<String>,       // the graph that is sounding, if any
    pub dialog: Option<Dialog>,
}
