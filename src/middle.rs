// The screen: turns button presses into effect requests, keeps the
// playing / not-playing flag, and turns failures into dialogs.

use std::time::Instant;

use tracing::{error, info};

use crate::audio_api::AudioAsset;
use crate::error::PlaybackError;
use crate::pipeline::graph::EffectRequest;
use crate::pipeline::playback::{AudioBackend, PlaybackController};
use crate::shared::{
    Dialog, DisplayState, EffectButton, InputEvent, PlayState, NUM_EFFECT_BUTTONS,
};

pub const EFFECT_TABLE: [(EffectButton, EffectRequest); NUM_EFFECT_BUTTONS] = [
    (EffectButton::Slow, EffectRequest::rate(0.5)),
    (EffectButton::Fast, EffectRequest::rate(1.5)),
    (EffectButton::Chipmunk, EffectRequest::pitch(1000.0)),
    (EffectButton::Vader, EffectRequest::pitch(-1000.0)),
    (EffectButton::Echo, EffectRequest::echo()),
    (EffectButton::Reverb, EffectRequest::reverb()),
];

pub fn request_for(button: EffectButton) -> EffectRequest {
    EFFECT_TABLE[button.index()].1
}

pub struct Middle<B: AudioBackend> {
    controller: PlaybackController<B>,
    play_state: PlayState,
    dialog: Option<Dialog>,
    last_effect: Option<EffectButton>,
}

fn dialog_for(err: &PlaybackError) -> Dialog {
    Dialog {
        title: err.dialog_title(),
        message: err.to_string(),
    }
}

impl<B: AudioBackend> Middle<B> {
    // The recording is opened by the caller exactly once; if that failed the
    // screen still comes up, shows why, and never tries again.
    pub fn new(backend: B, recording: Result<AudioAsset, PlaybackError>) -> Self {
        let (asset, dialog) = match recording {
            Ok(asset) => (Some(asset), None),
            Err(e) => {
                error!("{e}");
                (None, Some(dialog_for(&e)))
            }
        };
        Self {
            controller: PlaybackController::new(backend, asset),
            play_state: PlayState::NotPlaying,
            dialog,
            last_effect: None,
        }
    }

    #[cfg(test)]
    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    fn effects_enabled(&self) -> bool {
        self.play_state == PlayState::NotPlaying
    }

    fn stop_enabled(&self) -> bool {
        self.play_state == PlayState::Playing
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        // dialogs are modal
        if self.dialog.is_some() {
            if event == InputEvent::DismissDialog {
                self.dialog = None;
            }
            return;
        }
        match event {
            InputEvent::PlayEffect(button) => self.play(button),
            InputEvent::Stop => self.stop(),
            InputEvent::DismissDialog | InputEvent::Quit => {}
        }
    }

    fn play(&mut self, button: EffectButton) {
        if !self.effects_enabled() {
            return;
        }
        info!(effect = button.label(), "play sound for button pressed");

        // Only flip to Playing once the engine is confirmed running
        match self.controller.play(&request_for(button)) {
            Ok(_) => {
                self.last_effect = Some(button);
                self.configure(PlayState::Playing);
            }
            Err(e) => {
                self.configure(PlayState::NotPlaying);
                self.show_error(&e);
            }
        }
    }

    fn stop(&mut self) {
        if !self.stop_enabled() {
            return;
        }
        info!("stop button pressed");
        self.controller.stop();
        self.configure(PlayState::NotPlaying);
    }

    // Called every frame; the completion timer fires here, never on the audio thread
    pub fn tick(&mut self, now: Instant) {
        if self.controller.tick(now) {
            self.configure(PlayState::NotPlaying);
        }
    }

    fn configure(&mut self, state: PlayState) {
        self.play_state = state;
    }

    fn show_error(&mut self, err: &PlaybackError) {
        error!("{err}");
        self.dialog = Some(dialog_for(err));
    }

    pub fn display_state(&self) -> DisplayState {
        let asset = self.controller.asset();
        DisplayState {
            play_state: self.play_state,
            effects_enabled: [self.effects_enabled(); NUM_EFFECT_BUTTONS],
            stop_enabled: self.stop_enabled(),
            last_effect: self.last_effect,
            recording_name: asset
                .and_then(|a| a.path.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            duration_secs: asset.map(|a| a.duration_secs()).unwrap_or(0.0),
            remaining_secs: self.controller.remaining_secs(Instant::now()),
            chain: self.controller.active_graph().map(|g| g.describe()),
            dialog: self.dialog.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_fixture::{asset_with, FakeBackend};
    use std::path::PathBuf;
    use std::time::Duration;

    fn screen() -> (Middle<FakeBackend>, std::rc::Rc<crate::pipeline::test_fixture::Probe>) {
        let (backend, probe) = FakeBackend::new();
        (Middle::new(backend, Ok(asset_with(44100, 44100))), probe)
    }

    #[test]
    fn table_covers_every_button_in_order() {
        for (i, (button, _)) in EFFECT_TABLE.iter().enumerate() {
            assert_eq!(button.index(), i);
        }
        assert_eq!(request_for(EffectButton::Slow).rate, Some(0.5));
        assert_eq!(request_for(EffectButton::Fast).rate, Some(1.5));
        assert_eq!(request_for(EffectButton::Chipmunk).pitch, Some(1000.0));
        assert_eq!(request_for(EffectButton::Vader).pitch, Some(-1000.0));
        assert!(request_for(EffectButton::Echo).echo);
        assert!(request_for(EffectButton::Reverb).reverb);
    }

    #[test]
    fn starts_not_playing_with_effects_enabled() {
        let (screen, _) = screen();
        let ds = screen.display_state();
        assert_eq!(ds.play_state, PlayState::NotPlaying);
        assert_eq!(ds.effects_enabled, [true; NUM_EFFECT_BUTTONS]);
        assert!(!ds.stop_enabled);
        assert_eq!(ds.recording_name, "test_recording.wav");
        assert!(ds.dialog.is_none());
    }

    #[test]
    fn playing_flips_the_controls() {
        let (mut screen, _) = screen();
        screen.handle_input(InputEvent::PlayEffect(EffectButton::Echo));
        let ds = screen.display_state();
        assert_eq!(ds.play_state, PlayState::Playing);
        assert_eq!(ds.effects_enabled, [false; NUM_EFFECT_BUTTONS]);
        assert!(ds.stop_enabled);
        assert_eq!(ds.last_effect, Some(EffectButton::Echo));
        assert!(ds.remaining_secs.is_some());
        assert_eq!(ds.chain.as_deref(), Some("Source -> TimePitch(unity) -> Echo(MultiEcho) -> Output"));
    }

    #[test]
    fn effect_presses_are_ignored_while_playing() {
        let (mut screen, probe) = screen();
        screen.handle_input(InputEvent::PlayEffect(EffectButton::Slow));
        screen.handle_input(InputEvent::PlayEffect(EffectButton::Fast));
        assert_eq!(probe.starts.get(), 1);
        assert_eq!(screen.display_state().last_effect, Some(EffectButton::Slow));
    }

    #[test]
    fn stop_returns_to_not_playing() {
        let (mut screen, probe) = screen();
        screen.handle_input(InputEvent::PlayEffect(EffectButton::Reverb));
        screen.handle_input(InputEvent::Stop);
        screen.handle_input(InputEvent::Stop);
        assert_eq!(screen.display_state().play_state, PlayState::NotPlaying);
        assert_eq!(probe.shutdowns.get(), 1);
    }

    #[test]
    fn completion_re_enables_the_effects() {
        let (mut screen, probe) = screen();
        let start = Instant::now();
        screen.handle_input(InputEvent::PlayEffect(EffectButton::Fast)); // 1s clip at 1.5x
        screen.tick(start + Duration::from_millis(500));
        assert_eq!(screen.display_state().play_state, PlayState::Playing);
        screen.tick(start + Duration::from_millis(700));
        assert_eq!(screen.display_state().play_state, PlayState::NotPlaying);
        assert_eq!(probe.shutdowns.get(), 1);
        assert!(screen.display_state().effects_enabled.iter().all(|&e| e));
    }

    #[test]
    fn engine_failure_shows_dialog_and_stays_idle() {
        let (mut backend, _) = FakeBackend::new();
        backend.fail_start = true;
        let mut screen = Middle::new(backend, Ok(asset_with(44100, 44100)));
        screen.handle_input(InputEvent::PlayEffect(EffectButton::Vader));

        let ds = screen.display_state();
        assert_eq!(ds.play_state, PlayState::NotPlaying);
        assert!(!ds.stop_enabled);
        assert_eq!(ds.dialog.unwrap().title, "Audio Engine Error");
    }

    #[test]
    fn dialog_is_modal_until_dismissed() {
        let (mut backend, probe) = FakeBackend::new();
        backend.fail_start = true;
        let mut screen = Middle::new(backend, Ok(asset_with(44100, 44100)));
        screen.handle_input(InputEvent::PlayEffect(EffectButton::Vader));
        screen.handle_input(InputEvent::PlayEffect(EffectButton::Echo));
        assert_eq!(probe.starts.get(), 0);
        assert!(screen.dialog().is_some());

        screen.handle_input(InputEvent::DismissDialog);
        assert!(screen.dialog().is_none());
    }

    #[test]
    fn failed_open_reports_once_and_never_plays() {
        let (backend, probe) = FakeBackend::new();
        let err = PlaybackError::AssetOpen {
            path: PathBuf::from("gone.wav"),
            source: hound::Error::FormatError("no riff"),
        };
        let mut screen = Middle::new(backend, Err(err));
        assert_eq!(screen.dialog().unwrap().title, "Audio File Error");
        assert_eq!(screen.display_state().recording_name, "");

        screen.handle_input(InputEvent::DismissDialog);
        screen.handle_input(InputEvent::PlayEffect(EffectButton::Echo));
        assert_eq!(screen.display_state().play_state, PlayState::NotPlaying);
        assert_eq!(screen.dialog().unwrap().title, "Audio File Error");
        assert_eq!(probe.starts.get(), 0);
    }
}
