// Purely for testing: an in-memory recording and a fake audio backend that
// counts how many engines are alive at once.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use crate::audio::StereoFrame;
use crate::audio_api::{AudioAsset, ProcessingFormat, SampleBuffer};
use crate::error::PlaybackError;
use crate::pipeline::graph::EffectGraph;
use crate::pipeline::playback::{AudioBackend, RunningEngine};

pub fn asset_with(length: usize, sample_rate: u32) -> AudioAsset {
    AudioAsset {
        path: PathBuf::from("test_recording.wav"),
        format: ProcessingFormat { sample_rate, channels: 1 },
        buffer: Arc::new(SampleBuffer::from_frames(vec![StereoFrame::mono(0.25); length])),
    }
}

#[derive(Debug, Default)]
pub struct Probe {
    pub live: Cell<usize>,
    pub peak: Cell<usize>,
    pub starts: Cell<usize>,
    pub scheduled: Cell<usize>,
    pub player_stops: Cell<usize>,
    pub shutdowns: Cell<usize>,
    pub last_graph: Cell<Option<usize>>, // node count of the most recent start
}

pub struct FakeBackend {
    pub probe: Rc<Probe>,
    pub fail_start: bool,
    pub sample_time: u64, // what the player reports right after scheduling
}

impl FakeBackend {
    pub fn new() -> (Self, Rc<Probe>) {
        let probe = Rc::new(Probe::default());
        let backend = Self { probe: Rc::clone(&probe), fail_start: false, sample_time: 0 };
        (backend, probe)
    }
}

pub struct FakeEngine {
    probe: Rc<Probe>,
    sample_time: u64,
}

impl AudioBackend for FakeBackend {
    type Engine = FakeEngine;

    fn start(&mut self, graph: &EffectGraph) -> Result<FakeEngine, PlaybackError> {
        if self.fail_start {
            return Err(PlaybackError::EngineStart("fake device refused".into()));
        }
        let p = &self.probe;
        p.starts.set(p.starts.get() + 1);
        p.live.set(p.live.get() + 1);
        p.peak.set(p.peak.get().max(p.live.get()));
        p.last_graph.set(Some(graph.nodes().len()));
        Ok(FakeEngine { probe: Rc::clone(&self.probe), sample_time: self.sample_time })
    }
}

impl RunningEngine for FakeEngine {
    fn schedule(&mut self, _asset: &AudioAsset) {
        self.probe.scheduled.set(self.probe.scheduled.get() + 1);
    }

    fn sample_time(&self) -> u64 {
        self.sample_time
    }

    fn stop_player(&mut self) {
        self.probe.player_stops.set(self.probe.player_stops.get() + 1);
    }

    fn shutdown(self) {
        self.probe.live.set(self.probe.live.get() - 1);
        self.probe.shutdowns.set(self.probe.shutdowns.get() + 1);
    }
}
