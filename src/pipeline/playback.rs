// Owns the one playback session that may exist at a time: builds a graph,
// starts an engine for it, and tears it down on stop or when the clip ends.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::audio_api::AudioAsset;
use crate::error::PlaybackError;
use super::graph::{build_graph, EffectGraph, EffectRequest};

/// Something that can turn a graph into sound. Starting must be synchronous:
/// either the engine is running when this returns, or nothing was started.
pub trait AudioBackend {
    type Engine: RunningEngine;

    fn start(&mut self, graph: &EffectGraph) -> Result<Self::Engine, PlaybackError>;
}

/// A started engine. Dropping the value without `shutdown` is a leak of the
/// output device for as long as the value lives, so the controller always
/// shuts down explicitly.
pub trait RunningEngine {
    /// Queue the whole asset on the player node for immediate playback.
    fn schedule(&mut self, asset: &AudioAsset);

    /// Player read position, in source frames.
    fn sample_time(&self) -> u64;

    fn stop_player(&mut self);

    /// Stop and reset the engine, releasing the device.
    fn shutdown(self);
}

// far longer than any clip; keeps `Instant + Duration` from overflowing
const MAX_TIMER_DELAY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

// One-shot deadline counted from arming, checked by the main loop's tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompletionTimer {
    deadline: Instant,
}

impl CompletionTimer {
    pub fn arm(delay_secs: f64, now: Instant) -> Self {
        let delay = Duration::try_from_secs_f64(delay_secs.max(0.0))
            .unwrap_or(MAX_TIMER_DELAY)
            .min(MAX_TIMER_DELAY);
        Self { deadline: now + delay }
    }

    pub fn remaining_secs(&self, now: Instant) -> f64 {
        self.deadline.saturating_duration_since(now).as_secs_f64()
    }

    pub fn expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

pub struct PlaybackSession<E> {
    engine: E,
    graph: EffectGraph,
    timer: CompletionTimer,
}

pub struct PlaybackController<B: AudioBackend> {
    backend: B,
    asset: Option<AudioAsset>, // None when the recording couldn't be opened
    session: Option<PlaybackSession<B::Engine>>,
}

/// Time left in the clip, stretched by the playback rate.
pub fn stop_delay_secs(length: u64, sample_time: u64, sample_rate: u32, rate: f32) -> f64 {
    if sample_rate == 0 || rate.is_nan() || rate <= 0.0 {
        return 0.0;
    }
    length.saturating_sub(sample_time) as f64 / sample_rate as f64 / rate as f64
}

impl<B: AudioBackend> PlaybackController<B> {
    pub fn new(backend: B, asset: Option<AudioAsset>) -> Self {
        Self { backend, asset, session: None }
    }

    #[cfg(test)]
    pub fn is_playing(&self) -> bool {
        self.session.is_some()
    }

    pub fn asset(&self) -> Option<&AudioAsset> {
        self.asset.as_ref()
    }

    pub fn active_graph(&self) -> Option<&EffectGraph> {
        self.session.as_ref().map(|s| &s.graph)
    }

    pub fn remaining_secs(&self, now: Instant) -> Option<f64> {
        self.session.as_ref().map(|s| s.timer.remaining_secs(now))
    }

    /// Start a fresh session for `request`, returning the armed stop delay.
    /// Any running session is fully torn down first.
    pub fn play(&mut self, request: &EffectRequest) -> Result<f64, PlaybackError> {
        self.stop();

        let asset = self.asset.as_ref().ok_or(PlaybackError::AssetUnavailable)?;
        let graph = build_graph(asset, request)?;
        debug!(graph = %graph.describe(), "graph built");

        let mut engine = self.backend.start(&graph)?;
        engine.schedule(asset);

        let delay = stop_delay_secs(
            asset.length(),
            engine.sample_time(),
            asset.format.sample_rate,
            request.rate_multiplier(),
        );
        info!(delay_secs = delay, nodes = graph.nodes().len(), "playback started");

        self.session = Some(PlaybackSession {
            engine,
            graph,
            timer: CompletionTimer::arm(delay, Instant::now()),
        });
        Ok(delay)
    }

    /// Tear down the current session, if any. Returns whether one was running.
    pub fn stop(&mut self) -> bool {
        let Some(mut session) = self.session.take() else {
            return false;
        };
        session.engine.stop_player();
        session.engine.shutdown();
        info!("playback stopped");
        true
    }

    /// Check the completion timer. Returns true when this tick ended playback.
    pub fn tick(&mut self, now: Instant) -> bool {
        let expired = match self.session.as_ref() {
            Some(session) => session.timer.expired(now),
            None => return false,
        };
        if expired {
            info!("recording finished playing");
            self.stop();
        }
        expired
    }
}

impl<B: AudioBackend> Drop for PlaybackController<B> {
    fn drop(&mut self) { // quitting mid-clip still releases the device
        self.stop();
    }
}
