use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, error, info, warn};

use crate::audio_api::{AudioAsset, AudioCommand};
use crate::error::PlaybackError;
use crate::pipeline::graph::EffectGraph;
use crate::pipeline::playback::{AudioBackend, RunningEngine};

mod effect;
mod engine;
mod frame;
mod player;
mod reverb;
mod sample_buffer;

#[cfg(test)]
pub use frame::StereoFrame;
pub use sample_buffer::SampleBuffer;

use engine::Engine;

// Opens a fresh output stream on the default device for every graph
#[derive(Default)]
pub struct CpalBackend;

impl AudioBackend for CpalBackend {
    type Engine = AudioHandle;

    fn start(&mut self, graph: &EffectGraph) -> Result<AudioHandle, PlaybackError> {
        for c in graph.connections() {
            debug!(from = ?c.from, to = ?c.to, sample_rate = c.format.sample_rate, "connect");
        }
        start_audio(graph).map_err(|e| {
            error!("audio engine failed to start: {e:#}");
            PlaybackError::EngineStart(format!("{e:#}"))
        })
    }
}

pub struct AudioHandle {
    tx: Sender<AudioCommand>,
    sample_time: Arc<AtomicU64>,
    stream: cpal::Stream,
}

impl AudioHandle {
    pub fn send(&self, cmd: AudioCommand) {
        if self.tx.try_send(cmd).is_err() {
            warn!("audio command queue full, command dropped");
        }
    }
}

impl RunningEngine for AudioHandle {
    fn schedule(&mut self, asset: &AudioAsset) {
        self.send(AudioCommand::Schedule {
            buffer: Arc::clone(&asset.buffer),
            source_rate: asset.format.sample_rate,
        });
    }

    fn sample_time(&self) -> u64 {
        self.sample_time.load(Ordering::Relaxed)
    }

    fn stop_player(&mut self) {
        self.send(AudioCommand::StopPlayer);
    }

    fn shutdown(self) {
        if let Err(e) = self.stream.pause() {
            warn!("could not pause output stream: {e}");
        }
        drop(self.stream); // closes the device and frees the graph
    }
}

pub fn start_audio(graph: &EffectGraph) -> anyhow::Result<AudioHandle> {
    let (tx, rx) = crossbeam_channel::bounded::<AudioCommand>(64);

    let host = cpal::default_host();
    let device = host.default_output_device().context("no default output device")?;
    let config = device.default_output_config().context("no default output config")?;

    let sample_rate = config.sample_rate();
    let channels = config.channels() as usize;
    let sample_time = Arc::new(AtomicU64::new(0));

    match config.sample_format() {
        cpal::SampleFormat::F32 => {
            let engine = Engine::new(graph, sample_rate, Arc::clone(&sample_time));
            let stream = build_output_stream_f32(&device, &config.into(), rx, engine, channels)?;
            stream.play().context("failed to play output stream")?;
            info!(sample_rate, channels, "output stream started");

            Ok(AudioHandle { tx, sample_time, stream })
        }
        other => anyhow::bail!("unsupported sample format {other:?} (only f32 supported for now)"),
    }
}

// ── Output stream ─────────────────────────────────────────────────

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    rx: Receiver<AudioCommand>,
    mut engine: Engine,
    channels: usize,
) -> anyhow::Result<cpal::Stream> {
    let err_fn = |err| error!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
            while let Ok(cmd) = rx.try_recv() {
                engine.handle_cmd(cmd);
            }
            engine.render_interleaved(data, channels);
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}
