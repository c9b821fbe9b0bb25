use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use super::effect::{Effect, MultiTapEcho, TimePitchNode};
use super::frame::StereoFrame;
use super::player::PlayerNode;
use super::reverb::Reverb;
use crate::audio_api::AudioCommand;
use crate::pipeline::effects::GraphNode;
use crate::pipeline::graph::EffectGraph;

// Largest block rendered in one go; bigger device buffers are split up so the
// callback never allocates
pub const MAX_BLOCK: usize = 4096;

// Build the DSP stage for one graph node. The output sink has no stage of its
// own, the engine writes straight to the device buffer.
pub fn realise(node: &GraphNode, sample_rate: f32) -> Option<Box<dyn Effect>> {
    match node {
        GraphNode::TimePitch(tp) => Some(Box::new(TimePitchNode::new(*tp, sample_rate))),
        GraphNode::Echo(preset) => Some(Box::new(MultiTapEcho::new(*preset, sample_rate))),
        GraphNode::Reverb { preset, wet_dry_mix } => {
            Some(Box::new(Reverb::new(*preset, *wet_dry_mix, sample_rate)))
        }
        GraphNode::Output => None,
    }
}

// Lives inside the cpal callback: one player feeding a fixed chain of stages
pub struct Engine {
    sample_rate: f32,
    rate: f32, // from the time/pitch node, applied as player read speed
    player: PlayerNode,
    chain: Vec<Box<dyn Effect>>,
    scratch: Vec<StereoFrame>,
}

impl Engine {
    pub fn new(graph: &EffectGraph, sample_rate: u32, sample_time: Arc<AtomicU64>) -> Self {
        let sr = sample_rate as f32;
        Self {
            sample_rate: sr,
            rate: graph.time_pitch().rate,
            player: PlayerNode::new(sample_time),
            chain: graph.nodes().iter().filter_map(|n| realise(n, sr)).collect(),
            scratch: vec![StereoFrame::zero(); MAX_BLOCK],
        }
    }

    #[cfg(test)]
    pub fn stage_count(&self) -> usize {
        self.chain.len()
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::Schedule { buffer, source_rate } => {
                // device-rate conversion and the requested rate both land on the read speed
                let speed = self.rate as f64 * source_rate as f64 / self.sample_rate as f64;
                self.player.schedule(buffer, speed);
            }
            AudioCommand::StopPlayer => self.player.stop(),
        }
    }

    pub fn render_block(&mut self, out: &mut [StereoFrame]) {
        out.fill(StereoFrame::zero());
        self.player.render_into(out);
        for stage in &mut self.chain {
            stage.process(out);
        }
    }

    // Interleaved device buffer of any width; mono gets the L/R average
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for chunk in data.chunks_mut(MAX_BLOCK * channels) {
            let frames = chunk.len() / channels;
            let mut block = std::mem::take(&mut self.scratch);
            self.render_block(&mut block[..frames]);
            for (samples, f) in chunk.chunks_exact_mut(channels).zip(&block[..frames]) {
                if channels == 1 {
                    samples[0] = (f.left + f.right) * 0.5;
                } else {
                    samples[0] = f.left;
                    samples[1] = f.right;
                    samples[2..].fill(0.0);
                }
            }
            self.scratch = block;
        }
    }
}
