// Turns an effect request into an ordered chain:
// source -> time/pitch -> (echo) -> (reverb) -> output

use crate::audio_api::{AudioAsset, ProcessingFormat};
use crate::error::PlaybackError;
use super::effects::{
    GraphNode, TimePitch, MAX_PITCH_CENTS, MAX_RATE, MIN_PITCH_CENTS, MIN_RATE,
    NO_PITCH_SHIFT, UNITY_RATE,
};

/// Which effects to put between the recording and the speakers.
/// Rate and pitch are not meant to be combined, but nothing stops it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EffectRequest {
    pub rate: Option<f32>,
    pub pitch: Option<f32>, // cents
    pub echo: bool,
    pub reverb: bool,
}

impl EffectRequest {
    pub const fn rate(rate: f32) -> Self {
        Self { rate: Some(rate), pitch: None, echo: false, reverb: false }
    }

    pub const fn pitch(cents: f32) -> Self {
        Self { rate: None, pitch: Some(cents), echo: false, reverb: false }
    }

    pub const fn echo() -> Self {
        Self { rate: None, pitch: None, echo: true, reverb: false }
    }

    pub const fn reverb() -> Self {
        Self { rate: None, pitch: None, echo: false, reverb: true }
    }

    // rate used for timing; absent means the clip plays at its own speed
    pub fn rate_multiplier(&self) -> f32 {
        self.rate.unwrap_or(UNITY_RATE)
    }
}

// One edge in the chain. Both ends run at the source's processing format.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Endpoint {
    Source,
    Node(GraphNode),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub from: Endpoint,
    pub to: Endpoint,
    pub format: ProcessingFormat,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EffectGraph {
    pub source: ProcessingFormat,
    nodes: Vec<GraphNode>, // time/pitch first, output last
}

impl EffectGraph {
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn time_pitch(&self) -> TimePitch {
        match self.nodes.first() {
            Some(GraphNode::TimePitch(tp)) => *tp,
            _ => TimePitch::default(),
        }
    }

    // Connect adjacent pairs over [source, nodes...]
    pub fn connections(&self) -> Vec<Connection> {
        let chain: Vec<Endpoint> = std::iter::once(Endpoint::Source)
            .chain(self.nodes.iter().copied().map(Endpoint::Node))
            .collect();
        chain
            .windows(2)
            .map(|pair| Connection { from: pair[0], to: pair[1], format: self.source })
            .collect()
    }

    pub fn describe(&self) -> String {
        let labels: Vec<String> = self.nodes.iter().map(|n| n.label()).collect();
        format!("Source -> {}", labels.join(" -> "))
    }
}

pub fn build_graph(asset: &AudioAsset, request: &EffectRequest) -> Result<EffectGraph, PlaybackError> {
    let format = asset.format;
    if asset.length() == 0 {
        return Err(PlaybackError::GraphConstruction("recording is empty".into()));
    }
    if format.sample_rate == 0 {
        return Err(PlaybackError::GraphConstruction("recording has no sample rate".into()));
    }
    if format.channels == 0 || format.channels > 2 {
        return Err(PlaybackError::GraphConstruction(format!(
            "unsupported channel count {}",
            format.channels
        )));
    }

    let time_pitch = TimePitch {
        rate: checked(request.rate, UNITY_RATE, MIN_RATE, MAX_RATE, "rate")?,
        pitch: checked(request.pitch, NO_PITCH_SHIFT, MIN_PITCH_CENTS, MAX_PITCH_CENTS, "pitch")?,
    };

    // the time/pitch stage is always there, even as a pass-through
    let mut nodes = vec![GraphNode::TimePitch(time_pitch)];
    if request.echo {
        nodes.push(GraphNode::echo());
    }
    if request.reverb {
        nodes.push(GraphNode::reverb());
    }
    nodes.push(GraphNode::Output);

    Ok(EffectGraph { source: format, nodes })
}

fn checked(value: Option<f32>, default: f32, min: f32, max: f32, what: &str) -> Result<f32, PlaybackError> {
    let v = value.unwrap_or(default);
    if !v.is_finite() || v < min || v > max {
        return Err(PlaybackError::GraphConstruction(format!(
            "{what} {v} outside {min}..={max}"
        )));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middle::EFFECT_TABLE;
    use crate::pipeline::effects::{EchoPreset, ReverbPreset};
    use crate::pipeline::test_fixture::asset_with;

    #[test]
    fn every_button_builds_a_well_formed_chain() {
        let asset = asset_with(44100, 44100);
        for (button, request) in EFFECT_TABLE {
            let graph = build_graph(&asset, &request).unwrap();
            let nodes = graph.nodes();
            assert!(matches!(nodes.first(), Some(GraphNode::TimePitch(_))), "{button:?}");
            assert_eq!(nodes.last(), Some(&GraphNode::Output), "{button:?}");
            let expected = 2 + request.echo as usize + request.reverb as usize;
            assert_eq!(nodes.len(), expected, "{button:?}");
        }
    }

    #[test]
    fn echo_comes_before_reverb() {
        let asset = asset_with(44100, 44100);
        let request = EffectRequest { echo: true, reverb: true, ..Default::default() };
        let graph = build_graph(&asset, &request).unwrap();
        assert_eq!(
            graph.nodes(),
            &[
                GraphNode::TimePitch(TimePitch::default()),
                GraphNode::Echo(EchoPreset::MultiEcho),
                GraphNode::Reverb { preset: ReverbPreset::Cathedral, wet_dry_mix: 50.0 },
                GraphNode::Output,
            ]
        );
    }

    #[test]
    fn vader_is_pitch_only() {
        let asset = asset_with(44100, 44100);
        let graph = build_graph(&asset, &EffectRequest::pitch(-1000.0)).unwrap();
        assert_eq!(
            graph.nodes(),
            &[GraphNode::TimePitch(TimePitch { rate: 1.0, pitch: -1000.0 }), GraphNode::Output]
        );
    }

    #[test]
    fn connections_pair_up_neighbours_at_source_format() {
        let asset = asset_with(44100, 22050);
        let graph = build_graph(&asset, &EffectRequest::echo()).unwrap();
        let conns = graph.connections();
        assert_eq!(conns.len(), 3);
        assert_eq!(conns[0].from, Endpoint::Source);
        assert_eq!(conns[0].to, Endpoint::Node(graph.nodes()[0]));
        assert_eq!(conns[1].to, Endpoint::Node(GraphNode::echo()));
        assert_eq!(conns[2].to, Endpoint::Node(GraphNode::Output));
        assert!(conns.iter().all(|c| c.format.sample_rate == 22050));
    }

    #[test]
    fn empty_recording_is_rejected() {
        let asset = asset_with(0, 44100);
        let err = build_graph(&asset, &EffectRequest::default()).unwrap_err();
        assert!(matches!(err, PlaybackError::GraphConstruction(_)));
    }

    #[test]
    fn zero_sample_rate_is_rejected() {
        let asset = asset_with(100, 0);
        assert!(build_graph(&asset, &EffectRequest::default()).is_err());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let asset = asset_with(100, 44100);
        assert!(build_graph(&asset, &EffectRequest::rate(0.0)).is_err());
        assert!(build_graph(&asset, &EffectRequest::rate(f32::NAN)).is_err());
        assert!(build_graph(&asset, &EffectRequest::pitch(5000.0)).is_err());
        assert!(build_graph(&asset, &EffectRequest::rate(32.0)).is_ok());
    }
}
