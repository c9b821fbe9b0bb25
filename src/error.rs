use std::path::PathBuf;

// Everything that can go wrong between a key press and sound coming out.
// None of these are fatal to the process; the screen turns them into a dialog.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("could not open recording {}: {source}", .path.display())]
    AssetOpen {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("no recording is loaded")]
    AssetUnavailable,

    #[error("could not build effect graph: {0}")]
    GraphConstruction(String),

    #[error("could not start audio engine: {0}")]
    EngineStart(String),
}

impl PlaybackError {
    // Fixed alert titles, one per failure family
    pub fn dialog_title(&self) -> &'static str {
        match self {
            PlaybackError::AssetOpen { .. } | PlaybackError::AssetUnavailable => "Audio File Error",
            PlaybackError::GraphConstruction(_) => "Audio Graph Error",
            PlaybackError::EngineStart(_) => "Audio Engine Error",
        }
    }
}
