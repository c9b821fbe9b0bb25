// Read once at startup; nothing here is ever written back.
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

pub const APP_DIR: &str = ".pitchperfect";
const SETTINGS_FILE: &str = "settings.json";
pub const LOG_FILE: &str = "pitchperfect.log";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub recording: PathBuf, // relative paths resolve against the project dir
    pub tick_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recording: PathBuf::from("recording.wav"),
            tick_ms: 16, // ~60fps
        }
    }
}

impl Settings {
    pub fn recording_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.recording)
    }
}

// <project_dir>/.pitchperfect/settings.json
pub fn settings_file_path(project_dir: &Path) -> PathBuf {
    project_dir.join(APP_DIR).join(SETTINGS_FILE)
}

pub fn log_file_path(project_dir: &Path) -> PathBuf {
    project_dir.join(APP_DIR).join(LOG_FILE)
}

// A missing file means defaults; a broken one is an error worth reporting
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };
    serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
}
