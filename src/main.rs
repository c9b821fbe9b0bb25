mod shared;
mod tui;
mod audio_api;
mod audio;
mod error;
mod loader;
mod middle;
mod pipeline;

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use audio::CpalBackend;
use middle::Middle;
use pipeline::settings;
use shared::InputEvent;

/// Play back a recorded clip through pitch, speed, echo and reverb effects.
#[derive(Parser, Debug)]
#[command(name = "pitchperfect", version)]
struct Args {
    /// WAV file to play; defaults to the `recording` entry in settings
    recording: Option<PathBuf>,

    /// Directory holding the recording and `.pitchperfect/`
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Settings file to read instead of `<dir>/.pitchperfect/settings.json`
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let project_dir = match args.dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("no working directory")?,
    };
    init_logging(&project_dir)?;

    let settings_path = args
        .settings
        .unwrap_or_else(|| settings::settings_file_path(&project_dir));
    let settings = settings::load_settings(&settings_path)?;
    let recording_path = args
        .recording
        .unwrap_or_else(|| settings.recording_path(&project_dir));

    // open the recording once; a failure is shown on screen rather than bailing
    let recording = loader::sample_loader::open_recording(&recording_path);
    let mut middle = Middle::new(CpalBackend, recording);
    info!(path = %recording_path.display(), "play sounds screen loaded");

    terminal::enable_raw_mode()?;
    let _guard = RawModeGuard; // auto drops when out of scope

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let tick_rate = Duration::from_millis(settings.tick_ms.max(1));
    let mut tui_state = tui::mode::TuiState::default();

    loop {
        let ds = middle.display_state();
        tui_state.dialog_open = ds.dialog.is_some();
        tui_state.playing = ds.play_state == shared::PlayState::Playing;

        term.draw(|frame| {
            tui::view::render(frame, frame.area(), &ds);
        })?;

        let events = tui::input::poll_input(tick_rate, &tui_state)?;
        for event in events {
            if event == InputEvent::Quit {
                info!("quit");
                drop(middle); // releases the output device before the terminal
                drop(term);
                return Ok(());
            }
            middle.handle_input(event);
        }

        // fires the completion timer on this thread, never the audio one
        middle.tick(Instant::now());
    }
}

// The terminal is ours while the TUI runs, so logs go to a file
fn init_logging(project_dir: &Path) -> anyhow::Result<()> {
    let log_path = settings::log_file_path(project_dir);
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
