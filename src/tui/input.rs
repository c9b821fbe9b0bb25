use std::time::Duration;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crate::shared::{EffectButton, InputEvent};
use super::mode::TuiState;

// poll for input from the terminal and resolve keys into semantic input
// events; the middle layer decides whether they're allowed
pub fn poll_input(timeout: Duration, ts: &TuiState) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(vec![]);
        }
        return Ok(handle_key(key.code, ts));
    }
    Ok(vec![])
}

fn handle_key(code: KeyCode, ts: &TuiState) -> Vec<InputEvent> {
    match code {
        KeyCode::Esc => vec![InputEvent::Quit],

        // while a dialog is up, Enter is the only thing that does anything
        KeyCode::Enter if ts.dialog_open => vec![InputEvent::DismissDialog],
        _ if ts.dialog_open => vec![],

        KeyCode::Char(' ') if ts.playing => vec![InputEvent::Stop],
        KeyCode::Char(c) => char_to_button(c)
            .map(|b| vec![InputEvent::PlayEffect(b)])
            .unwrap_or_default(),

        _ => vec![],
    }
}

// '1'..'6' in button order
fn char_to_button(c: char) -> Option<EffectButton> {
    let idx = c.to_digit(10)? as usize;
    EffectButton::from_index(idx.checked_sub(1)?)
}
