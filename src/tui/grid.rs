use crate::shared::{DisplayState, EffectButton, PlayState};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

const COLS: usize = 3;
const ROWS: usize = 2;

// The six effect buttons, two rows of three
pub fn draw_button_grid(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let row_constraints = [Constraint::Ratio(1, ROWS as u32); ROWS];
    let col_constraints = [Constraint::Ratio(1, COLS as u32); COLS];

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(area);

    for (row_idx, row_area) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(col_constraints)
            .split(*row_area);

        for (col_idx, cell_area) in cols.iter().enumerate() {
            let idx = row_idx * COLS + col_idx;
            let Some(button) = EffectButton::from_index(idx) else {
                continue;
            };
            let style = button_style(button, state);
            let block = Block::bordered().border_style(style);
            let label = Paragraph::new(format!("{} {}", idx + 1, button.label()))
                .style(style)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(label, *cell_area);
        }
    }
}

fn button_style(button: EffectButton, state: &DisplayState) -> Style {
    let sounding = state.play_state == PlayState::Playing && state.last_effect == Some(button);
    if sounding {
        Style::default().fg(Color::LightMagenta).bg(Color::Magenta).add_modifier(Modifier::BOLD)
    } else if state.effects_enabled[button.index()] {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}
