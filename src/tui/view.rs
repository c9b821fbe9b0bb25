use crate::shared::{Dialog, DisplayState, PlayState, DISMISS_LABEL};
use super::grid::draw_button_grid;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // status screen
            Constraint::Min(6),    // effect buttons
            Constraint::Length(3), // stop button
            Constraint::Length(1), // key help
        ])
        .split(area);

    draw_screen(frame, sections[0], state);
    draw_button_grid(frame, sections[1], state);
    draw_stop(frame, sections[2], state);
    draw_help(frame, sections[3]);

    if let Some(dialog) = &state.dialog {
        draw_dialog(frame, area, dialog);
    }
}

fn draw_screen(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let name = if state.recording_name.is_empty() {
        "no recording".to_string()
    } else {
        format!("{} ({:.1}s)", state.recording_name, state.duration_secs)
    };
    let status = match (state.play_state, state.last_effect, state.remaining_secs) {
        (PlayState::Playing, Some(effect), Some(left)) => format!("PLAYING {}  {:.1}s", effect.label(), left.max(0.0)),
        (PlayState::Playing, _, _) => "PLAYING".to_string(),
        (PlayState::NotPlaying, _, _) => "READY".to_string(),
    };
    let lines = vec![
        Line::from(Span::styled(name, Style::default().fg(Color::Cyan))),
        Line::from(Span::styled(status, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(
            state.chain.clone().unwrap_or_default(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let screen = Paragraph::new(lines).block(Block::bordered().title(" pitchperfect "));
    frame.render_widget(screen, area);
}

fn draw_stop(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let style = if state.stop_enabled {
        Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let stop = Paragraph::new("SPACE  STOP")
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::bordered().border_style(style));
    frame.render_widget(stop, area);
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new("1-6 play effect   space stop   enter dismiss   esc quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}

fn draw_dialog(frame: &mut Frame, area: Rect, dialog: &Dialog) {
    let popup = centered(area, 50, 7);
    let lines = vec![
        Line::from(dialog.message.as_str()),
        Line::from(""),
        Line::from(Span::styled(
            format!("[enter] {}", DISMISS_LABEL),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(
            Block::bordered()
                .title(format!(" {} ", dialog.title))
                .border_style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(Clear, popup);
    frame.render_widget(body, popup);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(area.x + (area.width - w) / 2, area.y + (area.height - h) / 2, w, h)
}
