//! Status bar: bottom line with transport modes and keybindings.

use lyrica_core::state::{PlaybackState, RepeatMode};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{style_mode, C_MUTED, C_PRIMARY, C_SEPARATOR};

pub const KEYS: &str = "↑↓/jk select  Enter play  Space pause  n/p next/prev  s shuffle  r repeat  l like  c current  ,/. seek 5s  </> seek 30s  ←→ vol  Q queue  Tab pane  K keys  q quit";

/// Draw a horizontal separator line.
pub fn draw_separator(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(C_SEPARATOR),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

fn repeat_badge(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::Off => "repeat",
        RepeatMode::All => "repeat all",
        RepeatMode::One => "repeat one",
    }
}

/// Draw the footer: shuffle/repeat badges, volume, then the key legend if
/// `show_keys`.
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, state: &PlaybackState, show_keys: bool) {
    let mut spans = vec![
        Span::styled(" shuffle ", style_mode(state.shuffle)),
        Span::styled(
            format!(" {} ", repeat_badge(state.repeat_mode)),
            style_mode(state.repeat_mode != RepeatMode::Off),
        ),
        Span::styled(
            format!(" vol {:>3}% ", (state.volume * 100.0).round() as u32),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
    ];
    if show_keys {
        spans.push(Span::styled(format!(" {}", KEYS), Style::default().fg(C_MUTED)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
