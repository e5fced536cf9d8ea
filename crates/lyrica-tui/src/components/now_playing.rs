//! NowPlaying: 2-row top bar.
//!
//! Row 1: transport glyph, title, artist, like heart.
//! Row 2: progress bar with elapsed/total.
//!
//! Not focusable.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::{
    app_state::AppState,
    theme::{style_muted, style_secondary, C_ACCENT, C_LIKED, C_PAUSED, C_PLAYING, C_PRIMARY},
    widgets::progress_bar::draw_progress,
};

pub struct NowPlaying;

impl NowPlaying {
    pub fn new() -> Self {
        Self
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        frame.render_widget(Clear, area);
        if area.height < 2 {
            frame.render_widget(Paragraph::new(title_line(state)), area);
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);
        frame.render_widget(Paragraph::new(title_line(state)), rows[0]);
        if state.snapshot.current_track.is_some() {
            draw_progress(frame, rows[1], state.playback());
        }
    }
}

impl Default for NowPlaying {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn title_line(state: &AppState) -> Line<'static> {
    let mut spans = vec![Span::styled(
        " lyrica ",
        Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
    )];

    let Some(track) = &state.snapshot.current_track else {
        spans.push(Span::styled("nothing selected", style_muted()));
        return Line::from(spans);
    };

    let (glyph, color) = if state.playback().is_playing {
        ("▶ ", C_PLAYING)
    } else {
        ("⏸ ", C_PAUSED)
    };
    spans.push(Span::styled(glyph, Style::default().fg(color)));
    spans.push(Span::styled(
        track.title.clone(),
        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled(format!(" · {}", track.artist), style_secondary()));
    if state.snapshot.current_liked {
        spans.push(Span::styled(" ♥", Style::default().fg(C_LIKED)));
    }
    Line::from(spans)
}
