//! TrackList component: the catalog, one row per track.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        style_default, style_playing, style_secondary, style_selected_focused, C_LIKED, C_MUTED,
        C_SECONDARY,
    },
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
    },
};

#[derive(Default)]
pub struct TrackList {
    list: ScrollableList,
}

impl TrackList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.list.selected
    }

    /// Keep the cursor range in step with the catalog.
    pub fn sync(&mut self, state: &AppState) {
        self.list.set_len(state.track_count());
    }
}

impl Component for TrackList {
    fn id(&self) -> ComponentId {
        ComponentId::TrackList
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        self.sync(state);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => vec![Action::SelectUp(1)],
            KeyCode::Down | KeyCode::Char('j') => vec![Action::SelectDown(1)],
            KeyCode::PageUp => vec![Action::SelectUp(10)],
            KeyCode::PageDown => vec![Action::SelectDown(10)],
            KeyCode::Home | KeyCode::Char('g') => vec![Action::SelectFirst],
            KeyCode::End | KeyCode::Char('G') => vec![Action::SelectLast],
            KeyCode::Enter if !self.list.is_empty() => vec![Action::Select(self.list.selected)],
            KeyCode::Char('L') if !self.list.is_empty() => {
                vec![Action::ToggleLikeAt(self.list.selected)]
            }
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, state: &AppState) {
        self.sync(state);
        match action {
            Action::SelectUp(n) => self.list.select_up(*n),
            Action::SelectDown(n) => self.list.select_down(*n),
            Action::SelectFirst => self.list.select_first(),
            Action::SelectLast => self.list.select_last(),
            Action::JumpToCurrent => {
                if let Some(id) = state.current_id() {
                    self.list.select(id);
                }
            }
            _ => {}
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        self.sync(state);
        let count = format!("{} tracks", state.track_count());
        let block = pane_chrome(
            "tracks",
            Some('1'),
            focused,
            Some(Badge {
                text: &count,
                color: C_SECONDARY,
            }),
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.list.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  catalog is empty", Style::default().fg(C_MUTED))),
                inner,
            );
            return;
        }

        let height = inner.height as usize;
        self.list.ensure_visible(height);
        let items: Vec<ListItem> = self
            .list
            .visible_range(height)
            .filter_map(|i| state.snapshot.queue.get(i))
            .map(|entry| {
                let marker = if entry.is_current {
                    if state.playback().is_playing {
                        "▶ "
                    } else {
                        "⏸ "
                    }
                } else {
                    "  "
                };
                let heart = if state.is_liked(entry.id) { "♥ " } else { "  " };
                let title_style = if entry.is_current {
                    style_playing()
                } else {
                    style_default()
                };
                let row_style = if entry.id == self.list.selected && focused {
                    style_selected_focused()
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, style_playing()),
                    Span::styled(heart, Style::default().fg(C_LIKED)),
                    Span::styled(entry.title.clone(), title_style),
                    Span::styled(format!("  {}", entry.artist), style_secondary()),
                ]))
                .style(row_style)
            })
            .collect();

        frame.render_widget(List::new(items), inner);
    }
}
