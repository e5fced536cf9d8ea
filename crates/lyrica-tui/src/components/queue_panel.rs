//! QueuePanel component: what plays next without user input.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use lyrica_core::queue::QueueView;
use lyrica_core::state::RepeatMode;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_default, style_muted, style_secondary, style_selected_focused, C_MODE_ON},
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
    },
};

#[derive(Default)]
pub struct QueuePanel {
    list: ScrollableList,
}

impl QueuePanel {
    pub fn new() -> Self {
        Self::default()
    }

    fn upcoming(state: &AppState) -> Vec<usize> {
        QueueView::upcoming_in(state.track_count(), state.playback())
    }

    /// Placeholder shown when the next track is not a fixed sequence.
    fn notice(state: &AppState) -> Option<&'static str> {
        let playback = state.playback();
        if playback.shuffle {
            Some("shuffle is on, next track is random")
        } else if playback.repeat_mode == RepeatMode::One {
            Some("repeating the current track")
        } else {
            None
        }
    }
}

impl Component for QueuePanel {
    fn id(&self) -> ComponentId {
        ComponentId::QueuePanel
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        let upcoming = Self::upcoming(state);
        self.list.set_len(upcoming.len());
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => vec![Action::SelectUp(1)],
            KeyCode::Down | KeyCode::Char('j') => vec![Action::SelectDown(1)],
            KeyCode::Home | KeyCode::Char('g') => vec![Action::SelectFirst],
            KeyCode::End | KeyCode::Char('G') => vec![Action::SelectLast],
            KeyCode::Enter => upcoming
                .get(self.list.selected)
                .map(|&id| vec![Action::Select(id)])
                .unwrap_or_default(),
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, state: &AppState) {
        self.list.set_len(Self::upcoming(state).len());
        match action {
            Action::SelectUp(n) => self.list.select_up(*n),
            Action::SelectDown(n) => self.list.select_down(*n),
            Action::SelectFirst => self.list.select_first(),
            Action::SelectLast => self.list.select_last(),
            // The queue shifts under the cursor on every track change.
            Action::Select(_) | Action::Next | Action::Prev => self.list.select_first(),
            _ => {}
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let upcoming = Self::upcoming(state);
        self.list.set_len(upcoming.len());

        let count = upcoming.len().to_string();
        let badge = (!upcoming.is_empty()).then(|| Badge {
            text: &count,
            color: C_MODE_ON,
        });
        let block = pane_chrome("up next", Some('2'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if let Some(note) = Self::notice(state) {
            frame.render_widget(Paragraph::new(Span::styled(format!("  {}", note), style_muted())), inner);
            return;
        }
        if upcoming.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  stops after this track", style_muted())),
                inner,
            );
            return;
        }

        let height = inner.height as usize;
        self.list.ensure_visible(height);
        let items: Vec<ListItem> = self
            .list
            .visible_range(height)
            .filter_map(|row| {
                let entry = state.snapshot.queue.get(upcoming[row])?;
                let style = if focused && row == self.list.selected {
                    style_selected_focused()
                } else {
                    style_default()
                };
                Some(ListItem::new(Line::from(vec![
                    Span::styled(format!("{:>3} ", row + 1), style_secondary()),
                    Span::styled(entry.title.clone(), style),
                ])))
            })
            .collect();
        frame.render_widget(List::new(items), inner);
    }
}
