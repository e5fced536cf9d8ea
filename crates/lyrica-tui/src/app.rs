//! App: component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks.
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - Commands to the core flow out through a separate `cmd_tx` channel.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use lyrica_core::protocol::{Command, PlayerSnapshot};

use crate::core::{CoreEvent, SnapshotStore};
use crate::BroadcastMessage;
use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{now_playing::NowPlaying, queue_panel::QueuePanel, track_list::TrackList},
    widgets::{status_bar, toast::ToastManager},
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    StateUpdated(PlayerSnapshot),
    Warning(String),
}

const SEEK_SHORT_SECS: f64 = 5.0;
const SEEK_LONG_SECS: f64 = 30.0;
const VOLUME_STEP: f32 = 0.05;

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    // ── Shared state (passed read-only to components) ─────────────────────────
    pub state: AppState,

    // ── Components ────────────────────────────────────────────────────────────
    now_playing: NowPlaying,
    track_list: TrackList,
    queue_panel: QueuePanel,

    focus: ComponentId,

    cmd_tx: mpsc::Sender<CoreEvent>,
    snapshots: Arc<SnapshotStore>,

    /// Whether to quit on next iteration.
    should_quit: bool,

    toast: ToastManager,
}

impl App {
    pub async fn new(cmd_tx: mpsc::Sender<CoreEvent>, snapshots: Arc<SnapshotStore>) -> Self {
        let state = AppState::new(snapshots.get().await);
        let mut track_list = TrackList::new();
        track_list.sync(&state);
        Self {
            state,
            now_playing: NowPlaying::new(),
            track_list,
            queue_panel: QueuePanel::new(),
            focus: ComponentId::TrackList,
            cmd_tx,
            snapshots,
            should_quit: false,
            toast: ToastManager::new(),
        }
    }

    pub async fn run(mut self, mut broadcast_rx: broadcast::Receiver<BroadcastMessage>) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);

        // ── Background task: keyboard events ──────────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Background task: broadcast receiver (PlayerCore → AppMessage) ─────
        let bc_tx = tx.clone();
        let bc_snapshots = self.snapshots.clone();
        tokio::spawn(async move {
            loop {
                match broadcast_rx.recv().await {
                    Ok(msg) => {
                        let app_msg = match msg {
                            BroadcastMessage::StateUpdated => {
                                AppMessage::StateUpdated(bc_snapshots.get().await)
                            }
                            BroadcastMessage::Warning(w) => AppMessage::Warning(w),
                        };
                        if bc_tx.send(app_msg).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("broadcast receiver lagged by {} messages", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
        });

        // Toast expiry check.
        let mut toast_tick = tokio::time::interval(Duration::from_millis(250));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg).await;
                }
                _ = toast_tick.tick() => {
                    needs_redraw = self.toast.tick();
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    /// Returns true if the screen needs a redraw.
    async fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                for action in self.handle_key(key) {
                    self.dispatch(action).await;
                }
                true
            }
            AppMessage::Event(Event::Resize(_, _)) => true,
            AppMessage::Event(_) => false,
            AppMessage::StateUpdated(snapshot) => {
                self.on_state_updated(snapshot);
                true
            }
            AppMessage::Warning(w) => {
                self.toast.warning(w);
                true
            }
        }
    }

    fn on_state_updated(&mut self, snapshot: PlayerSnapshot) {
        let old = std::mem::replace(&mut self.state.snapshot, snapshot);

        for id in self.state.snapshot.liked.iter().filter(|id| !old.liked.contains(id)) {
            if let Some(entry) = self.state.snapshot.queue.get(*id) {
                self.toast.success(format!("liked {}", entry.title));
            }
        }
        for id in old.liked.iter().filter(|id| !self.state.snapshot.liked.contains(id)) {
            if let Some(entry) = self.state.snapshot.queue.get(*id) {
                self.toast.info(format!("unliked {}", entry.title));
            }
        }

        self.track_list.sync(&self.state);
        if old.state.current_track_id != self.state.current_id() {
            // Keep the cursor on the playing row when the track changes underneath it.
            self.track_list.on_action(&Action::JumpToCurrent, &self.state);
            self.queue_panel.on_action(&Action::SelectFirst, &self.state);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        // Global keys: always active regardless of focus
        match key.code {
            KeyCode::Char('q') if key.modifiers == KeyModifiers::NONE => return vec![Action::Quit],
            KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => {
                return vec![Action::Quit];
            }
            KeyCode::Tab | KeyCode::BackTab => return vec![Action::FocusNext],
            KeyCode::Char(' ') => return vec![Action::TogglePause],
            KeyCode::Char('n') => return vec![Action::Next],
            KeyCode::Char('p') => return vec![Action::Prev],
            KeyCode::Char('s') => return vec![Action::CycleShuffle],
            KeyCode::Char('r') => return vec![Action::CycleRepeat],
            KeyCode::Char('l') => return vec![Action::ToggleLike],
            KeyCode::Char('c') => return vec![Action::JumpToCurrent],
            KeyCode::Char('Q') => return vec![Action::ToggleQueue],
            KeyCode::Char('K') => return vec![Action::ToggleKeys],
            KeyCode::Char(',') => return vec![Action::SeekRelative(-SEEK_SHORT_SECS)],
            KeyCode::Char('.') => return vec![Action::SeekRelative(SEEK_SHORT_SECS)],
            KeyCode::Char('<') => return vec![Action::SeekRelative(-SEEK_LONG_SECS)],
            KeyCode::Char('>') => return vec![Action::SeekRelative(SEEK_LONG_SECS)],
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => {
                return vec![Action::Volume(self.state.stepped_volume(VOLUME_STEP))];
            }
            KeyCode::Left | KeyCode::Char('-') => {
                return vec![Action::Volume(self.state.stepped_volume(-VOLUME_STEP))];
            }
            _ => {}
        }

        match self.focus {
            ComponentId::TrackList => self.track_list.handle_key(key, &self.state),
            ComponentId::QueuePanel => self.queue_panel.handle_key(key, &self.state),
        }
    }

    async fn dispatch(&mut self, action: Action) {
        // Cursor movement only goes to the focused pane; everything else is
        // broadcast so both lists can react.
        let cursor_only = matches!(
            action,
            Action::SelectUp(_)
                | Action::SelectDown(_)
                | Action::SelectFirst
                | Action::SelectLast
        );
        if !cursor_only || self.focus == ComponentId::TrackList {
            self.track_list.on_action(&action, &self.state);
        }
        if !cursor_only || self.focus == ComponentId::QueuePanel {
            self.queue_panel.on_action(&action, &self.state);
        }

        self.apply_action(action).await;
    }

    async fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        match action {
            Action::FocusNext => {
                self.focus = match self.focus {
                    ComponentId::TrackList if self.state.show_queue => ComponentId::QueuePanel,
                    _ => ComponentId::TrackList,
                };
            }
            Action::ToggleQueue => {
                self.state.show_queue = !self.state.show_queue;
                if !self.state.show_queue {
                    self.focus = ComponentId::TrackList;
                }
            }
            Action::ToggleKeys => {
                self.state.show_keys = !self.state.show_keys;
            }
            Action::Quit => {
                self.should_quit = true;
                let _ = self.cmd_tx.send(CoreEvent::Shutdown).await;
            }
            other => {
                if let Some(cmd) = other.command() {
                    self.send_cmd(cmd).await;
                }
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.now_playing.draw(frame, outer[0], &self.state);
        status_bar::draw_separator(frame, outer[1]);

        if self.state.show_queue {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                .split(outer[2]);
            self.track_list.draw(
                frame,
                body[0],
                self.focus == ComponentId::TrackList,
                &self.state,
            );
            self.queue_panel.draw(
                frame,
                body[1],
                self.focus == ComponentId::QueuePanel,
                &self.state,
            );
        } else {
            self.track_list.draw(frame, outer[2], true, &self.state);
        }

        status_bar::draw_keys_bar(frame, outer[3], self.state.playback(), self.state.show_keys);

        // ── Toast notifications (topmost layer) ──────────────────────────────
        self.toast.draw(frame, area);
    }

    async fn send_cmd(&self, cmd: Command) {
        let _ = self.cmd_tx.send(CoreEvent::ClientCommand(cmd)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::test_state;

    async fn app(titles: &[&str]) -> (App, mpsc::Receiver<CoreEvent>) {
        let (tx, rx) = mpsc::channel(16);
        let snapshots = Arc::new(SnapshotStore::new(test_state(titles).snapshot));
        (App::new(tx, snapshots).await, rx)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn press(app: &mut App, code: KeyCode) {
        let msg = AppMessage::Event(Event::Key(key(code)));
        app.handle_message(msg).await;
    }

    fn next_command(rx: &mut mpsc::Receiver<CoreEvent>) -> Option<Command> {
        match rx.try_recv() {
            Ok(CoreEvent::ClientCommand(cmd)) => Some(cmd),
            _ => None,
        }
    }

    #[tokio::test]
    async fn transport_keys_forward_commands() {
        let (mut app, mut rx) = app(&["A", "B"]).await;
        press(&mut app, KeyCode::Char(' ')).await;
        press(&mut app, KeyCode::Char('n')).await;
        press(&mut app, KeyCode::Char('<')).await;
        assert_eq!(next_command(&mut rx), Some(Command::TogglePause));
        assert_eq!(next_command(&mut rx), Some(Command::Next));
        assert_eq!(next_command(&mut rx), Some(Command::SeekRelative { seconds: -30.0 }));
    }

    #[tokio::test]
    async fn volume_keys_step_from_snapshot_and_clamp() {
        let (mut app, mut rx) = app(&["A"]).await;
        app.state.snapshot.state.volume = 0.98;
        press(&mut app, KeyCode::Right).await;
        assert_eq!(next_command(&mut rx), Some(Command::Volume { value: 1.0 }));
    }

    #[tokio::test]
    async fn enter_plays_focused_row() {
        let (mut app, mut rx) = app(&["A", "B", "C"]).await;
        press(&mut app, KeyCode::Down).await;
        press(&mut app, KeyCode::Down).await;
        press(&mut app, KeyCode::Enter).await;
        assert_eq!(next_command(&mut rx), Some(Command::Select { id: 2 }));
    }

    #[tokio::test]
    async fn hiding_queue_returns_focus_to_tracks() {
        let (mut app, _rx) = app(&["A"]).await;
        press(&mut app, KeyCode::Tab).await;
        assert_eq!(app.focus, ComponentId::QueuePanel);
        press(&mut app, KeyCode::Char('Q')).await;
        assert_eq!(app.focus, ComponentId::TrackList);
        press(&mut app, KeyCode::Tab).await;
        assert_eq!(app.focus, ComponentId::TrackList);
    }

    #[tokio::test]
    async fn quit_shuts_the_core_down() {
        let (mut app, mut rx) = app(&["A"]).await;
        press(&mut app, KeyCode::Char('q')).await;
        assert!(app.should_quit);
        assert!(matches!(rx.try_recv(), Ok(CoreEvent::Shutdown)));
    }

    #[tokio::test]
    async fn like_changes_raise_toasts() {
        let (mut app, _rx) = app(&["A", "B"]).await;
        let mut snapshot = app.state.snapshot.clone();
        snapshot.liked = vec![1];
        app.on_state_updated(snapshot);
        assert_eq!(app.toast.len(), 1);
    }

    #[tokio::test]
    async fn track_change_moves_cursor_to_current() {
        let (mut app, _rx) = app(&["A", "B", "C"]).await;
        let mut snapshot = app.state.snapshot.clone();
        snapshot.state.current_track_id = Some(2);
        app.on_state_updated(snapshot);
        assert_eq!(app.track_list.selected(), 2);
    }
}
