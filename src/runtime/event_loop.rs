use std::sync::mpsc;
use std::time::Instant;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use bento_player::config;
use bento_player::engine::AudioResource;

use crate::app::App;
use crate::mpris::ControlCmd;
use crate::mpris::MprisHandle;
use crate::runtime::mpris_sync::{MprisView, current_view, update_mpris};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Last track/playing/duration triple pushed to MPRIS.
    pub last_mpris: MprisView,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` seeded from `app`.
    pub fn new<R: AudioResource>(app: &App<R>) -> Self {
        Self {
            last_mpris: current_view(app),
        }
    }
}

/// Main terminal event loop: drains resource events, draws, and dispatches
/// keyboard, mouse and MPRIS input. Returns `Ok(())` when shutdown is requested.
pub fn run<R: AudioResource>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<R>,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick = settings.engine.tick();

    loop {
        app.engine.pump();

        // Keep MPRIS in sync even when changes come from media keys or auto-advance.
        let view = current_view(app);
        if view != state.last_mpris {
            update_mpris(mpris, app);
            state.last_mpris = view;
        }

        app.engine.bridge_mut().advance();

        let mut bar = None;
        terminal.draw(|f| bar = Some(ui::draw(f, app, settings)))?;
        if let Some(area) = bar {
            app.set_progress_area(area);
        }

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app) {
                return Ok(());
            }
        }

        if !event::poll(tick)? {
            app.engine.tick(Instant::now());
            continue;
        }

        match event::read()? {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(cmd) = key_command(key, settings.controls.scrub_seconds) {
                    let _ = control_tx.send(cmd);
                }
            }
            Event::Mouse(mouse) => handle_mouse_event(mouse, app),
            _ => {}
        }
    }
}

/// Apply one control command. Returns `true` when the app should quit.
fn handle_control_cmd<R: AudioResource>(cmd: ControlCmd, app: &mut App<R>) -> bool {
    debug!(?cmd, "control command");
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => app.engine.play(),
        ControlCmd::Pause | ControlCmd::Stop => app.engine.pause(),
        ControlCmd::PlayPause => app.engine.toggle_play(),
        ControlCmd::Next => app.engine.skip_next(),
        ControlCmd::Prev => app.engine.skip_previous(),
        ControlCmd::SeekBy(delta) => app.engine.seek_by(delta),
    }
    false
}

/// Keys route through the same commands MPRIS sends.
fn key_command(key: KeyEvent, scrub_seconds: u64) -> Option<ControlCmd> {
    let scrub = scrub_seconds as f64;
    match key.code {
        KeyCode::Char('q') => Some(ControlCmd::Quit),
        KeyCode::Char('p') | KeyCode::Char(' ') => Some(ControlCmd::PlayPause),
        KeyCode::Char('l') => Some(ControlCmd::Next),
        KeyCode::Char('h') => Some(ControlCmd::Prev),
        KeyCode::Char('L') => Some(ControlCmd::SeekBy(scrub)),
        KeyCode::Char('H') => Some(ControlCmd::SeekBy(-scrub)),
        _ => None,
    }
}

fn handle_mouse_event<R: AudioResource>(mouse: MouseEvent, app: &mut App<R>) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
            app.click(mouse.column, mouse.row);
        }
        MouseEventKind::Moved => app.hover(mouse.column, mouse.row),
        _ => {}
    }
}
