//! Main application state and UI loop
//!
//! Contains the App struct and the keyboard and mouse handling of the dashboard

use crate::events::Event as WorkerEvent;
use crate::ui::dashboard::forms::FormState;
use crate::ui::dashboard::utils::{CanvasHit, canvas_inner, dashboard_layout, hit_test};
use crate::ui::dashboard::{DashboardState, UIConfig, render_dashboard};
use crate::workers::{Request, RequestWorker};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use ratatui::{Terminal, backend::Backend};
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc};

/// What the UI loop should do after an input event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Dispatch(Request),
}

impl From<Option<Request>> for Action {
    fn from(request: Option<Request>) -> Self {
        request.map_or(Action::None, Action::Dispatch)
    }
}

/// Application state
pub struct App {
    state: DashboardState,

    /// Receives events from background tasks.
    event_receiver: mpsc::Receiver<WorkerEvent>,

    /// Broadcasts shutdown signal to background tasks.
    shutdown_sender: broadcast::Sender<()>,

    /// Runs API requests issued by the user.
    requests: RequestWorker,

    /// Terminal area of the last drawn frame, for mapping mouse clicks.
    last_area: Rect,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(
        event_receiver: mpsc::Receiver<WorkerEvent>,
        shutdown_sender: broadcast::Sender<()>,
        requests: RequestWorker,
        ui_config: UIConfig,
    ) -> Self {
        Self {
            state: DashboardState::new(Instant::now(), ui_config),
            event_receiver,
            shutdown_sender,
            requests,
            last_area: Rect::default(),
        }
    }

    fn dispatch(&self, action: Action) -> bool {
        match action {
            Action::None => true,
            Action::Dispatch(request) => {
                self.requests.spawn(request);
                true
            }
            Action::Quit => {
                let _ = self.shutdown_sender.send(());
                false
            }
        }
    }
}

/// Runs the application UI in a loop, handling events and rendering the dashboard.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    let mut shutdown_receiver = app.shutdown_sender.subscribe();

    loop {
        // Shutdown requested elsewhere, e.g. Ctrl+C
        if shutdown_receiver.try_recv().is_ok() {
            return Ok(());
        }

        // Queue all incoming events for processing
        while let Ok(event) = app.event_receiver.try_recv() {
            app.state.add_event(event);
        }

        app.state.update();
        let completed = terminal.draw(|f| render_dashboard(f, &app.state))?;
        app.last_area = completed.area;

        if event::poll(Duration::from_millis(100))? {
            let action = match event::read()? {
                // Skip events that are not KeyEventKind::Press
                Event::Key(key) if key.kind == event::KeyEventKind::Release => continue,
                Event::Key(key) => handle_key(&mut app.state, key),
                Event::Mouse(mouse) => handle_mouse(&mut app.state, app.last_area, mouse),
                _ => Action::None,
            };
            if !app.dispatch(action) {
                return Ok(());
            }
        }
    }
}

/// Applies a key press to the dashboard.
pub fn handle_key(state: &mut DashboardState, key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    if let Some(form) = state.form.as_mut() {
        match key.code {
            KeyCode::Esc => state.close_form(),
            KeyCode::Enter => return state.submit_form().into(),
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
            KeyCode::Backspace => form.pop_char(),
            KeyCode::Char(c) => form.push_char(c),
            _ => {}
        }
        return Action::None;
    }

    let selected = state.selected_id();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return Action::Quit,
        KeyCode::Tab | KeyCode::Right | KeyCode::Down => state.select_next(),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Up => state.select_previous(),
        KeyCode::Enter => {
            if let Some(id) = selected {
                state.toggle_actions(&id);
            }
        }
        KeyCode::Char('d') => {
            if let Some(id) = selected {
                state.toggle_diagram(&id);
            }
        }
        KeyCode::Char('x') => {
            if let Some(id) = selected {
                return state.delete_indicator(&id).into();
            }
        }
        KeyCode::Char('n') => state.open_form(FormState::create_indicator(state.create_position)),
        KeyCode::Char('u') => state.open_form(FormState::update_indicator(selected.as_ref())),
        KeyCode::Char('b') => state.open_form(FormState::change_background()),
        KeyCode::Char('i') => state.open_form(FormState::upload_image()),
        _ => {}
    }
    Action::None
}

/// Applies a mouse click to the dashboard drawn in `area`.
pub fn handle_mouse(state: &mut DashboardState, area: Rect, mouse: MouseEvent) -> Action {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return Action::None;
    }

    let inner = canvas_inner(dashboard_layout(area).canvas);
    let Some(hit) = hit_test(&state.widgets, inner, mouse.column, mouse.row) else {
        return Action::None;
    };

    match hit {
        CanvasHit::Background(position) => {
            state.set_create_position(position);
            return Action::None;
        }
        // Widgets are not interactive while a form is open
        _ if state.form.is_some() => return Action::None,
        _ => {}
    }

    match hit {
        CanvasHit::Value(index) => {
            state.select(Some(index));
            if let Some(id) = state.selected_id() {
                state.toggle_actions(&id);
            }
            Action::None
        }
        CanvasHit::Diagram(index) => {
            state.select(Some(index));
            if let Some(id) = state.selected_id() {
                state.toggle_diagram(&id);
            }
            Action::None
        }
        CanvasHit::Delete(index) => {
            state.select(Some(index));
            match state.selected_id() {
                Some(id) => state.delete_indicator(&id).into(),
                None => Action::None,
            }
        }
        CanvasHit::Background(_) => Action::None,
    }
}
