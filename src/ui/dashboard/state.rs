//! Dashboard state management
//!
//! Owns the widgets, the chart registry and the activity log. Rendering is a pure
//! projection of this state.

use super::forms::FormState;
use super::widget::Widget;
use crate::chart::ChartRegistry;
use crate::consts::dashboard_consts::MAX_ACTIVITY_LOGS;
use crate::events::{Event as DashboardEvent, EventType};
use crate::hub::ConnectionState;
use crate::indicator::{IndicatorId, Position};
use crate::logging::LogLevel;

use std::collections::VecDeque;
use std::time::Instant;

/// UI configuration data grouped by concern
#[derive(Debug, Clone)]
pub struct UIConfig {
    pub with_background_color: bool,
    pub api_url: String,
    pub hub_url: String,
}

impl UIConfig {
    pub fn new(with_background_color: bool, api_url: String, hub_url: String) -> Self {
        Self {
            with_background_color,
            api_url,
            hub_url,
        }
    }
}

#[derive(Debug)]
pub struct DashboardState {
    /// Widgets in creation order
    pub widgets: Vec<Widget>,
    /// Charts of the widgets that have one
    pub charts: ChartRegistry,
    /// Queue of events waiting to be processed
    pub pending_events: VecDeque<DashboardEvent>,
    /// Activity logs for display
    pub activity_logs: VecDeque<DashboardEvent>,
    /// State of the live update channel
    pub connection_state: ConnectionState,
    /// Source URL of the background image, once one was chosen
    pub background_image_url: Option<String>,
    /// Position last clicked on the background area
    pub create_position: Position,
    /// Open input form, if any
    pub form: Option<FormState>,
    pub ui_config: UIConfig,
    /// The start time of the application, used for computing uptime.
    pub start_time: Instant,
    /// Animation tick counter
    pub tick: usize,

    selected: Option<usize>,
    /// Log entries added since the last update, for console output
    new_log_entries: Vec<DashboardEvent>,
}

impl DashboardState {
    pub fn new(start_time: Instant, ui_config: UIConfig) -> Self {
        Self {
            widgets: Vec::new(),
            charts: ChartRegistry::new(),
            pending_events: VecDeque::new(),
            activity_logs: VecDeque::new(),
            connection_state: ConnectionState::Disconnected,
            background_image_url: None,
            create_position: Position::default(),
            form: None,
            ui_config,
            start_time,
            tick: 0,
            selected: None,
            new_log_entries: Vec::new(),
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected.filter(|index| *index < self.widgets.len())
    }

    pub fn selected_widget(&self) -> Option<&Widget> {
        self.selected_index().map(|index| &self.widgets[index])
    }

    pub fn selected_id(&self) -> Option<IndicatorId> {
        self.selected_widget().map(|widget| widget.id.clone())
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|index| *index < self.widgets.len());
    }

    pub fn select_next(&mut self) {
        if self.widgets.is_empty() {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected_index() {
            Some(index) => (index + 1) % self.widgets.len(),
            None => 0,
        });
    }

    pub fn select_previous(&mut self) {
        if self.widgets.is_empty() {
            self.selected = None;
            return;
        }
        let len = self.widgets.len();
        self.selected = Some(match self.selected_index() {
            Some(index) => (index + len - 1) % len,
            None => len - 1,
        });
    }

    pub fn widget(&self, id: &IndicatorId) -> Option<&Widget> {
        self.widgets.iter().find(|widget| &widget.id == id)
    }

    pub(super) fn widget_mut(&mut self, id: &IndicatorId) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|widget| &widget.id == id)
    }

    pub(super) fn widget_index(&self, id: &IndicatorId) -> Option<usize> {
        self.widgets.iter().position(|widget| &widget.id == id)
    }

    /// Uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: DashboardEvent) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.new_log_entries.push(event.clone());
        self.activity_logs.push_back(event);
    }

    /// Records a dashboard-originated message in the activity log.
    pub fn log(&mut self, msg: String, event_type: EventType, log_level: LogLevel) {
        let level: log::Level = log_level.into();
        log::log!(level, "{}", msg);
        self.add_to_activity_log(DashboardEvent::dashboard(msg, event_type, log_level));
    }

    /// Add an event to the processing queue
    pub fn add_event(&mut self, event: DashboardEvent) {
        self.pending_events.push_back(event);
    }

    pub(super) fn clear_new_log_entries(&mut self) {
        self.new_log_entries.clear();
    }

    /// Log entries recorded since the previous call
    pub fn take_new_log_entries(&mut self) -> Vec<DashboardEvent> {
        std::mem::take(&mut self.new_log_entries)
    }
}
