//! Dashboard state update logic
//!
//! Applies incoming events and user actions to the dashboard state.

use super::forms::{FormState, Submission};
use super::state::DashboardState;
use super::widget::Widget;

use crate::chart::{ChartError, ChartHandle, UpdateError};
use crate::events::{Event as DashboardEvent, EventType, Payload};
use crate::indicator::{Indicator, IndicatorId, Position};
use crate::logging::LogLevel;
use crate::workers::Request;

impl DashboardState {
    /// Update the dashboard state with a new tick and all queued events.
    pub fn update(&mut self) {
        self.tick += 1;
        self.clear_new_log_entries();

        // Process all queued events one by one, in arrival order
        while let Some(event) = self.pending_events.pop_front() {
            self.process_event(event);
        }
    }

    /// Process a single event and update relevant state
    fn process_event(&mut self, mut event: DashboardEvent) {
        let payload = event.payload.take();
        self.add_to_activity_log(event);

        match payload {
            Some(Payload::IndicatorsLoaded(indicators)) => {
                for indicator in indicators {
                    self.add_indicator(indicator);
                }
            }
            Some(Payload::IndicatorCreated(indicator)) => self.add_indicator(indicator),
            Some(Payload::ValueReceived { id, value }) => self.receive_value(&id, value),
            Some(Payload::ConnectionChanged(state)) => self.connection_state = state,
            Some(Payload::BackgroundChanged(url)) => self.background_image_url = Some(url),
            None => {}
        }
    }

    /// Builds the widget for an indicator, and its chart when the history allows one.
    ///
    /// An indicator that is already shown is replaced.
    pub fn add_indicator(&mut self, indicator: Indicator) {
        let widget = Widget::from_indicator(&indicator);
        match self.widget_index(&indicator.id) {
            Some(index) => self.widgets[index] = widget,
            None => self.widgets.push(widget),
        }
        self.charts.remove(&indicator.id);

        match ChartHandle::from_history(&indicator.name, &indicator.indicator_values) {
            Ok(chart) => {
                self.charts.insert(indicator.id.clone(), chart);
                log::debug!("Chart created: chart-{}", indicator.id);
            }
            Err(ChartError::EmptyHistory) => self.log(
                format!("No values provided for chart of {}", indicator.id),
                EventType::Error,
                LogLevel::Error,
            ),
            Err(e) => self.log(
                format!("Chart for {} not created: {}", indicator.id, e),
                EventType::Error,
                LogLevel::Error,
            ),
        }
    }

    /// Shows a live value on its widget and appends it to the widget's chart.
    pub fn receive_value(&mut self, id: &IndicatorId, value: String) {
        let Some(widget) = self.widget_mut(id) else {
            self.log(
                format!("Element with ID: {} not found.", id),
                EventType::Error,
                LogLevel::Warn,
            );
            return;
        };
        widget.value = value.clone();

        match self.charts.apply_update(id, &value) {
            Ok(_) => {}
            Err(UpdateError::ChartNotFound(_)) => self.log(
                format!("Chart for ID {} not found", id),
                EventType::Error,
                LogLevel::Warn,
            ),
            Err(UpdateError::InvalidValue(e)) => self.log(
                format!("Numeric value is not valid: {}", e),
                EventType::Error,
                LogLevel::Error,
            ),
        }
    }

    /// Reveals or hides the Diagram/Delete buttons of a widget.
    pub fn toggle_actions(&mut self, id: &IndicatorId) {
        if let Some(widget) = self.widget_mut(id) {
            widget.actions_visible = !widget.actions_visible;
        }
    }

    /// Shows or hides a widget's chart. Widgets without a chart are left alone.
    pub fn toggle_diagram(&mut self, id: &IndicatorId) {
        if self.widget(id).is_none() {
            return;
        }
        if !self.charts.contains(id) {
            self.log(
                format!("Diagram element chart-{} not found", id),
                EventType::Refresh,
                LogLevel::Debug,
            );
            return;
        }
        if let Some(widget) = self.widget_mut(id) {
            widget.diagram_visible = !widget.diagram_visible;
        }
    }

    /// Removes a widget and its chart right away, before the server confirms.
    ///
    /// Returns the request that deletes the indicator on the server.
    pub fn delete_indicator(&mut self, id: &IndicatorId) -> Option<Request> {
        let index = self.widget_index(id)?;
        self.widgets.remove(index);
        self.charts.remove(id);

        let selected = self.selected_index();
        match selected {
            Some(selected) if selected > index => self.select(Some(selected - 1)),
            Some(selected) if selected == index => {
                self.select(index.checked_sub(1).or(Some(0)))
            }
            _ => {}
        }

        Some(Request::Delete(id.clone()))
    }

    /// Remembers a click on the background area as the next create position.
    pub fn set_create_position(&mut self, position: Position) {
        self.create_position = position;
        if let Some(form) = self.form.as_mut() {
            if form.kind == super::forms::FormKind::CreateIndicator {
                form.fields[3].value = position.x.to_string();
                form.fields[4].value = position.y.to_string();
            }
        }
    }

    pub fn open_form(&mut self, form: FormState) {
        self.form = Some(form);
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Submits the open form.
    ///
    /// Invalid input keeps the form open and is logged. Returns the API request the
    /// submission needs, if any.
    pub fn submit_form(&mut self) -> Option<Request> {
        let form = self.form.as_ref()?;
        let form_id = form.kind.id();
        match form.submit() {
            Ok(submission) => {
                self.form = None;
                match submission {
                    Submission::Create(indicator) => Some(Request::Create(indicator)),
                    Submission::Update { id, value } => {
                        self.receive_value(&id, value);
                        None
                    }
                    Submission::ChangeBackground(index) => Some(Request::ChangeBackground(index)),
                    Submission::UploadImage(path) => Some(Request::UploadImage(path)),
                }
            }
            Err(reason) => {
                self.log(
                    format!("{}: {}", form_id, reason),
                    EventType::Error,
                    LogLevel::Error,
                );
                None
            }
        }
    }
}
