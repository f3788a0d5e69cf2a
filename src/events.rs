//! Event System
//!
//! Types for events flowing from background tasks to the dashboard

use crate::hub::ConnectionState;
use crate::indicator::{Indicator, IndicatorId};
use crate::logging::{LogLevel, should_log_with_env};
use chrono::Local;
use std::fmt::Display;

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum Source {
    /// Requests against the indicator API.
    Api,
    /// The live update hub connection.
    LiveChannel,
    /// Local dashboard state changes.
    Dashboard,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
    Waiting,
    StateChange,
    Update,
}

/// State carried alongside an event for the dashboard to apply
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Initial indicator listing
    IndicatorsLoaded(Vec<Indicator>),
    /// An indicator the API just created
    IndicatorCreated(Indicator),
    /// A live (identifier, value) pair
    ValueReceived { id: IndicatorId, value: String },
    /// The hub connection changed state
    ConnectionChanged(ConnectionState),
    /// The background image source changed
    BackgroundChanged(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub source: Source,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
    pub payload: Option<Payload>,
}

impl Event {
    pub fn new(source: Source, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            source,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
            payload: None,
        }
    }

    pub fn api(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::Api, msg, event_type, log_level)
    }

    pub fn live_channel(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::LiveChannel, msg, event_type, log_level)
    }

    pub fn dashboard(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::Dashboard, msg, event_type, log_level)
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn connection_change(state: ConnectionState, msg: String) -> Self {
        Self::live_channel(msg, EventType::StateChange, LogLevel::Info)
            .with_payload(Payload::ConnectionChanged(state))
    }

    pub fn value_received(id: IndicatorId, value: String) -> Self {
        Self::live_channel(
            format!("received value: {} for ID: {}", value, id),
            EventType::Update,
            LogLevel::Debug,
        )
        .with_payload(Payload::ValueReceived { id, value })
    }

    pub fn should_display(&self) -> bool {
        // Connection changes are shown in the header instead
        if self.event_type == EventType::StateChange && self.log_level < LogLevel::Warn {
            return false;
        }
        if self.event_type == EventType::Success {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.event_type, self.timestamp, self.source, self.msg
        )
    }
}
