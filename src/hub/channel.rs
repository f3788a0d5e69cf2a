//! Live update channel
//!
//! Keeps a hub connection open, reconnecting on failure according to a
//! [`ReconnectPolicy`], and forwards every received value to the dashboard.

use super::ConnectionState;
use super::connection::{HubConnector, HubSession};
use super::error::HubError;
use super::policy::ReconnectPolicy;
use super::protocol::HubMessage;
use crate::consts::dashboard_consts::hub;
use crate::error_classifier::ErrorClassifier;
use crate::events::{Event, EventType};
use crate::logging::LogLevel;
use crate::workers::core::EventSender;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tokio_util::sync::CancellationToken;

/// Why a connected session ended
enum SessionEnd {
    Cancelled,
    Closed(String),
}

enum SessionStep {
    Cancelled,
    KeepAlive,
    Messages(Result<Option<Vec<HubMessage>>, HubError>),
}

pub struct LiveChannel<C: HubConnector> {
    connector: C,
    policy: ReconnectPolicy,
    event_sender: EventSender,
    cancel: CancellationToken,
    classifier: ErrorClassifier,
    state: ConnectionState,
}

impl<C: HubConnector> LiveChannel<C> {
    pub fn new(
        connector: C,
        policy: ReconnectPolicy,
        event_sender: EventSender,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            connector,
            policy,
            event_sender,
            cancel,
            classifier: ErrorClassifier::new(),
            state: ConnectionState::Disconnected,
        }
    }

    /// Runs the connect/receive/reconnect loop until cancelled.
    ///
    /// Only returns an error when the policy's attempt limit is reached.
    pub async fn run(mut self) -> Result<(), HubError> {
        let mut failed_attempts: u32 = 0;

        while !self.cancel.is_cancelled() {
            self.set_state(ConnectionState::Connecting, "Connecting to hub...")
                .await;

            let connected = tokio::select! {
                _ = self.cancel.cancelled() => break,
                result = self.connector.connect() => result,
            };

            match connected {
                Ok(session) => {
                    failed_attempts = 0;
                    self.set_state(ConnectionState::Connected, "Live channel connected.")
                        .await;
                    match self.receive(session).await {
                        SessionEnd::Cancelled => break,
                        SessionEnd::Closed(reason) => {
                            // Reconnect right away
                            self.event_sender
                                .send_event(Event::live_channel(
                                    format!("Connection closed: {}", reason),
                                    EventType::Refresh,
                                    LogLevel::Warn,
                                ))
                                .await;
                        }
                    }
                }
                Err(e) => {
                    failed_attempts = failed_attempts.saturating_add(1);
                    let log_level = self.classifier.classify_hub_error(&e);
                    self.event_sender
                        .send_event(Event::live_channel(
                            format!("Failed to connect (attempt {}): {}", failed_attempts, e),
                            EventType::Error,
                            log_level,
                        ))
                        .await;

                    if !self.policy.should_retry(failed_attempts) {
                        self.set_state(ConnectionState::Disconnected, "Live channel stopped.")
                            .await;
                        let err = HubError::AttemptsExhausted(failed_attempts);
                        self.event_sender
                            .send_event(Event::live_channel(
                                err.to_string(),
                                EventType::Error,
                                LogLevel::Error,
                            ))
                            .await;
                        return Err(err);
                    }

                    self.set_state(ConnectionState::Disconnected, "Live channel disconnected.")
                        .await;
                    self.event_sender
                        .send_event(Event::live_channel(
                            format!(
                                "Retrying in {} ms",
                                self.policy.interval.as_millis()
                            ),
                            EventType::Waiting,
                            LogLevel::Debug,
                        ))
                        .await;
                    tokio::select! {
                        _ = self.cancel.cancelled() => break,
                        _ = sleep(self.policy.interval) => {}
                    }
                }
            }
        }

        self.set_state(ConnectionState::Disconnected, "Live channel shut down.")
            .await;
        Ok(())
    }

    /// Pumps messages from a connected session until it ends.
    async fn receive(&mut self, mut session: Box<dyn HubSession>) -> SessionEnd {
        let mut keep_alive = interval(hub::keep_alive_interval());
        keep_alive.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        keep_alive.tick().await;

        loop {
            let step = tokio::select! {
                _ = self.cancel.cancelled() => SessionStep::Cancelled,
                _ = keep_alive.tick() => SessionStep::KeepAlive,
                batch = session.next_messages() => SessionStep::Messages(batch),
            };

            match step {
                SessionStep::Cancelled => return SessionEnd::Cancelled,
                SessionStep::KeepAlive => {
                    if let Err(e) = session.send_ping().await {
                        return SessionEnd::Closed(e.to_string());
                    }
                }
                SessionStep::Messages(Ok(Some(messages))) => {
                    for message in messages {
                        if let Some(reason) = self.dispatch(message).await {
                            return SessionEnd::Closed(reason);
                        }
                    }
                }
                SessionStep::Messages(Ok(None)) => {
                    return SessionEnd::Closed("server closed the connection".to_string());
                }
                SessionStep::Messages(Err(e)) => return SessionEnd::Closed(e.to_string()),
            }
        }
    }

    /// Routes one hub message. Returns the close reason if the server is closing.
    async fn dispatch(&mut self, message: HubMessage) -> Option<String> {
        match message {
            HubMessage::Close { error } => {
                Some(error.unwrap_or_else(|| "server requested close".to_string()))
            }
            HubMessage::Ping | HubMessage::Other(_) => None,
            HubMessage::Malformed(reason) => {
                self.event_sender
                    .send_event(Event::live_channel(
                        format!("Dropped malformed message: {}", reason),
                        EventType::Error,
                        LogLevel::Warn,
                    ))
                    .await;
                None
            }
            invocation => {
                match invocation.into_value_update() {
                    Ok(Some((id, value))) => {
                        self.event_sender
                            .send_event(Event::value_received(id, value))
                            .await;
                    }
                    Ok(None) => log::debug!("Ignoring hub invocation without a handler"),
                    Err(e) => {
                        self.event_sender
                            .send_event(Event::live_channel(
                                format!("Dropped malformed message: {}", e),
                                EventType::Error,
                                LogLevel::Warn,
                            ))
                            .await;
                    }
                }
                None
            }
        }
    }

    async fn set_state(&mut self, state: ConnectionState, msg: &str) {
        if self.state == state {
            return;
        }
        self.state = state;
        self.event_sender
            .send_event(Event::connection_change(state, msg.to_string()))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Payload;
    use crate::hub::protocol::parse_messages;
    use crate::indicator::IndicatorId;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::Instant;

    type Script = VecDeque<Result<Option<Vec<HubMessage>>, HubError>>;

    struct ScriptedSession {
        script: Script,
    }

    #[async_trait::async_trait]
    impl HubSession for ScriptedSession {
        async fn next_messages(&mut self) -> Result<Option<Vec<HubMessage>>, HubError> {
            match self.script.pop_front() {
                Some(step) => step,
                None => Ok(None),
            }
        }

        async fn send_ping(&mut self) -> Result<(), HubError> {
            Ok(())
        }
    }

    /// Hands out scripted sessions, failing once the scripts run out.
    #[derive(Clone, Default)]
    struct ScriptedConnector {
        sessions: Arc<Mutex<VecDeque<Script>>>,
        attempts: Arc<Mutex<Vec<Instant>>>,
    }

    impl ScriptedConnector {
        fn with_sessions(sessions: Vec<Script>) -> Self {
            Self {
                sessions: Arc::new(Mutex::new(sessions.into())),
                attempts: Arc::default(),
            }
        }

        fn attempts(&self) -> Vec<Instant> {
            self.attempts.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl HubConnector for ScriptedConnector {
        async fn connect(&self) -> Result<Box<dyn HubSession>, HubError> {
            self.attempts.lock().unwrap().push(Instant::now());
            match self.sessions.lock().unwrap().pop_front() {
                Some(script) => Ok(Box::new(ScriptedSession { script })),
                None => Err(HubError::Protocol("connection refused".to_string())),
            }
        }
    }

    fn receive(id: &str, value: &str) -> HubMessage {
        HubMessage::Invocation {
            target: "receive".to_string(),
            arguments: vec![json!(id), json!(value)],
        }
    }

    fn drain(receiver: &mut mpsc::Receiver<Event>) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            events.push(event);
        }
        events
    }

    fn channel(
        connector: ScriptedConnector,
        policy: ReconnectPolicy,
    ) -> (
        LiveChannel<ScriptedConnector>,
        mpsc::Receiver<Event>,
        CancellationToken,
    ) {
        let (sender, receiver) = mpsc::channel(1024);
        let cancel = CancellationToken::new();
        let channel = LiveChannel::new(connector, policy, EventSender::new(sender), cancel.clone());
        (channel, receiver, cancel)
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_are_spaced_by_interval() {
        let connector = ScriptedConnector::default();
        let policy = ReconnectPolicy::new(Duration::from_millis(5000), Some(4));
        let (channel, _receiver, _cancel) = channel(connector.clone(), policy);

        let result = channel.run().await;

        assert!(matches!(result, Err(HubError::AttemptsExhausted(4))));
        let attempts = connector.attempts();
        assert_eq!(attempts.len(), 4);
        for pair in attempts.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(5000));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_policy_keeps_retrying_until_cancelled() {
        let connector = ScriptedConnector::default();
        let (channel, _receiver, cancel) = channel(connector.clone(), ReconnectPolicy::default());

        let handle = tokio::spawn(channel.run());
        tokio::time::sleep(Duration::from_secs(60)).await;
        cancel.cancel();
        let result = handle.await.unwrap();

        assert!(result.is_ok());
        // One attempt at t=0, then one every five seconds
        assert!(connector.attempts().len() >= 12);
    }

    #[tokio::test(start_paused = true)]
    async fn test_forwards_values_and_reconnects_after_close() {
        let script: Script = VecDeque::from(vec![
            Ok(Some(vec![receive("1", "3,7"), HubMessage::Ping])),
            Ok(Some(vec![HubMessage::Close { error: None }])),
        ]);
        let connector = ScriptedConnector::with_sessions(vec![script]);
        let policy = ReconnectPolicy::new(Duration::from_millis(5000), Some(1));
        let (channel, mut receiver, _cancel) = channel(connector.clone(), policy);

        let result = channel.run().await;
        assert!(result.is_err());

        // The second attempt follows the close immediately
        let attempts = connector.attempts();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[1] - attempts[0], Duration::ZERO);

        let events = drain(&mut receiver);
        let states: Vec<ConnectionState> = events
            .iter()
            .filter_map(|event| match &event.payload {
                Some(Payload::ConnectionChanged(state)) => Some(*state),
                _ => None,
            })
            .collect();
        assert_eq!(
            states,
            vec![
                ConnectionState::Connecting,
                ConnectionState::Connected,
                ConnectionState::Connecting,
                ConnectionState::Disconnected,
            ]
        );
        assert!(events.iter().any(|event| event.payload
            == Some(Payload::ValueReceived {
                id: IndicatorId::from("1"),
                value: "3,7".to_string()
            })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_message_does_not_drop_connection() {
        let malformed = HubMessage::Invocation {
            target: "receive".to_string(),
            arguments: vec![json!("only-id")],
        };
        let script: Script = VecDeque::from(vec![
            Ok(Some(vec![malformed])),
            Ok(Some(vec![receive("2", "1,0")])),
        ]);
        let connector = ScriptedConnector::with_sessions(vec![script]);
        let policy = ReconnectPolicy::new(Duration::from_millis(10), Some(1));
        let (channel, mut receiver, _cancel) = channel(connector, policy);

        let _ = channel.run().await;
        let events = drain(&mut receiver);

        assert!(events
            .iter()
            .any(|event| event.msg.starts_with("Dropped malformed message")));
        assert!(events.iter().any(|event| matches!(
            &event.payload,
            Some(Payload::ValueReceived { id, .. }) if id.as_str() == "2"
        )));
    }

    #[tokio::test(start_paused = true)]
    async fn test_undecodable_record_keeps_rest_of_frame() {
        let frame = "{\"type\":1,\"target\":\"receive\",\"arguments\":[\"1\",\"3,7\"]}\u{1e}{\"type\":7,\"error\":{\"code\":1}}\u{1e}";
        let script: Script = VecDeque::from(vec![
            parse_messages(frame).map(Some),
            Ok(Some(vec![receive("1", "4,0")])),
        ]);
        let connector = ScriptedConnector::with_sessions(vec![script]);
        let policy = ReconnectPolicy::new(Duration::from_millis(10), Some(1));
        let (channel, mut receiver, _cancel) = channel(connector.clone(), policy);

        let _ = channel.run().await;
        let events = drain(&mut receiver);

        let values: Vec<&str> = events
            .iter()
            .filter_map(|event| match &event.payload {
                Some(Payload::ValueReceived { value, .. }) => Some(value.as_str()),
                _ => None,
            })
            .collect();
        // Both frames were read on the first connection
        assert_eq!(values, vec!["3,7", "4,0"]);
        assert!(events
            .iter()
            .any(|event| event.msg.starts_with("Dropped malformed message")));
        assert_eq!(connector.attempts().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_wait_stops_promptly() {
        let connector = ScriptedConnector::default();
        let (channel, _receiver, cancel) = channel(connector.clone(), ReconnectPolicy::default());

        let handle = tokio::spawn(channel.run());
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();
        let result = handle.await.unwrap();

        assert!(result.is_ok());
        assert_eq!(connector.attempts().len(), 1);
    }
}
