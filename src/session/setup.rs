//! Session setup and initialization

use crate::api::{ApiClient, IndicatorApi};
use crate::config::Config;
use crate::consts::dashboard_consts::EVENT_QUEUE_SIZE;
use crate::events::Event;
use crate::hub::{LiveChannel, WebSocketConnector};
use crate::workers::{EventSender, Request, RequestWorker};
use std::error::Error;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Session data for both TUI and headless modes
pub struct SessionData {
    /// Event receiver for background task events
    pub event_receiver: mpsc::Receiver<Event>,
    /// Join handles for background tasks
    pub join_handles: Vec<JoinHandle<()>>,
    /// Shutdown sender to stop all background tasks
    pub shutdown_sender: broadcast::Sender<()>,
    /// Stops the live channel, including a pending reconnect wait
    pub cancel: CancellationToken,
    /// Runs API requests for the dashboard
    pub requests: RequestWorker,
    pub config: Config,
}

/// Sets up a dashboard session
///
/// This function handles all the common setup required for both TUI and headless modes:
/// 1. Creates the API client and the hub connector
/// 2. Sets up the event and shutdown channels
/// 3. Starts the live channel and the initial indicator load
///
/// # Returns
/// * `Ok(SessionData)` - Successfully set up session
/// * `Err` - A configured URL is unusable
pub async fn setup_session(config: Config) -> Result<SessionData, Box<dyn Error>> {
    let api: Arc<dyn IndicatorApi> = Arc::new(ApiClient::new(config.api_url.clone())?);
    let connector = WebSocketConnector::new(config.hub_url.clone())?;

    let (event_sender, event_receiver) = mpsc::channel::<Event>(EVENT_QUEUE_SIZE);
    let (shutdown_sender, _) = broadcast::channel(1);
    let cancel = CancellationToken::new();

    let requests = RequestWorker::new(api, EventSender::new(event_sender.clone()));
    let live_channel = LiveChannel::new(
        connector,
        config.reconnect_policy(),
        EventSender::new(event_sender),
        cancel.clone(),
    );

    let mut join_handles = Vec::new();

    // Forward the shutdown signal to the live channel
    let mut shutdown_receiver = shutdown_sender.subscribe();
    let shutdown_cancel = cancel.clone();
    join_handles.push(tokio::spawn(async move {
        tokio::select! {
            _ = shutdown_receiver.recv() => shutdown_cancel.cancel(),
            _ = shutdown_cancel.cancelled() => {}
        }
    }));

    join_handles.push(tokio::spawn(async move {
        if let Err(e) = live_channel.run().await {
            log::error!("Live channel stopped: {}", e);
        }
    }));

    join_handles.push(requests.spawn(Request::LoadIndicators));

    Ok(SessionData {
        event_receiver,
        join_handles,
        shutdown_sender,
        cancel,
        requests,
        config,
    })
}
