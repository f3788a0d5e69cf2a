//! API requests issued on behalf of the dashboard
//!
//! Each request runs once, with no retry. Outcomes are reported as events; failures
//! are never fatal to the dashboard.

use super::core::EventSender;
use crate::api::IndicatorApi;
use crate::api::error::ApiError;
use crate::error_classifier::ErrorClassifier;
use crate::events::{Event, EventType, Payload};
use crate::indicator::{Indicator, IndicatorId, NewIndicator};
use crate::logging::LogLevel;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Work the dashboard asks the API for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    LoadIndicators,
    Create(NewIndicator),
    Delete(IndicatorId),
    UploadImage(PathBuf),
    ChangeBackground(String),
}

/// Executes dashboard requests against the API
#[derive(Clone)]
pub struct RequestWorker {
    api: Arc<dyn IndicatorApi>,
    event_sender: EventSender,
    classifier: ErrorClassifier,
}

impl RequestWorker {
    pub fn new(api: Arc<dyn IndicatorApi>, event_sender: EventSender) -> Self {
        Self {
            api,
            event_sender,
            classifier: ErrorClassifier::new(),
        }
    }

    /// Runs a request in the background.
    pub fn spawn(&self, request: Request) -> JoinHandle<()> {
        let worker = self.clone();
        tokio::spawn(async move { worker.execute(request).await })
    }

    pub async fn execute(&self, request: Request) {
        match request {
            Request::LoadIndicators => {
                let _ = self.load_indicators().await;
            }
            Request::Create(indicator) => {
                let _ = self.create_indicator(indicator).await;
            }
            Request::Delete(id) => {
                let _ = self.delete_indicator(&id).await;
            }
            Request::UploadImage(path) => {
                let _ = self.upload_background_image(path).await;
            }
            Request::ChangeBackground(index) => self.change_background(&index).await,
        }
    }

    /// Fetches the indicator list that seeds the dashboard.
    pub async fn load_indicators(&self) -> Result<Vec<Indicator>, ApiError> {
        match self.api.list_indicators().await {
            Ok(indicators) => {
                self.event_sender
                    .send_event(
                        Event::api(
                            format!("Loaded {} indicators", indicators.len()),
                            EventType::Success,
                            LogLevel::Info,
                        )
                        .with_payload(Payload::IndicatorsLoaded(indicators.clone())),
                    )
                    .await;
                Ok(indicators)
            }
            Err(e) => Err(self.report("Failed to load indicators", e).await),
        }
    }

    pub async fn create_indicator(&self, request: NewIndicator) -> Result<IndicatorId, ApiError> {
        match self.api.create_indicator(&request).await {
            Ok(id) => {
                let indicator = Indicator::created(id.clone(), &request);
                self.event_sender
                    .send_event(
                        Event::api(
                            format!("Created indicator {} ({})", request.name, id),
                            EventType::Success,
                            LogLevel::Info,
                        )
                        .with_payload(Payload::IndicatorCreated(indicator)),
                    )
                    .await;
                Ok(id)
            }
            Err(e) => Err(self.report("Failed to create indicator", e).await),
        }
    }

    /// Deletes an indicator on the server. The widget is already gone locally.
    pub async fn delete_indicator(&self, id: &IndicatorId) -> Result<(), ApiError> {
        match self.api.delete_indicator(id).await {
            Ok(()) => {
                self.event_sender
                    .send_api_event(
                        format!("Deleted indicator {}", id),
                        EventType::Success,
                        LogLevel::Debug,
                    )
                    .await;
                Ok(())
            }
            Err(e) => {
                Err(self
                    .report(&format!("Failed to delete indicator {}", id), e)
                    .await)
            }
        }
    }

    pub async fn upload_background_image(&self, path: PathBuf) -> Result<(), ApiError> {
        match self.api.upload_background_image(&path).await {
            Ok(()) => {
                self.event_sender
                    .send_api_event(
                        "Image uploaded successfully".to_string(),
                        EventType::Success,
                        LogLevel::Info,
                    )
                    .await;
                Ok(())
            }
            Err(e) => Err(self.report("Image upload failed", e).await),
        }
    }

    pub async fn change_background(&self, index: &str) {
        let url = self.api.background_image_url(index);
        self.event_sender
            .send_event(
                Event::dashboard(
                    format!("Background image set to {}", url),
                    EventType::Refresh,
                    LogLevel::Info,
                )
                .with_payload(Payload::BackgroundChanged(url)),
            )
            .await;
    }

    async fn report(&self, context: &str, error: ApiError) -> ApiError {
        let log_level = self.classifier.classify_api_error(&error);
        self.event_sender
            .send_api_event(
                format!("{}: {}", context, error),
                EventType::Error,
                log_level,
            )
            .await;
        error
    }
}
