use crate::api::error::ApiError;
use crate::indicator::{Indicator, IndicatorId, NewIndicator};
use std::path::Path;

pub(crate) mod client;
pub use client::ApiClient;
pub mod error;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait IndicatorApi: Send + Sync {
    /// Base URL every endpoint is resolved against.
    fn base_url(&self) -> &str;

    /// Lists all indicators, including their historical values.
    async fn list_indicators(&self) -> Result<Vec<Indicator>, ApiError>;

    /// Creates an indicator and returns its newly assigned identifier.
    async fn create_indicator(&self, indicator: &NewIndicator) -> Result<IndicatorId, ApiError>;

    /// Deletes an indicator.
    async fn delete_indicator(&self, id: &IndicatorId) -> Result<(), ApiError>;

    /// Uploads a background image file.
    async fn upload_background_image(&self, path: &Path) -> Result<(), ApiError>;

    /// URL of the background image with the given index.
    ///
    /// The image is consumed by URL, never fetched as data.
    fn background_image_url(&self, index: &str) -> String;
}
