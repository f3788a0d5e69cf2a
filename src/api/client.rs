//! Indicator API Client
//!
//! A client for the dashboard's REST API: indicator CRUD and background images.

use crate::api::IndicatorApi;
use crate::api::error::ApiError;
use crate::consts::dashboard_consts::{api_paths, http};
use crate::indicator::{Indicator, IndicatorId, NewIndicator};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, Response};
use std::path::Path;

// User-Agent string with client version
const USER_AGENT: &str = concat!("indicator-dashboard/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = ClientBuilder::new()
            .connect_timeout(http::connect_timeout())
            .timeout(http::request_timeout())
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    fn image_part(path: &Path, bytes: Vec<u8>) -> Result<Part, ApiError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let mime = guess_image_mime(path);
        Ok(Part::bytes(bytes).file_name(file_name).mime_str(mime)?)
    }
}

/// Content type for an uploaded image, from its file extension.
fn guess_image_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[async_trait::async_trait]
impl IndicatorApi for ApiClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn list_indicators(&self) -> Result<Vec<Indicator>, ApiError> {
        let response = self
            .client
            .get(self.build_url(api_paths::INDICATOR))
            .send()
            .await?;
        let response = Self::handle_response_status(response).await?;
        Ok(response.json().await?)
    }

    async fn create_indicator(&self, indicator: &NewIndicator) -> Result<IndicatorId, ApiError> {
        let response = self
            .client
            .post(self.build_url(api_paths::INDICATOR))
            .json(indicator)
            .send()
            .await?;
        let response = Self::handle_response_status(response).await?;
        Ok(response.json().await?)
    }

    async fn delete_indicator(&self, id: &IndicatorId) -> Result<(), ApiError> {
        let endpoint = format!(
            "{}/{}",
            api_paths::INDICATOR,
            urlencoding::encode(id.as_str())
        );
        let response = self.client.delete(self.build_url(&endpoint)).send().await?;
        Self::handle_response_status(response).await?;
        Ok(())
    }

    async fn upload_background_image(&self, path: &Path) -> Result<(), ApiError> {
        if !path.is_file() {
            return Err(ApiError::MissingFile(path.to_path_buf()));
        }
        let bytes = tokio::fs::read(path).await?;
        let form = Form::new().part(api_paths::UPLOAD_FIELD, Self::image_part(path, bytes)?);

        let response = self
            .client
            .post(self.build_url(api_paths::UPLOAD_IMAGE))
            .multipart(form)
            .send()
            .await?;
        Self::handle_response_status(response).await?;
        Ok(())
    }

    fn background_image_url(&self, index: &str) -> String {
        let endpoint = format!(
            "{}/{}",
            api_paths::BACKGROUND_IMAGE,
            urlencoding::encode(index.trim())
        );
        self.build_url(&endpoint)
    }
}

#[cfg(test)]
/// These are ignored by default since they require a live API server.
mod live_api_tests {
    use super::*;
    use crate::consts::dashboard_consts::DEFAULT_API_URL;

    #[tokio::test]
    #[ignore] // This test requires a live API instance.
    /// Should list the indicators known to the server.
    async fn test_list_indicators() {
        let client = ApiClient::new(DEFAULT_API_URL).unwrap();
        match client.list_indicators().await {
            Ok(indicators) => println!("Got {} indicators", indicators.len()),
            Err(e) => panic!("Failed to list indicators: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves a single canned HTTP response and returns the raw request it received.
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });
        (base_url, handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= header_end + 4 + content_length
    }

    #[tokio::test]
    async fn test_list_indicators_parses_listing() {
        let body = r#"[{"id":1,"name":"Temp","x":10,"y":20,"value":"21,5","unit":"C","indicatorValues":["20,0","21,5"]}]"#;
        let (base_url, server) = serve_once("200 OK", body).await;
        let client = ApiClient::new(base_url).unwrap();

        let indicators = client.list_indicators().await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("GET /api/Indicator HTTP/1.1"));
        assert_eq!(indicators.len(), 1);
        assert_eq!(indicators[0].id, IndicatorId::from("1"));
        assert_eq!(indicators[0].indicator_values.len(), 2);
    }

    #[tokio::test]
    async fn test_create_indicator_returns_new_identifier() {
        let (base_url, server) = serve_once("201 Created", "42").await;
        let client = ApiClient::new(base_url).unwrap();
        let body = NewIndicator::new("Level".into(), "1,5".into(), "m".into(), 3, 4);

        let id = client.create_indicator(&body).await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(id, IndicatorId::from("42"));
        assert!(request.starts_with("POST /api/Indicator HTTP/1.1"));
        assert!(request.contains(r#""description":"Level""#));
    }

    #[tokio::test]
    async fn test_delete_reports_http_status() {
        let (base_url, server) = serve_once("404 Not Found", "\"gone\"").await;
        let client = ApiClient::new(base_url).unwrap();

        let result = client.delete_indicator(&IndicatorId::from("a b")).await;
        let request = server.await.unwrap();

        assert!(request.starts_with("DELETE /api/Indicator/a%20b HTTP/1.1"));
        match result {
            Err(ApiError::Http { status, .. }) => assert_eq!(status, 404),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_sends_image_field() {
        let (base_url, server) = serve_once("204 No Content", "").await;
        let client = ApiClient::new(base_url).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floor.png");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"not really a png")
            .unwrap();

        client.upload_background_image(&path).await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("POST /api/BackgroundImage/upload-image HTTP/1.1"));
        assert!(request.contains(r#"name="image"; filename="floor.png""#));
        assert!(request.contains("not really a png"));
    }

    #[tokio::test]
    async fn test_upload_without_file_is_aborted() {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");

        let result = client.upload_background_image(&missing).await;
        assert!(matches!(result, Err(ApiError::MissingFile(path)) if path == missing));
    }

    #[test]
    fn test_background_image_url() {
        let client = ApiClient::new("https://localhost:7045/").unwrap();
        assert_eq!(
            client.background_image_url(" 3 "),
            "https://localhost:7045/api/BackgroundImage/3"
        );
    }
}
