//! Hub transport
//!
//! Negotiates a connection with the hub, opens the WebSocket, and performs the
//! protocol handshake.

use super::error::HubError;
use super::protocol::{self, HANDSHAKE_REQUEST, HubMessage, PING_MESSAGE};
use crate::consts::dashboard_consts::http;
use futures::{SinkExt, StreamExt};
use reqwest::Client;
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

/// Opens hub sessions.
#[async_trait::async_trait]
pub trait HubConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn HubSession>, HubError>;
}

/// An open hub connection.
#[async_trait::async_trait]
pub trait HubSession: Send {
    /// Waits for the next batch of messages.
    ///
    /// `Ok(None)` means the server closed the connection.
    async fn next_messages(&mut self) -> Result<Option<Vec<HubMessage>>, HubError>;

    /// Sends a keep-alive ping.
    async fn send_ping(&mut self) -> Result<(), HubError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NegotiateResponse {
    #[serde(default)]
    connection_token: Option<String>,
    #[serde(default)]
    connection_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Connects to the hub over WebSocket.
#[derive(Debug, Clone)]
pub struct WebSocketConnector {
    client: Client,
    hub_url: String,
}

impl WebSocketConnector {
    pub fn new(hub_url: impl Into<String>) -> Result<Self, HubError> {
        let client = Client::builder()
            .connect_timeout(http::connect_timeout())
            .timeout(http::request_timeout())
            .build()?;
        Ok(Self {
            client,
            hub_url: hub_url.into(),
        })
    }

    fn negotiate_url(&self) -> Result<Url, HubError> {
        let mut url = Url::parse(&self.hub_url)?;
        let path = format!("{}/negotiate", url.path().trim_end_matches('/'));
        url.set_path(&path);
        url.query_pairs_mut().append_pair("negotiateVersion", "1");
        Ok(url)
    }

    async fn negotiate(&self) -> Result<String, HubError> {
        let response = self.client.post(self.negotiate_url()?).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response text".to_string());
            return Err(HubError::NegotiateRejected { status, message });
        }
        let negotiated: NegotiateResponse = response.json().await?;
        if let Some(error) = negotiated.error {
            return Err(HubError::Handshake(error));
        }
        negotiated
            .connection_token
            .or(negotiated.connection_id)
            .ok_or_else(|| HubError::Protocol("negotiate returned no connection id".to_string()))
    }
}

/// Turns the hub URL into the WebSocket URL for a negotiated connection.
pub fn websocket_url(hub_url: &str, connection_token: &str) -> Result<Url, HubError> {
    let mut url = Url::parse(hub_url)?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(HubError::Protocol(format!(
                "unsupported hub URL scheme `{}`",
                other
            )));
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| HubError::Protocol(format!("cannot use scheme `{}`", scheme)))?;
    url.query_pairs_mut().append_pair("id", connection_token);
    Ok(url)
}

#[async_trait::async_trait]
impl HubConnector for WebSocketConnector {
    async fn connect(&self) -> Result<Box<dyn HubSession>, HubError> {
        let token = self.negotiate().await?;
        let url = websocket_url(&self.hub_url, &token)?;
        let (mut stream, _) = connect_async(url.as_str()).await?;

        stream
            .send(Message::Text(HANDSHAKE_REQUEST.to_string()))
            .await?;
        let pending = loop {
            match stream.next().await {
                Some(Ok(Message::Text(frame))) => break protocol::parse_handshake(&frame)?,
                Some(Ok(Message::Close(_))) | None => {
                    return Err(HubError::Handshake(
                        "connection closed during handshake".to_string(),
                    ));
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
            }
        };

        Ok(Box::new(WebSocketSession { stream, pending }))
    }
}

struct WebSocketSession {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    /// Messages that arrived together with the handshake answer
    pending: Vec<HubMessage>,
}

#[async_trait::async_trait]
impl HubSession for WebSocketSession {
    async fn next_messages(&mut self) -> Result<Option<Vec<HubMessage>>, HubError> {
        if !self.pending.is_empty() {
            return Ok(Some(std::mem::take(&mut self.pending)));
        }
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(frame))) => return protocol::parse_messages(&frame).map(Some),
                Some(Ok(Message::Binary(bytes))) => {
                    let frame = String::from_utf8(bytes)
                        .map_err(|e| HubError::Protocol(e.to_string()))?;
                    return protocol::parse_messages(&frame).map(Some);
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                // Transport pings are answered by tungstenite
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }

    async fn send_ping(&mut self) -> Result<(), HubError> {
        self.stream
            .send(Message::Text(PING_MESSAGE.to_string()))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_websocket_url_from_hub_url() {
        let url = websocket_url("https://localhost:7045/indicator", "abc").unwrap();
        assert_eq!(url.as_str(), "wss://localhost:7045/indicator?id=abc");

        let url = websocket_url("http://example.com/hub?tenant=1", "x y").unwrap();
        assert_eq!(url.as_str(), "ws://example.com/hub?tenant=1&id=x+y");

        assert!(websocket_url("ftp://example.com/hub", "abc").is_err());
    }

    #[test]
    fn test_negotiate_url() {
        let connector = WebSocketConnector::new("https://localhost:7045/indicator/").unwrap();
        assert_eq!(
            connector.negotiate_url().unwrap().as_str(),
            "https://localhost:7045/indicator/negotiate?negotiateVersion=1"
        );
    }
}
