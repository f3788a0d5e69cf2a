//! Live update channel: a persistent hub connection delivering (identifier, value) pairs

pub mod channel;
pub mod connection;
pub mod error;
pub mod policy;
pub mod protocol;

pub use channel::LiveChannel;
pub use connection::WebSocketConnector;
pub use error::HubError;
pub use policy::ReconnectPolicy;

/// Hub connection state
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, strum::Display)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}
