//! WebSocket Transport
//!
//! Provides a single device connection backed by tokio-tungstenite.
//! The connection runs on its own thread and pushes browser-style events
//! (open/message/error/close) back to the owner through a channel.

mod manager;

#[cfg(test)]
pub(crate) mod test_support;

pub use manager::{LedSocket, SocketEventReceiver};

use crate::error::LedResult;

/// WebSocket ready states (matching browser API)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ReadyState {
    Connecting = 0,
    Open = 1,
    Closing = 2,
    Closed = 3,
}

impl ReadyState {
    pub fn from_u32(value: u32) -> Self {
        match value {
            0 => Self::Connecting,
            1 => Self::Open,
            2 => Self::Closing,
            _ => Self::Closed,
        }
    }
}

/// Events pushed from the connection thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    Open,
    /// A text frame from the device
    Message(String),
    Error(String),
    Close { code: u16, reason: String },
}

/// The outbound half of a connection, as seen by the client.
pub trait Transport {
    fn is_open(&self) -> bool;

    /// Fire-and-forget send of a text frame.
    fn send_text(&self, text: String) -> LedResult<()>;

    fn close(&self);
}
