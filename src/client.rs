//! LED Toggle Client
//!
//! Holds the last device-reported status and turns socket events and
//! button clicks into display updates and toggle requests. Every handler
//! runs to completion on the caller's thread, so the status needs no locking.

use crate::config::StatusPolicy;
use crate::error::{LedClientError, LedResult};
use crate::protocol::{LedStatus, ToggleRequest, parse_status_report};
use crate::socket::{SocketEvent, Transport};

/// Somewhere to show the current LED status as text.
pub trait StatusDisplay {
    fn show_status(&mut self, status: &str);
}

pub struct LedToggleClient<T: Transport> {
    transport: T,
    /// Last reported status; empty until the device first reports.
    current_led_status: String,
    policy: StatusPolicy,
}

impl<T: Transport> LedToggleClient<T> {
    pub fn new(transport: T, policy: StatusPolicy) -> Self {
        Self {
            transport,
            current_led_status: String::new(),
            policy,
        }
    }

    pub fn current_status(&self) -> &str {
        &self.current_led_status
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Dispatch a socket event to the matching handler.
    pub fn handle_event(&mut self, event: SocketEvent, display: &mut impl StatusDisplay) {
        match event {
            SocketEvent::Open => self.on_open(),
            SocketEvent::Message(text) => {
                if let Err(e) = self.on_message(&text, display) {
                    log::warn!("Dropped device message: {}", e);
                }
            }
            SocketEvent::Error(detail) => self.on_error(&detail),
            SocketEvent::Close { code, reason } => self.on_close(code, &reason),
        }
    }

    pub fn on_open(&self) {
        log::info!("Connection opened.");
    }

    /// Parse a device message and adopt its `status`.
    ///
    /// On a parse failure (or a value refused by [`StatusPolicy::Strict`])
    /// the status and display are left untouched.
    pub fn on_message(&mut self, text: &str, display: &mut impl StatusDisplay) -> LedResult<()> {
        log::debug!("Message from device: {}", text);

        let report = parse_status_report(text)?;

        if report.error.is_some() || report.message.is_some() {
            log::warn!(
                "Device reported error={:?} message={:?}",
                report.error,
                report.message
            );
        }

        if self.policy == StatusPolicy::Strict && LedStatus::from_status(&report.status).is_none() {
            return Err(LedClientError::RejectedStatus(report.status));
        }

        self.current_led_status = report.status;
        self.refresh_display(display);
        Ok(())
    }

    pub fn on_error(&self, detail: &str) {
        log::error!("WebSocket error: {}", detail);
    }

    pub fn on_close(&self, code: u16, reason: &str) {
        log::info!("WebSocket connection closed. code={} reason={:?}", code, reason);
    }

    /// Ask the device for the complement of the last known status.
    ///
    /// Sends exactly one `{"state": ...}` frame and returns its text, or
    /// sends nothing when the status is unknown or the socket is not open.
    pub fn request_toggle(&self) -> LedResult<String> {
        let current = LedStatus::from_status(&self.current_led_status)
            .ok_or_else(|| LedClientError::InvalidStatus(self.current_led_status.clone()))?;

        if !self.transport.is_open() {
            return Err(LedClientError::NotOpen);
        }

        let payload = ToggleRequest::new(current.toggled()).to_json()?;
        self.transport.send_text(payload.clone())?;
        Ok(payload)
    }

    /// Button click handler: toggles and logs the outcome.
    pub fn on_click(&self) {
        match self.request_toggle() {
            Ok(payload) => log::info!("Sent: {}", payload),
            Err(e) => log::warn!("Toggle skipped: {}", e),
        }
    }

    /// Close the connection if it is open. Returns whether a close was issued.
    pub fn on_unload(&self) -> bool {
        if !self.transport.is_open() {
            return false;
        }
        self.transport.close();
        log::info!("WebSocket connection closed");
        true
    }

    pub fn refresh_display(&self, display: &mut impl StatusDisplay) {
        display.show_status(&self.current_led_status);
    }
}
