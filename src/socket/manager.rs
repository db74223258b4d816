use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::HeaderValue;

use crate::config::LedClientConfig;
use crate::error::{LedClientError, LedResult};
use crate::socket::{ReadyState, SocketEvent, Transport};

/// Abnormal closure, used when the connection drops without a close frame
const CLOSE_ABNORMAL: u16 = 1006;

enum Outgoing {
    Text(String),
    Close,
}

/// Thread-safe receiver for events coming off the connection thread
pub struct SocketEventReceiver {
    rx: Mutex<Receiver<SocketEvent>>,
}

impl SocketEventReceiver {
    /// Try to receive the next event without blocking
    pub fn try_recv(&self) -> Option<SocketEvent> {
        self.rx.lock().ok()?.try_recv().ok()
    }

    /// Block until an event arrives or `timeout` elapses
    pub fn recv_timeout(&self, timeout: Duration) -> Option<SocketEvent> {
        self.rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

/// A single WebSocket connection to the device controller.
pub struct LedSocket {
    url: String,
    sender: UnboundedSender<Outgoing>,
    ready_state: Arc<AtomicU32>,
    _handle: JoinHandle<()>,
}

impl LedSocket {
    /// Open the configured endpoint. Returns immediately; the outcome is
    /// reported as `Open` or `Error` + `Close` on the event receiver.
    pub fn connect(config: &LedClientConfig) -> LedResult<(LedSocket, SocketEventReceiver)> {
        let url = config.validate()?;

        let mut request = config
            .endpoint
            .as_str()
            .into_client_request()
            .map_err(|e| LedClientError::invalid_endpoint(&config.endpoint, e.to_string()))?;

        if let Some(ref origin) = config.origin {
            let value = HeaderValue::from_str(origin).map_err(|e| {
                LedClientError::invalid_endpoint(&config.endpoint, format!("bad origin: {}", e))
            })?;
            request.headers_mut().insert("Origin", value);
        }

        let host = url.host_str().unwrap_or("localhost");
        let port = url.port_or_known_default().unwrap_or(80);
        let addr = format!("{}:{}", host, port);

        let (tx, rx) = unbounded_channel::<Outgoing>();
        let (event_tx, event_rx) = mpsc::channel::<SocketEvent>();
        let ready_state = Arc::new(AtomicU32::new(ReadyState::Connecting as u32));

        let sink = EventSink {
            ready_state: ready_state.clone(),
            events: event_tx,
        };
        let endpoint = config.endpoint.clone();

        // Spawn on a separate thread with its own tokio runtime
        let handle = thread::spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    sink.fail(format!("Failed to create runtime: {}", e), "Runtime unavailable");
                    return;
                }
            };

            rt.block_on(run_connection(endpoint, addr, request, sink, rx));
        });

        let socket = LedSocket {
            url: config.endpoint.clone(),
            sender: tx,
            ready_state,
            _handle: handle,
        };
        let receiver = SocketEventReceiver {
            rx: Mutex::new(event_rx),
        };

        Ok((socket, receiver))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn ready_state(&self) -> ReadyState {
        ReadyState::from_u32(self.ready_state.load(Ordering::SeqCst))
    }
}

impl Transport for LedSocket {
    fn is_open(&self) -> bool {
        self.ready_state() == ReadyState::Open
    }

    fn send_text(&self, text: String) -> LedResult<()> {
        if !self.is_open() {
            return Err(LedClientError::NotOpen);
        }
        self.sender
            .send(Outgoing::Text(text))
            .map_err(|_| LedClientError::ChannelClosed)
    }

    fn close(&self) {
        match self.ready_state() {
            ReadyState::Closing | ReadyState::Closed => return,
            _ => {}
        }
        self.ready_state
            .store(ReadyState::Closing as u32, Ordering::SeqCst);
        log::info!("[LedSocket] Closing {}", self.url);

        if self.sender.send(Outgoing::Close).is_err() {
            log::debug!("[LedSocket] Connection task already gone");
        }
    }
}

/// The connection thread's side of the event channel
struct EventSink {
    ready_state: Arc<AtomicU32>,
    events: Sender<SocketEvent>,
}

impl EventSink {
    fn emit(&self, event: SocketEvent) {
        if self.events.send(event).is_err() {
            log::debug!("[LedSocket] Event receiver dropped");
        }
    }

    fn set_state(&self, state: ReadyState) {
        self.ready_state.store(state as u32, Ordering::SeqCst);
    }

    /// Report a failure the browser way: `error` followed by an abnormal `close`.
    fn fail(&self, message: String, reason: &str) {
        log::error!("[LedSocket] {}", message);
        self.set_state(ReadyState::Closed);
        self.emit(SocketEvent::Error(message));
        self.emit(SocketEvent::Close {
            code: CLOSE_ABNORMAL,
            reason: reason.to_string(),
        });
    }
}

async fn run_connection(
    endpoint: String,
    addr: String,
    request: Request,
    sink: EventSink,
    mut rx: UnboundedReceiver<Outgoing>,
) {
    log::info!("[LedSocket] Connecting TCP to {}", addr);

    let tcp_stream = match TcpStream::connect(&addr).await {
        Ok(stream) => stream,
        Err(e) => {
            sink.fail(
                format!("TCP connection to {} failed: {}", addr, e),
                "Connection failed",
            );
            return;
        }
    };

    log::info!("[LedSocket] Performing WebSocket handshake with {}", endpoint);

    let ws_stream = match tokio_tungstenite::client_async(request, tcp_stream).await {
        Ok((stream, response)) => {
            log::info!(
                "[LedSocket] Connected successfully (status: {})",
                response.status()
            );
            stream
        }
        Err(e) => {
            sink.fail(format!("Handshake failed: {}", e), "Handshake failed");
            return;
        }
    };

    // A close requested while the handshake was in flight still counts
    if sink
        .ready_state
        .compare_exchange(
            ReadyState::Connecting as u32,
            ReadyState::Open as u32,
            Ordering::SeqCst,
            Ordering::SeqCst,
        )
        .is_ok()
    {
        sink.emit(SocketEvent::Open);
    }

    let (mut write, mut read) = ws_stream.split();

    // Forward outgoing frames
    let send_task = tokio::spawn(async move {
        while let Some(outgoing) = rx.recv().await {
            match outgoing {
                Outgoing::Text(text) => {
                    if let Err(e) = write.send(Message::Text(text.into())).await {
                        log::error!("[LedSocket] Send error: {}", e);
                        break;
                    }
                }
                Outgoing::Close => {
                    if let Err(e) = write.send(Message::Close(None)).await {
                        log::warn!("[LedSocket] Failed to send close frame: {}", e);
                    }
                    break;
                }
            }
        }
    });

    let mut closed = false;
    while let Some(msg_result) = read.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                log::debug!("[LedSocket] Received: {}", text.as_str());
                sink.emit(SocketEvent::Message(text.as_str().to_owned()));
            }
            Ok(Message::Binary(data)) => {
                log::debug!("[LedSocket] Ignoring binary frame ({} bytes)", data.len());
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // Handled by tungstenite
            }
            Ok(Message::Close(frame)) => {
                let (code, reason): (u16, String) = frame
                    .map(|f| (f.code.into(), f.reason.to_string()))
                    .unwrap_or((1000, String::new()));
                log::info!("[LedSocket] Received close: {} {}", code, reason);
                sink.set_state(ReadyState::Closed);
                sink.emit(SocketEvent::Close { code, reason });
                closed = true;
                break;
            }
            Ok(Message::Frame(_)) => {}
            Err(e) => {
                sink.fail(format!("Read error: {}", e), "Connection error");
                closed = true;
                break;
            }
        }
    }

    if !closed {
        sink.set_state(ReadyState::Closed);
        sink.emit(SocketEvent::Close {
            code: CLOSE_ABNORMAL,
            reason: "Connection ended".to_string(),
        });
    }

    send_task.abort();
    log::info!("[LedSocket] Connection ended");
}
