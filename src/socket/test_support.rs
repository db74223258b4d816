//! Loopback device server shared by the socket and plugin tests.

use futures_util::{SinkExt, StreamExt};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

use crate::socket::{SocketEvent, SocketEventReceiver};

pub const WAIT: Duration = Duration::from_secs(5);

/// Marker forwarded by [`recording_device`] when a close frame arrives
pub const CLOSE_FRAME: &str = "<close>";

/// Accept one connection on a loopback port and hand it to `handler`.
pub fn start_server<F, Fut>(handler: F) -> (tokio::runtime::Runtime, String)
where
    F: FnOnce(WebSocketStream<TcpStream>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();
    let listener = rt.block_on(TcpListener::bind("127.0.0.1:0")).unwrap();
    let addr = listener.local_addr().unwrap();

    rt.spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        handler(ws).await;
    });

    (rt, format!("ws://{}/wsled", addr))
}

fn reply_for(request: &str) -> &'static str {
    match request {
        r#"{"state":"on"}"# => r#"{"status":"on"}"#,
        _ => r#"{"status":"off"}"#,
    }
}

/// Stand-in for the device: reports "off", then echoes each requested state.
pub async fn fake_device(mut ws: WebSocketStream<TcpStream>) {
    ws.send(Message::Text(r#"{"status":"off"}"#.to_string().into()))
        .await
        .unwrap();

    while let Some(Ok(msg)) = ws.next().await {
        if let Message::Text(text) = msg {
            let reply = reply_for(text.as_str());
            if ws.send(Message::Text(reply.to_string().into())).await.is_err() {
                break;
            }
        }
    }
}

/// Like [`fake_device`], but forwards every text frame it receives to `frames`,
/// plus [`CLOSE_FRAME`] for each close frame.
pub async fn recording_device(mut ws: WebSocketStream<TcpStream>, frames: Sender<String>) {
    ws.send(Message::Text(r#"{"status":"off"}"#.to_string().into()))
        .await
        .unwrap();

    while let Some(Ok(msg)) = ws.next().await {
        match msg {
            Message::Text(text) => {
                let _ = frames.send(text.as_str().to_owned());
                let reply = reply_for(text.as_str());
                if ws.send(Message::Text(reply.to_string().into())).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => {
                let _ = frames.send(CLOSE_FRAME.to_string());
            }
            _ => {}
        }
    }
}

pub fn next_event(receiver: &SocketEventReceiver) -> SocketEvent {
    receiver
        .recv_timeout(WAIT)
        .expect("timed out waiting for socket event")
}

/// Poll `condition` every few milliseconds until it holds or [`WAIT`] runs out.
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    condition()
}
