//! Shared helpers for integration tests.

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

// ============================================================================
// Servers
// ============================================================================

/// Binds a local listener and returns it with its `ws://` URL.
pub async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("addr").port();
    (listener, format!("ws://127.0.0.1:{port}/echo"))
}

/// Starts a server that echoes every text message on one connection.
pub async fn echo_server() -> String {
    let (listener, url) = bind().await;

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut ws = accept_async(stream).await.expect("upgrade");
        while let Some(Ok(message)) = ws.next().await {
            if message.is_text() && ws.send(message).await.is_err() {
                break;
            }
        }
    });

    url
}

/// Starts a server that echoes text messages and closes after `last`.
pub async fn echo_until(last: &'static str) -> String {
    let (listener, url) = bind().await;

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut ws = accept_async(stream).await.expect("upgrade");
        while let Some(Ok(message)) = ws.next().await {
            let Message::Text(text) = message else {
                continue;
            };
            let done = text.as_str() == last;
            if ws.send(Message::Text(text)).await.is_err() || done {
                break;
            }
        }
        let _ = ws.close(None).await;
        while ws.next().await.is_some() {}
    });

    url
}

/// Returns a `ws://` URL on a port with no listener.
pub async fn unreachable_url() -> String {
    let (listener, url) = bind().await;
    drop(listener);
    url
}
