/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for stock-fetch-adapter tests

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// What the scripted progress server does after sending its frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Ending {
    /// Send a close frame
    Close,
    /// Keep the connection open until the client goes away
    Hold,
}

/// Serve one WebSocket connection that sends `frames` in order
///
/// Returns the `ws://` URL to connect to.
#[allow(dead_code)]
pub async fn spawn_progress_server(frames: Vec<String>, ending: Ending) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        let Ok((stream, _)) = listener.accept().await else {
            return;
        };
        let Ok(mut ws) = accept_async(stream).await else {
            return;
        };
        for frame in frames {
            if ws.send(Message::Text(frame.into())).await.is_err() {
                return;
            }
        }
        match ending {
            Ending::Close => {
                let _ = ws.close(None).await;
                while let Some(Ok(_)) = ws.next().await {}
            }
            Ending::Hold => while let Some(Ok(_)) = ws.next().await {},
        }
    });

    Url::parse(&format!("ws://{addr}/ws/progress/test-task")).expect("url")
}

/// Address nothing listens on
#[allow(dead_code)]
pub async fn unreachable_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    Url::parse(&format!("ws://{addr}/ws/progress/gone")).expect("url")
}
