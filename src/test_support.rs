// src/test_support.rs
// =============================================================================
// A bare-bones HTTP server for the tests that wiremock cannot express:
// - Location headers with raw (non-ASCII) bytes, which wiremock refuses to set
// - counting how many requests are being handled at the same moment, which
//   needs a hook around the response delay
//
// Every connection serves one request and is then closed, so one in-flight
// request always means one open connection.
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// What the server has seen so far.
#[derive(Debug, Default)]
pub struct ServerStats {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    served: AtomicUsize,
}

impl ServerStats {
    /// Highest number of requests handled at the same time
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Requests answered
    pub fn served(&self) -> usize {
        self.served.load(Ordering::SeqCst)
    }
}

/// Starts a server that answers every request with `301` and the given raw
/// `Location` bytes, after waiting `delay`.
///
/// Returns the base URI (`http://127.0.0.1:PORT`) and the live stats.
pub async fn raw_redirect_server(location: &'static [u8], delay: Duration) -> (String, Arc<ServerStats>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    let stats = Arc::new(ServerStats::default());

    let server_stats = Arc::clone(&stats);
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let stats = Arc::clone(&server_stats);
            tokio::spawn(serve_one(socket, location, delay, stats));
        }
    });

    (uri, stats)
}

async fn serve_one(mut socket: TcpStream, location: &'static [u8], delay: Duration, stats: Arc<ServerStats>) {
    // Read until the blank line that ends the request head; GETs have no body
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&chunk[..n]),
        }
    }

    let now = stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    stats.peak.fetch_max(now, Ordering::SeqCst);

    tokio::time::sleep(delay).await;

    // Released before answering: the client cannot send its next request
    // until it has this response, so that request is never counted alongside
    // this one.
    stats.in_flight.fetch_sub(1, Ordering::SeqCst);
    stats.served.fetch_add(1, Ordering::SeqCst);

    let mut response = b"HTTP/1.1 301 Moved Permanently\r\nLocation: ".to_vec();
    response.extend_from_slice(location);
    response.extend_from_slice(b"\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");

    // A client that already hung up is not this server's problem
    if socket.write_all(&response).await.is_ok() {
        socket.shutdown().await.ok();
    }
}
