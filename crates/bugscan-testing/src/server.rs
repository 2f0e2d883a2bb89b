//! Stub HTTP endpoints for probe tests.
//!
//! Each server runs on its own thread with a private tokio runtime, so it can
//! be used from plain `#[test]` functions as well as from `#[tokio::test]`.

use axum::Router;
use axum::http::StatusCode;
use std::net::SocketAddr;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::oneshot;

/// A local HTTP server answering every path the same way.
///
/// # Example
/// ```no_run
/// use bugscan_testing::StubServer;
///
/// let server = StubServer::with_status(503);
/// let url = server.url("/health");
/// ```
pub struct StubServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl StubServer {
    /// Answer every request with `code`.
    pub fn with_status(code: u16) -> Self {
        let status = StatusCode::from_u16(code).expect("Invalid status code");
        Self::spawn(Router::new().fallback(move || async move { status }))
    }

    /// Accept connections but never answer.
    pub fn hanging() -> Self {
        Self::spawn(Router::new().fallback(|| async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            StatusCode::OK
        }))
    }

    fn spawn(router: Router) -> Self {
        let listener =
            std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub server");
        listener
            .set_nonblocking(true)
            .expect("Failed to set non-blocking");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let (tx, rx) = oneshot::channel::<()>();

        let thread = std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to build stub runtime");

            runtime.block_on(async move {
                let listener =
                    tokio::net::TcpListener::from_std(listener).expect("Failed to adopt listener");
                tokio::select! {
                    _ = async { axum::serve(listener, router).await } => {}
                    _ = rx => {}
                }
            });
        });

        Self {
            addr,
            shutdown: Some(tx),
            thread: Some(thread),
        }
    }

    /// Full URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// URL of a local port with nothing listening on it.
pub fn closed_port_url(path: &str) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind probe port");
    let addr = listener.local_addr().expect("Failed to read local addr");
    drop(listener);
    format!("http://{}{}", addr, path)
}
