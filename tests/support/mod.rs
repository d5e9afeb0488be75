// Shared primitives for one-time server bootstrapping across integration tests.
use axum::{Router, extract::Path, http::HeaderMap, http::StatusCode, routing::get};
use host_flags_server::Settings;
use std::{
    net::SocketAddr,
    // `Arc` shares data between threads; `OnceLock` writes a value only once.
    sync::{Arc, OnceLock},
    // Sleep durations are used in readiness polling loops.
    time::Duration,
};

// Base URL of the host flags server shared by all tests in a binary.
static SERVER_URL: OnceLock<String> = OnceLock::new();
// One-time guard that ensures the bootstrap path runs only once.
static SERVER_READY: OnceLock<()> = OnceLock::new();

pub const FLAGS_VIDEO: &str = "flagged-video";
pub const PADDED_VIDEO: &str = "padded-video";
pub const BARE_VIDEO: &str = "bare-video";
pub const BROKEN_VIDEO: &str = "broken-video";
pub const SLOW_VIDEO: &str = "slow-video";

// How long the fake upstream stalls before answering `SLOW_VIDEO`.
pub const SLOW_RESPONSE_DELAY: Duration = Duration::from_secs(3);

// Fake embed page keyed by video id; rejects clients without a desktop browser agent.
async fn embed_page(Path(video_id): Path<String>, headers: HeaderMap) -> (StatusCode, String) {
    let agent = headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !agent.contains("Chrome/120.0.0.0") {
        return (StatusCode::FORBIDDEN, "unsupported client".to_string());
    }

    match video_id.as_str() {
        FLAGS_VIDEO => (
            StatusCode::OK,
            r#"<html><script>ytcfg.set({"encryptedHostFlags":"ABC123","INNERTUBE_CONTEXT":{}});</script></html>"#
                .to_string(),
        ),
        PADDED_VIDEO => (
            StatusCode::OK,
            r#"<script>var cfg = {"encryptedHostFlags" :  "XYZ"};</script>"#.to_string(),
        ),
        SLOW_VIDEO => {
            tokio::time::sleep(SLOW_RESPONSE_DELAY).await;
            (
                StatusCode::OK,
                r#"{"encryptedHostFlags":"TOO_LATE"}"#.to_string(),
            )
        }
        BROKEN_VIDEO => (
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"encryptedHostFlags":"SHOULD_NOT_BE_READ"}"#.to_string(),
        ),
        _ => (StatusCode::OK, "<html><body>no config</body></html>".to_string()),
    }
}

pub fn fake_embed_router() -> Router {
    Router::new().route("/embed/{video_id}", get(embed_page))
}

// Ensure the fake upstream and the test server are running and return the server URL.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // Spawn an OS thread so the servers outlive individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            // Each server thread owns its own Tokio runtime.
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            // Run the fake upstream and the service on this dedicated runtime.
            runtime.block_on(async move {
                let upstream = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind fake upstream port");
                let upstream_addr = upstream.local_addr().expect("get upstream addr");
                tokio::spawn(async move {
                    axum::serve(upstream, fake_embed_router())
                        .await
                        .expect("fake upstream failed");
                });

                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                // Capture the exact address that was assigned by the OS.
                let addr = listener.local_addr().expect("get local addr");
                // Publish the final base URL so test code can target the right server.
                let _ = published_url_thread.set(format!("http://{}", addr));

                let settings = Settings {
                    embed_base_url: format!("http://{upstream_addr}/embed"),
                    embed_fetch_timeout: Duration::from_secs(5),
                    ..Settings::default()
                };
                host_flags_server::run(listener, settings)
                    .await
                    .expect("server failed");
            });
        });
        // Block until URL is published and the bound port starts accepting connections.
        wait_for_server_url_and_readiness(published_url);
    });

    // Return the stable shared URL used by all tests in this binary.
    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

// Start the fake embed server on the current runtime and return its address.
pub async fn spawn_upstream() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake upstream port");
    let addr = listener.local_addr().expect("get upstream addr");
    tokio::spawn(async move {
        axum::serve(listener, fake_embed_router())
            .await
            .expect("fake upstream failed");
    });
    addr
}

// Start a server on the current runtime with custom settings and return its URL.
pub async fn spawn_server(settings: Settings) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        host_flags_server::run(listener, settings)
            .await
            .expect("server failed");
    });
    format!("http://{addr}")
}

// Wait for URL publication and then for the server socket to accept TCP connections.
fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    // Poll until the server thread publishes the base URL.
    let base_url = loop {
        // If the URL is published, clone it and stop waiting.
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        // Avoid a tight loop while waiting for the background thread.
        std::thread::sleep(Duration::from_millis(10));
    };

    // Persist the URL globally so every test gets the same endpoint.
    let _ = SERVER_URL.set(base_url.clone());

    // Strip the scheme so we can use host:port for raw TCP readiness checks.
    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    // Retry for a short period to avoid racing server bind/accept.
    for _ in 0..100 {
        // Successful connect means the server socket is accepting connections.
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        // Wait briefly before the next readiness check.
        std::thread::sleep(Duration::from_millis(20));
    }

    // Fail fast if startup never reached an accepting state.
    panic!("server did not become ready in time");
}
