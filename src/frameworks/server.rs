// Framework bootstrap for the host flags service runtime.

use crate::frameworks::config::{self, Settings};
use crate::interface_adapters::clients::EmbedPageClient;
use crate::interface_adapters::routes;
use crate::interface_adapters::state::AppState;
use std::io::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use url::Url;

fn init_runtime() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    // RUST_LOG wins; otherwise log at info.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // LOG_FORMAT=json switches to one JSON object per line for log shippers.
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    // Route panics through tracing so they land in the same log stream.
    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener, settings: Settings) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state(&settings)?;
    let app = routes::app(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking.
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let settings = Settings::from_env().map_err(|e| {
        tracing::error!(error = %e, "invalid EMBED_BASE_URL");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let host = if config::bind_all_interfaces() {
        [0, 0, 0, 0]
    } else {
        [127, 0, 0, 1]
    };
    let address = SocketAddr::from((host, config::http_port()));

    // Bind TCP listener with error handling.
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener, settings).await
}

fn build_state(settings: &Settings) -> Result<Arc<AppState>> {
    // Settings built in code skip `from_env`, so the base URL is checked again here.
    let base_url = config::parse_base_url(&settings.embed_base_url)
        .and_then(|raw| Url::parse(&raw))
        .map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid embed base url: {e}"),
            )
        })?;
    let embed = EmbedPageClient::new(
        base_url,
        settings.user_agent.clone(),
        settings.embed_fetch_timeout,
    )
    .map_err(|e| std::io::Error::other(format!("failed to initialize embed client: {e}")))?;
    tracing::debug!(
        embed_base_url = %settings.embed_base_url,
        embed_fetch_timeout_ms = settings.embed_fetch_timeout.as_millis(),
        "embed client configured"
    );

    Ok(Arc::new(AppState {
        embed: Arc::new(embed),
    }))
}
