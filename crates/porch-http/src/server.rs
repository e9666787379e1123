use crate::{mjpeg, FrameHub};
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use tokio::net::{TcpListener, ToSocketAddrs};

const INDEX_HTML: &str = "image:<br><img src=\"/feed\" />";

/// Build the application router: `GET /` serves an HTML page embedding the
/// stream, `GET /feed` serves the stream itself.
pub fn router(hub: FrameHub) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/feed", get(feed))
        .with_state(hub)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn feed(State(hub): State<FrameHub>) -> impl IntoResponse {
    log::info!("Client connected to feed ({} streaming)", hub.client_count());
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, mjpeg::content_type())],
        Body::from_stream(hub.subscribe()),
    )
}

/// Bind `addr` and serve the router until ctrl-c.
pub async fn serve(addr: impl ToSocketAddrs, hub: FrameHub) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    log::info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(hub))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    log::info!("Shutting down");
}
