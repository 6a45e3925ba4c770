//! `/metrics` endpoint.
use std::net::SocketAddr;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use pace_prometheus::{Encoder, PrometheusMetrics, TextEncoder};

pub fn router(metrics: PrometheusMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

/// Serve `/metrics` on `addr` until `cancel` fires.
pub async fn serve(addr: SocketAddr, metrics: PrometheusMetrics, cancel: CancellationToken) {
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %addr, error = %e, "failed to bind metrics endpoint");
            return;
        }
    };
    info!(addr = %addr, "serving metrics");

    if let Err(e) = axum::serve(listener, router(metrics))
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
    {
        error!(error = %e, "metrics endpoint failed");
    }
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> Response {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    match encoder.encode(&metrics.gather(), &mut buffer) {
        Ok(()) => (
            [(header::CONTENT_TYPE, encoder.format_type().to_string())],
            buffer,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use pace_core::MetricsBackend;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use super::*;

    async fn get(addr: SocketAddr, path: &str) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn exposes_recorded_metrics() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_progress(50.0);
        metrics.record_stall();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(axum::serve(listener, router(metrics)).into_future());

        let response = get(addr, "/metrics").await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("pace_progress_percent 50"));
        assert!(response.contains("pace_stalls_total 1"));
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let metrics = PrometheusMetrics::new().unwrap();
        tokio::spawn(axum::serve(listener, router(metrics)).into_future());

        let response = get(addr, "/").await;
        assert!(response.starts_with("HTTP/1.1 404"));
    }

    #[tokio::test]
    async fn serve_stops_on_cancel() {
        let cancel = CancellationToken::new();
        let metrics = PrometheusMetrics::new().unwrap();
        let handle = tokio::spawn(serve("127.0.0.1:0".parse().unwrap(), metrics, cancel.clone()));

        cancel.cancel();
        tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
