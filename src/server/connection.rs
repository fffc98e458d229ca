// Connection handling module
// Serves one accepted TCP connection with hyper and the static file handler

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;

use mountserve::config::AppState;
use mountserve::http::{build_404_response, build_500_response, ServeBody};
use mountserve::logger::{self, AccessLogEntry};

/// Handle a single connection in a spawned local task.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Serves HTTP/1.1 with keep-alive
/// 3. Runs every request through the static file handler, 404 on a miss
pub fn handle_connection(stream: tokio::net::TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(true);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { Ok::<_, Infallible>(serve_request(req, peer_addr, &state).await) }
            }),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}

/// Serve one request and write its access log line
async fn serve_request(
    req: Request<Incoming>,
    peer_addr: SocketAddr,
    state: &AppState,
) -> Response<ServeBody> {
    let started = Instant::now();

    let response = match state
        .static_files
        .handle(&req, || async { Ok(build_404_response()) })
        .await
    {
        Ok(response) => response,
        Err(e) => {
            logger::log_error(&format!("Failed to serve {}: {e}", req.uri().path()));
            build_500_response()
        }
    };

    if let Some(format) = state.access_log_format() {
        let entry = AccessLogEntry::new(peer_addr, &req, &response, started.elapsed());
        logger::log_access(&entry, format);
    }

    response
}
