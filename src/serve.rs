//! Local preview server.
//!
//! Serves the site root as static files on the first free port of a fixed
//! range, with the configured `Content-Security-Policy` header on every
//! response (404s included). Runs until Ctrl-C.
//!
//! ```text
//! 8000 busy ──► 8001 busy ──► 8002 bound ──► GET /archive.html
//!                                             └─ ServeDir(root) + CSP header
//! ```
//!
//! The port scan binds with `std::net` so "is this port free" and "take this
//! port" are the same operation; the bound socket is then handed to tokio.

use crate::config::ServerConfig;
use axum::Router;
use axum::http::HeaderValue;
use axum::http::header::{CONTENT_SECURITY_POLICY, InvalidHeaderValue};
use log::{info, warn};
use std::net::{IpAddr, TcpListener};
use std::path::Path;
use thiserror::Error;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No free port: tried {attempts} port(s) starting at {start}")]
    NoFreePort { start: u16, attempts: u16 },
    #[error("Invalid Content-Security-Policy value: {0}")]
    Header(#[from] InvalidHeaderValue),
}

/// Bind the first free port in `start .. start + attempts`.
///
/// Ports past 65535 are never tried.
pub fn find_available_port(
    bind: IpAddr,
    start: u16,
    attempts: u16,
) -> Result<TcpListener, ServeError> {
    for offset in 0..attempts {
        let Some(port) = start.checked_add(offset) else {
            break;
        };
        match TcpListener::bind((bind, port)) {
            Ok(listener) => return Ok(listener),
            Err(e) => info!("Port {port} unavailable ({e}), trying next"),
        }
    }
    Err(ServeError::NoFreePort { start, attempts })
}

/// Static file router for `root` with the CSP header on every response.
pub fn router(root: &Path, content_security_policy: &str) -> Result<Router, ServeError> {
    let csp = HeaderValue::from_str(content_security_policy)?;
    Ok(Router::new()
        .fallback_service(ServeDir::new(root))
        .layer(SetResponseHeaderLayer::overriding(
            CONTENT_SECURITY_POLICY,
            csp,
        )))
}

/// Serve `root` until Ctrl-C.
pub fn serve(root: &Path, config: &ServerConfig) -> Result<(), ServeError> {
    let listener = find_available_port(config.bind, config.start_port, config.max_attempts)?;
    listener.set_nonblocking(true)?;
    let port = listener.local_addr()?.port();
    let app = router(root, &config.content_security_policy)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::from_std(listener)?;
        info!("Serving {} at http://localhost:{port}", root.display());
        println!("Serving at http://localhost:{port} (Ctrl-C to stop)");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    })?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            warn!("Could not listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    }
}
