//! The HTTP accept loop.
//!
//! Built on hyper and tokio: one task per connection, request bodies
//! collected up front under a timeout, graceful shutdown draining
//! in-flight connections with a bounded wait.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use gazette_core::{AppError, ErrorBody};
use gazette_extract::ExtractionContext;

use crate::app::App;
use crate::config::ServerConfig;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// The HTTP response body type.
pub type ResponseBody = Full<Bytes>;

/// The Gazette HTTP server.
pub struct Server {
    config: ServerConfig,
    app: Arc<App>,
}

impl Server {
    /// Creates a server over an application context.
    #[must_use]
    pub fn new(config: ServerConfig, app: App) -> Self {
        Self {
            config,
            app: Arc::new(app),
        }
    }

    /// Runs the server until SIGTERM or SIGINT.
    ///
    /// # Errors
    ///
    /// Returns an error when the bind address is invalid or cannot be
    /// bound.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Runs the server with a caller-controlled shutdown signal.
    ///
    /// # Errors
    ///
    /// Returns an error when the bind address is invalid or cannot be
    /// bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self.config.socket_addr().map_err(|e| {
            ServerError::Bind(format!(
                "invalid address '{}': {e}",
                self.config.http_addr()
            ))
        })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(format!("failed to bind to {addr}: {e}")))?;

        tracing::info!("server listening on {addr}");

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            let server = Arc::clone(&server);
                            let token = tracker.acquire();
                            let shutdown = shutdown.clone();

                            tokio::spawn(async move {
                                if let Err(e) = server.handle_connection(stream, remote_addr, shutdown).await {
                                    tracing::error!("connection error from {remote_addr}: {e}");
                                }
                                drop(token);
                            });
                        }
                        Err(e) => {
                            tracing::error!("failed to accept connection: {e}");
                        }
                    }
                }

                () = shutdown.recv() => {
                    tracing::info!("shutdown signal received, stopping server");
                    break;
                }
            }
        }

        let shutdown_timeout = server.config.shutdown_timeout();
        tracing::info!(
            "waiting up to {shutdown_timeout:?} for {} connections to close",
            tracker.active_connections()
        );

        tokio::select! {
            () = tracker.wait_for_drain() => {
                tracing::info!("all connections closed");
            }
            () = tokio::time::sleep(shutdown_timeout) => {
                tracing::warn!(
                    "shutdown timeout reached, {} connections still active",
                    tracker.active_connections()
                );
            }
        }

        tracing::info!("server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: &Arc<Self>,
        stream: tokio::net::TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let server = Arc::clone(self);

        let service = service_fn(move |req: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { server.handle_request(req).await }
        });

        let conn = http1::Builder::new().serve_connection(io, service);

        tokio::select! {
            result = conn => result,
            () = shutdown.recv() => {
                tracing::debug!("connection from {remote_addr} closed due to shutdown");
                Ok(())
            }
        }
    }

    async fn handle_request(
        self: &Arc<Self>,
        req: Request<Incoming>,
    ) -> Result<Response<ResponseBody>, Infallible> {
        let (parts, body) = req.into_parts();

        let body = match tokio::time::timeout(self.config.request_timeout(), collect_body(body))
            .await
        {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => {
                tracing::error!("failed to read request body: {e}");
                return Ok(error_response(
                    StatusCode::BAD_REQUEST,
                    &AppError::BadRequest,
                ));
            }
            Err(_) => {
                tracing::warn!("request body collection timed out");
                return Ok(error_response(
                    StatusCode::REQUEST_TIMEOUT,
                    &AppError::BadRequest,
                ));
            }
        };

        let ctx = ExtractionContext::new(parts.method, parts.uri, parts.headers, body);

        let response = tokio::time::timeout(self.config.request_timeout(), self.app.handle(ctx))
            .await;

        match response {
            Ok(response) => {
                let (parts, body) = response.into_parts();
                Ok(Response::from_parts(parts, Full::new(body)))
            }
            Err(_) => {
                tracing::warn!("handler timed out");
                Ok(error_response(
                    StatusCode::GATEWAY_TIMEOUT,
                    &AppError::Storage("handler timed out".to_string()),
                ))
            }
        }
    }
}

async fn collect_body(body: Incoming) -> Result<Bytes, hyper::Error> {
    Ok(body.collect().await?.to_bytes())
}

fn error_response(status: StatusCode, err: &AppError) -> Response<ResponseBody> {
    let body = serde_json::to_vec(&err.body()).unwrap_or_else(|_| {
        serde_json::to_vec(&ErrorBody {
            text: "Internal error!".to_string(),
            error: "internal".to_string(),
        })
        .unwrap_or_default()
    });

    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}

/// Server lifecycle failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    /// The configured address could not be parsed or bound.
    Bind(String),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bind(msg) => write!(f, "bind error: {msg}"),
        }
    }
}

impl std::error::Error for ServerError {}

#[cfg(test)]
mod tests {
    use super::*;
    use gazette_core::Config;
    use gazette_store::ArticleStore;
    use std::time::Duration;
    use tempfile::TempDir;

    fn test_server(dir: &TempDir, addr: &str) -> Server {
        let config = Config {
            addr: addr.to_string(),
            god_password: "x".to_string(),
            secret_key: "test-signing-key".to_string(),
            db_path: dir.path().join("articles.redb"),
        };
        let store = ArticleStore::open(&config.db_path).unwrap();
        let server_config = ServerConfig::builder()
            .http_addr(addr)
            .shutdown_timeout(Duration::from_millis(100))
            .build();
        Server::new(server_config, App::new(config, store))
    }

    #[tokio::test]
    async fn test_run_invalid_address() {
        let dir = TempDir::new().unwrap();
        let server = test_server(&dir, "not-a-valid-address");

        let result = server.run_with_shutdown(ShutdownSignal::new()).await;
        assert!(matches!(result, Err(ServerError::Bind(_))));
    }

    #[tokio::test]
    async fn test_run_and_shutdown() {
        let dir = TempDir::new().unwrap();
        // Port 0 picks a free port.
        let server = test_server(&dir, "127.0.0.1:0");

        let shutdown = ShutdownSignal::new();
        shutdown.trigger();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            server.run_with_shutdown(shutdown),
        )
        .await;

        assert!(result.is_ok());
        assert!(result.unwrap().is_ok());
    }

    #[test]
    fn test_server_error_display() {
        let err = ServerError::Bind("address in use".to_string());
        assert!(err.to_string().contains("bind error"));
    }
}
