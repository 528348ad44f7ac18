// src/server/http_server.rs
//! HTTP/1 control surface
//!
//! One task per connection, all on whatever runtime the caller provides.
//! On a current-thread runtime this is the cooperative event loop whose
//! starvation the workloads demonstrate.

use crate::server::handlers::{self, AppState};
use crate::server::router::Route;
use crate::utils::errors::{HarnessError, Result};
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// Control surface server
pub struct ControlServer {
    state: Arc<AppState>,
}

impl ControlServer {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Bind a listener on `addr`
    pub async fn bind(addr: &str) -> Result<TcpListener> {
        TcpListener::bind(addr)
            .await
            .map_err(|e| HarnessError::ServerFailed(format!("Failed to bind {}: {}", addr, e)))
    }

    /// Accept connections until `shutdown` resolves
    pub async fn serve(
        self: Arc<Self>,
        listener: TcpListener,
        shutdown: impl Future<Output = ()>,
    ) -> Result<()> {
        let local_addr = listener
            .local_addr()
            .map_err(|e| HarnessError::ServerFailed(format!("No local address: {}", e)))?;
        info!("Control surface listening on http://{}", local_addr);

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Control surface shutting down");
                    return Ok(());
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        let server = Arc::clone(&self);
                        tokio::spawn(async move { server.serve_connection(stream, addr).await });
                    }
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                    }
                },
            }
        }
    }

    async fn serve_connection(self: Arc<Self>, stream: tokio::net::TcpStream, addr: SocketAddr) {
        debug!("Accepted connection from {}", addr);

        let io = TokioIo::new(stream);
        let service = service_fn(move |req| {
            let server = Arc::clone(&self);
            async move { server.handle_request(req).await }
        });

        if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
            error!("Connection error: {}", e);
        }
    }

    /// Dispatch one request
    async fn handle_request(&self, req: Request<Incoming>) -> Result<Response<Full<Bytes>>> {
        let started = Instant::now();
        let method = req.method().clone();
        let uri = req.uri().clone();

        let response = match Route::resolve(&method, uri.path()) {
            Route::Index => handlers::index(),
            Route::NonBlocking => handlers::non_blocking(),
            Route::Metrics => handlers::metrics(&self.state),
            Route::Block(kind) => handlers::block(&self.state, kind, uri.query()).await,
            Route::NotFound => handlers::not_found(),
        };

        info!(
            method = %method,
            path = uri.path(),
            status = response.status().as_u16(),
            "Served in {:.3}s",
            started.elapsed().as_secs_f64()
        );

        Ok(response)
    }
}
