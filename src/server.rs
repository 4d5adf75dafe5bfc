//! HTTP server and graceful shutdown.
//!
//! On SIGTERM or Ctrl-C the server stops accepting and tells every open
//! connection to finish its current request and close; idle keep-alive
//! connections close at once. Connections still open after
//! [`DRAIN_TIMEOUT`] are aborted. Returning from [`Server::serve`] drops the
//! router and with it the shared [`App`](crate::App), which is when a
//! temporary store file is removed.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::error::{ApiError, Error};
use crate::method::Method;
use crate::request::Request;
use crate::response::IntoResponse;
use crate::router::Router;

/// How long shutdown waits for open connections before aborting them.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    pub fn bind(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Binds, then accepts connections and dispatches them through `router`
    /// until SIGTERM or Ctrl-C.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;
        info!(addr = %self.addr, "blogs-api listening");
        Self::serve_on(listener, router, shutdown_signal()).await
    }

    /// Serves `router` on an already bound `listener` until `shutdown`
    /// resolves, then drains.
    pub async fn serve_on(
        listener: TcpListener,
        router: Router,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), Error> {
        let router = Arc::new(router);
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut tasks = tokio::task::JoinSet::new();

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Check shutdown first so a signal stops accepting at once,
                // even with connections queued.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, _) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let router = Arc::clone(&router);
                    let stop = stop_rx.clone();
                    tasks.spawn(async move {
                        serve_connection(TokioIo::new(stream), router, stop).await;
                    });
                }

                // Reap finished tasks so the set does not grow without bound.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        drop(listener);
        // `stop_rx` is still in scope, so the send cannot fail.
        let _ = stop_tx.send(true);

        let drained = tokio::time::timeout(DRAIN_TIMEOUT, async {
            while tasks.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            warn!(remaining = tasks.len(), "drain timed out, aborting connections");
            tasks.shutdown().await;
        }

        info!("blogs-api stopped");
        Ok(())
    }
}

/// Runs one connection until the peer closes it or, after `stop` flips, until
/// the request in progress (if any) has been answered.
async fn serve_connection(
    io: TokioIo<tokio::net::TcpStream>,
    router: Arc<Router>,
    mut stop: watch::Receiver<bool>,
) {
    let peer = io.inner().peer_addr().ok();
    let svc = service_fn(move |req| {
        let router = Arc::clone(&router);
        async move { dispatch(&router, req).await }
    });

    let builder = ConnBuilder::new(TokioExecutor::new());
    let conn = builder.serve_connection(io, svc);
    tokio::pin!(conn);

    let mut stopping = *stop.borrow();
    if stopping {
        conn.as_mut().graceful_shutdown();
    }

    loop {
        tokio::select! {
            res = conn.as_mut() => {
                if let Err(e) = res {
                    error!(peer = ?peer, "connection error: {e}");
                }
                break;
            }
            changed = stop.changed(), if !stopping => {
                stopping = true;
                if changed.is_ok() {
                    conn.as_mut().graceful_shutdown();
                }
            }
        }
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Reads one request off the wire, routes it, and logs the outcome. Every
/// failure becomes a response, so hyper never sees an error.
async fn dispatch(
    router: &Router,
    req: hyper::Request<Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    let path = parts.uri.path().to_owned();

    let response = match (Method::try_from(&parts.method), read_body(body, MAX_BODY_BYTES).await) {
        (Ok(method), Ok(body)) => router.handle(Request::new(method, path.clone(), body)).await,
        (Err(()), _) => ApiError::RouteNotFound.into_response(),
        (_, Err(e)) => {
            warn!(%path, "rejected request body: {e}");
            e.into_response()
        }
    };

    info!(
        method = %parts.method,
        %path,
        status = response.status_code().as_u16(),
        latency_us = started.elapsed().as_micros() as u64,
        "request",
    );

    Ok(response.into_inner())
}

/// Collects a request body of at most `limit` bytes.
async fn read_body<B>(body: B, limit: usize) -> Result<Vec<u8>, ApiError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes().to_vec()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            Err(ApiError::InvalidBody(format!("body exceeds {limit} bytes")))
        }
        Err(e) => Err(ApiError::InvalidBody(e.to_string())),
    }
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on SIGTERM or Ctrl-C. If a handler cannot be installed that arm
/// never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
