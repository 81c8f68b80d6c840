//! A small TCP server that serves a built [`Mux`].

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Duration;

use crate::mux::Mux;
use crate::parser::{parse_request, request_length};
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::response::{HttpResponse, StatusCode};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Tasks spawned for accepted connections.
pub(crate) struct ConnectionTasks {
    set: JoinSet<()>,
}

impl ConnectionTasks {
    pub(crate) fn new() -> Self {
        Self { set: JoinSet::new() }
    }

    pub(crate) fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.set.spawn(task);
    }

    pub(crate) fn len(&self) -> usize {
        self.set.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Wait for the next task to finish and log it if it panicked.
    ///
    /// Returns `false` if there was no task to wait for.
    pub(crate) async fn reap(&mut self) -> bool {
        match self.set.join_next().await {
            Some(Ok(())) => true,
            Some(Err(e)) => {
                error!("Connection task failed: {e}");
                true
            }
            None => false,
        }
    }

    /// Wait for in-flight connections, aborting them after `timeout`.
    async fn drain(&mut self, timeout: Duration) {
        info!("Waiting for {len} active connections to complete...", len = self.len());
        let drained = tokio::time::timeout(timeout, async {
            while self.reap().await {}
        })
        .await;

        if drained.is_err() {
            warn!("Shutdown timed out, aborting {len} connections", len = self.len());
            self.set.abort_all();
        }
        info!("Server shutdown complete");
    }
}

/// An HTTP server.
///
/// The router is moved behind an `Arc` when the server is built, so no route
/// can be added or removed while requests are being served. Every connection
/// carries a single request and is closed after the response.
pub struct HttpServer {
    pub config: ServerConfig,
    mux: Arc<Mux>,
}

impl HttpServer {
    pub fn new(config: ServerConfig, mux: Mux) -> Self {
        Self {
            config,
            mux: Arc::new(mux),
        }
    }

    pub fn mux(&self) -> &Mux {
        &self.mux
    }

    fn log_routes(&self) {
        info!("Registered routes:");
        for route in self.mux.routes() {
            let method = route.method.to_uppercase();
            info!("  {method} {}", route.pattern);
        }
    }

    /// Resolves on Ctrl+C. Never resolves if the handler cannot be installed.
    async fn ctrl_c() {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown"),
            Err(e) => {
                error!("Error setting up Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    }

    fn spawn_connection(
        &self,
        mut socket: TcpStream,
        addr: SocketAddr,
        semaphore: &Arc<Semaphore>,
        tasks: &mut ConnectionTasks,
    ) {
        let Ok(permit) = semaphore.clone().try_acquire_owned() else {
            warn!("Connection limit reached, rejecting connection from {addr}");
            tasks.spawn(async move {
                let response = HttpResponse::new(StatusCode::ServiceUnavailable)
                    .with_content_type("text/plain")
                    .with_body_string("Server is at capacity, please try again later");
                let _ = Self::send(&mut socket, response).await;
            });
            return;
        };

        let mux = Arc::clone(&self.mux);
        let config = self.config.clone();
        tasks.spawn(async move {
            let _permit = permit;
            if let Err(e) = Self::handle_connection(&mut socket, &mux, &config).await {
                warn!("Error handling connection from {addr}: {e}");
            }
        });
    }

    /// Bind the configured address and serve until Ctrl+C.
    pub async fn start(&self) -> Result<(), Error> {
        self.log_routes();

        let listener = TcpListener::bind(&self.config.addr).await?;
        info!("Server listening on http://{addr}", addr = self.config.addr);

        self.serve(listener, Self::ctrl_c()).await
    }

    /// Serve connections from `listener` until `shutdown` resolves, then wait
    /// for the connections still in flight.
    pub async fn serve(
        &self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), Error> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_connections));
        let mut tasks = ConnectionTasks::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Shutting down server...");
                    break;
                }
                true = tasks.reap(), if !tasks.is_empty() => {}
                accepted = listener.accept() => match accepted {
                    Ok((socket, addr)) => self.spawn_connection(socket, addr, &semaphore, &mut tasks),
                    Err(e) => {
                        error!("Error accepting connection: {e}");
                        tokio::time::sleep(Duration::from_millis(100)).await;
                    }
                },
            }
        }

        tasks.drain(SHUTDOWN_TIMEOUT).await;
        Ok(())
    }

    /// Read one request from `socket`, route it and write the response.
    pub async fn handle_connection(
        socket: &mut (impl AsyncRead + AsyncWrite + Unpin),
        mux: &Mux,
        config: &ServerConfig,
    ) -> Result<(), Error> {
        let request = match Self::read_request(socket, config).await {
            Ok(buf) if buf.is_empty() => return Ok(()),
            Ok(buf) => parse_request(&buf).map_err(Error::from),
            Err(e) => Err(e),
        };

        let request = match request {
            Ok(req) => req,
            Err(Error::IoError(e)) => return Err(e.into()),
            Err(e) => {
                Self::send(socket, Self::rejection(&e)).await?;
                return Err(e);
            }
        };

        let mut response = HttpResponse::default();
        mux.serve(&mut response, request);
        Self::send(socket, response).await
    }

    /// Read the header section, then as many body bytes as its
    /// `Content-Length` declares.
    ///
    /// Stops early if the peer closes the connection; an empty buffer means
    /// nothing was sent.
    async fn read_request(
        socket: &mut (impl AsyncRead + Unpin),
        config: &ServerConfig,
    ) -> Result<Vec<u8>, Error> {
        let limit = config.max_request_size;
        let mut buf = Vec::with_capacity(config.read_buffer_size);
        let mut chunk = vec![0; config.read_buffer_size];
        let mut expected = None;

        loop {
            if expected.is_none() {
                expected = request_length(&buf)?;
            }
            match expected {
                Some(len) if len > limit => return Err(Error::RequestTooLarge(limit)),
                Some(len) if buf.len() >= len => break,
                None if buf.len() >= limit => return Err(Error::RequestTooLarge(limit)),
                _ => {}
            }

            let n = socket.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        Ok(buf)
    }

    fn rejection(e: &Error) -> HttpResponse {
        let (status, message) = match e {
            Error::RequestTooLarge(limit) => (
                StatusCode::PayloadTooLarge,
                format!("Request exceeds {limit} bytes"),
            ),
            Error::ParseError(e) => (StatusCode::BadRequest, format!("Error parsing request: {e}")),
            e => (StatusCode::InternalServerError, e.to_string()),
        };

        HttpResponse::new(status)
            .with_content_type("text/plain")
            .with_body_string(message)
    }

    /// Write `response` and mark the connection as closing.
    async fn send(
        socket: &mut (impl AsyncWrite + Unpin),
        mut response: HttpResponse,
    ) -> Result<(), Error> {
        response
            .headers
            .retain(|name, _| !name.eq_ignore_ascii_case("Connection"));
        response.set_header("Connection", "close");

        socket.write_all(&response.to_bytes()).await?;
        socket.flush().await?;
        Ok(())
    }
}
