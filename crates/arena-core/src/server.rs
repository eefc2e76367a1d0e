//! Native HTTP server implementation
//!
//! hyper HTTP/1.1 on a multi-threaded tokio runtime with:
//! - Radix-trie routing with an any-method tree and a fallback handler
//! - SO_REUSEADDR and TCP_NODELAY via socket2
//! - Connection tracking and graceful drain on shutdown

use crate::{Error, Method, Middleware, MiddlewareChain, Request, Response, Result, Router, StatusCode};
use bytes::Bytes;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use socket2::{Domain, Protocol, Socket, Type};
use std::convert::Infallible;
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub hostname: String,
    pub port: u16,
    /// Tokio worker threads
    pub workers: usize,
    /// Largest request body accepted, in bytes
    pub max_body_size: usize,
    /// How long shutdown waits for in-flight connections
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: "0.0.0.0".to_string(),
            port: 8080,
            workers: num_cpus::get(),
            max_body_size: 1024 * 1024,
            shutdown_timeout: Duration::from_secs(10),
        }
    }
}

impl ServerConfig {
    /// Parse hostname and port into a bindable address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .hostname
            .parse()
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", self.hostname, e)))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        if self.workers == 0 {
            return Err(Error::Config("workers must be at least 1".to_string()));
        }
        if self.max_body_size == 0 {
            return Err(Error::Config("max body size must be at least 1 byte".to_string()));
        }
        Ok(())
    }
}

/// Route handler type
pub type DynamicHandler = Arc<
    dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync,
>;

/// Box an async closure into a [`DynamicHandler`]
pub fn handler<F, Fut>(f: F) -> DynamicHandler
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(move |req| Box::pin(f(req)))
}

/// Routing table and middleware shared by every connection
///
/// Built once at startup and read-only afterwards.
pub struct ServerState {
    router: Router<DynamicHandler>,
    middleware: MiddlewareChain,
    fallback: Option<DynamicHandler>,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            middleware: MiddlewareChain::new(),
            fallback: None,
        }
    }

    /// Add a route for one method
    pub fn route(&mut self, method: Method, path: &str, handler: DynamicHandler) -> &mut Self {
        self.router.insert(method.as_str(), path, handler);
        self
    }

    /// Add a route matching every method
    pub fn any(&mut self, path: &str, handler: DynamicHandler) -> &mut Self {
        self.router.any(path, handler);
        self
    }

    /// Handler for paths no route matches
    pub fn fallback(&mut self, handler: DynamicHandler) -> &mut Self {
        self.fallback = Some(handler);
        self
    }

    /// Append a middleware; the first one added is the outermost
    pub fn middleware<M: Middleware + 'static>(&mut self, middleware: M) -> &mut Self {
        self.middleware.add(middleware);
        self
    }

    /// Run a request through middleware and the matched handler
    pub async fn handle(&self, mut req: Request) -> Response {
        if let Some(mut early) = self.middleware.run_before(&mut req) {
            self.middleware.run_after(&req, &mut early);
            return early;
        }

        let handler = match self.router.find(req.method.as_str(), &req.path) {
            Some(matched) => {
                req.params = matched.params_map();
                Some(matched.value.clone())
            }
            None => self.fallback.clone(),
        };

        let head = req.clone();
        let mut res = match handler {
            Some(handler) => handler(req).await,
            None => Response::not_found(),
        };

        self.middleware.run_after(&head, &mut res);
        res
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a graceful shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Every connection closed before the timeout
    pub drained: bool,
    /// Connections still open when the server gave up waiting
    pub remaining: u64,
}

/// HTTP server bound to one [`ServerState`]
pub struct Server {
    config: ServerConfig,
    state: Arc<ServerState>,
    tracker: Arc<ConnectionTracker>,
}

impl Server {
    pub fn new(config: ServerConfig, state: ServerState) -> Self {
        Self {
            config,
            state: Arc::new(state),
            tracker: Arc::new(ConnectionTracker::new()),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn tracker(&self) -> Arc<ConnectionTracker> {
        self.tracker.clone()
    }

    /// Bind the configured address. Must run inside a tokio runtime.
    pub fn bind(&self) -> Result<TcpListener> {
        let addr = self.config.socket_addr()?;
        let socket = create_optimized_socket(&addr)?;
        socket.set_nonblocking(true)?;
        let listener: std::net::TcpListener = socket.into();
        Ok(TcpListener::from_std(listener)?)
    }

    /// Accept connections until `signal` resolves, then drain
    pub async fn serve_with_shutdown<F>(&self, listener: TcpListener, signal: F) -> Result<ShutdownReport>
    where
        F: Future<Output = ()>,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::pin!(signal);

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, remote) = match accepted {
                        Ok(conn) => conn,
                        Err(err) => {
                            tracing::warn!(%err, "accept failed");
                            continue;
                        }
                    };

                    if self.tracker.is_shutting_down() {
                        drop(stream);
                        continue;
                    }

                    self.spawn_connection(stream, remote, shutdown_rx.clone());
                }
                _ = &mut signal => {
                    self.tracker.start_shutdown();
                    break;
                }
            }
        }

        drop(listener);
        // Receivers only error once we are gone; ignore
        let _ = shutdown_tx.send(true);

        let drained = self.tracker.wait_idle(self.config.shutdown_timeout).await;
        Ok(ShutdownReport {
            drained,
            remaining: self.tracker.count(),
        })
    }

    fn spawn_connection(&self, stream: TcpStream, remote: SocketAddr, mut shutdown: watch::Receiver<bool>) {
        if let Err(err) = stream.set_nodelay(true) {
            tracing::debug!(%err, %remote, "set_nodelay failed");
        }

        let state = self.state.clone();
        let tracker = self.tracker.clone();
        let max_body = self.config.max_body_size;
        tracker.increment();

        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req: hyper::Request<Incoming>| {
                let state = state.clone();
                async move { Ok::<_, Infallible>(handle_request(state, req, remote, max_body).await) }
            });

            let conn = http1::Builder::new().serve_connection(io, service);
            tokio::pin!(conn);

            let result = tokio::select! {
                res = conn.as_mut() => res,
                _ = shutdown.changed() => {
                    conn.as_mut().graceful_shutdown();
                    conn.as_mut().await
                }
            };

            if let Err(err) = result {
                // Clients hanging up mid-request are routine
                if !err.is_incomplete_message() && !err.is_closed() {
                    tracing::warn!(%err, %remote, "connection error");
                }
            }

            tracker.decrement();
        });
    }
}

async fn handle_request(
    state: Arc<ServerState>,
    req: hyper::Request<Incoming>,
    remote: SocketAddr,
    max_body: usize,
) -> hyper::Response<Full<Bytes>> {
    let request = match from_hyper_request(req, Some(remote), max_body).await {
        Ok(request) => request,
        Err(Error::BodyTooLarge { limit }) => {
            return to_hyper_response(Response::error(
                StatusCode::PAYLOAD_TOO_LARGE,
                &format!("Request body exceeds {} bytes", limit),
            ));
        }
        Err(Error::InvalidMethod(_)) => return to_hyper_response(Response::method_not_allowed()),
        Err(err) => {
            tracing::debug!(%err, %remote, "unreadable request");
            return to_hyper_response(Response::bad_request("Bad Request"));
        }
    };

    to_hyper_response(state.handle(request).await)
}

/// Create a TCP listening socket with SO_REUSEADDR and TCP_NODELAY
pub fn create_optimized_socket(addr: &SocketAddr) -> std::io::Result<Socket> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // SO_REUSEADDR - allow binding to address in TIME_WAIT
    socket.set_reuse_address(true)?;

    // TCP_NODELAY - disable Nagle's algorithm for lower latency
    socket.set_nodelay(true)?;

    socket.bind(&(*addr).into())?;
    socket.listen(1024)?;

    Ok(socket)
}

/// Convert a hyper request into our Request, buffering at most `max_body` bytes
pub async fn from_hyper_request<B>(
    req: hyper::Request<B>,
    remote: Option<SocketAddr>,
    max_body: usize,
) -> Result<Request>
where
    B: hyper::body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let received_at = Instant::now();
    let (parts, body) = req.into_parts();
    let method: Method = parts.method.as_str().parse()?;

    let mut request = Request::new(method, parts.uri.path());
    request.query = parts.uri.query().map(|s| s.to_string());
    request.remote_addr = remote;
    request.received_at = received_at;

    for (name, value) in &parts.headers {
        if let Ok(v) = value.to_str() {
            request.headers.push((name.to_string(), v.to_string()));
        }
    }

    request.body = Limited::new(body, max_body)
        .collect()
        .await
        .map_err(|err| {
            if err.downcast_ref::<http_body_util::LengthLimitError>().is_some() {
                Error::BodyTooLarge { limit: max_body }
            } else {
                Error::Http(err.to_string())
            }
        })?
        .to_bytes();

    Ok(request)
}

/// Convert our Response to hyper Response
pub fn to_hyper_response(res: Response) -> hyper::Response<Full<Bytes>> {
    let mut builder = hyper::Response::builder().status(res.status.as_u16());

    for (name, value) in &res.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    match builder.body(Full::new(res.body)) {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(%err, "handler produced an invalid response head");
            let mut fallback = hyper::Response::new(Full::new(Bytes::from_static(b"Internal Server Error\n")));
            *fallback.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        }
    }
}

// ============================================================================
// Connection Tracking for Graceful Shutdown
// ============================================================================

/// Tracks active connections for graceful shutdown
///
/// Used to:
/// - Count active connections
/// - Signal shutdown to reject new connections
/// - Wait for existing connections to drain
#[derive(Debug)]
pub struct ConnectionTracker {
    active: AtomicU64,
    shutting_down: AtomicBool,
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self {
            active: AtomicU64::new(0),
            shutting_down: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn increment(&self) {
        self.active.fetch_add(1, Ordering::SeqCst);
    }

    #[inline]
    pub fn decrement(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }

    /// Signal that shutdown is in progress
    pub fn start_shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    /// Wait until no connection is active; false if `timeout` elapsed first
    pub async fn wait_idle(&self, timeout: Duration) -> bool {
        let start = Instant::now();
        loop {
            if self.count() == 0 {
                return true;
            }
            if start.elapsed() >= timeout {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}
