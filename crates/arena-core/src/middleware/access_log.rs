//! Access log middleware
//!
//! Tags each request with an id and emits one `tracing` event per
//! response with method, path, status and latency.

use crate::{Request, Response};
use super::Middleware;
use rand::Rng;

/// Access log configuration
#[derive(Clone)]
pub struct AccessLogConfig {
    /// Header carrying the request ID in both directions
    pub header_name: String,
    /// Generate request ID if the client did not send one
    pub generate_id: bool,
    /// Emit the per-request event
    pub log_requests: bool,
}

impl Default for AccessLogConfig {
    fn default() -> Self {
        Self {
            header_name: "X-Request-ID".to_string(),
            generate_id: true,
            log_requests: true,
        }
    }
}

impl AccessLogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = name.into();
        self
    }

    pub fn generate_id(mut self, generate: bool) -> Self {
        self.generate_id = generate;
        self
    }

    pub fn quiet(mut self) -> Self {
        self.log_requests = false;
        self
    }
}

/// Generate a 16-character request id
pub fn generate_request_id() -> String {
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..16)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Access log middleware
pub struct AccessLog {
    config: AccessLogConfig,
}

impl AccessLog {
    pub fn new(config: AccessLogConfig) -> Self {
        Self { config }
    }
}

impl Default for AccessLog {
    fn default() -> Self {
        Self::new(AccessLogConfig::default())
    }
}

impl Middleware for AccessLog {
    fn before(&self, req: &mut Request) -> Option<Response> {
        let request_id = req
            .header(&self.config.header_name)
            .map(|s| s.to_string())
            .or_else(|| self.config.generate_id.then(generate_request_id));

        req.request_id = request_id;
        None
    }

    fn after(&self, req: &Request, res: &mut Response) {
        if let Some(ref id) = req.request_id {
            res.set_header(&self.config.header_name, id.clone());
        }

        if self.config.log_requests {
            let elapsed = req.received_at.elapsed();
            tracing::info!(
                request_id = req.request_id.as_deref().unwrap_or("-"),
                method = req.method.as_str(),
                path = %req.path,
                status = res.status.as_u16(),
                elapsed_us = elapsed.as_micros() as u64,
                "request"
            );
        }
    }
}
