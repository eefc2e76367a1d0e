//! Middleware implementations
//!
//! Middleware runs around every routed handler: `before` hooks in
//! registration order, `after` hooks in reverse order.

pub mod access_log;
pub mod client_ip;
pub mod compress;
pub mod security;

// Re-exports for convenience
pub use access_log::{generate_request_id, AccessLog, AccessLogConfig};
pub use client_ip::{resolve_client_ip, ClientIpPolicy, RemoteFormat};
pub use compress::{Compress, Encoding};
pub use security::{FrameOptions, Security, SecurityConfig};

use crate::{Request, Response};

/// Middleware trait - process request/response
pub trait Middleware: Send + Sync {
    /// Process request before handler; returning a response short-circuits the handler
    fn before(&self, req: &mut Request) -> Option<Response>;

    /// Process response after handler
    fn after(&self, req: &Request, res: &mut Response);
}

/// Middleware chain
pub struct MiddlewareChain {
    middlewares: Vec<Box<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    /// Append a middleware; the first one added is the outermost
    pub fn add<M: Middleware + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Box::new(middleware));
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Run before middlewares, return early response if any
    pub fn run_before(&self, req: &mut Request) -> Option<Response> {
        for m in &self.middlewares {
            if let Some(res) = m.before(req) {
                return Some(res);
            }
        }
        None
    }

    /// Run after middlewares in reverse order
    pub fn run_after(&self, req: &Request, res: &mut Response) {
        for m in self.middlewares.iter().rev() {
            m.after(req, res);
        }
    }
}

impl Default for MiddlewareChain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Method, RequestBuilder};
    use std::sync::{Arc, Mutex};

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Middleware for Recorder {
        fn before(&self, _req: &mut Request) -> Option<Response> {
            self.log.lock().unwrap().push(format!("before:{}", self.name));
            None
        }

        fn after(&self, _req: &Request, _res: &mut Response) {
            self.log.lock().unwrap().push(format!("after:{}", self.name));
        }
    }

    #[test]
    fn test_chain_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = MiddlewareChain::new();
        chain.add(Recorder { name: "outer", log: log.clone() });
        chain.add(Recorder { name: "inner", log: log.clone() });

        let mut req = RequestBuilder::new(Method::Get, "/").build();
        assert!(chain.run_before(&mut req).is_none());
        let mut res = Response::ok();
        chain.run_after(&req, &mut res);

        assert_eq!(
            *log.lock().unwrap(),
            vec!["before:outer", "before:inner", "after:inner", "after:outer"]
        );
    }
}
