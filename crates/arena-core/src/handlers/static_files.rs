//! Static file serving handler
//!
//! Serves assets from a directory with ETag and Cache-Control support.

use crate::{Method, Request, Response, ResponseBuilder, StatusCode};
use std::path::{Component, Path, PathBuf};

/// Static file configuration
#[derive(Clone)]
pub struct StaticFileConfig {
    /// Root directory
    pub root: PathBuf,
    /// Index file name served for directory paths
    pub index: String,
    /// Cache max-age in seconds
    pub max_age: u32,
    /// Enable ETag
    pub etag: bool,
    /// Serve dot files
    pub hidden: bool,
}

impl Default for StaticFileConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            index: "index.html".to_string(),
            max_age: 3600,
            etag: true,
            hidden: false,
        }
    }
}

impl StaticFileConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }
}

/// Static file handler
pub struct StaticFiles {
    config: StaticFileConfig,
}

impl StaticFiles {
    pub fn new(config: StaticFileConfig) -> Self {
        Self { config }
    }

    /// Serve static files from directory
    pub fn serve(root: impl Into<PathBuf>) -> Self {
        Self::new(StaticFileConfig::new(root))
    }

    /// Handle a request for `relative`, the part of the path below the mount point
    pub async fn handle(&self, req: &Request, relative: &str) -> Response {
        if req.method != Method::Get && req.method != Method::Head {
            return Response::method_not_allowed();
        }

        let Some(path) = self.sanitize_path(relative) else {
            return Response::not_found();
        };
        let full_path = self.config.root.join(&path);

        let meta = match tokio::fs::metadata(&full_path).await {
            Ok(meta) => meta,
            Err(_) => return Response::not_found(),
        };

        if !meta.is_dir() {
            return self.serve_file(&full_path, &meta, req).await;
        }

        let index_path = full_path.join(&self.config.index);
        if let Ok(index_meta) = tokio::fs::metadata(&index_path).await {
            if index_meta.is_file() {
                return self.serve_file(&index_path, &index_meta, req).await;
            }
        }

        Response::not_found()
    }

    /// Sanitize request path to prevent directory traversal
    fn sanitize_path(&self, path: &str) -> Option<PathBuf> {
        let path = path.trim_start_matches('/');

        if !self.config.hidden && path.split('/').any(|s| s.starts_with('.')) {
            return None;
        }

        let mut result = PathBuf::new();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(c) => result.push(c),
                Component::ParentDir => return None,
                _ => {}
            }
        }

        Some(result)
    }

    async fn serve_file(&self, path: &Path, meta: &std::fs::Metadata, req: &Request) -> Response {
        let etag = self.config.etag.then(|| generate_etag(meta));

        if let (Some(etag), Some(if_none_match)) = (etag.as_deref(), req.header("if-none-match")) {
            if etag_matches(if_none_match, etag) {
                return ResponseBuilder::new(StatusCode::NOT_MODIFIED)
                    .header("ETag", etag)
                    .build();
            }
        }

        let content = match tokio::fs::read(path).await {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(%err, path = %path.display(), "static file read failed");
                return Response::not_found();
            }
        };

        let mut builder = ResponseBuilder::new(StatusCode::OK).header("Content-Type", mime_type(path));

        if let Some(etag) = etag {
            builder = builder.header("ETag", etag);
        }

        if self.config.max_age > 0 {
            builder = builder.header("Cache-Control", format!("max-age={}", self.config.max_age));
        }

        if req.method == Method::Head {
            builder.build()
        } else {
            builder.body(content).build()
        }
    }
}

/// Weak comparison against an `If-None-Match` list. Compressed responses
/// carry a weakened copy of the tag, so `W/` is ignored on both sides.
fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    let etag = etag.trim_start_matches("W/");
    if_none_match
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || candidate.trim_start_matches("W/") == etag)
}

fn generate_etag(meta: &std::fs::Metadata) -> String {
    use std::time::UNIX_EPOCH;

    let mtime = meta
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0);

    format!("\"{:x}-{:x}\"", mtime, meta.len())
}

fn mime_type(path: &Path) -> &'static str {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext.to_lowercase().as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}
