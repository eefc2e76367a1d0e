//! Compression middleware
//!
//! Negotiates brotli, gzip or deflate from `Accept-Encoding` and
//! compresses text-like bodies above a size threshold.

use crate::{Request, Response};
use super::Middleware;

/// Compression encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Gzip,
    Brotli,
    Deflate,
    Identity,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Gzip => "gzip",
            Encoding::Brotli => "br",
            Encoding::Deflate => "deflate",
            Encoding::Identity => "identity",
        }
    }

    /// Parse from Accept-Encoding header. Codings listed with `q=0` are refused.
    pub fn from_accept_encoding(header: &str) -> Self {
        let offered: Vec<&str> = header
            .split(',')
            .filter_map(|token| {
                let mut parts = token.split(';');
                let name = parts.next().unwrap_or("").trim();
                let refused = parts.any(|param| {
                    let Some((key, value)) = param.split_once('=') else {
                        return false;
                    };
                    key.trim().eq_ignore_ascii_case("q")
                        && value.trim().parse::<f32>().is_ok_and(|q| q <= 0.0)
                });
                (!name.is_empty() && !refused).then_some(name)
            })
            .collect();
        let accepts = |name: &str| offered.iter().any(|t| t.eq_ignore_ascii_case(name));

        // Priority: br > gzip > deflate > identity
        if accepts("br") {
            Encoding::Brotli
        } else if accepts("gzip") {
            Encoding::Gzip
        } else if accepts("deflate") {
            Encoding::Deflate
        } else {
            Encoding::Identity
        }
    }
}

#[cfg_attr(not(feature = "compress"), allow(dead_code))]
const GZIP_LEVEL: u32 = 6;
#[cfg_attr(not(feature = "compress"), allow(dead_code))]
const BROTLI_QUALITY: i32 = 4;

/// Compress middleware
pub struct Compress {
    min_size: usize,
}

impl Compress {
    pub fn new() -> Self {
        Self {
            min_size: 1024, // Don't compress < 1KB
        }
    }

    fn should_compress(&self, content_type: &str, size: usize) -> bool {
        if size < self.min_size {
            return false;
        }

        content_type.starts_with("text/")
            || content_type.contains("json")
            || content_type.contains("xml")
            || content_type.contains("javascript")
            || content_type.contains("css")
    }

    #[cfg(feature = "compress")]
    fn encode(&self, encoding: Encoding, data: &[u8]) -> std::io::Result<Vec<u8>> {
        use flate2::write::{DeflateEncoder, GzEncoder};
        use flate2::Compression;
        use std::io::Write;

        match encoding {
            Encoding::Gzip => {
                let mut encoder =
                    GzEncoder::new(Vec::new(), Compression::new(GZIP_LEVEL));
                encoder.write_all(data)?;
                encoder.finish()
            }
            Encoding::Deflate => {
                let mut encoder =
                    DeflateEncoder::new(Vec::new(), Compression::new(GZIP_LEVEL));
                encoder.write_all(data)?;
                encoder.finish()
            }
            Encoding::Brotli => {
                let mut output = Vec::new();
                let params = brotli::enc::BrotliEncoderParams {
                    quality: BROTLI_QUALITY,
                    ..Default::default()
                };
                brotli::enc::BrotliCompress(&mut std::io::Cursor::new(data), &mut output, &params)?;
                Ok(output)
            }
            Encoding::Identity => Ok(data.to_vec()),
        }
    }

    #[cfg(not(feature = "compress"))]
    fn encode(&self, _encoding: Encoding, data: &[u8]) -> std::io::Result<Vec<u8>> {
        Ok(data.to_vec())
    }
}

impl Default for Compress {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for Compress {
    fn before(&self, _req: &mut Request) -> Option<Response> {
        None
    }

    fn after(&self, req: &Request, res: &mut Response) {
        if res.header("content-encoding").is_some() {
            return;
        }

        let accept = req.header("accept-encoding").unwrap_or("");
        let encoding = Encoding::from_accept_encoding(accept);
        if encoding == Encoding::Identity {
            return;
        }

        let body_len = res.body.len();
        if !self.should_compress(res.content_type().unwrap_or(""), body_len) {
            return;
        }

        let compressed = match self.encode(encoding, &res.body) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(%err, encoding = encoding.as_str(), "compression failed, sending identity");
                return;
            }
        };

        // Only use compressed if smaller
        if compressed.len() < body_len {
            res.body = bytes::Bytes::from(compressed);
            res.set_header("Content-Encoding", encoding.as_str());
            res.set_header("Vary", "Accept-Encoding");
            // hyper derives the length from the new body
            res.headers.retain(|(k, _)| !k.eq_ignore_ascii_case("content-length"));
            // The encoded bytes differ from the identity representation
            let weak = res
                .header("etag")
                .filter(|t| !t.starts_with("W/"))
                .map(|t| format!("W/{}", t));
            if let Some(weak) = weak {
                res.set_header("ETag", weak);
            }
        }
    }
}
