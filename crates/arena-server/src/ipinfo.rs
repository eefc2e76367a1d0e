//! IP reflector data

use arena_core::middleware::{resolve_client_ip, ClientIpPolicy};
use arena_core::Request;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What the reflector reports about a request and the host serving it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpInfo {
    pub client_ip: String,
    pub server_ip: String,
    pub hostname: String,
    pub user_agent: String,
    /// Canonical header name to comma-joined values
    pub headers: BTreeMap<String, String>,
}

impl IpInfo {
    /// Gather everything for `req`, probing the host for its address and name
    pub async fn collect(req: &Request) -> Self {
        Self::with_host(req, server_ip().await, hostname().await)
    }

    /// Build from the request plus already-known host details
    pub fn with_host(req: &Request, server_ip: String, hostname: String) -> Self {
        Self {
            client_ip: resolve_client_ip(&ClientIpPolicy::reflector(), req),
            server_ip,
            hostname,
            user_agent: req.user_agent().to_string(),
            headers: header_map(req),
        }
    }
}

/// `x-forwarded-for` -> `X-Forwarded-For`
pub fn canonical_header_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        upper = c == '-';
    }
    out
}

/// Request headers keyed by canonical name, repeated headers joined with ", "
///
/// `Host` is request metadata rather than a header here and is left out.
pub fn header_map(req: &Request) -> BTreeMap<String, String> {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in &req.headers {
        if name.eq_ignore_ascii_case("host") {
            continue;
        }
        map.entry(canonical_header_name(name))
            .and_modify(|joined| {
                joined.push_str(", ");
                joined.push_str(value);
            })
            .or_insert_with(|| value.clone());
    }
    map
}

/// Local address the OS would use to reach the public internet
///
/// Connecting a UDP socket only selects a route; nothing is sent.
pub async fn server_ip() -> String {
    let probe = async {
        let socket = tokio::net::UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect("8.8.8.8:80").await?;
        socket.local_addr()
    };

    match probe.await {
        Ok(addr) => addr.ip().to_string(),
        Err(err) => {
            tracing::debug!(%err, "server address probe failed");
            "unknown".to_string()
        }
    }
}

/// Kernel hostname, else `$HOSTNAME`, else empty
pub async fn hostname() -> String {
    if let Ok(name) = tokio::fs::read_to_string("/proc/sys/kernel/hostname").await {
        let name = name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }
    std::env::var("HOSTNAME").unwrap_or_default()
}
