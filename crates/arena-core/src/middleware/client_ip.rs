//! Client address resolution
//!
//! Picks the address a request should be attributed to: the first
//! `X-Forwarded-For` entry, then `X-Real-IP`, then the socket peer.
//! The two services differ in small ways (empty forwarded entries,
//! trimming, whether the peer port is kept), so the rules are a policy
//! value rather than hard-coded.

use crate::Request;

/// How the socket peer address is rendered when no header applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFormat {
    /// `ip:port`, IPv6 in brackets
    AddrWithPort,
    /// Bare IP without port or brackets
    HostOnly,
}

/// Client address resolution rules
#[derive(Debug, Clone)]
pub struct ClientIpPolicy {
    /// Header holding the forwarded chain (default: x-forwarded-for)
    pub forwarded_header: String,
    /// Header holding a single proxy-supplied address (default: x-real-ip)
    pub real_ip_header: String,
    /// Fall through when the first forwarded entry is blank
    pub skip_empty_forwarded: bool,
    /// Trim whitespace around the real-ip header value
    pub trim_real_ip: bool,
    /// Rendering of the socket peer fallback
    pub remote: RemoteFormat,
}

impl Default for ClientIpPolicy {
    fn default() -> Self {
        Self::arena()
    }
}

impl ClientIpPolicy {
    /// Rules used when recording a game's originating address
    pub fn arena() -> Self {
        Self {
            forwarded_header: "x-forwarded-for".to_string(),
            real_ip_header: "x-real-ip".to_string(),
            skip_empty_forwarded: true,
            trim_real_ip: true,
            remote: RemoteFormat::AddrWithPort,
        }
    }

    /// Rules used by the IP reflector
    pub fn reflector() -> Self {
        Self {
            forwarded_header: "x-forwarded-for".to_string(),
            real_ip_header: "x-real-ip".to_string(),
            skip_empty_forwarded: false,
            trim_real_ip: false,
            remote: RemoteFormat::HostOnly,
        }
    }
}

/// Resolve the client address of a request under the given policy
pub fn resolve_client_ip(policy: &ClientIpPolicy, req: &Request) -> String {
    // Only the first occurrence of each header counts
    if let Some(forwarded) = req.header(&policy.forwarded_header).filter(|v| !v.is_empty()) {
        let first = forwarded.split(',').next().unwrap_or("").trim();
        if !first.is_empty() || !policy.skip_empty_forwarded {
            return first.to_string();
        }
    }

    if let Some(real_ip) = req.header(&policy.real_ip_header).filter(|v| !v.is_empty()) {
        return if policy.trim_real_ip {
            real_ip.trim().to_string()
        } else {
            real_ip.to_string()
        };
    }

    match (req.remote_addr, policy.remote) {
        (Some(addr), RemoteFormat::AddrWithPort) => addr.to_string(),
        (Some(addr), RemoteFormat::HostOnly) => addr.ip().to_string(),
        (None, _) => String::new(),
    }
}
