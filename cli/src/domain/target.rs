//! Scrape target address validation.
//!
//! Pure functions only: no I/O, no async.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::TargetError;

/// RFC 1123 hostname: dot-separated labels of alphanumerics and inner hyphens.
static HOSTNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$")
        .expect("valid regex")
});

const MAX_HOSTNAME_LEN: usize = 253;

/// A validated `host:port` endpoint that Prometheus should scrape.
///
/// The host may be a DNS name, an IPv4 address, or a bracketed IPv6
/// address (`[::1]:9100`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScrapeTarget {
    host: String,
    port: u16,
}

impl ScrapeTarget {
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ScrapeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for ScrapeTarget {
    type Err = TargetError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let raw = input.trim();
        let (host, port) = raw
            .rsplit_once(':')
            .ok_or_else(|| TargetError::MissingPort(raw.to_string()))?;

        if host.is_empty() || port.is_empty() {
            return Err(TargetError::MissingPort(raw.to_string()));
        }

        let port = match port.parse::<u16>() {
            Ok(p) if p != 0 => p,
            _ => {
                return Err(TargetError::InvalidPort {
                    target: raw.to_string(),
                    port: port.to_string(),
                });
            }
        };

        if !is_valid_host(host) {
            return Err(TargetError::InvalidHost(raw.to_string()));
        }

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

fn is_valid_host(host: &str) -> bool {
    if let Some(inner) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
        return inner.parse::<Ipv6Addr>().is_ok();
    }
    // An unbracketed colon means an IPv6 literal without brackets; the port
    // split above would have been ambiguous.
    if host.contains(':') {
        return false;
    }
    if host.parse::<Ipv4Addr>().is_ok() {
        return true;
    }
    // Dotted-quad lookalikes that failed IPv4 parsing (e.g. 10.0.0.256).
    if host.split('.').all(|label| label.chars().all(|c| c.is_ascii_digit())) {
        return false;
    }
    host.len() <= MAX_HOSTNAME_LEN && HOSTNAME_RE.is_match(host)
}
