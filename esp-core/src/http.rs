//! HTTP/1.1 Wire-Format Helfer
//!
//! Baut Requests und parst Antworten für den TCP-Transport der Firmware.
//! Keine Socket-Abhängigkeiten, damit auf dem Host testbar.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use crate::traits::TransportError;
use crate::types::Response;

/// URL-Schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub const fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

/// Zerlegte absolute URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpUrl<'a> {
    pub scheme: Scheme,
    pub host: &'a str,
    pub port: u16,
    /// Pfad inklusive Query, mindestens "/"
    pub path: &'a str,
}

impl<'a> HttpUrl<'a> {
    /// Parst `http://host[:port][/path]` bzw. `https://...`
    pub fn parse(url: &'a str) -> Result<Self, TransportError> {
        let (scheme, rest) = if let Some(rest) = strip_prefix_ignore_case(url, "http://") {
            (Scheme::Http, rest)
        } else if let Some(rest) = strip_prefix_ignore_case(url, "https://") {
            (Scheme::Https, rest)
        } else {
            return Err(TransportError::UnsupportedScheme);
        };

        let split = rest.find('/').unwrap_or(rest.len());
        let (authority, path) = rest.split_at(split);
        let path = if path.is_empty() { "/" } else { path };

        // userinfo wird ignoriert
        let authority = match authority.rfind('@') {
            Some(at) => &authority[at + 1..],
            None => authority,
        };

        let (host, port) = match authority.rfind(':') {
            Some(colon) if !authority.ends_with(']') => {
                let port = authority[colon + 1..]
                    .parse::<u16>()
                    .map_err(|_| TransportError::InvalidUrl)?;
                (&authority[..colon], port)
            }
            _ => (authority, scheme.default_port()),
        };

        if host.is_empty() {
            return Err(TransportError::InvalidUrl);
        }

        Ok(Self {
            scheme,
            host,
            port,
            path,
        })
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    match text.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => Some(&text[prefix.len()..]),
        _ => None,
    }
}

/// HTTP-Methode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    Put,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Put => "PUT",
        }
    }
}

/// Ein abzusendender Request
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    pub method: Method,
    pub url: &'a str,
    pub headers: &'a [(String, String)],
    pub body: &'a str,
}

/// Header die der Client selbst setzt
const MANAGED_HEADERS: [&str; 3] = ["host", "content-length", "connection"];

/// Serialisiert einen Request als HTTP/1.1 mit `Connection: close`
pub fn write_request(request: &Request<'_>, url: &HttpUrl<'_>) -> Vec<u8> {
    let mut head = String::new();
    let _ = write!(head, "{} {} HTTP/1.1\r\n", request.method.as_str(), url.path);
    if url.port == url.scheme.default_port() {
        let _ = write!(head, "Host: {}\r\n", url.host);
    } else {
        let _ = write!(head, "Host: {}:{}\r\n", url.host, url.port);
    }
    for (name, value) in request.headers {
        if MANAGED_HEADERS.iter().any(|h| name.eq_ignore_ascii_case(h)) {
            continue;
        }
        let _ = write!(head, "{}: {}\r\n", name, value);
    }
    let _ = write!(head, "Content-Length: {}\r\n", request.body.len());
    head.push_str("Connection: close\r\n\r\n");

    let mut bytes = head.into_bytes();
    bytes.extend_from_slice(request.body.as_bytes());
    bytes
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Parst Status-Code und Body einer (vollständig gelesenen) Antwort
pub fn parse_response(bytes: &[u8]) -> Result<Response, TransportError> {
    let line_end = find(bytes, b"\r\n").ok_or(TransportError::InvalidResponse)?;
    let status_line =
        core::str::from_utf8(&bytes[..line_end]).map_err(|_| TransportError::InvalidResponse)?;

    let mut parts = status_line.split(' ');
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        return Err(TransportError::InvalidResponse);
    }
    let status = parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or(TransportError::InvalidResponse)?;

    let body = match find(bytes, b"\r\n\r\n") {
        Some(end) => String::from_utf8_lossy(&bytes[end + 4..]).into_owned(),
        None => String::new(),
    };

    Ok(Response { status, body })
}
