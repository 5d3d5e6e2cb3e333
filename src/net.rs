// src/net.rs
// Page fetching: overview URL construction, a minimal HTTP/1.0 GET over
// plain TCP, and the bounded retry wrapper for transient failures.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use log::{info, warn};

use crate::dates::next_month;
use crate::error::FetchError;
use crate::params::{HOST, MAX_FETCH_RETRIES, OVERVIEW_PATH, PORT, STORED_SEARCH};

/// Supplies raw overview HTML for one month. The cache store calls this on
/// every miss, and once per run for the current month.
pub trait PageFetcher {
    fn fetch(&self, year: i32, month: u32, username: &str) -> Result<String, FetchError>;
}

/// Blocking fetcher against the portal, with the standard retry policy.
pub struct HttpFetcher;

impl PageFetcher for HttpFetcher {
    fn fetch(&self, year: i32, month: u32, username: &str) -> Result<String, FetchError> {
        let path = overview_path(year, month, username);
        info!("downloading http://{HOST}{path}");
        with_retry(MAX_FETCH_RETRIES, FetchError::is_transient, || {
            http_get(HOST, PORT, &path)
        })
    }
}

/// Run `op`, allowing up to `max_retries` further attempts while `retryable`
/// approves the failure. Any other failure surfaces immediately.
pub fn with_retry<T, E>(
    max_retries: u32,
    retryable: impl Fn(&E) -> bool,
    mut op: impl FnMut() -> Result<T, E>,
) -> Result<T, E>
where
    E: std::fmt::Display,
{
    let mut left = max_retries;
    loop {
        match op() {
            Ok(v) => return Ok(v),
            Err(e) if left > 0 && retryable(&e) => {
                warn!("...failed to download ({e}), retrying {left}");
                left -= 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Path + query for one month's overview page, reproduced exactly as the
/// portal expects: the stored-search selector, the username, and a half-open
/// month range in the date parameter.
pub fn overview_path(year: i32, month: u32, username: &str) -> String {
    let (next_year, next_mon) = next_month(year, month);
    let date = format!("between {year}-{month}-01 and {next_year}-{next_mon}-01");
    format!(
        "{OVERVIEW_PATH}?storedSearch={STORED_SEARCH}&user={}&date={}",
        form_encode(username),
        form_encode(&date),
    )
}

/// application/x-www-form-urlencoded: unreserved bytes pass through, space
/// becomes '+', everything else is %XX.
pub fn form_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

/// Perform a plain HTTP GET request and return the response body as a String.
///
/// HTTP/1.0 with `Connection: close`, so the server ends the body at EOF and
/// no chunked transfer handling is needed.
pub fn http_get(host: &str, port: u16, path: &str) -> Result<String, FetchError> {
    let mut stream = TcpStream::connect((host, port))?;
    stream.set_read_timeout(Some(Duration::from_secs(15)))?;
    stream.set_write_timeout(Some(Duration::from_secs(15)))?;

    let req = format!(
        "GET {} HTTP/1.0\r\nHost: {}\r\nUser-Agent: batlab_scrape/0.2\r\nConnection: close\r\n\r\n",
        path, host
    );
    stream.write_all(req.as_bytes())?;
    stream.flush()?;

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf)?;
    let resp = String::from_utf8_lossy(&buf);

    let status = resp.split("\r\n").next().unwrap_or("");
    if !status.contains("200") {
        return Err(FetchError::Status(s!(status)));
    }

    let body_idx = resp.find("\r\n\r\n").ok_or(FetchError::MalformedResponse)? + 4;
    Ok(s!(&resp[body_idx..]))
}
