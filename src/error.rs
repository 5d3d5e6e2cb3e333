// src/error.rs

use thiserror::Error;

/// Crate-level error. Parse failures abort the current request; months cached
/// before the failure stay on disk and are reused on retry.
#[derive(Debug, Error)]
pub enum Error {
    #[error("download failed: {0}")]
    Fetch(#[from] FetchError),

    #[error(
        "range start {start_year}-{start_month:02} is after stop {stop_year}-{stop_month:02}"
    )]
    RangeOrder {
        start_year: i32,
        start_month: u32,
        stop_year: i32,
        stop_month: u32,
    },

    #[error("month {0} out of range 1-12")]
    Month(u32),

    #[error("bad {field} value {text:?}")]
    FieldConversion { field: &'static str, text: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure surfaced by a page fetcher. Only transient kinds are eligible for
/// the fetcher's bounded retry; everything else surfaces immediately.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("connection failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Status(String),

    #[error("malformed HTTP response")]
    MalformedResponse,
}

impl FetchError {
    /// Network interruptions that are worth another attempt. A read timeout
    /// shows up as `WouldBlock` on some platforms.
    pub fn is_transient(&self) -> bool {
        use std::io::ErrorKind;
        match self {
            FetchError::Io(e) => matches!(
                e.kind(),
                ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::TimedOut
                    | ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}
