// src/lib.rs

#[macro_use]
pub mod macros;

pub mod cache;
pub mod cli;
pub mod csv;
pub mod dates;
pub mod error;
pub mod extract;
pub mod html;
pub mod net;
pub mod params;
pub mod scrape;
pub mod table;

pub use error::{Error, FetchError};
pub use table::{RunRecord, RunTable};
