// src/cache.rs

use std::fs;
use std::path::PathBuf;

use chrono::{Datelike, Utc};
use log::{debug, info};

use crate::dates::MonthRange;
use crate::error::Error;
use crate::net::PageFetcher;

/// On-disk store of monthly overview pages, one flat HTML file per month.
/// Past months are immutable once downloaded; the current month is still
/// accumulating runs upstream, so it is re-fetched once per store lifetime,
/// at open.
pub struct OverviewCache {
    cachedir: PathBuf,
    username: String,
    fetcher: Box<dyn PageFetcher>,
}

impl OverviewCache {
    /// Create the cache directory if needed and refresh the current UTC
    /// month through `fetcher`.
    pub fn open(
        cachedir: impl Into<PathBuf>,
        username: &str,
        fetcher: Box<dyn PageFetcher>,
    ) -> Result<Self, Error> {
        let now = Utc::now();
        Self::open_at(cachedir, username, fetcher, now.year(), now.month())
    }

    /// As `open`, with the current month supplied by the caller.
    pub fn open_at(
        cachedir: impl Into<PathBuf>,
        username: &str,
        fetcher: Box<dyn PageFetcher>,
        year: i32,
        month: u32,
    ) -> Result<Self, Error> {
        let cachedir = cachedir.into();
        fs::create_dir_all(&cachedir)?;
        let cache = Self {
            cachedir,
            username: s!(username),
            fetcher,
        };
        cache.download_month(year, month)?;
        Ok(cache)
    }

    /// Path for one month's page. Identical keys always map to the same
    /// path; distinct usernames never collide.
    pub fn month_path(&self, year: i32, month: u32) -> PathBuf {
        let usr = if self.username.is_empty() {
            s!()
        } else {
            format!("{}_", self.username)
        };
        self.cachedir.join(format!("{usr}{year}-{month:02}.html"))
    }

    /// Download every month in `range` that is not already on disk. Months
    /// already present are left untouched.
    pub fn ensure(&self, range: MonthRange) -> Result<(), Error> {
        for (year, month) in range {
            let path = self.month_path(year, month);
            if path.exists() {
                debug!("cache hit for {year}-{month:02}");
                continue;
            }
            self.download_month(year, month)?;
        }
        Ok(())
    }

    /// Read one cached page back as text.
    pub fn load(&self, year: i32, month: u32) -> Result<String, Error> {
        Ok(fs::read_to_string(self.month_path(year, month))?)
    }

    /// Fetch and persist verbatim. Whole-file overwrite; the fetcher owns
    /// all retry behavior.
    fn download_month(&self, year: i32, month: u32) -> Result<(), Error> {
        let page = self.fetcher.fetch(year, month, &self.username)?;
        let path = self.month_path(year, month);
        fs::write(&path, &page)?;
        info!("saved {}", path.display());
        Ok(())
    }
}
