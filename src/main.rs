// src/main.rs
// Thin binary: parse args, open the cache, collect the range, emit CSV.
// Usage:
//   batlab_scrape --from 2021-11 --to 2022-02 -u scopatz -o runs.csv

use std::fs::File;
use std::io::{self, BufWriter, Write};

use chrono::{Datelike, Utc};

use batlab_scrape::cache::OverviewCache;
use batlab_scrape::dates::MonthRange;
use batlab_scrape::net::HttpFetcher;
use batlab_scrape::{cli, csv, scrape};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let params = cli::parse_cli()?;

    let (stop_year, stop_month) = params.stop.unwrap_or_else(|| {
        let now = Utc::now();
        (now.year(), now.month())
    });
    let range = MonthRange::new(params.start.0, params.start.1, stop_year, stop_month)?;

    let cache = OverviewCache::open(&params.cachedir, &params.username, Box::new(HttpFetcher))?;
    let table = scrape::collect_runs(&cache, range, params.schema)?;

    match &params.out {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            csv::write_table(&mut out, &table)?;
            out.flush()?;
            eprintln!("Wrote {} run(s) to {}", table.len(), path.display());
        }
        None => csv::write_table(io::stdout().lock(), &table)?,
    }
    Ok(())
}
