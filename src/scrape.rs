// src/scrape.rs

use log::info;

use crate::cache::OverviewCache;
use crate::dates::MonthRange;
use crate::error::Error;
use crate::extract::{self, Schema};
use crate::table::RunTable;

/// Fetch (as needed), parse and assemble every month in `range` into one
/// table. Months are processed sequentially, in range order; rows keep the
/// order pages gave them.
pub fn collect_runs(
    cache: &OverviewCache,
    range: MonthRange,
    schema: Schema,
) -> Result<RunTable, Error> {
    cache.ensure(range)?;

    let mut table = RunTable::new();
    for (year, month) in range {
        let page = cache.load(year, month)?;
        table.append(extract::extract_page(&page, schema)?);
    }
    info!(
        "collected {} run(s) over {} month(s)",
        table.len(),
        range.count()
    );
    Ok(table)
}
