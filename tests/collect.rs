// tests/collect.rs
// End-to-end: mock fetcher → disk cache → extractor → assembled table.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use batlab_scrape::cache::OverviewCache;
use batlab_scrape::dates::MonthRange;
use batlab_scrape::error::FetchError;
use batlab_scrape::extract::{Field, Schema, Value};
use batlab_scrape::net::PageFetcher;
use batlab_scrape::scrape::collect_runs;

type Calls = Rc<RefCell<HashMap<(i32, u32), u32>>>;

/// Serves one synthetic legacy-layout page per month, with a single run
/// whose id encodes the month, and counts every fetch.
struct MonthlyPages {
    calls: Calls,
}

impl MonthlyPages {
    fn new() -> (Self, Calls) {
        let calls = Calls::default();
        (
            Self {
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }
}

fn page_for(year: i32, month: u32) -> String {
    format!(
        r#"<html><body><table>
          <tr><th>Run</th><th>Result</th></tr>
          <tr class="succeeded">
            <td></td>
            <td><a href="/nmi/run?id={id}">{id}</a></td>
            <td>Succeeded</td><td>scopatz</td><td>build</td><td>pyne</td>
            <td></td>
            <td>{year}-{month:02}-15 08:00:00</td><td>0:30:00</td>
            <td>nightly</td><td>x86_64_RH6</td>
          </tr>
        </table></body></html>"#,
        id = year as i64 * 100 + month as i64,
    )
}

impl PageFetcher for MonthlyPages {
    fn fetch(&self, year: i32, month: u32, _username: &str) -> Result<String, FetchError> {
        *self.calls.borrow_mut().entry((year, month)).or_insert(0) += 1;
        Ok(page_for(year, month))
    }
}

#[test]
fn multi_month_collection_in_range_order() {
    let dir = tempfile::tempdir().unwrap();
    let (fetcher, _calls) = MonthlyPages::new();
    let cache = OverviewCache::open_at(dir.path(), "", Box::new(fetcher), 2022, 3).unwrap();

    let range = MonthRange::new(2021, 12, 2022, 1).unwrap();
    let table = collect_runs(&cache, range, Schema::Auto).unwrap();

    assert_eq!(table.len(), 2);
    // one row per page, concatenated in month order, aligned by index
    assert_eq!(
        table.column(Field::Id),
        &[Value::Int(202112), Value::Int(202201)]
    );
    let first = table.record(0).unwrap();
    assert_eq!(first.user.as_deref(), Some("scopatz"));
    assert_eq!(first.duration, Some(1800));
    assert_eq!(
        first.start.unwrap().to_string(),
        "2021-12-15 08:00:00"
    );
    let second = table.record(1).unwrap();
    assert_eq!(second.start.unwrap().to_string(), "2022-01-15 08:00:00");
}

#[test]
fn recollection_reuses_cached_months() {
    let dir = tempfile::tempdir().unwrap();
    let (fetcher, calls) = MonthlyPages::new();
    let cache = OverviewCache::open_at(dir.path(), "", Box::new(fetcher), 2022, 3).unwrap();

    let range = MonthRange::new(2021, 11, 2022, 2).unwrap();
    collect_runs(&cache, range, Schema::Auto).unwrap();
    collect_runs(&cache, range, Schema::Auto).unwrap();

    // past months fetched exactly once across both collections
    for key in [(2021, 11), (2021, 12), (2022, 1), (2022, 2)] {
        assert_eq!(calls.borrow().get(&key), Some(&1), "{key:?}");
    }
    // the current month was refreshed at open, independent of the range
    assert_eq!(calls.borrow().get(&(2022, 3)), Some(&1));
}

#[test]
fn single_month_request() {
    let dir = tempfile::tempdir().unwrap();
    let (fetcher, _) = MonthlyPages::new();
    let cache = OverviewCache::open_at(dir.path(), "jdoe", Box::new(fetcher), 2022, 3).unwrap();

    let range = MonthRange::new(2021, 6, 2021, 6).unwrap();
    let table = collect_runs(&cache, range, Schema::Auto).unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.record(0).unwrap().id, Some(202106));
    assert!(dir.path().join("jdoe_2021-06.html").exists());
}
