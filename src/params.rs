// src/params.rs

/// BaTLab results portal. Plain http, no TLS.
pub const HOST: &str = "submit-1.batlab.org";
pub const PORT: u16 = 80;
pub const OVERVIEW_PATH: &str = "/nmi/results/overview";

/// Fixed stored-search selector the portal expects on every overview query.
pub const STORED_SEARCH: &str = "0";

pub const DEFAULT_CACHE_DIR: &str = "cache";

/// Transient download failures are retried this many extra times before the
/// error surfaces to the caller.
pub const MAX_FETCH_RETRIES: u32 = 3;
