// src/cli.rs

use std::{env, path::PathBuf};

use crate::extract::Schema;
use crate::params::DEFAULT_CACHE_DIR;

pub struct Params {
    pub start: (i32, u32),
    pub stop: Option<(i32, u32)>, // None: current UTC month
    pub username: String,
    pub cachedir: PathBuf,
    pub schema: Schema,
    pub out: Option<PathBuf>,
}

const USAGE: &str = "\
Usage: batlab_scrape --from YYYY-MM [options]

  --from YYYY-MM        first month to collect (required)
  --to YYYY-MM          last month, inclusive (default: current month)
  -u, --user NAME       only this user's runs
  --cache-dir DIR       where monthly pages are kept (default: cache)
  --schema KIND         auto | legacy | versioned (default: auto)
  -o, --out FILE        write CSV here instead of stdout
  -h, --help            this text";

pub fn parse_cli() -> Result<Params, Box<dyn std::error::Error>> {
    let mut start = None;
    let mut stop = None;
    let mut username = s!();
    let mut cachedir = PathBuf::from(DEFAULT_CACHE_DIR);
    let mut schema = Schema::Auto;
    let mut out = None;

    let mut args = env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "--from" => {
                let v = args.next().ok_or("Missing value for --from")?;
                start = Some(parse_year_month(&v)?);
            }
            "--to" => {
                let v = args.next().ok_or("Missing value for --to")?;
                stop = Some(parse_year_month(&v)?);
            }
            "-u" | "--user" => username = args.next().ok_or("Missing username")?,
            "--cache-dir" => {
                cachedir = PathBuf::from(args.next().ok_or("Missing cache directory")?)
            }
            "--schema" => {
                let v = args.next().ok_or("Missing value for --schema")?;
                schema = match v.to_ascii_lowercase().as_str() {
                    "auto" => Schema::Auto,
                    "legacy" => Schema::Legacy,
                    "versioned" => Schema::Versioned,
                    other => return Err(format!("Unknown schema: {}", other).into()),
                };
            }
            "-o" | "--out" => out = Some(PathBuf::from(args.next().ok_or("Missing output file")?)),
            "-h" | "--help" => {
                eprintln!("{USAGE}");
                std::process::exit(0);
            }
            _ => return Err(format!("Unknown arg: {}", a).into()),
        }
    }

    let start = start.ok_or("Specify --from YYYY-MM")?;
    Ok(Params {
        start,
        stop,
        username,
        cachedir,
        schema,
        out,
    })
}

/// "2021-11" → (2021, 11). Month bounds are checked later by MonthRange.
fn parse_year_month(s: &str) -> Result<(i32, u32), Box<dyn std::error::Error>> {
    let (y, m) = s
        .split_once('-')
        .ok_or_else(|| format!("Expected YYYY-MM, got: {}", s))?;
    Ok((y.trim().parse()?, m.trim().parse()?))
}
