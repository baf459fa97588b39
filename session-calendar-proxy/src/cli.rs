use std::env;
use std::net::SocketAddr;
use std::process;

use getopts::{Matches, Options};
use session_calendar::{LayoutConfig, PackingOrder};
use tokio::time::Duration;
use url::Url;

const DEFAULT_UPSTREAM: &str = "http://127.0.0.1:3000/";

#[derive(Debug)]
pub struct Args {
    pub address: SocketAddr,
    pub upstream: Url,
    pub enable_cache: bool,
    pub cache_ttl: Duration,
    pub layout: LayoutConfig,
}

#[derive(Debug)]
pub enum Invocation {
    Run(Args),
    Help(String),
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "a",
        "address",
        "Socket address (IP and port) to listen on [Default: 127.0.0.1:8080]",
        "SOCKET_ADDRESS",
    );
    opts.optopt(
        "u",
        "upstream",
        "Base URL of the marketplace API [Default: http://127.0.0.1:3000/]",
        "URL",
    );
    opts.optflag(
        "c",
        "enable-cache",
        "Enable caching of fetched mentor sessions [Default: false]",
    );
    opts.optopt(
        "t",
        "cache-ttl",
        "Time-to-live for cached sessions [Default: 3600]",
        "SECONDS",
    );
    opts.optopt(
        "",
        "hour-height",
        "Pixels per hour of the day timeline [Default: 48]",
        "PIXELS",
    );
    opts.optflag(
        "",
        "chronological",
        "Sort a day's sessions by start time before packing them into columns",
    );
    opts
}

pub fn parse(args: Vec<String>) -> Args {
    match try_parse(&args) {
        Ok(Invocation::Run(args)) => args,
        Ok(Invocation::Help(usage)) => {
            println!("{usage}");
            process::exit(0);
        }
        Err(message) => {
            eprintln!("{message}");
            process::exit(1);
        }
    }
}

pub fn try_parse(args: &[String]) -> Result<Invocation, String> {
    let opts = opts();
    let matches = opts.parse(args).map_err(|fail| fail.to_string())?;

    if matches.opt_present("help") {
        return Ok(Invocation::Help(
            opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))),
        ));
    }

    let address = opt_or(&matches, "address", SocketAddr::from(([127, 0, 0, 1], 8080)))?;

    let upstream = match matches.opt_str("upstream") {
        Some(raw) => base_url(&raw)
            .map_err(|err| format!("Provided value for option 'upstream' is invalid: {err}"))?,
        None => base_url(DEFAULT_UPSTREAM).map_err(|err| err.to_string())?,
    };

    let enable_cache = matches.opt_present("enable-cache");
    let cache_ttl = Duration::from_secs(opt_or(&matches, "cache-ttl", 3600)?);

    let hour_height: f64 = opt_or(&matches, "hour-height", 48.0)?;
    if !(hour_height.is_finite() && hour_height > 0.0) {
        return Err("Provided value for option 'hour-height' must be positive".into());
    }

    let order = if matches.opt_present("chronological") {
        PackingOrder::Chronological
    } else {
        PackingOrder::Input
    };

    Ok(Invocation::Run(Args {
        address,
        upstream,
        enable_cache,
        cache_ttl,
        layout: LayoutConfig { hour_height, order },
    }))
}

fn opt_or<T>(matches: &Matches, name: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    matches
        .opt_get_default(name, default)
        .map_err(|err| format!("Provided value for option '{name}' is invalid: {err}"))
}

/// Joined paths are relative to the base, so it must end with a slash.
fn base_url(raw: &str) -> Result<Url, url::ParseError> {
    if raw.ends_with('/') {
        Url::parse(raw)
    } else {
        Url::parse(&format!("{raw}/"))
    }
}
