// src/log.rs
use std::sync::OnceLock;
use std::time::Instant;

use tracing_subscriber::EnvFilter;

static START: OnceLock<Instant> = OnceLock::new();

fn start() -> Instant {
    *START.get_or_init(Instant::now)
}

/// Format elapsed milliseconds as `HH:MM:SS.mmm`.
pub fn fmt_elapsed(ms: u128) -> String {
    let total_ms = ms as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

/// Time since `init` (or first call), for end-of-run summaries.
pub fn elapsed() -> String {
    fmt_elapsed(start().elapsed().as_millis())
}

/// Install the stderr subscriber. `RUST_LOG` wins when set; otherwise
/// `verbose` picks debug over info for this crate.
/// Safe to call more than once; later calls are ignored.
pub fn init(verbose: bool) {
    start();
    let fallback = if verbose { "pdac_scrape=debug" } else { "pdac_scrape=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_format_pads_fields() {
        assert_eq!(fmt_elapsed(0), "00:00:00.000");
        assert_eq!(fmt_elapsed(3_723_004), "01:02:03.004");
    }
}
