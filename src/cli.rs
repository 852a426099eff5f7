// src/cli.rs
use std::path::PathBuf;

use clap::Parser;

use crate::config::consts::CREDENTIAL_VAR;
use crate::config::options::{OptionsInput, RunOptions, Section};
use crate::error::Result;
use crate::progress::StdoutProgress;
use crate::runner::{self, RunSummary};

/// Scrape the PDAC exhibitor directory into CSV and GeoJSON tables.
#[derive(Parser, Debug)]
#[command(name = "pdac_scrape", version)]
pub struct Args {
    /// Output directory (created if missing)
    #[arg(short = 'o', long = "out", value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Where addresses.csv, countries.geojson and booths.geojson live [default: the output dir]
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Geocode the address book again instead of reading addresses.geojson
    #[arg(short = 'g', long)]
    pub regeocode: bool,

    #[arg(long, value_name = "FILE")]
    pub addresses: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    pub countries: Option<PathBuf>,

    /// Booth floor plan, copied out as booths.csv when present
    #[arg(long, value_name = "FILE")]
    pub booths: Option<PathBuf>,

    /// Use the country centroid when a filtered geocode finds nothing
    #[arg(long)]
    pub centroid_fallback: bool,

    /// Run only these sections (ix, ts, cs, pt); repeatable
    #[arg(long = "only", value_name = "SECTION")]
    pub only: Vec<Section>,

    /// Geocoding API key
    #[arg(long, env = CREDENTIAL_VAR, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn into_input(self) -> OptionsInput {
        OptionsInput {
            out_dir: self.out,
            data_dir: self.data_dir,
            addresses: self.addresses,
            countries: self.countries,
            booths: self.booths,
            regeocode: self.regeocode,
            centroid_fallback: self.centroid_fallback,
            sections: self.only,
            api_key: self.api_key,
        }
    }
}

/// Parse arguments, validate, and run against the live site.
pub fn run() -> Result<RunSummary> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    crate::log::init(args.verbose);

    let opts = RunOptions::validate(args.into_input())?;
    logf!(
        "Writing to {} ({})",
        opts.out_dir.display(),
        opts.sections.iter().map(Section::to_string).collect::<Vec<_>>().join(", ")
    );

    let mut progress = StdoutProgress::default();
    runner::run(&opts, &mut progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("pdac_scrape").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_map_onto_options() {
        let input = parse(&["-o", "out", "-g", "--only", "cs", "--only", "ix", "--booths", "plan.geojson", "--api-key", "k"]).into_input();
        assert_eq!(input.out_dir, Some(PathBuf::from("out")));
        assert!(input.regeocode);
        assert_eq!(input.booths, Some(PathBuf::from("plan.geojson")));
        assert!(!input.centroid_fallback);
        assert_eq!(input.sections, vec![Section::Cs, Section::Ix]);
        assert_eq!(input.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn unknown_section_is_rejected() {
        let res = Args::try_parse_from(["pdac_scrape", "-o", "out", "--only", "xx"]);
        assert!(res.is_err());
    }
}
