// src/config/options.rs
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::consts::*;
use crate::error::ConfigError;

/// Directory sections, in run order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    /// Investors Exchange
    Ix,
    /// Trade Show
    Ts,
    /// Core Shack
    Cs,
    /// Prospectors Tent
    Pt,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Ix, Section::Ts, Section::Cs, Section::Pt];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Ix => "Investors Exchange (IX)",
            Section::Ts => "Trade Show (TS)",
            Section::Cs => "Core Shack (CS)",
            Section::Pt => "Prospectors Tent (PT)",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Section::Ix => "ix",
            Section::Ts => "ts",
            Section::Cs => "cs",
            Section::Pt => "pt",
        };
        f.write_str(s)
    }
}

/// Independently scraped parts of a section. One failing does not stop
/// the others.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    IxAlphabetical,
    IxCommodity,
    IxCountry,
    TsAlphabetical,
    TsBusinessType,
    CoreShack,
    ProspectorsTent,
}

impl Section {
    pub fn categories(&self) -> &'static [Category] {
        match self {
            Section::Ix => &[Category::IxAlphabetical, Category::IxCommodity, Category::IxCountry],
            Section::Ts => &[Category::TsAlphabetical, Category::TsBusinessType],
            Section::Cs => &[Category::CoreShack],
            Section::Pt => &[Category::ProspectorsTent],
        }
    }
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::IxAlphabetical | Category::TsAlphabetical => "alphabetical",
            Category::IxCommodity => "commodity",
            Category::IxCountry => "country",
            Category::TsBusinessType => "business type",
            Category::CoreShack => "core shack",
            Category::ProspectorsTent => "prospectors tent",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ix" => Ok(Section::Ix),
            "ts" => Ok(Section::Ts),
            "cs" => Ok(Section::Cs),
            "pt" => Ok(Section::Pt),
            other => Err(format!("unknown section: {other} (expected ix, ts, cs or pt)")),
        }
    }
}

/// Raw, unvalidated settings as collected by a frontend.
#[derive(Clone, Debug, Default)]
pub struct OptionsInput {
    pub out_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub addresses: Option<PathBuf>,
    pub countries: Option<PathBuf>,
    pub booths: Option<PathBuf>,
    pub regeocode: bool,
    pub centroid_fallback: bool,
    pub sections: Vec<Section>,
    pub api_key: Option<String>,
}

/// Validated run configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    pub out_dir: PathBuf,
    pub addresses_csv: PathBuf,
    pub addresses_cache: PathBuf,
    pub countries: PathBuf,
    pub booths: PathBuf,
    pub regeocode: bool,
    pub centroid_fallback: bool,
    pub sections: Vec<Section>,
    pub api_key: String,
}

impl RunOptions {
    /// Check everything that must hold before the first request goes out.
    pub fn validate(input: OptionsInput) -> Result<Self, ConfigError> {
        let out_dir = input.out_dir.ok_or(ConfigError::MissingOutputDir)?;
        if out_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingOutputDir);
        }
        if out_dir.exists() && !out_dir.is_dir() {
            return Err(ConfigError::NotADirectory(out_dir));
        }

        let api_key = input
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingCredential(CREDENTIAL_VAR))?;

        let data_dir = input.data_dir.unwrap_or_else(|| out_dir.clone());
        let addresses_csv = input.addresses.unwrap_or_else(|| data_dir.join(ADDRESSES_CSV));
        let countries = input.countries.unwrap_or_else(|| data_dir.join(COUNTRIES_GEOJSON));
        let booths = input.booths.unwrap_or_else(|| data_dir.join(BOOTHS_GEOJSON));

        let mut sections = if input.sections.is_empty() {
            Section::ALL.to_vec()
        } else {
            input.sections
        };
        // Run order is fixed regardless of how they were asked for.
        sections.sort();
        sections.dedup();

        Ok(Self {
            addresses_cache: out_dir.join(ADDRESSES_CACHE),
            out_dir,
            addresses_csv,
            countries,
            booths,
            regeocode: input.regeocode,
            centroid_fallback: input.centroid_fallback,
            sections,
            api_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(dir: &str) -> OptionsInput {
        OptionsInput {
            out_dir: Some(PathBuf::from(dir)),
            api_key: Some(s!("k")),
            ..Default::default()
        }
    }

    #[test]
    fn missing_out_dir_is_reported_first() {
        let err = RunOptions::validate(OptionsInput::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingOutputDir));
    }

    #[test]
    fn blank_credential_is_missing() {
        let mut i = input("out");
        i.api_key = Some(s!("   "));
        let err = RunOptions::validate(i).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential("OPENCAGE")));
    }

    #[test]
    fn inputs_default_to_data_dir_then_out_dir() {
        let opts = RunOptions::validate(input("out")).unwrap();
        assert_eq!(opts.addresses_csv, PathBuf::from("out").join("addresses.csv"));
        assert_eq!(opts.countries, PathBuf::from("out").join("countries.geojson"));
        assert_eq!(opts.sections, Section::ALL.to_vec());

        let mut i = input("out");
        i.data_dir = Some(PathBuf::from("data"));
        let opts = RunOptions::validate(i).unwrap();
        assert_eq!(opts.addresses_csv, PathBuf::from("data").join("addresses.csv"));
        assert_eq!(opts.booths, PathBuf::from("data").join("booths.geojson"));
        assert_eq!(opts.addresses_cache, PathBuf::from("out").join("addresses.geojson"));
    }

    #[test]
    fn sections_are_put_in_run_order() {
        let mut i = input("out");
        i.sections = vec![Section::Pt, Section::Ix, Section::Pt];
        let opts = RunOptions::validate(i).unwrap();
        assert_eq!(opts.sections, vec![Section::Ix, Section::Pt]);
    }

    #[test]
    fn every_category_belongs_to_one_section() {
        let all: Vec<Category> = Section::ALL.iter().flat_map(|s| s.categories().iter().copied()).collect();
        assert_eq!(all.len(), 7);
        for (i, c) in all.iter().enumerate() {
            assert!(!all[i + 1..].contains(c), "{c:?} listed twice");
        }
        assert_eq!(Section::Ts.categories()[1].to_string(), "business type");
    }

    #[test]
    fn section_parses_case_insensitively() {
        assert_eq!("CS".parse::<Section>(), Ok(Section::Cs));
        assert!("xx".parse::<Section>().is_err());
    }
}
