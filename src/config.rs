//! Settings file handling.
//!
//! ```toml
//! author = "Lutz Ballaschke"
//! start_date = "2018-01-01"
//! end_date = "2018-12-31"
//! hourly_rate = 80
//! locale = "de"
//!
//! [[projects]]
//! workspace = "/home/karl/workspace/reeknersprook"
//! name = "rs"
//!
//! [[projects]]
//! workspace = "/home/karl/workspace/avr-uno"
//! name = "avr"
//! ```
//!
//! Dates are quoted ISO strings. Everything beyond the project list, the
//! author filter and the window has a default; the core only ever reads
//! the resulting struct.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use num_format::Locale;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::billing::Currency;
use crate::worklog::Period;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read settings '{path}': {source}")]
    Io { path: String, source: io::Error },

    #[error("cannot parse settings '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("no projects configured in '{path}'")]
    NoProjects { path: String },

    #[error("start date {from} is after end date {until}")]
    InvalidPeriod { from: NaiveDate, until: NaiveDate },

    #[error("unknown number locale: '{name}'")]
    UnknownLocale { name: String },
}

/// One repository to bill for.
#[derive(Deserialize, Debug, PartialEq, Clone)]
pub struct Project {
    pub workspace: PathBuf,
    pub name: String,
}

#[derive(Deserialize, Debug, PartialEq, Clone)]
pub struct Settings {
    pub author: String,
    pub projects: Vec<Project>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_workday_hours")]
    pub workday_hours: Decimal,
    #[serde(default = "default_hourly_rate")]
    pub hourly_rate: Decimal,
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,
    #[serde(default = "default_page_lines")]
    pub page_lines: usize,
    #[serde(default = "default_line_length")]
    pub line_length: usize,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_workday_hours() -> Decimal {
    Decimal::from(8)
}

fn default_hourly_rate() -> Decimal {
    Decimal::from(80)
}

fn default_tax_rate() -> Decimal {
    Decimal::from(16)
}

fn default_page_lines() -> usize {
    44
}

fn default_line_length() -> usize {
    60
}

fn default_locale() -> String {
    "en".to_string()
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings: Settings = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        if settings.projects.is_empty() {
            return Err(ConfigError::NoProjects {
                path: path.display().to_string(),
            });
        }
        Ok(settings)
    }

    pub fn period(&self) -> Result<Period, ConfigError> {
        period(self.start_date, self.end_date)
    }

    pub fn number_locale(&self) -> Result<Locale, ConfigError> {
        Locale::from_name(&self.locale).map_err(|_| ConfigError::UnknownLocale {
            name: self.locale.clone(),
        })
    }
}

pub fn period(from: NaiveDate, until: NaiveDate) -> Result<Period, ConfigError> {
    if from > until {
        return Err(ConfigError::InvalidPeriod { from, until });
    }
    Ok(Period::new(from, until))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"
author = "Lutz Ballaschke"
start_date = "2018-01-01"
end_date = "2018-12-31"
hourly_rate = 85
workday_hours = 7.5
locale = "de"

[[projects]]
workspace = "/home/karl/workspace/reeknersprook"
name = "rs"

[[projects]]
workspace = "/home/karl/workspace/avr-uno"
name = "avr"
"#;

    #[test]
    fn parses_full_settings() {
        let settings: Settings = toml::from_str(SAMPLE).unwrap();

        assert_eq!(settings.author, "Lutz Ballaschke");
        assert_eq!(settings.projects.len(), 2);
        assert_eq!(settings.projects[1].name, "avr");
        assert_eq!(settings.hourly_rate, dec!(85));
        assert_eq!(settings.workday_hours, dec!(7.5));
        assert_eq!(settings.locale, "de");
        assert!(settings.number_locale().is_ok());
    }

    #[test]
    fn defaults_fill_the_gaps() {
        let minimal = r#"
author = "Lutz Ballaschke"
start_date = "2018-01-01"
end_date = "2018-12-31"

[[projects]]
workspace = "/tmp/repo"
name = "rs"
"#;
        let settings: Settings = toml::from_str(minimal).unwrap();

        assert_eq!(settings.workday_hours, dec!(8));
        assert_eq!(settings.hourly_rate, dec!(80));
        assert_eq!(settings.tax_rate, dec!(16));
        assert_eq!(settings.page_lines, 44);
        assert_eq!(settings.line_length, 60);
        assert_eq!(settings.currency, Currency::Eur);
        assert_eq!(settings.locale, "en");
    }

    #[test]
    fn reversed_window_is_rejected() {
        let from = NaiveDate::from_ymd_opt(2018, 6, 1).unwrap();
        let until = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();

        assert!(matches!(
            period(from, until),
            Err(ConfigError::InvalidPeriod { .. })
        ));
    }
}
