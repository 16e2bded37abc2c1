use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::billing::{BillingContext, RenderOptions};
use crate::cli::{Command, Opts};
use crate::config::{self, ConfigError, Settings};
use crate::error::{LogError, StoreError};
use crate::gitlog;
use crate::input;
use crate::store;
use crate::templates;
use crate::worklog::ProjectLog;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("IO Error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("{source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("{source}")]
    Log {
        #[from]
        source: LogError,
    },

    #[error("{source}")]
    Store {
        #[from]
        source: StoreError,
    },

    #[error("template not found: '{path}'")]
    MissingTemplate { path: String },

    #[error("template rendering failed: {source}")]
    Render {
        #[from]
        source: askama::Error,
    },

    #[error("Input Error: {source}")]
    Input {
        #[from]
        source: inquire::error::InquireError,
    },
}

pub fn run_cmd(opts: Opts) -> Result<(), RunError> {
    let settings = Settings::load(&opts.config)?;

    match opts.subcommand {
        Command::Extract { start, end, force } => {
            extract(&settings, &opts.worklog, start, end, force)
        }
        Command::Render {
            template,
            output,
            rate,
            line_length,
        } => render(&settings, &opts.worklog, template, output, rate, line_length),
    }
}

/// Phase 1: git history to worklog file.
fn extract(
    settings: &Settings,
    worklog_path: &Path,
    start: Option<chrono::NaiveDate>,
    end: Option<chrono::NaiveDate>,
    force: bool,
) -> Result<(), RunError> {
    let period = config::period(
        start.unwrap_or(settings.start_date),
        end.unwrap_or(settings.end_date),
    )?;

    if worklog_path.exists() && !force {
        let keep = !input::confirm_overwrite(&worklog_path.display().to_string())?;
        if keep {
            println!("keeping: {}", worklog_path.display());
            return Ok(());
        }
    }

    let mut merged = ProjectLog::new("all", period);
    for project in &settings.projects {
        println!("scanning: {}", project.workspace.display());
        let log = gitlog::parse_project(project, &settings.author, period, settings.workday_hours)?;
        merged = merged + log;
    }

    println!("writing: {}", worklog_path.display());
    store::write_records(worklog_path, &merged.commits)?;
    println!(
        "{} commits over {} days",
        merged.commits.len(),
        merged.day_hours().len()
    );
    Ok(())
}

/// Phase 2: worklog file to invoice document.
fn render(
    settings: &Settings,
    worklog_path: &Path,
    template: Option<PathBuf>,
    output: Option<PathBuf>,
    rate: Option<u32>,
    line_length: Option<usize>,
) -> Result<(), RunError> {
    println!("reading: {}", worklog_path.display());
    let commits = store::read_records(worklog_path)?;
    let log = ProjectLog::with_commits("all", settings.period()?, commits);

    let opts = RenderOptions {
        rate: rate.map(Decimal::from).unwrap_or(settings.hourly_rate),
        tax_rate: settings.tax_rate,
        line_length: line_length.unwrap_or(settings.line_length),
        page_lines: settings.page_lines,
        currency: settings.currency,
        locale: settings.number_locale()?,
        multi_project: settings.projects.len() > 1,
    };
    let ctx = BillingContext::new(&log, &opts);

    let rendered = match &template {
        Some(path) => templates::render_file(path, &ctx)?,
        None => templates::render(&ctx)?,
    };

    let out_path = output.unwrap_or_else(|| worklog_path.with_extension("tex"));
    println!("writing: {}", out_path.display());
    fs::write(&out_path, rendered)?;
    Ok(())
}
