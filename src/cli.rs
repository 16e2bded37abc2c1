use chrono::NaiveDate;
use clap::{Parser, ValueHint};
use std::path::PathBuf;

/* Argument Structure
 *
 * extract [--start <date>] [--end <date>] [--force]
 * render [--template <file>] [--output <file>]
 *        [--rate <n>] [--line-length <n>]
 */

#[derive(Parser)]
#[clap(version, about = "Bill git commit history as per-day worklogs")]
pub struct Opts {
    /// Settings file with the project list and billing defaults
    #[clap(short, long, default_value="githours.toml",
        value_hint=ValueHint::FilePath)]
    pub config: PathBuf,

    /// Worklog file written by extract and read by render
    #[clap(short, long, default_value="worklog.json",
        value_hint=ValueHint::FilePath)]
    pub worklog: PathBuf,

    #[clap(subcommand)]
    pub subcommand: Command,
}

#[derive(Parser)]
pub enum Command {
    /// Collect commit days from the configured repositories
    Extract {
        /// First day of the billing window, overrides the settings file
        #[clap(short, long)]
        start: Option<NaiveDate>,

        /// Last day of the billing window (inclusive), overrides the
        /// settings file
        #[clap(short, long)]
        end: Option<NaiveDate>,

        /// Overwrite an existing worklog file without asking
        #[clap(short, long)]
        force: bool,
    },

    /// Render the invoice document from the worklog file
    Render {
        /// External LaTeX layout with \VAR{...} placeholders; the built-in
        /// layout is used when omitted
        #[clap(short, long, value_hint=ValueHint::FilePath)]
        template: Option<PathBuf>,

        /// Where to write the document, defaults to the worklog path with
        /// a .tex extension
        #[clap(short, long, value_hint=ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Hourly rate, overrides the settings file
        #[clap(short, long)]
        rate: Option<u32>,

        /// Worklog column width, overrides the settings file
        #[clap(short, long)]
        line_length: Option<usize>,
    },
}
