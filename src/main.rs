mod billing;
mod cli;
mod config;
mod error;
mod gitlog;
mod input;
mod run;
mod store;
mod templates;
mod worklog;
mod wrap;

use clap::Parser;
use crate::cli::Opts;

fn main() {
    pretty_env_logger::init();
    let opts = Opts::parse();

    if let Err(error) = run::run_cmd(opts) {
        eprintln!("{}", error);
        std::process::exit(1);
    }
}
