use std::process::Command;

use chrono::DateTime;
use log::debug;
use rust_decimal::Decimal;

use crate::config::Project;
use crate::error::LogError;
use crate::worklog::{CommitRecord, Period, ProjectLog};

/// Timestamp layout of the default `git log` date lines,
/// e.g. `Mon Mar 5 12:00:00 2018 +0100`.
const DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Y %z";

/// Run `git log` for one project and collect the commit records falling
/// inside the billing window. Hours are defaulted to the configured
/// workday; the operator can edit them in the worklog file later.
pub fn parse_project(
    project: &Project,
    author: &str,
    period: Period,
    workday_hours: Decimal,
) -> Result<ProjectLog, LogError> {
    let workspace = project.workspace.display().to_string();
    let output = Command::new("git")
        .arg("log")
        .arg(format!("--author={}", author))
        .current_dir(&project.workspace)
        .output()
        .map_err(|source| LogError::InvalidWorkspace {
            path: workspace.clone(),
            detail: source.to_string(),
        })?;

    if !output.status.success() {
        return Err(LogError::InvalidWorkspace {
            path: workspace,
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let text = String::from_utf8(output.stdout)?;
    let log = parse_log(&text, &project.name, period, workday_hours)?;
    debug!("{}: {} commits in window", project.name, log.commits.len());
    Ok(log)
}

/// Walk the verbose log output line by line. A `Date:` line inside the
/// window opens a new record and subsequent message lines accumulate into
/// it; a date outside the window drops its message lines instead.
fn parse_log(
    text: &str,
    name: &str,
    period: Period,
    workday_hours: Decimal,
) -> Result<ProjectLog, LogError> {
    let mut log = ProjectLog::new(name, period);
    let mut recording = false;

    for line in text.lines() {
        if line.starts_with("commit")
            || line.starts_with("Author")
            || line.starts_with("Merge:")
            || line.trim().is_empty()
        {
            continue;
        }

        if let Some(stamp) = line.strip_prefix("Date:") {
            let date = DateTime::parse_from_str(stamp.trim(), DATE_FORMAT).map_err(|_| {
                LogError::MalformedLogEntry {
                    line: line.to_string(),
                }
            })?;
            let day = date.date_naive();
            if period.contains_day(day) {
                log.commits.push(CommitRecord::new(day, workday_hours, name));
                recording = true;
            } else {
                recording = false;
            }
        } else if recording {
            if let Some(commit) = log.commits.last_mut() {
                commit.append_text(line.trim());
            }
        }
    }

    Ok(log)
}
