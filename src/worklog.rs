use std::cmp;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Add;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Billing window, both ends inclusive.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy)]
pub struct Period {
    pub from: NaiveDate,
    pub until: NaiveDate,
}

impl Period {
    pub fn new(from: NaiveDate, until: NaiveDate) -> Self {
        Self { from, until }
    }

    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.from <= day && day <= self.until
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} — {}", self.from, self.until)
    }
}

/// One logged commit, attributed to a single calendar day.
///
/// `hours` is the configured workday default resolved at extraction time;
/// once written to the worklog file it is authoritative and may be
/// hand-edited there before billing.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct CommitRecord {
    pub date: NaiveDate,
    pub hours: Decimal,
    #[serde(default)]
    pub text: String,
    pub proj_name: String,
}

impl CommitRecord {
    pub fn new(date: NaiveDate, hours: Decimal, proj_name: &str) -> Self {
        Self {
            date,
            hours,
            text: String::new(),
            proj_name: proj_name.to_string(),
        }
    }

    /// Append one commit-message line, space-joined with what came before.
    pub fn append_text(&mut self, line: &str) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(line);
    }
}

impl fmt::Display for CommitRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} ({})", self.date, self.text, self.proj_name)
    }
}

/// Commit records for one project, or for several merged together.
#[derive(Debug, PartialEq, Clone)]
pub struct ProjectLog {
    pub name: String,
    pub period: Period,
    pub commits: Vec<CommitRecord>,
}

impl ProjectLog {
    pub fn new(name: &str, period: Period) -> Self {
        Self {
            name: name.to_string(),
            period,
            commits: Vec::new(),
        }
    }

    pub fn with_commits(name: &str, period: Period, commits: Vec<CommitRecord>) -> Self {
        Self {
            name: name.to_string(),
            period,
            commits,
        }
    }

    /// One entry per distinct day. When several records share a date the
    /// first record's hours win; hours are a per-day figure, never a sum
    /// over commits.
    pub fn day_hours(&self) -> BTreeMap<NaiveDate, Decimal> {
        let mut days = BTreeMap::new();
        for commit in &self.commits {
            days.entry(commit.date).or_insert(commit.hours);
        }
        days
    }

    pub fn total_hours(&self) -> Decimal {
        self.day_hours().values().copied().sum()
    }
}

impl Add for ProjectLog {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        let period = Period::new(
            cmp::min(self.period.from, other.period.from),
            cmp::max(self.period.until, other.period.until),
        );
        let mut commits = self.commits;
        commits.extend(other.commits);
        Self {
            name: self.name,
            period,
            commits,
        }
    }
}

impl fmt::Display for ProjectLog {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} ({} commits)",
            self.name,
            self.period,
            self.commits.len()
        )
    }
}
