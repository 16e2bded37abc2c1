use std::collections::BTreeMap;

use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::worklog::ProjectLog;
use crate::wrap::break_into_lines;

#[derive(
    Display,
    EnumString,
    Serialize,
    Deserialize,
    Debug,
    Default,
    PartialEq,
    Clone,
    Copy,
)]
pub enum Currency {
    #[strum(serialize = "EUR €")]
    #[serde(rename = "EUR")]
    #[default]
    Eur,
    #[strum(serialize = "USD $")]
    #[serde(rename = "USD")]
    Usd,
    #[strum(serialize = "CAD $")]
    #[serde(rename = "CAD")]
    Cad,
}

/// Invoice amounts round half-down: an exact midpoint goes to the smaller
/// neighbor, so 2.345 becomes 2.34.
pub fn round_half_down(amount: Decimal, dp: u32) -> Decimal {
    amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointTowardZero)
}

/// Format a two-decimal amount with the locale's digit grouping. The
/// locale is plain data flowing in from the settings, never process
/// state.
pub fn format_amount(amount: Decimal, locale: &Locale) -> String {
    let whole = amount.trunc();
    let cents = ((amount - whole).abs() * Decimal::from(100)).trunc();
    match (whole.to_i64(), cents.to_u32()) {
        (Some(units), Some(cents)) => format!(
            "{}{}{:02}",
            units.to_formatted_string(locale),
            locale.decimal(),
            cents
        ),
        _ => format!("{:.2}", amount),
    }
}

/// Everything the render step needs besides the worklog itself.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub rate: Decimal,
    pub tax_rate: Decimal,
    pub line_length: usize,
    pub page_lines: usize,
    pub currency: Currency,
    pub locale: Locale,
    pub multi_project: bool,
}

/// One rendered worklog line. Continuation lines of a wrapped message
/// leave date and hours empty; `count` is the running line counter modulo
/// the page size, for page breaks in the document.
#[derive(Debug, PartialEq, Clone)]
pub struct WorklogLine {
    pub date: String,
    pub hours: String,
    pub text: String,
    pub count: usize,
}

/// The attribute set handed to the template layer.
#[derive(Debug, Clone)]
pub struct BillingContext {
    pub date: String,
    pub hours: Decimal,
    pub rate: Decimal,
    pub tax_rate: Decimal,
    pub currency: Currency,
    pub fee: String,
    pub tax: String,
    pub total: String,
    pub worklogs: Vec<WorklogLine>,
}

impl BillingContext {
    pub fn new(log: &ProjectLog, opts: &RenderOptions) -> Self {
        let days = log.day_hours();
        let total_hours: Decimal = days.values().copied().sum();

        let fee = round_half_down(total_hours * opts.rate, 2);
        let tax = round_half_down(fee * opts.tax_rate / Decimal::from(100), 2);
        let total = fee + tax;

        let mut worklogs = Vec::new();
        let mut counter = 1;
        for (day, hours) in &days {
            let mut lines = day_lines(log, *day, opts);
            let first = if lines.is_empty() {
                String::new()
            } else {
                lines.remove(0)
            };
            push_line(
                &mut worklogs,
                &mut counter,
                opts.page_lines,
                day.to_string(),
                hours.to_string(),
                first,
            );
            for text in lines {
                push_line(
                    &mut worklogs,
                    &mut counter,
                    opts.page_lines,
                    String::new(),
                    String::new(),
                    text,
                );
            }
        }

        Self {
            date: log.period.until.to_string(),
            hours: total_hours,
            rate: opts.rate,
            tax_rate: opts.tax_rate,
            currency: opts.currency,
            fee: format_amount(fee, &opts.locale),
            tax: format_amount(tax, &opts.locale),
            total: format_amount(total, &opts.locale),
            worklogs,
        }
    }

    /// Stable attribute mapping for filling an external layout.
    pub fn attributes(&self) -> BTreeMap<&'static str, String> {
        let worklogs = self
            .worklogs
            .iter()
            .map(|line| format!("{} & {} & {} \\\\", line.date, line.hours, line.text))
            .collect::<Vec<_>>()
            .join("\n");

        BTreeMap::from([
            ("date", self.date.clone()),
            ("hours", self.hours.to_string()),
            ("rate", self.rate.to_string()),
            ("tax_rate", self.tax_rate.to_string()),
            ("currency", self.currency.to_string()),
            ("fee", self.fee.clone()),
            ("tax", self.tax.clone()),
            ("total", self.total.clone()),
            ("worklogs", worklogs),
        ])
    }
}

fn push_line(
    worklogs: &mut Vec<WorklogLine>,
    counter: &mut usize,
    page_lines: usize,
    date: String,
    hours: String,
    text: String,
) {
    worklogs.push(WorklogLine {
        date,
        hours,
        text,
        count: *counter % page_lines.max(1),
    });
    *counter += 1;
}

/// Wrapped message lines for one day, in commit order. With more than one
/// project configured, the day's last message gets its project tag so the
/// operator can tell the sources apart on the invoice.
fn day_lines(log: &ProjectLog, day: NaiveDate, opts: &RenderOptions) -> Vec<String> {
    let day_commits: Vec<_> = log.commits.iter().filter(|c| c.date == day).collect();

    let mut lines = Vec::new();
    for (idx, commit) in day_commits.iter().enumerate() {
        let mut wrapped = break_into_lines(&sanitize(&commit.text), opts.line_length);
        if opts.multi_project && idx == day_commits.len() - 1 {
            if let Some(last) = wrapped.last_mut() {
                *last = format!("{} ({})", last, commit.proj_name);
            }
        }
        lines.extend(wrapped);
    }
    lines
}

/// Strip characters pdflatex chokes on in free text.
fn sanitize(text: &str) -> String {
    text.replace('_', "-").replace('%', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worklog::{CommitRecord, Period};
    use rust_decimal_macros::dec;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn record(date: NaiveDate, hours: Decimal, text: &str, proj: &str) -> CommitRecord {
        let mut commit = CommitRecord::new(date, hours, proj);
        commit.append_text(text);
        commit
    }

    fn options() -> RenderOptions {
        RenderOptions {
            rate: dec!(80),
            tax_rate: dec!(16),
            line_length: 60,
            page_lines: 44,
            currency: Currency::Eur,
            locale: Locale::en,
            multi_project: false,
        }
    }

    fn march_log(commits: Vec<CommitRecord>) -> ProjectLog {
        ProjectLog::with_commits(
            "all",
            Period::new(ymd(2018, 3, 1), ymd(2018, 3, 31)),
            commits,
        )
    }

    #[test]
    fn midpoints_round_down() {
        assert_eq!(round_half_down(dec!(2.345), 2), dec!(2.34));
        assert_eq!(round_half_down(dec!(2.355), 2), dec!(2.35));
        assert_eq!(round_half_down(dec!(2.346), 2), dec!(2.35));
    }

    #[test]
    fn fee_tax_and_total() {
        let log = march_log(vec![record(ymd(2018, 3, 5), dec!(10), "long day", "rs")]);
        let ctx = BillingContext::new(&log, &options());

        assert_eq!(ctx.hours, dec!(10));
        assert_eq!(ctx.fee, "800.00");
        assert_eq!(ctx.tax, "128.00");
        assert_eq!(ctx.total, "928.00");
        assert_eq!(ctx.date, "2018-03-31");
    }

    #[test]
    fn amounts_follow_the_locale() {
        assert_eq!(format_amount(dec!(12345.60), &Locale::en), "12,345.60");
        assert_eq!(format_amount(dec!(12345.60), &Locale::de), "12.345,60");
        assert_eq!(format_amount(dec!(0.05), &Locale::en), "0.05");
    }

    #[test]
    fn first_line_of_a_day_carries_date_and_hours() {
        let log = march_log(vec![
            record(ymd(2018, 3, 5), dec!(8), "fix bug", "rs"),
            record(ymd(2018, 3, 5), dec!(8), "add feature", "rs"),
        ]);
        let ctx = BillingContext::new(&log, &options());

        assert_eq!(ctx.worklogs.len(), 2);
        assert_eq!(ctx.worklogs[0].date, "2018-03-05");
        assert_eq!(ctx.worklogs[0].hours, "8");
        assert_eq!(ctx.worklogs[0].text, "fix bug");
        assert_eq!(ctx.worklogs[1].date, "");
        assert_eq!(ctx.worklogs[1].hours, "");
        assert_eq!(ctx.worklogs[1].text, "add feature");
    }

    #[test]
    fn counter_runs_across_days_modulo_page_size() {
        let mut opts = options();
        opts.page_lines = 3;
        let log = march_log(vec![
            record(ymd(2018, 3, 5), dec!(8), "one", "rs"),
            record(ymd(2018, 3, 6), dec!(8), "two", "rs"),
            record(ymd(2018, 3, 7), dec!(8), "three", "rs"),
            record(ymd(2018, 3, 8), dec!(8), "four", "rs"),
        ]);
        let ctx = BillingContext::new(&log, &opts);

        let counts: Vec<_> = ctx.worklogs.iter().map(|l| l.count).collect();
        assert_eq!(counts, vec![1, 2, 0, 1]);
    }

    #[test]
    fn project_tag_marks_the_days_last_message_when_multi_project() {
        let mut opts = options();
        opts.multi_project = true;
        let log = march_log(vec![
            record(ymd(2018, 3, 5), dec!(8), "fix bug", "rs"),
            record(ymd(2018, 3, 5), dec!(8), "port driver", "avr"),
        ]);
        let ctx = BillingContext::new(&log, &opts);

        assert_eq!(ctx.worklogs[0].text, "fix bug");
        assert_eq!(ctx.worklogs[1].text, "port driver (avr)");
    }

    #[test]
    fn single_project_output_stays_untagged() {
        let log = march_log(vec![record(ymd(2018, 3, 5), dec!(8), "fix bug", "rs")]);
        let ctx = BillingContext::new(&log, &options());

        assert_eq!(ctx.worklogs[0].text, "fix bug");
    }

    #[test]
    fn latex_unsafe_characters_are_stripped() {
        let log = march_log(vec![record(
            ymd(2018, 3, 5),
            dec!(8),
            "rename foo_bar, 100% done",
            "rs",
        )]);
        let ctx = BillingContext::new(&log, &options());

        assert_eq!(ctx.worklogs[0].text, "rename foo-bar, 100 done");
    }

    #[test]
    fn attributes_expose_the_whole_context() {
        let log = march_log(vec![record(ymd(2018, 3, 5), dec!(10), "long day", "rs")]);
        let ctx = BillingContext::new(&log, &options());
        let attrs = ctx.attributes();

        assert_eq!(attrs["fee"], "800.00");
        assert_eq!(attrs["total"], "928.00");
        assert_eq!(attrs["currency"], "EUR €");
        assert!(attrs["worklogs"].contains("2018-03-05 & 10 & long day \\\\"));
    }
}
