use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{Days, NaiveDate};

use super::RunMetrics;
use crate::ui::style;

pub const DEFAULT_STATS_DAYS: u32 = 7;

/// Summed counters over a set of runs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aggregate {
    pub runs: usize,
    pub questions: usize,
    pub summary_checks: usize,
    pub confirmation_attempts: usize,
    pub confirmed: usize,
    answer_length_sum: f64,
    duplicate_rate_sum: f64,
}

impl Aggregate {
    fn add(&mut self, run: &RunMetrics) {
        self.runs += 1;
        self.questions += run.session.questions_total;
        self.summary_checks += run.session.summary_check_turns;
        self.confirmation_attempts += run.session.confirmation_attempts;
        self.confirmed += run.session.confirmed;
        self.answer_length_sum += run.session.avg_answer_length;
        self.duplicate_rate_sum += run.session.duplicate_question_rate;
    }

    fn per_run(&self, total: f64) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            total / self.runs as f64
        }
    }

    pub fn avg_questions(&self) -> f64 {
        self.per_run(self.questions as f64)
    }

    pub fn summary_check_rate(&self) -> f64 {
        ratio(self.summary_checks, self.questions)
    }

    pub fn confirmation_success_rate(&self) -> f64 {
        ratio(self.confirmed, self.confirmation_attempts)
    }

    pub fn avg_answer_length(&self) -> f64 {
        self.per_run(self.answer_length_sum)
    }

    pub fn avg_duplicate_rate(&self) -> f64 {
        self.per_run(self.duplicate_rate_sum)
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Overall and per-day aggregates for the last `days` days.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsReport {
    pub days: u32,
    pub since: NaiveDate,
    pub until: NaiveDate,
    pub overall: Aggregate,
    pub per_day: BTreeMap<NaiveDate, Aggregate>,
}

impl StatsReport {
    /// First day covered by a `days`-long window ending on `today`.
    pub fn window_start(days: u32, today: NaiveDate) -> NaiveDate {
        let days = days.max(1);
        today
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn build(runs: &[RunMetrics], days: u32, today: NaiveDate) -> Self {
        let days = if days == 0 { DEFAULT_STATS_DAYS } else { days };
        let since = Self::window_start(days, today);
        let mut overall = Aggregate::default();
        let mut per_day: BTreeMap<NaiveDate, Aggregate> = BTreeMap::new();

        for run in runs.iter().filter(|r| r.date >= since) {
            overall.add(run);
            per_day.entry(run.date).or_default().add(run);
        }

        Self {
            days,
            since,
            until: today,
            overall,
            per_day,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.overall.runs == 0
    }

    pub fn render(&self, locale: &str) -> String {
        let mut out = String::new();
        let title = t!("stats.title", locale = locale, days = self.days);
        let _ = writeln!(
            out,
            "{} {}",
            style::header(title),
            style::dim(format!("({} .. {})", self.since, self.until))
        );
        if self.is_empty() {
            let _ = writeln!(out, "{}", t!("stats.empty", locale = locale));
            return out;
        }

        let o = &self.overall;
        let rows = [
            (t!("stats.runs", locale = locale), o.runs.to_string()),
            (t!("stats.avg_questions", locale = locale), format!("{:.2}", o.avg_questions())),
            (
                t!("stats.summary_check_rate", locale = locale),
                percent(o.summary_check_rate()),
            ),
            (
                t!("stats.confirmation_success", locale = locale),
                percent(o.confirmation_success_rate()),
            ),
            (
                t!("stats.avg_answer_length", locale = locale),
                format!("{:.1}", o.avg_answer_length()),
            ),
            (t!("stats.duplicate_rate", locale = locale), percent(o.avg_duplicate_rate())),
        ];
        for (label, value) in rows {
            let _ = writeln!(out, "{}: {}", style::label(label), style::value(value));
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", style::header(t!("stats.per_day", locale = locale)));
        for (date, day) in &self.per_day {
            let _ = writeln!(
                out,
                "- {date}: run={}, q={:.1}, summary={}, conf={}, ans={:.1}, dup={}",
                day.runs,
                day.avg_questions(),
                percent(day.summary_check_rate()),
                percent(day.confirmation_success_rate()),
                day.avg_answer_length(),
                percent(day.avg_duplicate_rate()),
            );
        }
        out
    }
}

fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}
