//! Status command: work and slack totals for today, this week and this month.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Datelike, Duration, FixedOffset};
use serde::Serialize;
use tl_core::{Stats, StatsCollection};

use super::util::{format_clock, format_stat_duration, open_journal};
use crate::Config;

/// Totals for one period, in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub work_minutes: i64,
    pub slack_minutes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_minutes: Option<i64>,
}

impl PeriodTotals {
    fn new(stats: Stats, target: Option<Duration>) -> Self {
        Self {
            work_minutes: stats.work.num_minutes(),
            slack_minutes: stats.slack.num_minutes(),
            target_minutes: target.map(|t| t.num_minutes()),
        }
    }
}

/// Computed status data.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub now: DateTime<FixedOffset>,
    pub today: PeriodTotals,
    pub week: PeriodTotals,
    pub month: PeriodTotals,
    pub arrived_at: Option<DateTime<FixedOffset>>,
    pub expected_leave: Option<DateTime<FixedOffset>>,
    pub remaining_today_minutes: i64,
}

impl StatusReport {
    pub fn new(stats: &StatsCollection, config: &Config, now: DateTime<FixedOffset>) -> Self {
        let daily_target = config.daily_target();
        Self {
            now,
            today: PeriodTotals::new(stats.daily, Some(daily_target)),
            week: PeriodTotals::new(stats.weekly, Some(config.weekly_target())),
            month: PeriodTotals::new(stats.monthly, None),
            arrived_at: stats.arrived_time,
            expected_leave: stats.expected_leave(daily_target),
            remaining_today_minutes: stats.remaining_today(daily_target).num_minutes(),
        }
    }
}

fn minutes(value: i64) -> String {
    format_stat_duration(Duration::minutes(value))
}

/// Writes the human-readable status.
pub fn render<W: Write>(writer: &mut W, report: &StatusReport) -> std::io::Result<()> {
    writeln!(
        writer,
        "{} (Week {})",
        report.now.format("%B, %d-%m-%Y"),
        report.now.iso_week().week()
    )?;

    let today = report.today;
    let left = if report.remaining_today_minutes >= 0 {
        format!("{} left", minutes(report.remaining_today_minutes))
    } else {
        format!("{} over", minutes(-report.remaining_today_minutes))
    };
    writeln!(
        writer,
        "{:<8}{} of {}, {left}, slack {}",
        "Today",
        minutes(today.work_minutes),
        minutes(today.target_minutes.unwrap_or_default()),
        minutes(today.slack_minutes),
    )?;

    let week = report.week;
    writeln!(
        writer,
        "{:<8}{} of {}, slack {}",
        "Week",
        minutes(week.work_minutes),
        minutes(week.target_minutes.unwrap_or_default()),
        minutes(week.slack_minutes),
    )?;

    writeln!(
        writer,
        "{:<8}{}, slack {}",
        "Month",
        minutes(report.month.work_minutes),
        minutes(report.month.slack_minutes),
    )?;

    match (report.arrived_at, report.expected_leave) {
        (Some(arrived), Some(leave)) => writeln!(
            writer,
            "{:<8}{}, leave at {}",
            "Arrived",
            format_clock(arrived),
            format_clock(leave)
        ),
        _ => writeln!(writer, "Not arrived yet. Log `**arrived` to start the day."),
    }
}

pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    now: DateTime<FixedOffset>,
    json: bool,
) -> Result<()> {
    let journal = open_journal(&config.journal_path, now)?;
    let report = StatusReport::new(journal.stats(), config, now);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        render(writer, &report)?;
    }
    Ok(())
}
