//! Daily, weekly and monthly work/slack accumulation.

use chrono::{DateTime, Duration, FixedOffset};

use crate::entry::Entry;

/// A work/slack accumulator bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub work: Duration,
    pub slack: Duration,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            work: Duration::zero(),
            slack: Duration::zero(),
        }
    }
}

impl Stats {
    fn add(&mut self, duration: Duration, slack: bool) {
        if slack {
            self.slack += duration;
        } else {
            self.work += duration;
        }
    }
}

/// Running totals for the current day, ISO week and month.
///
/// `arrived_time` doubles as the "arrival handled" flag: once set it is never
/// overwritten, and only a fresh load starts from an empty collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsCollection {
    pub daily: Stats,
    pub weekly: Stats,
    pub monthly: Stats,
    pub arrived_time: Option<DateTime<FixedOffset>>,
}

impl StatsCollection {
    /// Folds every entry, in order, into an empty collection.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        entries.into_iter().fold(Self::default(), |mut stats, entry| {
            stats.fold(entry);
            stats
        })
    }

    /// Adds one entry to the totals.
    ///
    /// This is an accumulator: applying the same entry twice counts it twice.
    pub fn fold(&mut self, entry: &Entry) {
        let slack = entry.is_slack();
        let periods = entry.classification;

        if periods.today {
            self.daily.add(entry.duration, slack);
        }
        if periods.current_week {
            self.weekly.add(entry.duration, slack);
        }
        if periods.current_month {
            self.monthly.add(entry.duration, slack);
        }

        if periods.today && entry.is_arrival() && self.arrived_time.is_none() {
            tracing::debug!(arrived = %entry.end_time, "recorded arrival");
            self.arrived_time = Some(entry.end_time);
        }
    }

    pub const fn arrival_handled(&self) -> bool {
        self.arrived_time.is_some()
    }

    /// When the day's target is reached, counting from arrival. `None`
    /// without an arrival or when the result is out of range.
    pub fn expected_leave(&self, daily_target: Duration) -> Option<DateTime<FixedOffset>> {
        self.arrived_time
            .and_then(|arrived| arrived.checked_add_signed(daily_target))
    }

    /// Work still missing to reach `daily_target`. Negative once exceeded.
    pub fn remaining_today(&self, daily_target: Duration) -> Duration {
        daily_target - self.daily.work
    }
}
