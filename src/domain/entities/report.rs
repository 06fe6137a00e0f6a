//! Range reports over the per-day stats ledger.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Display name used for urls that are no longer in the registry.
pub const UNNAMED_DESTINATION: &str = "Sin nombre";

/// Named reporting window, always ending today (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsRange {
    #[default]
    Today,
    Yesterday,
    /// Monday of the current week through today.
    Week,
    /// First day of the current month through today.
    Month,
}

impl StatsRange {
    /// Parses a range name. Unknown or missing names fall back to [`StatsRange::Today`].
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(|r| r.trim().to_ascii_lowercase()).as_deref() {
            Some("yesterday") => Self::Yesterday,
            Some("week") => Self::Week,
            Some("month") => Self::Month,
            _ => Self::Today,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Lists the calendar days covered by this range, oldest first.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use link_rotator::domain::entities::StatsRange;
    ///
    /// // 2024-05-15 is a Wednesday.
    /// let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
    /// let days = StatsRange::Week.days(today);
    /// assert_eq!(days.first(), NaiveDate::from_ymd_opt(2024, 5, 13).as_ref());
    /// assert_eq!(days.len(), 3);
    /// ```
    pub fn days(self, today: NaiveDate) -> Vec<NaiveDate> {
        match self {
            Self::Today => vec![today],
            Self::Yesterday => vec![today.pred_opt().unwrap_or(today)],
            Self::Week => {
                let since_monday = u64::from(today.weekday().num_days_from_monday());
                days_between(today - Days::new(since_monday), today)
            }
            Self::Month => days_between(today.with_day(1).unwrap_or(today), today),
        }
    }
}

impl fmt::Display for StatsRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive list of days from `first` to `last`.
fn days_between(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    first.iter_days().take_while(|day| *day <= last).collect()
}

/// One url's total within a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsRow {
    pub name: String,
    pub url: String,
    pub count: i64,
}

/// Aggregated hit counts for a range, joined to current registry names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeReport {
    pub range: String,
    pub total: i64,
    pub stats: Vec<StatsRow>,
}

impl RangeReport {
    /// Builds a report from per-url totals.
    ///
    /// `names` maps url to display name; urls without a (non-empty) name get
    /// [`UNNAMED_DESTINATION`]. Rows are ordered by count descending, ties by
    /// url ascending.
    pub fn build(
        range: StatsRange,
        totals: HashMap<String, i64>,
        names: &HashMap<String, String>,
    ) -> Self {
        let mut stats: Vec<StatsRow> = totals
            .into_iter()
            .filter(|(_, count)| *count != 0)
            .map(|(url, count)| {
                let name = names
                    .get(&url)
                    .filter(|name| !name.is_empty())
                    .cloned()
                    .unwrap_or_else(|| UNNAMED_DESTINATION.to_string());
                StatsRow { name, url, count }
            })
            .collect();

        stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.url.cmp(&b.url)));

        let total = stats.iter().map(|row| row.count).sum();

        Self {
            range: range.to_string(),
            total,
            stats,
        }
    }
}
