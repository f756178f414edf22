use serde::Serialize;
use time::Date;

use crate::fold::fold_weeks;
use crate::labels::month_labels;
use crate::record::ContributionMap;
use crate::tier::Tier;
use crate::types::{serialize_date, CalendarCell, CalendarError, DailyActivity, MonthLabel, Week};
use crate::window::daily_window;

/// Render-ready activity calendar for the window ending at `anchor`.
///
/// Every build recomputes from the given records; nothing is cached between
/// calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calendar {
    #[serde(serialize_with = "serialize_date")]
    pub anchor: Date,
    pub days: Vec<DailyActivity>,
    pub weeks: Vec<Week>,
    pub month_labels: Vec<MonthLabel>,
}

impl Calendar {
    pub fn build(records: &ContributionMap, anchor: Date) -> Result<Self, CalendarError> {
        let days = daily_window(records, anchor)?;
        let weeks = fold_weeks(&days)?;
        let month_labels = month_labels(&weeks);
        tracing::debug!(
            %anchor,
            records = records.len(),
            weeks = weeks.len(),
            labels = month_labels.len(),
            "built activity calendar"
        );
        Ok(Self {
            anchor,
            days,
            weeks,
            month_labels,
        })
    }

    /// Activity for `date`, if it falls inside the window.
    pub fn day(&self, date: Date) -> Option<&DailyActivity> {
        self.days
            .binary_search_by_key(&date, |d| d.date)
            .ok()
            .map(|i| &self.days[i])
    }

    pub fn total_contributions(&self) -> usize {
        self.days.iter().map(|d| d.contributions).sum()
    }

    /// Number of days with at least one contribution.
    pub fn active_days(&self) -> usize {
        self.days.iter().filter(|d| d.contributions > 0).count()
    }

    pub fn highlighted_days(&self) -> impl Iterator<Item = &DailyActivity> {
        self.days.iter().filter(|d| d.highlight)
    }

    /// Per-tier day counts over the real days, in legend order.
    pub fn tier_counts(&self) -> [(Tier, usize); 3] {
        let mut counts = [(Tier::None, 0), (Tier::Low, 0), (Tier::High, 0)];
        for day in &self.days {
            let slot = match Tier::for_count(day.contributions) {
                Tier::None => 0,
                Tier::Low => 1,
                Tier::High => 2,
            };
            counts[slot].1 += 1;
        }
        counts
    }
}

/// Hover text for a cell, e.g. `Wednesday, January 10, 2024: 5 contributions`.
pub fn describe_day(cell: &CalendarCell) -> String {
    let date = cell.date();
    format!(
        "{}, {} {}, {}: {} contributions",
        date.weekday(),
        date.month(),
        date.day(),
        date.year(),
        cell.contributions()
    )
}
