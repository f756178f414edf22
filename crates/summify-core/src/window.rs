use time::{Date, Duration};

use crate::fold::week_start;
use crate::record::ContributionMap;
use crate::types::{CalendarError, DailyActivity, WINDOW_DAYS};

/// First date of the window that ends at `anchor`. The Sunday that starts
/// the window's first week must also be representable, so the grid can be
/// padded.
pub fn window_start(anchor: Date) -> Result<Date, CalendarError> {
    let start = anchor
        .checked_sub(Duration::days(WINDOW_DAYS as i64 - 1))
        .ok_or(CalendarError::AnchorOutOfRange { anchor })?;
    week_start(start).map_err(|_| CalendarError::AnchorOutOfRange { anchor })?;
    Ok(start)
}

/// Dense, oldest-first activity for the `WINDOW_DAYS` days ending at `anchor`
/// inclusive. Days missing from `records` have zero contributions.
pub fn daily_window(
    records: &ContributionMap,
    anchor: Date,
) -> Result<Vec<DailyActivity>, CalendarError> {
    let start = window_start(anchor)?;
    let mut days = Vec::with_capacity(WINDOW_DAYS);
    let mut date = start;
    for _ in 0..WINDOW_DAYS {
        let record = records.record(date);
        days.push(DailyActivity {
            date,
            contributions: record.count,
            highlight: record.highlight,
        });
        // The last step lands on anchor + 1, which may not exist at Date::MAX.
        match date.next_day() {
            Some(next) => date = next,
            None => break,
        }
    }
    Ok(days)
}
