use time::{Date, Duration};

use crate::types::{CalendarCell, CalendarError, DailyActivity, Week, DAYS_PER_WEEK};

/// Sunday-based weekday index: Sunday = 0 .. Saturday = 6.
pub fn weekday_index(date: Date) -> usize {
    date.weekday().number_days_from_sunday() as usize
}

/// The Sunday that starts `date`'s week.
pub fn week_start(date: Date) -> Result<Date, CalendarError> {
    date.checked_sub(Duration::days(weekday_index(date) as i64))
        .ok_or(CalendarError::WeekStartOutOfRange { date })
}

/// Fold the window into Sunday-first weeks.
///
/// The first week is front-padded with placeholder cells dated from the
/// preceding Sunday so that column rows line up with weekdays. The last week
/// is left short when the padded length is not a multiple of seven.
///
/// Fails when the first day's Sunday is before `Date::MIN`.
pub fn fold_weeks(days: &[DailyActivity]) -> Result<Vec<Week>, CalendarError> {
    let Some(first) = days.first() else {
        return Ok(Vec::new());
    };
    let sunday = week_start(first.date)?;
    let pad = weekday_index(first.date);

    let mut cells = Vec::with_capacity(pad + days.len());
    // Every padding date lies in [sunday, first.date), so adding cannot overflow.
    cells.extend((0..pad).map(|offset| CalendarCell::Padding {
        date: sunday + Duration::days(offset as i64),
    }));
    cells.extend(days.iter().copied().map(CalendarCell::Day));

    Ok(cells
        .chunks(DAYS_PER_WEEK)
        .map(|chunk| chunk.to_vec())
        .collect())
}

/// Number of placeholder cells in front of the first real day.
pub fn padding_len(weeks: &[Week]) -> usize {
    weeks
        .iter()
        .flatten()
        .take_while(|cell| cell.is_padding())
        .count()
}

/// The real days of the grid in order, placeholders removed.
pub fn real_days(weeks: &[Week]) -> Vec<DailyActivity> {
    weeks
        .iter()
        .flatten()
        .filter_map(CalendarCell::as_day)
        .copied()
        .collect()
}
