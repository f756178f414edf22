use crate::types::{short_month_name, MonthLabel, Week};

/// Month labels for the column axis.
///
/// Cells are scanned week by week, top to bottom. A label is emitted at the
/// current week index whenever a cell's month differs from the last emitted
/// label, so a week containing a month boundary anchors the new month. A
/// month that reappears after another one is labelled again.
pub fn month_labels(weeks: &[Week]) -> Vec<MonthLabel> {
    let mut labels = Vec::new();
    let mut current: Option<&'static str> = None;

    for (week_index, week) in weeks.iter().enumerate() {
        for cell in week {
            let name = short_month_name(cell.date().month());
            if current != Some(name) {
                labels.push(MonthLabel {
                    label: name,
                    week_index,
                });
                current = Some(name);
            }
        }
    }
    labels
}
