use std::path::Path;

use anyhow::Context;

use summify_client::{BackendClient, ClientConfig, Session};
use summify_core::{describe_day, Calendar, CalendarCell, ContributionMap, Tier, DAYS_PER_WEEK};
use time::{Date, OffsetDateTime};

const WEEKDAYS: [&str; DAYS_PER_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const GUTTER: usize = 4;

pub struct CalendarParams<'a> {
    pub store_root: &'a Path,
    pub user: Option<&'a str>,
    pub anchor: Option<&'a str>,
    pub input: Option<&'a Path>,
    pub json: bool,
}

/// `summify calendar`
pub fn execute(params: CalendarParams<'_>) -> anyhow::Result<()> {
    let anchor = match params.anchor {
        Some(s) => summify_core::parse_date(s.trim())?,
        None => today(),
    };

    let records = match params.input {
        Some(path) => load_records(path)?,
        None => {
            let config = summify_store::read_config(&summify_store::config_path(params.store_root))?;
            let user = crate::resolve_user(&config, params.user)?;
            let client = BackendClient::new(ClientConfig::resolve(&config), Session::resolve(&config));
            client.fetch_contributions(&user)
        }
    };

    let calendar = Calendar::build(&records, anchor)?;
    if params.json {
        println!("{}", serde_json::to_string_pretty(&calendar)?);
    } else {
        print!("{}", render_text(&calendar));
    }
    Ok(())
}

fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// Read a contributions payload (envelope or bare map) from disk.
fn load_records(path: &Path) -> anyhow::Result<ContributionMap> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Ok(ContributionMap::from_json(&value))
}

fn glyph(count: usize) -> char {
    match Tier::for_count(count) {
        Tier::None => '·',
        Tier::Low => '▪',
        Tier::High => '■',
    }
}

/// Plain-text heat-map: month row, one row per weekday, legend, totals.
pub fn render_text(calendar: &Calendar) -> String {
    let mut out = String::new();
    let first = calendar.days.first().map(|d| d.date);
    match first {
        Some(first) => out.push_str(&format!("Activity {first} .. {}\n", calendar.anchor)),
        None => out.push_str("Activity\n"),
    }

    // Each week is two columns wide; skip a label that would overlap the previous one.
    let width = GUTTER + calendar.weeks.len() * 2;
    let mut months = vec![' '; width];
    let mut next_free = 0;
    for label in &calendar.month_labels {
        let col = GUTTER + label.week_index * 2;
        if col < next_free || col + label.label.len() > width {
            continue;
        }
        for (i, ch) in label.label.chars().enumerate() {
            months[col + i] = ch;
        }
        next_free = col + label.label.len() + 1;
    }
    out.push_str(months.iter().collect::<String>().trim_end());
    out.push('\n');

    for (row, name) in WEEKDAYS.iter().enumerate() {
        let mut line = format!("{name:<GUTTER$}");
        for week in &calendar.weeks {
            match week.get(row) {
                Some(cell) if cell.is_padding() => line.push(' '),
                Some(cell) => line.push(glyph(cell.contributions())),
                None => line.push(' '),
            }
            line.push(' ');
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str("\nLess ");
    for count in Tier::LEGEND {
        out.push(glyph(count));
        out.push(' ');
    }
    out.push_str("More\n");

    out.push_str(&format!(
        "{} contributions on {} days\n",
        calendar.total_contributions(),
        calendar.active_days()
    ));
    for day in calendar.highlighted_days() {
        out.push_str(&format!("* {}\n", describe_day(&CalendarCell::Day(*day))));
    }
    out
}
