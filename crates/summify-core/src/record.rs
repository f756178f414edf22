use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use time::Date;

use crate::types::parse_date;

/// Key under which the backend wraps the per-day map.
pub const ENVELOPE_KEY: &str = "contributions";

/// Activity recorded for one day. `count` is the number of activity items the
/// backend listed for that day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContributionRecord {
    pub count: usize,
    pub highlight: bool,
}

impl ContributionRecord {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            highlight: false,
        }
    }

    pub fn highlighted(mut self) -> Self {
        self.highlight = true;
        self
    }

    /// Decode one day's value. Returns `None` when the value is not an object.
    fn from_value(date: Date, value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let count = match obj.get("contributions") {
            Some(Value::Array(items)) => items.len(),
            Some(other) => {
                tracing::warn!(%date, value = %other, "contributions is not a list, counting as zero");
                0
            }
            None => {
                tracing::warn!(%date, "record has no contributions list, counting as zero");
                0
            }
        };
        let highlight = obj.get("highlight").and_then(Value::as_bool).unwrap_or(false);
        Some(Self { count, highlight })
    }
}

/// Sparse per-day contribution records keyed by calendar date. Dates that are
/// absent carry no activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributionMap {
    records: BTreeMap<Date, ContributionRecord>,
}

impl ContributionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a backend response. Accepts either the
    /// `{"contributions": {...}}` envelope or the bare per-day object.
    ///
    /// Malformed pieces never fail the whole map: entries with an unparseable
    /// date key or a non-object value are dropped, a missing or non-list
    /// `contributions` field counts as zero, and a missing or non-boolean
    /// `highlight` is `false`.
    pub fn from_json(value: &Value) -> Self {
        let days = match value.get(ENVELOPE_KEY) {
            Some(inner) if inner.is_object() => inner,
            _ => value,
        };
        let Some(obj) = days.as_object() else {
            tracing::warn!(kind = json_kind(days), "contribution payload is not an object");
            return Self::default();
        };

        let mut records = BTreeMap::new();
        for (key, raw) in obj {
            let date = match parse_date(key) {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!(key = %key, "skipping contribution entry: {e}");
                    continue;
                }
            };
            match ContributionRecord::from_value(date, raw) {
                Some(record) => {
                    records.insert(date, record);
                }
                None => {
                    tracing::warn!(%date, kind = json_kind(raw), "skipping non-object contribution entry");
                }
            }
        }
        Self { records }
    }

    pub fn insert(&mut self, date: Date, record: ContributionRecord) {
        self.records.insert(date, record);
    }

    /// Record for `date`, defaulting to no activity.
    pub fn record(&self, date: Date) -> ContributionRecord {
        self.records.get(&date).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Date, &ContributionRecord)> {
        self.records.iter()
    }
}

impl FromIterator<(Date, ContributionRecord)> for ContributionMap {
    fn from_iter<I: IntoIterator<Item = (Date, ContributionRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'de> Deserialize<'de> for ContributionMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
