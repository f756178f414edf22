use serde::Serialize;

use crate::types::{HIGH_THRESHOLD, LOW_THRESHOLD};

/// Colour tier for a day's contribution count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    None,
    Low,
    High,
}

impl Tier {
    /// Sample counts shown in the "Less .. More" legend, one per tier.
    pub const LEGEND: [usize; 3] = [0, LOW_THRESHOLD, HIGH_THRESHOLD];

    pub fn for_count(count: usize) -> Self {
        if count >= HIGH_THRESHOLD {
            Tier::High
        } else if count >= LOW_THRESHOLD {
            Tier::Low
        } else {
            Tier::None
        }
    }

    /// Display colour as a hex string.
    pub fn color(self) -> &'static str {
        match self {
            Tier::None => "#161b22",
            Tier::Low => "#276749",
            Tier::High => "#68d391",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::None => "none",
            Tier::Low => "low",
            Tier::High => "high",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
