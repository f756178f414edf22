pub mod calendar;
pub mod fold;
pub mod labels;
pub mod record;
pub mod tier;
pub mod types;
pub mod window;

pub use calendar::{describe_day, Calendar};
pub use record::{ContributionMap, ContributionRecord};
pub use tier::Tier;
pub use types::*;
