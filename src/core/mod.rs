// Core algorithm exports
pub mod criteria;
pub mod distance;
pub mod hours;
pub mod matcher;
pub mod scoring;

pub use criteria::{standard_criteria, Criterion, ScoringContext};
pub use distance::haversine_distance;
pub use hours::{parse_business_hours, BusinessHours, CLOSED};
pub use matcher::Matcher;
pub use scoring::{calculate_match_score, format_address, round2, tally};
