use serde::Serialize;
use std::collections::BTreeMap;

/// Value a directory uses for a day with no hours
pub const CLOSED: &str = "Closed";

/// Weekly schedule parsed from a directory's free-text hours
///
/// `is_open` means "posts hours on at least one day". It is not a wall-clock
/// check and says nothing about whether the organization is open right now.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessHours {
    pub is_open: bool,
    pub schedule: BTreeMap<String, String>,
}

/// Parse newline-delimited `"<Day>: <hours>"` lines
///
/// Values are kept verbatim; time ranges are not interpreted. Lines without a
/// `": "` separator are skipped. A repeated day keeps its last value.
pub fn parse_business_hours(raw: Option<&str>) -> BusinessHours {
    let Some(raw) = raw else {
        return BusinessHours::default();
    };

    let mut schedule = BTreeMap::new();
    for line in raw.lines().filter(|l| !l.trim().is_empty()) {
        match line.split_once(": ") {
            Some((day, hours)) => {
                schedule.insert(day.to_string(), hours.to_string());
            }
            None => tracing::trace!("Skipping malformed hours line: {:?}", line),
        }
    }

    let is_open = schedule.values().any(|hours| hours != CLOSED);

    BusinessHours { is_open, schedule }
}
