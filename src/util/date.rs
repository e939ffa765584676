use chrono::{DateTime, NaiveDate, NaiveDateTime};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DISPLAY_FORMAT: &str = "%m/%d/%Y %I:%M %p";

/// A completion timestamp classified once, so the filter and the renderer
/// agree on what counts as a usable date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionDate {
    Missing,
    Unparseable(String),
    At(NaiveDateTime),
}

impl CompletionDate {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::Missing;
        };
        match parse_wall_clock(raw) {
            Some(at) => Self::At(at),
            None => Self::Unparseable(raw.to_string()),
        }
    }

    pub fn instant(&self) -> Option<NaiveDateTime> {
        match self {
            Self::At(at) => Some(*at),
            _ => None,
        }
    }

    /// Table cell text: formatted date, the raw value if it could not be
    /// parsed, or `N/A`.
    pub fn display(&self) -> String {
        match self {
            Self::At(at) => at.format(DISPLAY_FORMAT).to_string(),
            Self::Unparseable(raw) => raw.clone(),
            Self::Missing => "N/A".to_string(),
        }
    }
}

/// Parse an ISO 8601 timestamp and keep its wall-clock reading.
///
/// Any offset (`Z`, `+02:00`) is dropped rather than converted, so the result
/// compares directly against a local naive "now".
pub fn parse_wall_clock(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
