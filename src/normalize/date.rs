use chrono::{Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

const ISO_FORMAT: &str = "%Y-%m-%d";

/// Formats tried after the split heuristic fails, in order.
const FALLBACK_FORMATS: &[&str] = &["%d.%m.%Y", "%d/%m/%y", "%d %b %Y", "%b %d, %Y", "%d-%b-%Y"];

#[allow(clippy::expect_used)]
fn iso_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("invalid iso prefix regex"))
}

/// Canonical `YYYY-MM-DD` for a loosely formatted date, falling back to today.
pub fn normalize_date(raw: &str) -> String {
    normalize_date_on(raw, Local::now().date_naive())
}

/// [`normalize_date`] with an explicit "today" for the fallback.
pub fn normalize_date_on(raw: &str, today: NaiveDate) -> String {
    let clean = raw.replace(['"', '\''], "");
    let clean = clean.trim();
    if clean.is_empty() {
        return today.format(ISO_FORMAT).to_string();
    }

    // Re-parsing an ISO date can only lose information, so keep the prefix as-is.
    if let Some(m) = iso_prefix_re().find(clean) {
        return m.as_str().to_string();
    }

    split_date(clean)
        .or_else(|| fallback_date(clean))
        .unwrap_or(today)
        .format(ISO_FORMAT)
        .to_string()
}

/// `YYYY/MM/DD` when the first part has four digits, `DD/MM/YYYY` otherwise.
fn split_date(clean: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = clean.split(['/', '-']).map(str::trim).collect();
    let [first, second, third] = parts.as_slice() else {
        return None;
    };
    let (year, month, day) = if first.len() == 4 {
        (*first, *second, *third)
    } else {
        (*third, *second, *first)
    };
    if year.len() != 4 {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn fallback_date(clean: &str) -> Option<NaiveDate> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(clean, "%d/%m/%Y %H:%M:%S") {
        return Some(dt.date());
    }
    FALLBACK_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(clean, fmt).ok())
}

/// True when the field looks like a day/month/year or ISO date.
pub fn is_date_like(field: &str) -> bool {
    date_like_re().is_match(field.trim())
}

#[allow(clippy::expect_used)]
fn date_like_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2}[/.-]\d{1,2}[/.-]\d{2,4}|\d{4}-\d{2}-\d{2})")
            .expect("invalid date-like regex")
    })
}

#[cfg(test)]
#[path = "date_tests.rs"]
mod tests;
