use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime};

const THAI_MONTHS: [&str; 12] = [
    "ม.ค.", "ก.พ.", "มี.ค.", "เม.ย.", "พ.ค.", "มิ.ย.",
    "ก.ค.", "ส.ค.", "ก.ย.", "ต.ค.", "พ.ย.", "ธ.ค.",
];

/// `10 ม.ค. 2568`: day, abbreviated Thai month, Buddhist-era year
pub fn format_date_thai(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        THAI_MONTHS[date.month0() as usize],
        date.year() + 543
    )
}

/// Normalize a backend time cell to `HH:MM`. Unrecognized input is
/// returned unchanged.
pub fn format_time(raw: &str) -> String {
    let raw = raw.trim();

    for pattern in ["%H:%M:%S", "%H:%M"] {
        if let Ok(t) = NaiveTime::parse_from_str(raw, pattern) {
            return t.format("%H:%M").to_string();
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.with_timezone(&Local).format("%H:%M").to_string();
    }

    raw.to_string()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn current_time() -> String {
    Local::now().format("%H:%M").to_string()
}
