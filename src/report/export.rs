use chrono::NaiveDate;

use super::ranking::RankedStudent;

pub const CSV_HEADER: &str = "อันดับ,รหัสนักเรียน,ชื่อ,นามสกุล,ห้อง,จำนวนครั้ง";

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Ranking as CSV, header first, one row per ranked student
pub fn ranking_csv(ranked: &[RankedStudent]) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');

    for row in ranked {
        let s = &row.summary;
        let fields = [
            row.rank.to_string(),
            csv_field(s.student_code.as_deref().unwrap_or_default()),
            csv_field(&s.first_name),
            csv_field(&s.last_name),
            csv_field(&s.class_room),
            s.total_late.to_string(),
        ];
        csv.push_str(&fields.join(","));
        csv.push('\n');
    }

    csv
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("สถิติการมาสาย_{}.csv", date.format("%Y-%m-%d"))
}
