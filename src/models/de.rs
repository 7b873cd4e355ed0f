//! Lenient field decoding for spreadsheet-backed payloads.
//!
//! Cells come back as numbers or strings depending on how the sheet was
//! edited, so ids and counts accept both.

use serde::{Deserialize, Deserializer};
use serde::de::Error;

#[derive(Deserialize)]
#[serde(untagged)]
enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    fn into_text(self) -> String {
        match self {
            Cell::Int(n) => n.to_string(),
            Cell::Float(f) if f.fract() == 0.0 => format!("{}", f as i64),
            Cell::Float(f) => f.to_string(),
            Cell::Text(s) => s,
            Cell::Bool(b) => b.to_string(),
        }
    }
}

pub fn id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Cell::deserialize(deserializer)? {
        Cell::Int(n) => Ok(n),
        Cell::Float(f) if f.fract() == 0.0 => Ok(f as i64),
        Cell::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid id: {:?}", s))),
        other => Err(D::Error::custom(format!("invalid id: {}", other.into_text()))),
    }
}

pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Cell>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Cell::Int(n)) => u32::try_from(n).map_err(D::Error::custom),
        Some(Cell::Float(f)) if f >= 0.0 && f.fract() == 0.0 => Ok(f as u32),
        Some(Cell::Text(s)) if s.trim().is_empty() => Ok(0),
        Some(Cell::Text(s)) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid count: {:?}", s))),
        Some(other) => Err(D::Error::custom(format!("invalid count: {}", other.into_text()))),
    }
}

pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Cell>::deserialize(deserializer)?
        .map(Cell::into_text)
        .unwrap_or_default())
}

/// Empty strings and nulls both mean "absent"
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Cell>::deserialize(deserializer)?
        .map(Cell::into_text)
        .filter(|s| !s.trim().is_empty()))
}
