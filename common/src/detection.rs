//! License-plate detection records as returned by `/dashboard/lp-detections`.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A reference to a lot or camera inside a detection row.
///
/// The backend sends either the numeric id or a display name depending on
/// its serializer, so both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Id(i64),
    Name(String),
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Id(id) => write!(f, "{id}"),
            Label::Name(name) => f.write_str(name),
        }
    }
}

/// A single plate read by one camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    #[serde(default)]
    pub parking_lot: Option<Label>,
    #[serde(default)]
    pub camera: Option<Label>,
    pub plate_number: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<FixedOffset>,
    pub confidence_score: f64,
    #[serde(default)]
    pub car_image: Option<String>,
    #[serde(default)]
    pub lpr_image: Option<String>,
}

impl DetectionRecord {
    /// Calendar date of the read in the operator's local time zone.
    pub fn local_date(&self) -> String {
        self.created_at.with_timezone(&Local).format("%Y-%m-%d").to_string()
    }

    /// Wall-clock time of the read in the operator's local time zone.
    pub fn local_time(&self) -> String {
        self.created_at.with_timezone(&Local).format("%H:%M:%S").to_string()
    }

    /// Confidence with two decimals, as shown in the detections table.
    pub fn confidence_display(&self) -> String {
        format!("{:.2}", self.confidence_score)
    }
}

impl std::fmt::Display for DetectionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Detection({}, {:.2}, {})",
            self.plate_number,
            self.confidence_score,
            self.created_at.to_rfc3339()
        )
    }
}

/// Accept RFC 3339 timestamps, falling back to naive ISO timestamps which
/// are taken as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("bad timestamp: {raw}")))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset())
}
