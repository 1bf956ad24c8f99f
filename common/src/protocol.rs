//! Wire types shared with the recognition backend's `/dashboard` API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Envelope used by every list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing<T> {
    pub results: Vec<T>,
}

/// A camera mounted at a parking lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub id: u64,
    pub name: String,
}

/// A parking lot with its nested cameras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingLot {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub cameras: Vec<Camera>,
}

// ─── report requests ─────────────────────────────────────────────────────

/// Body of `POST /dashboard/parking-occupancy-report/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancyReportRequest {
    pub parking_lot_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: String,
    pub end_time: String,
}

/// Body of `POST /dashboard/vehicle-activity-report/`.
///
/// Every key is always present; unset filters travel as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleActivityReportRequest {
    pub parking_lot_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: String,
    pub end_time: String,
    pub license_plate: Option<String>,
    pub min_visits: Option<u32>,
    pub max_visits: Option<u32>,
    pub min_visit_duration: Option<u32>,
    pub max_visit_duration: Option<u32>,
}

// ─── report results (lightly typed views) ────────────────────────────────

/// The two headline figures of an occupancy report.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OccupancySummary {
    #[serde(default)]
    pub unfinished_visits_count: Option<serde_json::Value>,
    #[serde(default)]
    pub occupancy_percentage: Option<serde_json::Value>,
}

/// One vehicle row of an activity report.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VehicleActivityRecord {
    #[serde(default)]
    pub plate_number: Option<String>,
    #[serde(default)]
    pub car_image: Option<String>,
    #[serde(default)]
    pub plate_image: Option<String>,
    #[serde(default)]
    pub parking_lot_name: Option<String>,
    #[serde(default)]
    pub number_of_visits: Option<serde_json::Value>,
    #[serde(default)]
    pub average_visit_duration: Option<serde_json::Value>,
}
