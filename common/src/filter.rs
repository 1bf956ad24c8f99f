//! Report filter form: the operator's selections and the per-report rules
//! deciding when a request may be sent.

use chrono::{DateTime, TimeZone};

use crate::protocol::{OccupancyReportRequest, VehicleActivityReportRequest};
use crate::time_range::{self, DateRange, TimeOfDay};

/// The two report screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Occupancy,
    VehicleActivity,
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportKind::Occupancy => f.write_str("parking occupancy"),
            ReportKind::VehicleActivity => f.write_str("vehicle activity"),
        }
    }
}

/// A form field, named the way the operator sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ParkingLot,
    DateRange,
    TimeOfDay,
    LicensePlate,
    MinVisits,
    MaxVisits,
    MinVisitDuration,
    MaxVisitDuration,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::ParkingLot => "Parking Lot",
            Field::DateRange => "Date Range",
            Field::TimeOfDay => "Time of Day",
            Field::LicensePlate => "License Plate",
            Field::MinVisits => "Min Visits",
            Field::MaxVisits => "Max Visits",
            Field::MinVisitDuration => "Min Visit Duration",
            Field::MaxVisitDuration => "Max Visit Duration",
        }
    }
}

/// Required fields are missing; nothing was sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill out all the required fields: {}.", join_labels(.0))]
    MissingFields(Vec<Field>),

    #[error(
        "Enter a License Plate, or all of Min Visits, Max Visits, Min Visit Duration \
         and Max Visit Duration (missing: {}).",
        join_labels(.0)
    )]
    NoActivityCriteria(Vec<Field>),
}

impl ValidationError {
    /// Every field the operator still has to fill in.
    pub fn missing(&self) -> &[Field] {
        match self {
            ValidationError::MissingFields(f) | ValidationError::NoActivityCriteria(f) => f,
        }
    }
}

fn join_labels(fields: &[Field]) -> String {
    fields.iter().map(|f| f.label()).collect::<Vec<_>>().join(", ")
}

/// Visit count and duration (minutes) bounds of the activity report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisitBounds {
    pub min_visits: Option<u32>,
    pub max_visits: Option<u32>,
    pub min_duration: Option<u32>,
    pub max_duration: Option<u32>,
}

impl VisitBounds {
    fn missing(&self) -> Vec<Field> {
        [
            (self.min_visits, Field::MinVisits),
            (self.max_visits, Field::MaxVisits),
            (self.min_duration, Field::MinVisitDuration),
            (self.max_duration, Field::MaxVisitDuration),
        ]
        .into_iter()
        .filter(|(v, _)| v.is_none())
        .map(|(_, f)| f)
        .collect()
    }
}

/// Current values of the report filter form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterForm {
    pub parking_lot: Option<u64>,
    pub date_range: Option<DateRange>,
    pub time_of_day: Option<TimeOfDay>,
    pub license_plate: Option<String>,
    pub visits: VisitBounds,
}

impl FilterForm {
    /// License plate with surrounding whitespace removed; blank counts as unset.
    pub fn plate(&self) -> Option<&str> {
        self.license_plate
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Check that every field `kind` needs is present.
    ///
    /// Occupancy needs lot, date range and time of day. Vehicle activity
    /// needs a lot plus either a license plate or all four visit bounds.
    pub fn validate(&self, kind: ReportKind) -> Result<(), ValidationError> {
        match kind {
            ReportKind::Occupancy => {
                let missing: Vec<Field> = [
                    (self.parking_lot.is_none(), Field::ParkingLot),
                    (self.date_range.is_none(), Field::DateRange),
                    (self.time_of_day.is_none(), Field::TimeOfDay),
                ]
                .into_iter()
                .filter(|(absent, _)| *absent)
                .map(|(_, f)| f)
                .collect();
                if missing.is_empty() {
                    Ok(())
                } else {
                    Err(ValidationError::MissingFields(missing))
                }
            }
            ReportKind::VehicleActivity => {
                if self.parking_lot.is_none() {
                    return Err(ValidationError::MissingFields(vec![Field::ParkingLot]));
                }
                if self.plate().is_some() {
                    return Ok(());
                }
                let missing = self.visits.missing();
                if missing.is_empty() {
                    Ok(())
                } else {
                    let mut fields = vec![Field::LicensePlate];
                    fields.extend(missing);
                    Err(ValidationError::NoActivityCriteria(fields))
                }
            }
        }
    }

    /// Validate and build the occupancy request body.
    pub fn occupancy_request<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<OccupancyReportRequest, ValidationError> {
        self.validate(ReportKind::Occupancy)?;
        let range = time_range::resolve(self.date_range, self.time_of_day, now);
        Ok(OccupancyReportRequest {
            parking_lot_id: self.lot_id_string(),
            start_date: range.start_date,
            end_date: range.end_date,
            start_time: range.start_time_str(),
            end_time: range.end_time_str(),
        })
    }

    /// Validate and build the vehicle-activity request body.
    pub fn vehicle_activity_request<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<VehicleActivityReportRequest, ValidationError> {
        self.validate(ReportKind::VehicleActivity)?;
        let range = time_range::resolve(self.date_range, self.time_of_day, now);
        Ok(VehicleActivityReportRequest {
            parking_lot_id: self.lot_id_string(),
            start_date: range.start_date,
            end_date: range.end_date,
            start_time: range.start_time_str(),
            end_time: range.end_time_str(),
            license_plate: self.plate().map(str::to_string),
            min_visits: self.visits.min_visits,
            max_visits: self.visits.max_visits,
            min_visit_duration: self.visits.min_duration,
            max_visit_duration: self.visits.max_duration,
        })
    }

    // Only called after validation, which guarantees a lot.
    fn lot_id_string(&self) -> String {
        self.parking_lot.map(|id| id.to_string()).unwrap_or_default()
    }
}
