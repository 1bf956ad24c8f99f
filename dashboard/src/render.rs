//! Plain-text rendering of the dashboard views.

use serde_json::Value;

use lotwatch_common::detection::DetectionRecord;
use lotwatch_common::protocol::{OccupancySummary, VehicleActivityRecord};
use lotwatch_common::scope::{LotOption, Scope};

pub const NO_DATA: &str = "No data available.";
const NO_IMAGE: &str = "No Image";

/// Left-aligned columns separated by two spaces, header underlined.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut out = line(headers.iter().copied(), &widths);
    out.push_str(&line(rule.iter().map(String::as_str), &widths));
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str), &widths));
    }
    out
}

fn line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut s = cells
        .zip(widths)
        .map(|(c, &w)| format!("{c:<w$}"))
        .collect::<Vec<_>>()
        .join("  ");
    s.truncate(s.trim_end().len());
    s.push('\n');
    s
}

fn image_cell(url: &Option<String>) -> String {
    url.clone().unwrap_or_else(|| NO_IMAGE.to_string())
}

fn value_cell(v: &Option<Value>) -> String {
    match v {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

// ─── listings ────────────────────────────────────────────────────────────

pub fn lots(options: &[LotOption]) -> String {
    if options.is_empty() {
        return format!("{NO_DATA}\n");
    }
    let rows: Vec<Vec<String>> = options
        .iter()
        .map(|o| {
            let id = match o.scope {
                Scope::All => "all".to_string(),
                Scope::Only(id) => id.to_string(),
            };
            let cameras = o
                .cameras
                .iter()
                .map(|c| format!("{} ({})", c.name, c.id))
                .collect::<Vec<_>>()
                .join(", ");
            vec![id, o.name.clone(), cameras]
        })
        .collect();
    table(&["ID", "PARKING LOT", "CAMERAS"], &rows)
}

pub fn detections(records: &[DetectionRecord]) -> String {
    if records.is_empty() {
        return format!("{NO_DATA}\n");
    }
    let label = |l: &Option<lotwatch_common::detection::Label>| {
        l.as_ref().map(ToString::to_string).unwrap_or_else(|| "-".into())
    };
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|d| {
            vec![
                label(&d.parking_lot),
                label(&d.camera),
                d.plate_number.clone(),
                d.local_date(),
                d.local_time(),
                d.confidence_display(),
                image_cell(&d.car_image),
                image_cell(&d.lpr_image),
            ]
        })
        .collect();
    table(
        &[
            "PARKING LOT ID",
            "CAMERA ID",
            "PLATE NUMBER",
            "DATE",
            "TIME",
            "CONFIDENCE SCORE",
            "CAR IMAGE",
            "PLATE IMAGE",
        ],
        &rows,
    )
}

// ─── reports ─────────────────────────────────────────────────────────────

fn pretty(value: &Value) -> String {
    let mut s = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    s.push('\n');
    s
}

/// Occupancy headline figures, or the raw JSON when the backend sent
/// something else.
pub fn occupancy(value: &Value) -> String {
    let summary: OccupancySummary = serde_json::from_value(value.clone()).unwrap_or_default();
    if summary.unfinished_visits_count.is_none() && summary.occupancy_percentage.is_none() {
        return pretty(value);
    }
    let mut out = String::from("Parking Occupancy Report\n");
    out.push_str(&format!(
        "  Unfinished Visits Count: {}\n",
        value_cell(&summary.unfinished_visits_count)
    ));
    out.push_str(&format!(
        "  Occupancy Percentage:    {}%\n",
        value_cell(&summary.occupancy_percentage)
    ));
    out
}

/// One block per vehicle, or the raw JSON when the body is not a list.
pub fn vehicle_activity(value: &Value) -> String {
    let Value::Array(items) = value else {
        return pretty(value);
    };
    if items.is_empty() {
        return format!("{NO_DATA}\n");
    }
    let mut out = String::from("Vehicle Activity Report\n");
    for item in items {
        let r: VehicleActivityRecord = serde_json::from_value(item.clone()).unwrap_or_default();
        out.push('\n');
        out.push_str(&format!("  Plate Number:           {}\n", r.plate_number.as_deref().unwrap_or("-")));
        out.push_str(&format!("  Parking Lot Name:       {}\n", r.parking_lot_name.as_deref().unwrap_or("-")));
        out.push_str(&format!("  Number of Visits:       {}\n", value_cell(&r.number_of_visits)));
        out.push_str(&format!(
            "  Average Visit Duration: {} mins\n",
            value_cell(&r.average_visit_duration)
        ));
        out.push_str(&format!("  Car Image:              {}\n", image_cell(&r.car_image)));
        out.push_str(&format!("  Plate Image:            {}\n", image_cell(&r.plate_image)));
    }
    out
}
