//! Report submission: validate the filter form, expand the time range, POST
//! once, and classify the answer.

use chrono::{DateTime, TimeZone};
use serde_json::Value;
use tracing::{error, info};

use lotwatch_common::filter::{FilterForm, ReportKind, ValidationError};

use crate::api::{ApiClient, ApiError, OCCUPANCY_REPORT_PATH, VEHICLE_ACTIVITY_REPORT_PATH};

pub const EMPTY_MESSAGE: &str = "No data found. Please try with different filters.";
pub const RETRY_MESSAGE: &str = "An error occurred. Please try again.";

/// A report request that reached the backend and came back 2xx.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    /// Parsed body with at least some content.
    Data(Value),
    /// `{}`, `[]`, `null` or no body at all.
    Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ReportError {
    /// What the operator is shown. Backend failures collapse to a generic
    /// retry prompt; the detail goes to the log.
    pub fn user_message(&self) -> String {
        match self {
            ReportError::Validation(e) => e.to_string(),
            ReportError::Api(_) => RETRY_MESSAGE.to_string(),
        }
    }
}

/// Submits occupancy and vehicle-activity reports.
#[derive(Debug, Clone)]
pub struct ReportClient {
    api: ApiClient,
}

impl ReportClient {
    pub fn new(api: ApiClient) -> Self {
        ReportClient { api }
    }

    /// Validate `form` for `kind` and, if it passes, issue exactly one POST.
    ///
    /// Date bounds are computed from `now` in its own time zone.
    pub async fn submit<Tz: TimeZone>(
        &self,
        kind: ReportKind,
        form: &FilterForm,
        now: &DateTime<Tz>,
    ) -> Result<ReportOutcome, ReportError> {
        let response = match kind {
            ReportKind::Occupancy => {
                let body = form.occupancy_request(now)?;
                info!("Requesting {kind} report for lot {}", body.parking_lot_id);
                self.api.post_json(OCCUPANCY_REPORT_PATH, &body).await
            }
            ReportKind::VehicleActivity => {
                let body = form.vehicle_activity_request(now)?;
                info!("Requesting {kind} report for lot {}", body.parking_lot_id);
                self.api.post_json(VEHICLE_ACTIVITY_REPORT_PATH, &body).await
            }
        };

        match response {
            Ok(Some(value)) if !is_empty(&value) => Ok(ReportOutcome::Data(value)),
            Ok(_) => Ok(ReportOutcome::Empty),
            Err(e) => {
                error!("{kind} report failed: {e}");
                Err(e.into())
            }
        }
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::StubBackend;
    use chrono::FixedOffset;
    use lotwatch_common::config::Config;
    use lotwatch_common::filter::Field;
    use lotwatch_common::time_range::{DateRange, TimeOfDay};

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-06-15T10:30:00+00:00").unwrap()
    }

    fn reports(url: &str) -> ReportClient {
        ReportClient::new(ApiClient::new(&Config::default().with_backend_url(url)).unwrap())
    }

    fn occupancy_form() -> FilterForm {
        FilterForm {
            parking_lot: Some(5),
            date_range: Some(DateRange::Last7Days),
            time_of_day: Some(TimeOfDay::Evening),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_occupancy_without_lot_sends_nothing() {
        let stub = StubBackend::builder()
            .respond(OCCUPANCY_REPORT_PATH, 200, r#"{"occupancy_percentage": 40}"#)
            .spawn()
            .await;
        let form = FilterForm {
            parking_lot: None,
            ..occupancy_form()
        };
        let err = reports(&stub.url)
            .submit(ReportKind::Occupancy, &form, &now())
            .await
            .unwrap_err();

        assert!(matches!(&err, ReportError::Validation(v) if v.missing() == [Field::ParkingLot]));
        assert!(err.user_message().contains("Parking Lot"));
        assert!(stub.requests().is_empty());
    }

    #[tokio::test]
    async fn test_occupancy_posts_resolved_body_once() {
        let stub = StubBackend::builder()
            .respond(
                OCCUPANCY_REPORT_PATH,
                200,
                r#"{"unfinished_visits_count": 12, "occupancy_percentage": 40}"#,
            )
            .spawn()
            .await;
        let outcome = reports(&stub.url)
            .submit(ReportKind::Occupancy, &occupancy_form(), &now())
            .await
            .unwrap();

        match outcome {
            ReportOutcome::Data(v) => assert_eq!(v["unfinished_visits_count"], 12),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(stub.requests().len(), 1);
        let sent = stub.last_request(OCCUPANCY_REPORT_PATH).unwrap().json();
        assert_eq!(
            sent,
            serde_json::json!({
                "parking_lot_id": "5",
                "start_date": "2024-06-08",
                "end_date": "2024-06-15",
                "start_time": "18:00:00",
                "end_time": "00:00:00"
            })
        );
    }

    #[tokio::test]
    async fn test_empty_bodies_are_empty_outcomes() {
        for body in ["{}", "[]", "null", ""] {
            let stub = StubBackend::builder()
                .respond(VEHICLE_ACTIVITY_REPORT_PATH, 200, body)
                .spawn()
                .await;
            let form = FilterForm {
                parking_lot: Some(5),
                license_plate: Some("ABC123".into()),
                ..Default::default()
            };
            let outcome = reports(&stub.url)
                .submit(ReportKind::VehicleActivity, &form, &now())
                .await
                .unwrap();
            assert_eq!(outcome, ReportOutcome::Empty, "body {body:?}");
        }
    }

    #[tokio::test]
    async fn test_activity_body_keys() {
        let stub = StubBackend::builder()
            .respond(
                VEHICLE_ACTIVITY_REPORT_PATH,
                200,
                r#"[{"plate_number":"ABC123","number_of_visits":3}]"#,
            )
            .spawn()
            .await;
        let form = FilterForm {
            parking_lot: Some(9),
            license_plate: Some("ABC123".into()),
            ..Default::default()
        };
        let outcome = reports(&stub.url)
            .submit(ReportKind::VehicleActivity, &form, &now())
            .await
            .unwrap();
        assert!(matches!(outcome, ReportOutcome::Data(Value::Array(ref rows)) if rows.len() == 1));

        let sent = stub.last_request(VEHICLE_ACTIVITY_REPORT_PATH).unwrap().json();
        assert_eq!(sent["parking_lot_id"], "9");
        assert_eq!(sent["license_plate"], "ABC123");
        assert!(sent["start_date"].is_null());
        assert!(sent["min_visits"].is_null());
        assert_eq!(sent["start_time"], "00:00:00");
    }

    #[tokio::test]
    async fn test_server_error_gives_retry_message() {
        let stub = StubBackend::builder()
            .respond(OCCUPANCY_REPORT_PATH, 502, "bad gateway")
            .spawn()
            .await;
        let err = reports(&stub.url)
            .submit(ReportKind::Occupancy, &occupancy_form(), &now())
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::Api(ApiError::Status { .. })));
        assert_eq!(err.user_message(), RETRY_MESSAGE);
        assert_eq!(stub.hits(OCCUPANCY_REPORT_PATH), 1);
    }

    #[tokio::test]
    async fn test_garbage_body_is_decode_error() {
        let stub = StubBackend::builder()
            .respond(OCCUPANCY_REPORT_PATH, 200, "<html>oops</html>")
            .spawn()
            .await;
        let err = reports(&stub.url)
            .submit(ReportKind::Occupancy, &occupancy_form(), &now())
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::Api(ApiError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Bind then drop a listener to get a port nobody serves.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = reports(&url)
            .submit(ReportKind::Occupancy, &occupancy_form(), &now())
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::Api(ApiError::Transport { .. })));
        assert_eq!(err.user_message(), RETRY_MESSAGE);
    }

    #[test]
    fn test_is_empty() {
        assert!(is_empty(&serde_json::json!({})));
        assert!(!is_empty(&serde_json::json!({"a": 1})));
        assert!(!is_empty(&serde_json::json!(0)));
    }
}
