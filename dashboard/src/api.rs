//! HTTP access to the recognition backend's `/dashboard` endpoints.
//!
//! Routes used:
//!   GET  /dashboard/parking-lot-with-camera      → lots with nested cameras
//!   GET  /dashboard/lp-detections                → detections (optional filters)
//!   POST /dashboard/parking-occupancy-report/    → occupancy report
//!   POST /dashboard/vehicle-activity-report/     → vehicle activity report

use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use lotwatch_common::config::Config;
use lotwatch_common::detection::DetectionRecord;
use lotwatch_common::protocol::{Listing, ParkingLot};
use lotwatch_common::scope::LotFilter;

pub const PARKING_LOTS_WITH_CAMERAS_PATH: &str = "/dashboard/parking-lot-with-camera";
pub const DETECTIONS_PATH: &str = "/dashboard/lp-detections";
pub const OCCUPANCY_REPORT_PATH: &str = "/dashboard/parking-occupancy-report/";
pub const VEHICLE_ACTIVITY_REPORT_PATH: &str = "/dashboard/vehicle-activity-report/";

/// Anything that went wrong between sending a request and decoding its body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid URL {url}: {reason}")]
    Url { url: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    #[error("cannot decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Thin wrapper around a shared `reqwest::Client` and the backend base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(ApiClient {
            http,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| ApiError::Url {
            url: raw,
            reason: e.to_string(),
        })
    }

    /// Detection listing URL for the given lot/camera filter.
    pub fn detections_url(&self, filter: &LotFilter) -> Result<Url, ApiError> {
        let mut url = self.endpoint(DETECTIONS_PATH)?;
        let pairs = filter.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    /// All parking lots with their cameras, in backend order.
    pub async fn parking_lots(&self) -> Result<Vec<ParkingLot>, ApiError> {
        let url = self.endpoint(PARKING_LOTS_WITH_CAMERAS_PATH)?;
        self.get_listing(url).await
    }

    /// Detections matching `filter`.
    pub async fn detections(&self, filter: &LotFilter) -> Result<Vec<DetectionRecord>, ApiError> {
        let url = self.detections_url(filter)?;
        self.get_listing(url).await
    }

    /// POST `body` as JSON to `path`.
    ///
    /// Returns `None` when the backend answered 2xx with no body at all.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<serde_json::Value>, ApiError> {
        let url = self.endpoint(path)?;
        debug!("POST {url}");
        let resp = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|source| transport(&url, source))?;
        let bytes = Self::success_body(&url, resp).await?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| ApiError::Decode {
                url: url.to_string(),
                source,
            })
    }

    async fn get_listing<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, ApiError> {
        debug!("GET {url}");
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| transport(&url, source))?;
        let bytes = Self::success_body(&url, resp).await?;

        let listing: Listing<T> = serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })?;
        Ok(listing.results)
    }

    async fn success_body(url: &Url, resp: reqwest::Response) -> Result<Vec<u8>, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }
        let bytes = resp.bytes().await.map_err(|source| transport(url, source))?;
        Ok(bytes.to_vec())
    }
}

fn transport(url: &Url, source: reqwest::Error) -> ApiError {
    ApiError::Transport {
        url: url.to_string(),
        source,
    }
}
