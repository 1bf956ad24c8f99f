//! Detections view state: lot/camera selector contents and the current
//! detection list.
//!
//! Every selection change yields a [`DetectionQuery`]. Queries carry a
//! generation number and only the most recently issued one may replace the
//! list, so a slow earlier response can never overwrite newer data. A failed
//! fetch keeps the previous list and records the error.

use tracing::{error, info, warn};

use lotwatch_common::detection::DetectionRecord;
use lotwatch_common::protocol::ParkingLot;
use lotwatch_common::scope::{lot_options, LotFilter, LotOption, Scope};

use crate::api::{ApiClient, ApiError};

/// Snapshot of the filter a detection fetch was issued for.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionQuery {
    generation: u64,
    filter: LotFilter,
}

impl DetectionQuery {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn filter(&self) -> &LotFilter {
        &self.filter
    }
}

#[derive(Debug, Default)]
pub struct DetectionListing {
    lots: Vec<LotOption>,
    lots_error: Option<String>,
    filter: LotFilter,
    detections: Vec<DetectionRecord>,
    last_error: Option<String>,
    issued: u64,
}

impl DetectionListing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lot selector entries, "All Parking Lots" first. Empty until
    /// [`load_lots`](Self::load_lots) succeeds.
    pub fn lots(&self) -> &[LotOption] {
        &self.lots
    }

    pub fn lots_error(&self) -> Option<&str> {
        self.lots_error.as_deref()
    }

    pub fn filter(&self) -> &LotFilter {
        &self.filter
    }

    pub fn detections(&self) -> &[DetectionRecord] {
        &self.detections
    }

    /// Error of the most recent detection fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ── lots ─────────────────────────────────────────────────────────────

    /// Fetch the lot listing once. Returns whether it succeeded.
    pub async fn load_lots(&mut self, api: &ApiClient) -> bool {
        let result = api.parking_lots().await;
        self.apply_lots(result)
    }

    pub fn apply_lots(&mut self, result: Result<Vec<ParkingLot>, ApiError>) -> bool {
        match result {
            Ok(lots) => {
                info!("Loaded {} parking lot(s)", lots.len());
                self.lots = lot_options(lots);
                self.lots_error = None;
                true
            }
            Err(e) => {
                error!("Error fetching parking lots: {e}");
                self.lots_error = Some(e.to_string());
                false
            }
        }
    }

    // ── selection ────────────────────────────────────────────────────────

    /// Select a lot by scope. Unknown lot ids are still applied, with no
    /// cameras to choose from.
    pub fn select_lot(&mut self, lot: Scope<u64>) -> DetectionQuery {
        let option = match self.lots.iter().find(|o| o.scope == lot) {
            Some(o) => o.clone(),
            None => match lot {
                Scope::All => LotOption::all_lots(),
                Scope::Only(id) => {
                    warn!("Parking lot {id} is not in the lot listing");
                    LotOption {
                        scope: lot,
                        name: id.to_string(),
                        cameras: Vec::new(),
                    }
                }
            },
        };
        self.filter.select_lot(&option);
        self.begin_fetch()
    }

    /// Select a camera. Returns `None` when the selection did not change
    /// (same camera, or no specific lot selected).
    pub fn select_camera(&mut self, camera: Scope<u64>) -> Option<DetectionQuery> {
        if !self.filter.select_camera(camera) {
            if self.filter.lot().is_all() && !camera.is_all() {
                warn!("Camera filter ignored while all parking lots are selected");
            }
            return None;
        }
        Some(self.begin_fetch())
    }

    // ── detection fetches ────────────────────────────────────────────────

    /// Issue a new query for the current filter, superseding older ones.
    pub fn begin_fetch(&mut self) -> DetectionQuery {
        self.issued += 1;
        DetectionQuery {
            generation: self.issued,
            filter: self.filter.clone(),
        }
    }

    /// Apply the result of `query`. Returns whether the list was replaced.
    pub fn complete_fetch(
        &mut self,
        query: &DetectionQuery,
        result: Result<Vec<DetectionRecord>, ApiError>,
    ) -> bool {
        if query.generation < self.issued {
            info!(
                "Discarding stale detections (generation {} < {})",
                query.generation, self.issued
            );
            return false;
        }
        match result {
            Ok(detections) => {
                info!("Loaded {} detection(s)", detections.len());
                self.detections = detections;
                self.last_error = None;
                true
            }
            Err(e) => {
                error!("Error fetching detections: {e}");
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    /// Fetch `query` and apply it.
    pub async fn fetch(&mut self, api: &ApiClient, query: DetectionQuery) -> bool {
        let result = api.detections(&query.filter).await;
        self.complete_fetch(&query, result)
    }

    /// Re-fetch detections for the current filter.
    pub async fn refresh(&mut self, api: &ApiClient) -> bool {
        let query = self.begin_fetch();
        self.fetch(api, query).await
    }
}
