//! Lot/camera selection for the detections view.
//!
//! "All parking lots" and "all cameras" are their own variant rather than a
//! reserved identifier, so they can never collide with a real backend id.

use crate::protocol::{Camera, ParkingLot};

/// Either no filter, or a filter on one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope<T> {
    #[default]
    All,
    Only(T),
}

impl<T: Copy> Scope<T> {
    pub fn only(&self) -> Option<T> {
        match self {
            Scope::All => None,
            Scope::Only(v) => Some(*v),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Scope::All)
    }
}

impl<T> From<Option<T>> for Scope<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Scope::Only(v),
            None => Scope::All,
        }
    }
}

/// An entry of the lot selector: the synthetic "all" entry or a real lot.
#[derive(Debug, Clone, PartialEq)]
pub struct LotOption {
    pub scope: Scope<u64>,
    pub name: String,
    pub cameras: Vec<Camera>,
}

impl LotOption {
    pub const ALL_LOTS_LABEL: &'static str = "All Parking Lots";

    pub fn all_lots() -> Self {
        LotOption {
            scope: Scope::All,
            name: Self::ALL_LOTS_LABEL.to_string(),
            cameras: Vec::new(),
        }
    }
}

impl From<ParkingLot> for LotOption {
    fn from(lot: ParkingLot) -> Self {
        LotOption {
            scope: Scope::Only(lot.id),
            name: lot.name,
            cameras: lot.cameras,
        }
    }
}

/// Build the selector contents: the "all" entry followed by the backend lots
/// in their original order.
pub fn lot_options(lots: Vec<ParkingLot>) -> Vec<LotOption> {
    std::iter::once(LotOption::all_lots())
        .chain(lots.into_iter().map(LotOption::from))
        .collect()
}

/// Current lot/camera filter plus the camera choices of the selected lot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LotFilter {
    lot: Scope<u64>,
    camera: Scope<u64>,
    cameras: Vec<Camera>,
}

impl LotFilter {
    pub fn lot(&self) -> Scope<u64> {
        self.lot
    }

    pub fn camera(&self) -> Scope<u64> {
        self.camera
    }

    /// Cameras offered for the selected lot (empty for "all lots").
    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    /// Switch lots. The camera resets to "all" and the camera list becomes
    /// the new lot's cameras.
    pub fn select_lot(&mut self, option: &LotOption) {
        self.lot = option.scope;
        self.camera = Scope::All;
        self.cameras = match option.scope {
            Scope::All => Vec::new(),
            Scope::Only(_) => option.cameras.clone(),
        };
    }

    /// Switch cameras. Ignored while no specific lot is selected.
    ///
    /// Returns whether the filter changed.
    pub fn select_camera(&mut self, camera: Scope<u64>) -> bool {
        if self.lot.is_all() || self.camera == camera {
            return false;
        }
        self.camera = camera;
        true
    }

    /// Query parameters for `GET /dashboard/lp-detections`.
    ///
    /// The camera only applies together with a specific lot.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Scope::Only(lot) = self.lot {
            pairs.push(("parking_lot_id", lot.to_string()));
            if let Scope::Only(camera) = self.camera {
                pairs.push(("camera_id", camera.to_string()));
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lot5() -> ParkingLot {
        ParkingLot {
            id: 5,
            name: "Main".into(),
            cameras: vec![
                Camera { id: 1, name: "Entry".into() },
                Camera { id: 2, name: "Exit".into() },
            ],
        }
    }

    #[test]
    fn test_select_lot_resets_camera() {
        let mut filter = LotFilter::default();
        let option = LotOption::from(lot5());
        filter.select_lot(&option);
        assert!(filter.select_camera(Scope::Only(2)));
        assert_eq!(filter.camera(), Scope::Only(2));

        filter.select_lot(&option);
        assert_eq!(filter.camera(), Scope::All);
        let ids: Vec<u64> = filter.cameras().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_all_lots_clears_cameras() {
        let mut filter = LotFilter::default();
        filter.select_lot(&LotOption::from(lot5()));
        filter.select_lot(&LotOption::all_lots());
        assert!(filter.cameras().is_empty());
        assert_eq!(filter.lot(), Scope::All);
    }

    #[test]
    fn test_camera_ignored_without_lot() {
        let mut filter = LotFilter::default();
        assert!(!filter.select_camera(Scope::Only(1)));
        assert_eq!(filter.camera(), Scope::All);
    }

    #[test]
    fn test_query_pairs() {
        let mut filter = LotFilter::default();
        assert!(filter.query_pairs().is_empty());

        filter.select_lot(&LotOption::from(lot5()));
        assert_eq!(filter.query_pairs(), vec![("parking_lot_id", "5".to_string())]);

        filter.select_camera(Scope::Only(1));
        assert_eq!(
            filter.query_pairs(),
            vec![("parking_lot_id", "5".to_string()), ("camera_id", "1".to_string())]
        );
    }

    #[test]
    fn test_lot_options_prepends_all() {
        let options = lot_options(vec![lot5()]);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].scope, Scope::All);
        assert_eq!(options[0].name, "All Parking Lots");
        assert_eq!(options[1].scope, Scope::Only(5));
    }
}
