use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::geometry::{Crs, WorkAreaGeometry};

/// Raw answers of the spatial queries for one geometry. "No intersection" is the empty,
/// false or `None` value of each field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialFacts {
    pub on_general_street: bool,
    /// Street-classification codes of every classified street the geometry touches.
    pub street_classes: BTreeSet<String>,
    pub in_central_business_district: bool,
    /// Highest daily traffic volume among segments within 15 m.
    pub max_traffic_volume_15m: Option<u32>,
    /// Highest daily traffic volume among segments within 30 m.
    pub max_traffic_volume_30m: Option<u32>,
    pub on_transit_critical_segment: bool,
    pub bus_routes: BTreeSet<String>,
    pub tram_lane_types: BTreeSet<String>,
    pub priority_cycling_route: bool,
    pub main_cycling_route: bool,
}

/// Read-only spatial query capability against the infrastructure reference layers.
///
/// Implementations hold no per-call state, so calls for different work areas may run
/// concurrently.
pub trait SpatialFactResolver: Send + Sync {
    fn resolve(&self, geometry: &WorkAreaGeometry) -> Result<SpatialFacts, ResolverError>;

    /// Answers for several geometries, in input order.
    fn resolve_all(
        &self,
        geometries: &[&WorkAreaGeometry],
    ) -> Result<Vec<SpatialFacts>, ResolverError> {
        geometries
            .iter()
            .map(|geometry| self.resolve(geometry))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolverError {
    #[error("spatial fact resolver unavailable: {0}")]
    Unavailable(String),
    #[error("geometry is expressed in {found} but the reference layers use {expected}")]
    CrsMismatch { expected: Crs, found: Crs },
}

impl ResolverError {
    pub const fn is_retryable(&self) -> bool {
        matches!(self, ResolverError::Unavailable(_))
    }
}
