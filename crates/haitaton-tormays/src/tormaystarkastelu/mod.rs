//! Törmäystarkastelu: nuisance-index calculation for work areas.
//!
//! Data flows one way. The [`service::TormaystarkasteluService`] asks a
//! [`resolver::SpatialFactResolver`] for the spatial facts of a geometry, the
//! [`classification`] tables turn raw codes and counts into ordinal buckets, and the
//! [`calculator::IndexCalculator`] combines them with the declared nuisance into the result.

pub mod aggregate;
pub mod calculator;
pub mod classification;
pub mod domain;
pub mod geometry;
pub mod layers;
pub mod memory;
pub mod nuisance;
pub mod repository;
pub mod resolver;
pub mod result;
pub mod service;

#[cfg(test)]
mod tests;

pub use aggregate::{summarize, AreaResult, GoverningIndex, HankeSummary};
pub use calculator::{
    CalculationError, CalculatorConfig, DurationPolicy, IndexCalculator, IndexWeights,
};
pub use classification::{
    classify, ClassificationTable, CyclingRoute, DurationBand, Katuluokka, Luokittelu, TramLane,
    UnrecognizedClassificationCode,
};
pub use domain::{HankeId, WorkAreaId};
pub use geometry::{Crs, GeometryError, WorkAreaGeometry};
pub use layers::{LayerError, LayerKind, ReferenceLayers};
pub use memory::InMemoryWorkAreaRepository;
pub use nuisance::{
    DeclaredNuisance, LaneImpact, LaneImpactLength, NuisanceLevel, NuisanceValidationError,
};
pub use repository::{CalculationState, RepositoryError, WorkArea, WorkAreaRepository};
pub use resolver::{ResolverError, SpatialFactResolver, SpatialFacts};
pub use result::{
    IndeksiTyyppi, IndexCategory, IndexComponent, IndexFactor, IndexValue, LiikennehaittaIndeksi,
    TormaystarkasteluResult,
};
pub use service::{TormaystarkasteluError, TormaystarkasteluService};
