use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use geo::{BoundingRect, LineString, MultiPolygon, Polygon};

use crate::tormaystarkastelu::calculator::{CalculatorConfig, DurationPolicy, IndexCalculator};
use crate::tormaystarkastelu::domain::{HankeId, WorkAreaId};
use crate::tormaystarkastelu::geometry::{Crs, WorkAreaGeometry};
use crate::tormaystarkastelu::memory::InMemoryWorkAreaRepository;
use crate::tormaystarkastelu::nuisance::{
    DeclaredNuisance, LaneImpact, LaneImpactLength, NuisanceLevel,
};
use crate::tormaystarkastelu::repository::{RepositoryError, WorkArea, WorkAreaRepository};
use crate::tormaystarkastelu::resolver::{ResolverError, SpatialFactResolver, SpatialFacts};
use crate::tormaystarkastelu::result::TormaystarkasteluResult;
use crate::tormaystarkastelu::service::TormaystarkasteluService;

pub(super) const ORIGIN_X: f64 = 25_496_000.0;
pub(super) const ORIGIN_Y: f64 = 6_672_000.0;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn nuisance(lane_impact: LaneImpact, length: LaneImpactLength) -> DeclaredNuisance {
    DeclaredNuisance {
        lane_impact,
        lane_impact_length: length,
        noise: NuisanceLevel::NoNuisance,
        dust: NuisanceLevel::NoNuisance,
        vibration: NuisanceLevel::NoNuisance,
        start_date: date(2024, 5, 6),
        end_date: date(2024, 5, 6),
    }
}

pub(super) fn quiet_nuisance() -> DeclaredNuisance {
    nuisance(LaneImpact::NoImpact, LaneImpactLength::NoImpact)
}

pub(super) fn one_lane_nuisance() -> DeclaredNuisance {
    nuisance(
        LaneImpact::ReducesOneLaneInOneDirection,
        LaneImpactLength::Under10Metres,
    )
}

pub(super) fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![
            (x, y),
            (x + size, y),
            (x + size, y + size),
            (x, y + size),
            (x, y),
        ]),
        Vec::new(),
    )
}

/// Ten-metre square whose lower-left corner sits `offset` metres east of the origin.
pub(super) fn geometry_at(offset: f64) -> WorkAreaGeometry {
    WorkAreaGeometry::new(
        Crs::Epsg3879,
        MultiPolygon(vec![square(ORIGIN_X + offset, ORIGIN_Y, 10.0)]),
    )
    .expect("non-empty geometry")
}

pub(super) fn codes(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Facts of the arterial-street example: major street, heavy traffic, inside the CBD.
pub(super) fn arterial_facts() -> SpatialFacts {
    SpatialFacts {
        on_general_street: true,
        street_classes: codes(&["Pääkatu tai moottoriväylä"]),
        in_central_business_district: true,
        max_traffic_volume_15m: Some(17_566),
        max_traffic_volume_30m: Some(17_566),
        ..SpatialFacts::default()
    }
}

pub(super) fn transit_facts() -> SpatialFacts {
    SpatialFacts {
        on_transit_critical_segment: true,
        bus_routes: codes(&["55", "56", "58"]),
        tram_lane_types: codes(&["dedicated"]),
        ..SpatialFacts::default()
    }
}

pub(super) fn calculator() -> IndexCalculator {
    IndexCalculator::new(CalculatorConfig::default())
}

pub(super) fn weighted_calculator() -> IndexCalculator {
    IndexCalculator::new(CalculatorConfig::with_duration_policy(
        DurationPolicy::Weighted,
    ))
}

pub(super) fn hanke() -> HankeId {
    HankeId("HAI24-7".to_string())
}

pub(super) fn work_area_id(suffix: &str) -> WorkAreaId {
    WorkAreaId(format!("HAI24-7/{suffix}"))
}

pub(super) fn work_area(suffix: &str, offset: f64, nuisance: DeclaredNuisance) -> WorkArea {
    WorkArea::new(
        work_area_id(suffix),
        hanke(),
        Some(geometry_at(offset)),
        nuisance,
    )
}

/// Resolver answering by the western edge of the geometry, with empty facts elsewhere.
#[derive(Default)]
pub(super) struct MappedResolver {
    by_offset: HashMap<i64, SpatialFacts>,
    calls: AtomicUsize,
}

impl MappedResolver {
    pub(super) fn with(mut self, offset: f64, facts: SpatialFacts) -> Self {
        self.by_offset.insert(offset as i64, facts);
        self
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SpatialFactResolver for MappedResolver {
    fn resolve(&self, geometry: &WorkAreaGeometry) -> Result<SpatialFacts, ResolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let offset = geometry
            .polygons()
            .bounding_rect()
            .map_or(0, |rect| (rect.min().x - ORIGIN_X) as i64);
        Ok(self.by_offset.get(&offset).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub(super) struct UnavailableResolver;

impl SpatialFactResolver for UnavailableResolver {
    fn resolve(&self, _geometry: &WorkAreaGeometry) -> Result<SpatialFacts, ResolverError> {
        Err(ResolverError::Unavailable(
            "reference database connection refused".to_string(),
        ))
    }
}

/// Repository that replaces the declared nuisance right before the result is written,
/// imitating an edit that lands while a calculation is running.
#[derive(Default)]
pub(super) struct EditingRepository {
    pub(super) inner: InMemoryWorkAreaRepository,
}

impl WorkAreaRepository for EditingRepository {
    fn fetch(&self, id: &WorkAreaId) -> Result<Option<WorkArea>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn work_areas_of(&self, hanke_id: &HankeId) -> Result<Vec<WorkArea>, RepositoryError> {
        self.inner.work_areas_of(hanke_id)
    }

    fn store_result(
        &self,
        id: &WorkAreaId,
        expected_revision: u64,
        result: TormaystarkasteluResult,
    ) -> Result<WorkArea, RepositoryError> {
        self.inner.replace_nuisance(id, one_lane_nuisance())?;
        self.inner.store_result(id, expected_revision, result)
    }
}

pub(super) fn service(
    resolver: MappedResolver,
) -> (
    TormaystarkasteluService<MappedResolver, InMemoryWorkAreaRepository>,
    Arc<MappedResolver>,
    Arc<InMemoryWorkAreaRepository>,
) {
    let resolver = Arc::new(resolver);
    let repository = Arc::new(InMemoryWorkAreaRepository::default());
    let service = TormaystarkasteluService::new(
        resolver.clone(),
        repository.clone(),
        CalculatorConfig::default(),
    );
    (service, resolver, repository)
}
