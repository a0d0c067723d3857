use std::sync::Arc;

use tracing::{debug, info, warn};

use super::aggregate::{summarize, AreaResult, HankeSummary};
use super::calculator::{CalculationError, CalculatorConfig, IndexCalculator};
use super::classification::UnrecognizedClassificationCode;
use super::domain::{HankeId, WorkAreaId};
use super::geometry::{Crs, WorkAreaGeometry};
use super::nuisance::{DeclaredNuisance, NuisanceValidationError};
use super::repository::{RepositoryError, WorkArea, WorkAreaRepository};
use super::resolver::{ResolverError, SpatialFactResolver};
use super::result::TormaystarkasteluResult;

/// Orchestrates resolve, classify, calculate and persist for work areas and projects.
pub struct TormaystarkasteluService<R, W> {
    resolver: Arc<R>,
    repository: Arc<W>,
    calculator: Arc<IndexCalculator>,
}

impl<R, W> TormaystarkasteluService<R, W>
where
    R: SpatialFactResolver + 'static,
    W: WorkAreaRepository + 'static,
{
    pub fn new(resolver: Arc<R>, repository: Arc<W>, config: CalculatorConfig) -> Self {
        Self {
            resolver,
            repository,
            calculator: Arc::new(IndexCalculator::new(config)),
        }
    }

    pub fn calculator(&self) -> &IndexCalculator {
        &self.calculator
    }

    /// Recomputes one stored work area and replaces its result.
    ///
    /// The write is rejected with a repository conflict when the work area's inputs were
    /// replaced while the calculation ran.
    pub fn calculate(
        &self,
        work_area_id: &WorkAreaId,
    ) -> Result<TormaystarkasteluResult, TormaystarkasteluError> {
        let work_area = self
            .repository
            .fetch(work_area_id)?
            .ok_or_else(|| TormaystarkasteluError::WorkAreaNotFound(work_area_id.clone()))?;

        info!(
            work_area = %work_area.id,
            revision = work_area.revision,
            "calculating nuisance indices"
        );

        let result = self.compute(&work_area)?;
        let stored = self
            .repository
            .store_result(&work_area.id, work_area.revision, result.clone())?;

        info!(
            work_area = %stored.id,
            perusindeksi = %result.perusindeksi,
            pyorailyindeksi = %result.pyorailyindeksi,
            joukkoliikenneindeksi = %result.joukkoliikenneindeksi,
            liikennehaittaindeksi = %result.liikennehaittaindeksi.indeksi,
            "stored nuisance indices"
        );

        Ok(result)
    }

    /// Calculates an already loaded geometry and declared nuisance without persisting.
    pub fn calculate_for(
        &self,
        geometry: &WorkAreaGeometry,
        nuisance: &DeclaredNuisance,
    ) -> Result<TormaystarkasteluResult, TormaystarkasteluError> {
        nuisance.validate()?;
        let facts = self.resolver.resolve(geometry)?;
        debug!(?facts, "resolved spatial facts");
        Ok(self.calculator.calculate(&facts, nuisance)?)
    }

    /// Recomputes every work area of a project, then aggregates the fresh results.
    pub fn calculate_project(
        &self,
        hanke_id: &HankeId,
    ) -> Result<HankeSummary, TormaystarkasteluError> {
        let work_areas = self.repository.work_areas_of(hanke_id)?;
        if work_areas.is_empty() {
            return Err(TormaystarkasteluError::EmptyProject(hanke_id.clone()));
        }

        for work_area in &work_areas {
            self.calculate(&work_area.id)?;
        }

        self.project_summary(hanke_id)
    }

    /// Aggregates the latest stored results without recomputing anything.
    pub fn project_summary(
        &self,
        hanke_id: &HankeId,
    ) -> Result<HankeSummary, TormaystarkasteluError> {
        let work_areas = self.repository.work_areas_of(hanke_id)?;

        let mut areas = Vec::with_capacity(work_areas.len());
        for work_area in &work_areas {
            let result = work_area
                .result
                .as_ref()
                .ok_or_else(|| TormaystarkasteluError::NotCalculated(work_area.id.clone()))?;
            areas.push(AreaResult {
                work_area: &work_area.id,
                result,
                stale: work_area.is_stale(),
            });
        }

        let summary = summarize(hanke_id, &areas)
            .ok_or_else(|| TormaystarkasteluError::EmptyProject(hanke_id.clone()))?;

        if summary.is_current() {
            info!(
                hanke = %hanke_id,
                work_areas = summary.work_areas.len(),
                "aggregated project indices"
            );
        } else {
            warn!(
                hanke = %hanke_id,
                stale = summary.stale_work_areas.len(),
                "aggregated project indices include stale work areas"
            );
        }

        Ok(summary)
    }

    fn compute(
        &self,
        work_area: &WorkArea,
    ) -> Result<TormaystarkasteluResult, TormaystarkasteluError> {
        work_area.nuisance.validate()?;
        let geometry = work_area
            .geometry
            .as_ref()
            .ok_or_else(|| TormaystarkasteluError::MissingGeometry(work_area.id.clone()))?;

        self.calculate_for(geometry, &work_area.nuisance)
            .inspect_err(|err| {
                warn!(work_area = %work_area.id, error = %err, "nuisance index calculation failed");
            })
    }
}

/// Error raised by the calculation service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TormaystarkasteluError {
    #[error("work area {0} has no geometry; cannot calculate nuisance indices")]
    MissingGeometry(WorkAreaId),
    #[error(transparent)]
    UnrecognizedClassificationCode(#[from] UnrecognizedClassificationCode),
    #[error("invalid declared nuisance: {0}")]
    InvalidDeclaredNuisance(#[from] NuisanceValidationError),
    #[error("spatial fact resolver unavailable: {0}")]
    ResolverUnavailable(String),
    #[error("geometry is expressed in {found} but the reference layers use {expected}")]
    CrsMismatch { expected: Crs, found: Crs },
    #[error("work area {0} not found")]
    WorkAreaNotFound(WorkAreaId),
    #[error("project {0} has no work areas")]
    EmptyProject(HankeId),
    #[error("work area {0} has not been calculated yet")]
    NotCalculated(WorkAreaId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl TormaystarkasteluError {
    /// True for transient collaborator failures.
    pub const fn is_retryable(&self) -> bool {
        match self {
            TormaystarkasteluError::ResolverUnavailable(_) => true,
            TormaystarkasteluError::Repository(err) => err.is_retryable(),
            _ => false,
        }
    }
}

impl From<ResolverError> for TormaystarkasteluError {
    fn from(value: ResolverError) -> Self {
        match value {
            ResolverError::Unavailable(reason) => Self::ResolverUnavailable(reason),
            ResolverError::CrsMismatch { expected, found } => Self::CrsMismatch { expected, found },
        }
    }
}

impl From<CalculationError> for TormaystarkasteluError {
    fn from(value: CalculationError) -> Self {
        match value {
            CalculationError::InvalidDeclaredNuisance(err) => Self::InvalidDeclaredNuisance(err),
            CalculationError::UnrecognizedClassificationCode(err) => {
                Self::UnrecognizedClassificationCode(err)
            }
        }
    }
}
