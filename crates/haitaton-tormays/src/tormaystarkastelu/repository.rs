use serde::{Deserialize, Serialize};

use super::domain::{HankeId, WorkAreaId};
use super::geometry::WorkAreaGeometry;
use super::nuisance::DeclaredNuisance;
use super::result::TormaystarkasteluResult;

/// Whether the stored result reflects the current inputs of a work area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationState {
    Stale,
    Computed,
}

impl CalculationState {
    pub const fn label(self) -> &'static str {
        match self {
            CalculationState::Stale => "stale",
            CalculationState::Computed => "computed",
        }
    }
}

/// Repository record of one work area and its latest result.
///
/// `revision` moves on every input replacement, which is how a result computed against
/// superseded inputs is detected on write.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkArea {
    pub id: WorkAreaId,
    pub hanke_id: HankeId,
    pub geometry: Option<WorkAreaGeometry>,
    pub nuisance: DeclaredNuisance,
    pub revision: u64,
    pub state: CalculationState,
    pub result: Option<TormaystarkasteluResult>,
}

impl WorkArea {
    pub fn new(
        id: WorkAreaId,
        hanke_id: HankeId,
        geometry: Option<WorkAreaGeometry>,
        nuisance: DeclaredNuisance,
    ) -> Self {
        Self {
            id,
            hanke_id,
            geometry,
            nuisance,
            revision: 0,
            state: CalculationState::Stale,
            result: None,
        }
    }

    pub fn replace_geometry(&mut self, geometry: Option<WorkAreaGeometry>) {
        self.geometry = geometry;
        self.mark_stale();
    }

    pub fn replace_nuisance(&mut self, nuisance: DeclaredNuisance) {
        self.nuisance = nuisance;
        self.mark_stale();
    }

    /// Replaces the previous result wholesale.
    pub fn record_result(&mut self, result: TormaystarkasteluResult) {
        self.result = Some(result);
        self.state = CalculationState::Computed;
    }

    pub fn is_stale(&self) -> bool {
        self.state == CalculationState::Stale
    }

    fn mark_stale(&mut self) {
        self.revision += 1;
        self.state = CalculationState::Stale;
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait WorkAreaRepository: Send + Sync {
    fn fetch(&self, id: &WorkAreaId) -> Result<Option<WorkArea>, RepositoryError>;

    /// Work areas of a project ordered by identifier.
    fn work_areas_of(&self, hanke_id: &HankeId) -> Result<Vec<WorkArea>, RepositoryError>;

    /// Stores `result` only if the work area is still at `expected_revision`, returning the
    /// updated record.
    fn store_result(
        &self,
        id: &WorkAreaId,
        expected_revision: u64,
        result: TormaystarkasteluResult,
    ) -> Result<WorkArea, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error(
        "work area {id} changed during calculation (expected revision {expected}, found {found})"
    )]
    Conflict {
        id: WorkAreaId,
        expected: u64,
        found: u64,
    },
    #[error("work area {0} not found")]
    NotFound(WorkAreaId),
    #[error("work area {0} already exists")]
    Duplicate(WorkAreaId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            RepositoryError::Conflict { .. } | RepositoryError::Unavailable(_)
        )
    }
}
