use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{HankeId, WorkAreaId};
use super::geometry::WorkAreaGeometry;
use super::nuisance::DeclaredNuisance;
use super::repository::{RepositoryError, WorkArea, WorkAreaRepository};
use super::result::TormaystarkasteluResult;

/// Process-local work-area store used by the command line and by tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryWorkAreaRepository {
    records: Arc<Mutex<BTreeMap<WorkAreaId, WorkArea>>>,
}

impl InMemoryWorkAreaRepository {
    pub fn insert(&self, work_area: WorkArea) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&work_area.id) {
            return Err(RepositoryError::Duplicate(work_area.id));
        }
        guard.insert(work_area.id.clone(), work_area);
        Ok(())
    }

    pub fn replace_geometry(
        &self,
        id: &WorkAreaId,
        geometry: Option<WorkAreaGeometry>,
    ) -> Result<WorkArea, RepositoryError> {
        self.modify(id, |work_area| work_area.replace_geometry(geometry))
    }

    pub fn replace_nuisance(
        &self,
        id: &WorkAreaId,
        nuisance: DeclaredNuisance,
    ) -> Result<WorkArea, RepositoryError> {
        self.modify(id, |work_area| work_area.replace_nuisance(nuisance))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn modify(
        &self,
        id: &WorkAreaId,
        change: impl FnOnce(&mut WorkArea),
    ) -> Result<WorkArea, RepositoryError> {
        let mut guard = self.lock()?;
        let work_area = guard
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        change(work_area);
        Ok(work_area.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<WorkAreaId, WorkArea>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("work area store poisoned".to_string()))
    }
}

impl WorkAreaRepository for InMemoryWorkAreaRepository {
    fn fetch(&self, id: &WorkAreaId) -> Result<Option<WorkArea>, RepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn work_areas_of(&self, hanke_id: &HankeId) -> Result<Vec<WorkArea>, RepositoryError> {
        Ok(self
            .lock()?
            .values()
            .filter(|work_area| &work_area.hanke_id == hanke_id)
            .cloned()
            .collect())
    }

    fn store_result(
        &self,
        id: &WorkAreaId,
        expected_revision: u64,
        result: TormaystarkasteluResult,
    ) -> Result<WorkArea, RepositoryError> {
        let mut guard = self.lock()?;
        let work_area = guard
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        if work_area.revision != expected_revision {
            return Err(RepositoryError::Conflict {
                id: id.clone(),
                expected: expected_revision,
                found: work_area.revision,
            });
        }
        work_area.record_result(result);
        Ok(work_area.clone())
    }
}
