use std::fs;
use std::path::Path;

use geojson::GeoJson;
use haitaton_tormays::error::AppError;
use haitaton_tormays::tormaystarkastelu::{
    DeclaredNuisance, DurationPolicy, GeometryError, HankeId, InMemoryWorkAreaRepository,
    ReferenceLayers, TormaystarkasteluError, WorkArea, WorkAreaGeometry, WorkAreaId,
};
use serde::Deserialize;

/// One work area as read from the command-line input file.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WorkAreaInput {
    pub(crate) id: WorkAreaId,
    /// GeoJSON geometry, feature or feature collection with a named `crs` member.
    #[serde(default)]
    pub(crate) geometry: Option<GeoJson>,
    pub(crate) nuisance: DeclaredNuisance,
}

impl WorkAreaInput {
    pub(crate) fn work_area_geometry(&self) -> Result<Option<WorkAreaGeometry>, GeometryError> {
        self.geometry
            .as_ref()
            .map(WorkAreaGeometry::from_geojson)
            .transpose()
    }

    pub(crate) fn into_work_area(self, hanke_id: &HankeId) -> Result<WorkArea, GeometryError> {
        let geometry = self.work_area_geometry()?;
        Ok(WorkArea::new(
            self.id,
            hanke_id.clone(),
            geometry,
            self.nuisance,
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ProjectInput {
    pub(crate) hanke_id: HankeId,
    pub(crate) work_areas: Vec<WorkAreaInput>,
}

pub(crate) fn parse_duration_policy(raw: &str) -> Result<DurationPolicy, String> {
    DurationPolicy::from_label(raw).ok_or_else(|| {
        format!("unknown duration policy '{raw}' (expected report_only or weighted)")
    })
}

pub(crate) fn load_reference_layers(path: &Path) -> Result<ReferenceLayers, AppError> {
    let source = fs::read_to_string(path)?;
    Ok(ReferenceLayers::from_geojson_str(&source)?)
}

pub(crate) fn read_work_area(path: &Path) -> Result<WorkAreaInput, AppError> {
    let source = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&source)?)
}

pub(crate) fn read_project(path: &Path) -> Result<ProjectInput, AppError> {
    let source = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&source)?)
}

/// Loads the given work areas into a fresh process-local repository.
pub(crate) fn seed_repository(
    hanke_id: &HankeId,
    work_areas: Vec<WorkAreaInput>,
) -> Result<InMemoryWorkAreaRepository, AppError> {
    let repository = InMemoryWorkAreaRepository::default();
    for input in work_areas {
        let work_area = input.into_work_area(hanke_id)?;
        repository
            .insert(work_area)
            .map_err(TormaystarkasteluError::from)?;
    }
    Ok(repository)
}
