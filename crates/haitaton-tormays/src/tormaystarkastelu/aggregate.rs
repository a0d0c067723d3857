use serde::{Deserialize, Serialize};

use super::domain::{HankeId, WorkAreaId};
use super::result::{IndeksiTyyppi, IndexValue, TormaystarkasteluResult};

/// Category maximum and the work area that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoverningIndex {
    pub indeksi: IndexValue,
    pub work_area: WorkAreaId,
}

/// Project-level representative indices: the worst work area governs each category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HankeSummary {
    pub hanke_id: HankeId,
    pub perusindeksi: GoverningIndex,
    pub pyorailyindeksi: GoverningIndex,
    pub joukkoliikenneindeksi: GoverningIndex,
    pub liikennehaittaindeksi: GoverningIndex,
    pub liikennehaitta_tyyppi: IndeksiTyyppi,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muut_haitat_indeksi: Option<GoverningIndex>,
    pub work_areas: Vec<WorkAreaId>,
    /// Work areas whose inputs changed after their result was computed.
    pub stale_work_areas: Vec<WorkAreaId>,
}

impl HankeSummary {
    pub fn is_current(&self) -> bool {
        self.stale_work_areas.is_empty()
    }
}

/// Latest result of one work area as input to [`summarize`].
#[derive(Debug, Clone, Copy)]
pub struct AreaResult<'a> {
    pub work_area: &'a WorkAreaId,
    pub result: &'a TormaystarkasteluResult,
    pub stale: bool,
}

/// Per-category maximum over the given results. Ties keep the earliest work area.
/// Returns `None` for an empty slice.
pub fn summarize(hanke_id: &HankeId, areas: &[AreaResult<'_>]) -> Option<HankeSummary> {
    let first = areas.first()?;

    let governing = |index_of: &dyn Fn(&TormaystarkasteluResult) -> IndexValue| {
        let mut best = GoverningIndex {
            indeksi: index_of(first.result),
            work_area: first.work_area.clone(),
        };
        for area in &areas[1..] {
            let candidate = index_of(area.result);
            if candidate > best.indeksi {
                best = GoverningIndex {
                    indeksi: candidate,
                    work_area: area.work_area.clone(),
                };
            }
        }
        best
    };

    let liikennehaittaindeksi = governing(&|result| result.liikennehaittaindeksi.indeksi);
    let liikennehaitta_tyyppi = areas
        .iter()
        .find(|area| area.work_area == &liikennehaittaindeksi.work_area)
        .map_or(IndeksiTyyppi::Perusindeksi, |area| {
            area.result.liikennehaittaindeksi.tyyppi
        });

    let mut muut_haitat_indeksi: Option<GoverningIndex> = None;
    for area in areas {
        if let Some(indeksi) = area.result.muut_haitat_indeksi {
            if muut_haitat_indeksi
                .as_ref()
                .map_or(true, |best| indeksi > best.indeksi)
            {
                muut_haitat_indeksi = Some(GoverningIndex {
                    indeksi,
                    work_area: area.work_area.clone(),
                });
            }
        }
    }

    Some(HankeSummary {
        hanke_id: hanke_id.clone(),
        perusindeksi: governing(&|result| result.perusindeksi),
        pyorailyindeksi: governing(&|result| result.pyorailyindeksi),
        joukkoliikenneindeksi: governing(&|result| result.joukkoliikenneindeksi),
        liikennehaittaindeksi,
        liikennehaitta_tyyppi,
        muut_haitat_indeksi,
        work_areas: areas.iter().map(|area| area.work_area.clone()).collect(),
        stale_work_areas: areas
            .iter()
            .filter(|area| area.stale)
            .map(|area| area.work_area.clone())
            .collect(),
    })
}
