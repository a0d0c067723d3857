use super::common::*;
use crate::tormaystarkastelu::aggregate::{summarize, AreaResult};
use crate::tormaystarkastelu::domain::WorkAreaId;
use crate::tormaystarkastelu::nuisance::NuisanceLevel;
use crate::tormaystarkastelu::resolver::SpatialFacts;
use crate::tormaystarkastelu::result::{IndeksiTyyppi, IndexValue, TormaystarkasteluResult};

fn area<'a>(
    work_area: &'a WorkAreaId,
    result: &'a TormaystarkasteluResult,
    stale: bool,
) -> AreaResult<'a> {
    AreaResult {
        work_area,
        result,
        stale,
    }
}

fn calculated(facts: &SpatialFacts) -> TormaystarkasteluResult {
    calculator()
        .calculate(facts, &one_lane_nuisance())
        .expect("valid inputs")
}

#[test]
fn each_category_is_governed_by_its_worst_work_area() {
    let cycling = SpatialFacts {
        priority_cycling_route: true,
        ..SpatialFacts::default()
    };
    let (first, second, third) = (work_area_id("1"), work_area_id("2"), work_area_id("3"));
    let results = [
        calculated(&arterial_facts()),
        calculated(&transit_facts()),
        calculated(&cycling),
    ];
    let areas = [
        area(&first, &results[0], false),
        area(&second, &results[1], false),
        area(&third, &results[2], false),
    ];

    let summary = summarize(&hanke(), &areas).expect("non-empty project");

    assert_eq!(summary.perusindeksi.work_area, first);
    assert_eq!(summary.perusindeksi.indeksi, results[0].perusindeksi);
    assert_eq!(summary.joukkoliikenneindeksi.work_area, second);
    assert_eq!(summary.pyorailyindeksi.work_area, third);
    assert_eq!(summary.liikennehaittaindeksi.indeksi, IndexValue::from_tenths(48));
    assert_eq!(summary.liikennehaitta_tyyppi, IndeksiTyyppi::Joukkoliikenneindeksi);
    assert_eq!(summary.work_areas, vec![first, second, third]);
    assert!(summary.is_current());
}

#[test]
fn ties_keep_the_earliest_work_area() {
    let (first, second) = (work_area_id("1"), work_area_id("2"));
    let result = calculated(&arterial_facts());
    let areas = [
        area(&first, &result, false),
        area(&second, &result, true),
    ];

    let summary = summarize(&hanke(), &areas).expect("non-empty project");

    assert_eq!(summary.perusindeksi.work_area, first);
    assert_eq!(summary.liikennehaittaindeksi.work_area, first);
    assert_eq!(summary.liikennehaitta_tyyppi, IndeksiTyyppi::Perusindeksi);
    assert_eq!(summary.stale_work_areas, vec![second]);
    assert!(!summary.is_current());
}

#[test]
fn other_nuisances_are_aggregated_only_when_scored() {
    let id = work_area_id("1");
    let report_only = calculated(&arterial_facts());
    let summary = summarize(
        &hanke(),
        &[area(&id, &report_only, false)],
    )
    .expect("non-empty project");
    assert_eq!(summary.muut_haitat_indeksi, None);

    let mut noisy = one_lane_nuisance();
    noisy.noise = NuisanceLevel::Continuous;
    let weighted = weighted_calculator()
        .calculate(&arterial_facts(), &noisy)
        .expect("valid inputs");
    let summary = summarize(
        &hanke(),
        &[area(&id, &weighted, false)],
    )
    .expect("non-empty project");
    let governing = summary.muut_haitat_indeksi.expect("weighted policy scores nuisances");
    assert_eq!(governing.work_area, id);
    assert!(governing.indeksi > IndexValue::ZERO);
}

#[test]
fn empty_input_has_no_summary() {
    assert_eq!(summarize(&hanke(), &[]), None);
}
