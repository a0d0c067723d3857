use std::sync::Arc;

use super::common::*;
use crate::tormaystarkastelu::calculator::CalculatorConfig;
use crate::tormaystarkastelu::domain::{HankeId, WorkAreaId};
use crate::tormaystarkastelu::memory::InMemoryWorkAreaRepository;
use crate::tormaystarkastelu::nuisance::NuisanceValidationError;
use crate::tormaystarkastelu::repository::{
    CalculationState, RepositoryError, WorkArea, WorkAreaRepository,
};
use crate::tormaystarkastelu::resolver::SpatialFacts;
use crate::tormaystarkastelu::result::{IndeksiTyyppi, IndexValue, TormaystarkasteluResult};
use crate::tormaystarkastelu::service::{TormaystarkasteluError, TormaystarkasteluService};

fn stored(repository: &InMemoryWorkAreaRepository, id: &WorkAreaId) -> WorkArea {
    repository
        .fetch(id)
        .expect("fetch succeeds")
        .expect("work area present")
}

#[test]
fn calculate_stores_result_and_marks_area_computed() {
    let (service, resolver, repository) =
        service(MappedResolver::default().with(0.0, arterial_facts()));
    repository
        .insert(work_area("1", 0.0, one_lane_nuisance()))
        .expect("insert succeeds");

    let result = service.calculate(&work_area_id("1")).expect("calculates");

    assert_eq!(result.perusindeksi, IndexValue::from_tenths(40));
    assert_eq!(resolver.calls(), 1);
    let record = stored(&repository, &work_area_id("1"));
    assert_eq!(record.state, CalculationState::Computed);
    assert_eq!(record.result, Some(result));
}

#[test]
fn recalculation_of_unchanged_inputs_is_identical() {
    let (service, _, repository) = service(MappedResolver::default().with(0.0, arterial_facts()));
    repository
        .insert(work_area("1", 0.0, one_lane_nuisance()))
        .expect("insert succeeds");

    let first = service.calculate(&work_area_id("1")).expect("calculates");
    let second = service.calculate(&work_area_id("1")).expect("recalculates");

    assert_eq!(first, second);
    assert_eq!(stored(&repository, &work_area_id("1")).result, Some(second));
}

#[test]
fn missing_geometry_fails_fast_and_stores_nothing() {
    let (service, resolver, repository) = service(MappedResolver::default());
    let mut area = work_area("1", 0.0, quiet_nuisance());
    area.geometry = None;
    repository.insert(area).expect("insert succeeds");

    match service.calculate(&work_area_id("1")) {
        Err(TormaystarkasteluError::MissingGeometry(id)) => assert_eq!(id, work_area_id("1")),
        other => panic!("expected missing geometry, got {other:?}"),
    }
    assert_eq!(resolver.calls(), 0);
    let record = stored(&repository, &work_area_id("1"));
    assert_eq!(record.result, None);
    assert_eq!(record.state, CalculationState::Stale);
}

#[test]
fn invalid_nuisance_is_rejected_before_resolution() {
    let (service, resolver, repository) = service(MappedResolver::default());
    let mut declared = quiet_nuisance();
    declared.start_date = date(2024, 6, 2);
    declared.end_date = date(2024, 6, 1);
    repository
        .insert(work_area("1", 0.0, declared))
        .expect("insert succeeds");

    match service.calculate(&work_area_id("1")) {
        Err(TormaystarkasteluError::InvalidDeclaredNuisance(
            NuisanceValidationError::EndBeforeStart { .. },
        )) => {}
        other => panic!("expected invalid nuisance, got {other:?}"),
    }
    assert_eq!(resolver.calls(), 0);
}

#[test]
fn unavailable_resolver_is_propagated_as_retryable() {
    let repository = Arc::new(InMemoryWorkAreaRepository::default());
    repository
        .insert(work_area("1", 0.0, quiet_nuisance()))
        .expect("insert succeeds");
    let service = TormaystarkasteluService::new(
        Arc::new(UnavailableResolver),
        repository.clone(),
        CalculatorConfig::default(),
    );

    let err = service
        .calculate(&work_area_id("1"))
        .expect_err("resolver is down");

    assert!(matches!(err, TormaystarkasteluError::ResolverUnavailable(_)));
    assert!(err.is_retryable());
    assert_eq!(stored(&repository, &work_area_id("1")).result, None);
}

#[test]
fn unrecognized_code_is_surfaced_and_previous_result_kept() {
    let facts = SpatialFacts {
        street_classes: codes(&["Kävelykatu"]),
        ..SpatialFacts::default()
    };
    let (service, _, repository) = service(
        MappedResolver::default()
            .with(0.0, arterial_facts())
            .with(500.0, facts),
    );
    repository
        .insert(work_area("1", 0.0, one_lane_nuisance()))
        .expect("insert succeeds");
    let previous = service.calculate(&work_area_id("1")).expect("calculates");

    repository
        .replace_geometry(&work_area_id("1"), Some(geometry_at(500.0)))
        .expect("geometry replaced");
    let err = service
        .calculate(&work_area_id("1"))
        .expect_err("unknown street class");

    assert!(matches!(
        err,
        TormaystarkasteluError::UnrecognizedClassificationCode(_)
    ));
    assert!(!err.is_retryable());
    let record = stored(&repository, &work_area_id("1"));
    assert_eq!(record.state, CalculationState::Stale);
    assert_eq!(record.result, Some(previous));
}

#[test]
fn edit_during_calculation_rejects_the_stale_write() {
    let repository = Arc::new(EditingRepository::default());
    repository
        .inner
        .insert(work_area("1", 0.0, quiet_nuisance()))
        .expect("insert succeeds");
    let service = TormaystarkasteluService::new(
        Arc::new(MappedResolver::default()),
        repository.clone(),
        CalculatorConfig::default(),
    );

    match service.calculate(&work_area_id("1")) {
        Err(TormaystarkasteluError::Repository(RepositoryError::Conflict {
            expected, found, ..
        })) => {
            assert_eq!(expected, 0);
            assert_eq!(found, 1);
        }
        other => panic!("expected conflict, got {other:?}"),
    }

    let record = stored(&repository.inner, &work_area_id("1"));
    assert_eq!(record.result, None);
    assert!(record.is_stale());
}

#[test]
fn replacing_inputs_marks_area_stale_until_recalculated() {
    let (service, _, repository) = service(MappedResolver::default().with(0.0, arterial_facts()));
    repository
        .insert(work_area("1", 0.0, quiet_nuisance()))
        .expect("insert succeeds");
    service.calculate(&work_area_id("1")).expect("calculates");

    let edited = repository
        .replace_nuisance(&work_area_id("1"), one_lane_nuisance())
        .expect("nuisance replaced");
    assert_eq!(edited.state, CalculationState::Stale);
    assert_eq!(edited.revision, 1);

    let summary = service.project_summary(&hanke()).expect("summary");
    assert_eq!(summary.stale_work_areas, vec![work_area_id("1")]);

    let result = service.calculate(&work_area_id("1")).expect("recalculates");
    assert_eq!(result.perusindeksi, IndexValue::from_tenths(40));
    let summary = service.project_summary(&hanke()).expect("summary");
    assert!(summary.is_current());
}

#[test]
fn calculate_for_does_not_touch_the_repository() {
    let (service, resolver, repository) =
        service(MappedResolver::default().with(0.0, transit_facts()));

    let result = service
        .calculate_for(&geometry_at(0.0), &quiet_nuisance())
        .expect("calculates");

    assert_eq!(result.liikennehaittaindeksi.tyyppi, IndeksiTyyppi::Joukkoliikenneindeksi);
    assert_eq!(resolver.calls(), 1);
    assert!(repository.is_empty());
}

#[test]
fn calculate_reports_unknown_work_area() {
    let (service, _, _) = service(MappedResolver::default());

    match service.calculate(&work_area_id("missing")) {
        Err(TormaystarkasteluError::WorkAreaNotFound(id)) => {
            assert_eq!(id, work_area_id("missing"))
        }
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn project_maximum_is_taken_per_category() {
    let cycling = SpatialFacts {
        priority_cycling_route: true,
        ..SpatialFacts::default()
    };
    let (service, _, repository) = service(
        MappedResolver::default()
            .with(0.0, arterial_facts())
            .with(100.0, transit_facts())
            .with(200.0, cycling),
    );
    repository
        .insert(work_area("1", 0.0, one_lane_nuisance()))
        .expect("insert succeeds");
    repository
        .insert(work_area("2", 100.0, quiet_nuisance()))
        .expect("insert succeeds");
    repository
        .insert(work_area("3", 200.0, one_lane_nuisance()))
        .expect("insert succeeds");

    let summary = service.calculate_project(&hanke()).expect("project calculates");

    let results: Vec<_> = ["1", "2", "3"]
        .iter()
        .map(|suffix| {
            stored(&repository, &work_area_id(suffix))
                .result
                .expect("calculated")
        })
        .collect();
    let max_of = |index: fn(&TormaystarkasteluResult) -> IndexValue| {
        results.iter().map(index).max().expect("three results")
    };

    assert_eq!(summary.perusindeksi.indeksi, max_of(|r| r.perusindeksi));
    assert_eq!(summary.perusindeksi.work_area, work_area_id("1"));
    assert_eq!(summary.joukkoliikenneindeksi.indeksi, max_of(|r| r.joukkoliikenneindeksi));
    assert_eq!(summary.joukkoliikenneindeksi.work_area, work_area_id("2"));
    assert_eq!(summary.pyorailyindeksi.indeksi, max_of(|r| r.pyorailyindeksi));
    assert_eq!(summary.pyorailyindeksi.work_area, work_area_id("3"));
    assert_eq!(
        summary.liikennehaittaindeksi.indeksi,
        max_of(|r| r.liikennehaittaindeksi.indeksi)
    );
    assert_eq!(summary.liikennehaittaindeksi.work_area, work_area_id("2"));
    assert_eq!(summary.liikennehaitta_tyyppi, IndeksiTyyppi::Joukkoliikenneindeksi);
    assert_eq!(summary.work_areas.len(), 3);
    assert!(summary.is_current());
}

#[test]
fn project_summary_never_recomputes() {
    let (service, resolver, repository) = service(MappedResolver::default());
    repository
        .insert(work_area("1", 0.0, quiet_nuisance()))
        .expect("insert succeeds");

    match service.project_summary(&hanke()) {
        Err(TormaystarkasteluError::NotCalculated(id)) => assert_eq!(id, work_area_id("1")),
        other => panic!("expected not calculated, got {other:?}"),
    }
    assert_eq!(resolver.calls(), 0);
}

#[test]
fn empty_project_is_an_error() {
    let (service, _, _) = service(MappedResolver::default());
    let unknown = HankeId("HAI24-404".to_string());

    assert!(matches!(
        service.project_summary(&unknown),
        Err(TormaystarkasteluError::EmptyProject(_))
    ));
    assert!(matches!(
        service.calculate_project(&unknown),
        Err(TormaystarkasteluError::EmptyProject(_))
    ));
}
