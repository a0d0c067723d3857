use crate::infra::{load_reference_layers, read_project, read_work_area, seed_repository};
use crate::render::{render_project, render_work_area, AreaReport, OutputFormat};
use clap::Args;
use haitaton_tormays::config::CalculationConfig;
use haitaton_tormays::error::AppError;
use haitaton_tormays::tormaystarkastelu::{
    CalculatorConfig, InMemoryWorkAreaRepository, TormaystarkasteluError,
    TormaystarkasteluService, WorkArea, WorkAreaRepository,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct CalculateArgs {
    /// Reference-layer GeoJSON (defaults to TORMAYS_REFERENCE_LAYERS)
    #[arg(long)]
    pub(crate) layers: Option<PathBuf>,
    /// Work-area JSON with id, geometry and declared nuisance
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct ProjectArgs {
    /// Reference-layer GeoJSON (defaults to TORMAYS_REFERENCE_LAYERS)
    #[arg(long)]
    pub(crate) layers: Option<PathBuf>,
    /// Project JSON with hanke_id and its work areas
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

fn calculator_config(calculation: &CalculationConfig) -> CalculatorConfig {
    CalculatorConfig::with_duration_policy(calculation.duration_policy)
}

pub(crate) fn run_calculate(
    args: CalculateArgs,
    calculation: &CalculationConfig,
) -> Result<(), AppError> {
    let CalculateArgs {
        layers,
        input,
        format,
    } = args;

    let layers = load_reference_layers(&calculation.reference_layers_or(layers)?)?;
    let input = read_work_area(&input)?;
    let geometry = input
        .work_area_geometry()?
        .ok_or_else(|| TormaystarkasteluError::MissingGeometry(input.id.clone()))?;

    let service = TormaystarkasteluService::new(
        Arc::new(layers),
        Arc::new(InMemoryWorkAreaRepository::default()),
        calculator_config(calculation),
    );
    let result = service.calculate_for(&geometry, &input.nuisance)?;
    info!(
        work_area = %input.id,
        liikennehaittaindeksi = %result.liikennehaittaindeksi.indeksi,
        "calculated work area"
    );

    let report = AreaReport {
        work_area: &input.id,
        result: &result,
    };
    render_work_area(&mut io::stdout().lock(), &report, format)
}

pub(crate) fn run_project(
    args: ProjectArgs,
    calculation: &CalculationConfig,
) -> Result<(), AppError> {
    let ProjectArgs {
        layers,
        input,
        format,
    } = args;

    let layers = load_reference_layers(&calculation.reference_layers_or(layers)?)?;
    let project = read_project(&input)?;
    info!(
        hanke = %project.hanke_id,
        work_areas = project.work_areas.len(),
        "loaded project input"
    );

    let hanke_id = project.hanke_id;
    let repository = Arc::new(seed_repository(&hanke_id, project.work_areas)?);
    let service = TormaystarkasteluService::new(
        Arc::new(layers),
        repository.clone(),
        calculator_config(calculation),
    );
    let summary = service.calculate_project(&hanke_id)?;

    let work_areas: Vec<WorkArea> = repository
        .work_areas_of(&hanke_id)
        .map_err(TormaystarkasteluError::from)?;
    let reports: Vec<AreaReport<'_>> = work_areas
        .iter()
        .filter_map(|work_area| {
            work_area.result.as_ref().map(|result| AreaReport {
                work_area: &work_area.id,
                result,
            })
        })
        .collect();

    render_project(&mut io::stdout().lock(), &summary, &reports, format)
}
