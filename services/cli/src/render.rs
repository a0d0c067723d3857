use std::io::Write;

use clap::ValueEnum;
use haitaton_tormays::error::AppError;
use haitaton_tormays::tormaystarkastelu::{
    GoverningIndex, HankeSummary, IndexCategory, TormaystarkasteluResult, WorkAreaId,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Latest result of one work area as rendered by the project command.
#[derive(Debug, Serialize)]
pub(crate) struct AreaReport<'a> {
    pub(crate) work_area: &'a WorkAreaId,
    pub(crate) result: &'a TormaystarkasteluResult,
}

#[derive(Debug, Serialize)]
struct ProjectReport<'a> {
    summary: &'a HankeSummary,
    work_areas: &'a [AreaReport<'a>],
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    work_area: &'a str,
    perusindeksi: String,
    pyorailyindeksi: String,
    joukkoliikenneindeksi: String,
    liikennehaittaindeksi: String,
    liikennehaitta_tyyppi: &'static str,
    muut_haitat_indeksi: String,
    duration_days: u32,
    duration_band: &'static str,
}

impl<'a> CsvRow<'a> {
    fn from_report(report: &AreaReport<'a>) -> Self {
        let result = report.result;
        Self {
            work_area: &report.work_area.0,
            perusindeksi: result.perusindeksi.to_string(),
            pyorailyindeksi: result.pyorailyindeksi.to_string(),
            joukkoliikenneindeksi: result.joukkoliikenneindeksi.to_string(),
            liikennehaittaindeksi: result.liikennehaittaindeksi.indeksi.to_string(),
            liikennehaitta_tyyppi: result.liikennehaittaindeksi.tyyppi.label(),
            muut_haitat_indeksi: result
                .muut_haitat_indeksi
                .map(|value| value.to_string())
                .unwrap_or_default(),
            duration_days: result.luokittelu.duration_days,
            duration_band: result.luokittelu.duration_band.label(),
        }
    }
}

pub(crate) fn render_work_area<W: Write>(
    out: &mut W,
    report: &AreaReport<'_>,
    format: OutputFormat,
) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
        OutputFormat::Text => write_result_text(out, report)?,
        OutputFormat::Csv => write_csv(out, std::slice::from_ref(report))?,
    }
    Ok(())
}

pub(crate) fn render_project<W: Write>(
    out: &mut W,
    summary: &HankeSummary,
    work_areas: &[AreaReport<'_>],
    format: OutputFormat,
) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &ProjectReport { summary, work_areas })?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            write_summary_text(out, summary)?;
            for report in work_areas {
                writeln!(out)?;
                write_result_text(out, report)?;
            }
        }
        OutputFormat::Csv => write_csv(out, work_areas)?,
    }
    Ok(())
}

fn write_csv<W: Write>(out: &mut W, reports: &[AreaReport<'_>]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    for report in reports {
        writer.serialize(CsvRow::from_report(report))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_summary_text<W: Write>(out: &mut W, summary: &HankeSummary) -> std::io::Result<()> {
    writeln!(
        out,
        "Project {} ({} work areas)",
        summary.hanke_id,
        summary.work_areas.len()
    )?;
    let governing = |out: &mut W, name: &str, index: &GoverningIndex| {
        writeln!(out, "  {:<24}{} ({})", name, index.indeksi, index.work_area)
    };
    governing(out, IndexCategory::Perusindeksi.label(), &summary.perusindeksi)?;
    governing(out, IndexCategory::Pyorailyindeksi.label(), &summary.pyorailyindeksi)?;
    governing(
        out,
        IndexCategory::Joukkoliikenneindeksi.label(),
        &summary.joukkoliikenneindeksi,
    )?;
    writeln!(
        out,
        "  {:<24}{} ({}, {})",
        IndexCategory::Liikennehaittaindeksi.label(),
        summary.liikennehaittaindeksi.indeksi,
        summary.liikennehaitta_tyyppi.label(),
        summary.liikennehaittaindeksi.work_area
    )?;
    if let Some(muut_haitat) = &summary.muut_haitat_indeksi {
        governing(out, IndexCategory::MuutHaitat.label(), muut_haitat)?;
    }
    if !summary.is_current() {
        let stale: Vec<_> = summary
            .stale_work_areas
            .iter()
            .map(|id| id.to_string())
            .collect();
        writeln!(out, "  stale work areas: {}", stale.join(", "))?;
    }
    Ok(())
}

fn write_result_text<W: Write>(out: &mut W, report: &AreaReport<'_>) -> std::io::Result<()> {
    let result = report.result;
    writeln!(out, "Work area {}", report.work_area)?;
    writeln!(out, "  {:<24}{}", "perusindeksi", result.perusindeksi)?;
    writeln!(out, "  {:<24}{}", "pyorailyindeksi", result.pyorailyindeksi)?;
    writeln!(out, "  {:<24}{}", "joukkoliikenneindeksi", result.joukkoliikenneindeksi)?;
    writeln!(
        out,
        "  {:<24}{} ({})",
        "liikennehaittaindeksi",
        result.liikennehaittaindeksi.indeksi,
        result.liikennehaittaindeksi.tyyppi.label()
    )?;
    if let Some(muut_haitat) = result.muut_haitat_indeksi {
        writeln!(out, "  {:<24}{}", "muut_haitat_indeksi", muut_haitat)?;
    }
    writeln!(
        out,
        "  duration: {} day(s), {} (policy {})",
        result.luokittelu.duration_days,
        result.luokittelu.duration_band.label(),
        result.duration_policy.label()
    )?;
    writeln!(out, "  components:")?;
    for component in &result.components {
        writeln!(
            out,
            "    - {}/{:?}: {:.2} ({})",
            component.category.label(),
            component.factor,
            component.points,
            component.notes
        )?;
    }
    Ok(())
}
