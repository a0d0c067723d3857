use serde::{Deserialize, Serialize};

use super::super::classification::{
    DurationBand, MAX_STREET_CLASS_BUCKET, MAX_TRAFFIC_VOLUME_BUCKET, MAX_TRAM_LANE_BUCKET,
};
use super::super::nuisance::{LaneImpact, LaneImpactLength, NuisanceLevel};

/// How the declared duration takes part in the calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationPolicy {
    /// Duration is carried into the result for display only.
    #[default]
    ReportOnly,
    /// Duration bands scale the noise, dust and vibration index.
    Weighted,
}

impl DurationPolicy {
    pub const fn label(self) -> &'static str {
        match self {
            DurationPolicy::ReportOnly => "report_only",
            DurationPolicy::Weighted => "weighted",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "report_only" | "report-only" => Some(DurationPolicy::ReportOnly),
            "weighted" => Some(DurationPolicy::Weighted),
            _ => None,
        }
    }
}

/// Fixed weights of the weighted-sum formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexWeights {
    pub street_class: f64,
    pub traffic_volume: f64,
    pub central_business_district: f64,
    pub lane_impact: f64,
    pub lane_impact_length: f64,
    pub priority_cycling_route: f64,
    pub main_cycling_route: f64,
    /// Share added to the cycling route points per lane-impact-length ordinal.
    pub cycling_length_step: f64,
    pub transit_critical_segment: f64,
    pub bus_route: f64,
    pub bus_route_cap: f64,
    pub tram_lane: f64,
    pub noise: f64,
    pub dust: f64,
    pub vibration: f64,
    /// Share of the nuisance severity applied per duration band, counting the first band.
    pub duration_step: f64,
}

impl IndexWeights {
    pub fn standard() -> Self {
        Self {
            street_class: 4.0,
            traffic_volume: 4.0,
            central_business_district: 6.0,
            lane_impact: 2.0,
            lane_impact_length: 2.0,
            priority_cycling_route: 3.0,
            main_cycling_route: 2.0,
            cycling_length_step: 0.25,
            transit_critical_segment: 12.0,
            bus_route: 1.0,
            bus_route_cap: 4.0,
            tram_lane: 1.0,
            noise: 3.0,
            dust: 2.0,
            vibration: 2.0,
            duration_step: 0.25,
        }
    }

    pub(crate) fn perusindeksi_max(&self) -> f64 {
        self.street_class * f64::from(MAX_STREET_CLASS_BUCKET)
            + self.traffic_volume * f64::from(MAX_TRAFFIC_VOLUME_BUCKET)
            + self.central_business_district
            + self.lane_impact * f64::from(LaneImpact::MAX_ORDINAL)
            + self.lane_impact_length * f64::from(LaneImpactLength::MAX_ORDINAL)
    }

    pub(crate) fn cycling_length_factor(&self, length: LaneImpactLength) -> f64 {
        1.0 + self.cycling_length_step * f64::from(length.ordinal())
    }

    pub(crate) fn pyorailyindeksi_max(&self) -> f64 {
        self.priority_cycling_route.max(self.main_cycling_route)
            * self.cycling_length_factor(LaneImpactLength::AtLeast500Metres)
    }

    pub(crate) fn joukkoliikenneindeksi_max(&self) -> f64 {
        self.transit_critical_segment
            + self.bus_route_cap
            + self.tram_lane * f64::from(MAX_TRAM_LANE_BUCKET)
    }

    pub(crate) fn duration_factor(&self, band: DurationBand) -> f64 {
        self.duration_step * f64::from(band.ordinal() + 1)
    }

    pub(crate) fn muut_haitat_max(&self) -> f64 {
        (self.noise + self.dust + self.vibration)
            * f64::from(NuisanceLevel::MAX_ORDINAL)
            * self.duration_factor(DurationBand::OverOneMonth)
    }
}

impl Default for IndexWeights {
    fn default() -> Self {
        Self::standard()
    }
}

/// Calculator configuration: the weight table plus the duration policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    pub weights: IndexWeights,
    pub duration_policy: DurationPolicy,
}

impl CalculatorConfig {
    pub fn with_duration_policy(duration_policy: DurationPolicy) -> Self {
        Self {
            weights: IndexWeights::standard(),
            duration_policy,
        }
    }
}
