use super::super::classification::{CyclingRoute, Luokittelu};
use super::super::result::{IndexCategory, IndexComponent, IndexFactor, IndexValue};
use super::config::IndexWeights;

/// Linear rescale of a raw weighted sum onto 0.0..=5.0.
pub(crate) fn rescale(raw: f64, raw_max: f64) -> IndexValue {
    if raw_max <= 0.0 {
        return IndexValue::ZERO;
    }
    IndexValue::from_f64(raw * 5.0 / raw_max)
}

struct Tally {
    category: IndexCategory,
    components: Vec<IndexComponent>,
    raw: f64,
}

impl Tally {
    fn new(category: IndexCategory) -> Self {
        Self {
            category,
            components: Vec::new(),
            raw: 0.0,
        }
    }

    fn add(&mut self, factor: IndexFactor, points: f64, notes: String) {
        self.raw += points;
        self.components.push(IndexComponent {
            category: self.category,
            factor,
            points,
            notes,
        });
    }

    fn finish(self, raw_max: f64) -> (IndexValue, Vec<IndexComponent>) {
        (rescale(self.raw, raw_max), self.components)
    }
}

pub(crate) fn perusindeksi(
    luokittelu: &Luokittelu,
    weights: &IndexWeights,
) -> (IndexValue, Vec<IndexComponent>) {
    let mut tally = Tally::new(IndexCategory::Perusindeksi);

    tally.add(
        IndexFactor::StreetClass,
        weights.street_class * f64::from(luokittelu.street_class_bucket),
        match luokittelu.katuluokka {
            Some(class) => format!(
                "street class '{}' bucket {}",
                class.code(),
                luokittelu.street_class_bucket
            ),
            None => "no classified street".to_string(),
        },
    );

    tally.add(
        IndexFactor::TrafficVolume,
        weights.traffic_volume * f64::from(luokittelu.traffic_volume_bucket),
        match luokittelu.traffic_volume {
            Some(volume) => format!(
                "{volume} vehicles/day, bucket {}",
                luokittelu.traffic_volume_bucket
            ),
            None => "no traffic volume within 30 m".to_string(),
        },
    );

    if luokittelu.in_central_business_district {
        tally.add(
            IndexFactor::CentralBusinessDistrict,
            weights.central_business_district,
            "inside the central business district".to_string(),
        );
    }

    tally.add(
        IndexFactor::LaneImpact,
        weights.lane_impact * f64::from(luokittelu.lane_impact.ordinal()),
        format!("declared lane impact: {}", luokittelu.lane_impact.label()),
    );

    tally.add(
        IndexFactor::LaneImpactLength,
        weights.lane_impact_length * f64::from(luokittelu.lane_impact_length.ordinal()),
        format!(
            "declared lane impact length: {}",
            luokittelu.lane_impact_length.label()
        ),
    );

    tally.finish(weights.perusindeksi_max())
}

pub(crate) fn pyorailyindeksi(
    luokittelu: &Luokittelu,
    weights: &IndexWeights,
) -> (IndexValue, Vec<IndexComponent>) {
    let mut tally = Tally::new(IndexCategory::Pyorailyindeksi);

    let route_points = match luokittelu.cycling_route {
        CyclingRoute::Priority => weights.priority_cycling_route,
        CyclingRoute::Main => weights.main_cycling_route,
        CyclingRoute::NoRoute => 0.0,
    };
    let factor = weights.cycling_length_factor(luokittelu.lane_impact_length);

    tally.add(
        IndexFactor::CyclingRoute,
        route_points * factor,
        format!(
            "{} scaled by {factor:.2} for {} lane impact",
            luokittelu.cycling_route.label(),
            luokittelu.lane_impact_length.label()
        ),
    );

    tally.finish(weights.pyorailyindeksi_max())
}

pub(crate) fn joukkoliikenneindeksi(
    luokittelu: &Luokittelu,
    weights: &IndexWeights,
) -> (IndexValue, Vec<IndexComponent>) {
    let mut tally = Tally::new(IndexCategory::Joukkoliikenneindeksi);

    if luokittelu.on_transit_critical_segment {
        tally.add(
            IndexFactor::TransitCriticalSegment,
            weights.transit_critical_segment,
            "on a transit-critical segment".to_string(),
        );
    }

    let routes = luokittelu.bus_route_count();
    if routes > 0 {
        let uncapped = weights.bus_route * routes as f64;
        let points = uncapped.min(weights.bus_route_cap);
        let notes = if uncapped > points {
            format!("{routes} bus routes, capped at {:.1}", weights.bus_route_cap)
        } else {
            format!("{routes} bus route(s)")
        };
        tally.add(IndexFactor::BusRoutes, points, notes);
    }

    if let Some(lane) = luokittelu.tram_lane {
        tally.add(
            IndexFactor::TramLane,
            weights.tram_lane * f64::from(luokittelu.tram_lane_bucket),
            format!("tram lane {lane:?}, bucket {}", luokittelu.tram_lane_bucket),
        );
    }

    tally.finish(weights.joukkoliikenneindeksi_max())
}

/// Noise, dust and vibration severity scaled by the duration band.
pub(crate) fn muut_haitat_indeksi(
    luokittelu: &Luokittelu,
    weights: &IndexWeights,
) -> (IndexValue, Vec<IndexComponent>) {
    let mut tally = Tally::new(IndexCategory::MuutHaitat);
    let factor = weights.duration_factor(luokittelu.duration_band);

    for (factor_kind, level, weight, name) in [
        (IndexFactor::Noise, luokittelu.noise, weights.noise, "noise"),
        (IndexFactor::Dust, luokittelu.dust, weights.dust, "dust"),
        (
            IndexFactor::Vibration,
            luokittelu.vibration,
            weights.vibration,
            "vibration",
        ),
    ] {
        tally.add(
            factor_kind,
            weight * f64::from(level.ordinal()) * factor,
            format!("{name} {} over {}", level.label(), luokittelu.duration_band.label()),
        );
    }

    tally.finish(weights.muut_haitat_max())
}
