//! Static lookup tables turning raw resolver answers into ordinal severity buckets.
//!
//! Every table is an exhaustive match. A code the tables do not know is a data-integrity
//! failure between the reference layers and the engine, never a default bucket.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::nuisance::{DeclaredNuisance, LaneImpact, LaneImpactLength, NuisanceLevel};
use super::resolver::SpatialFacts;

/// Table that rejected a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationTable {
    StreetClass,
    TramLaneType,
}

impl ClassificationTable {
    pub const fn label(self) -> &'static str {
        match self {
            ClassificationTable::StreetClass => "street class",
            ClassificationTable::TramLaneType => "tram lane type",
        }
    }
}

impl fmt::Display for ClassificationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {table} code '{code}'")]
pub struct UnrecognizedClassificationCode {
    pub table: ClassificationTable,
    pub code: String,
}

/// Street classification of the Helsinki street network, lowest severity first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Katuluokka {
    Tonttikatu,
    PaikallinenKokoojakatu,
    AlueellinenKokoojakatu,
    PaakatuTaiMoottorivayla,
}

impl Katuluokka {
    pub fn from_code(code: &str) -> Result<Self, UnrecognizedClassificationCode> {
        match code.trim() {
            "Tonttikatu tai ajoyhteys" => Ok(Katuluokka::Tonttikatu),
            "Paikallinen kokoojakatu" => Ok(Katuluokka::PaikallinenKokoojakatu),
            "Alueellinen kokoojakatu" => Ok(Katuluokka::AlueellinenKokoojakatu),
            "Pääkatu tai moottoriväylä" => Ok(Katuluokka::PaakatuTaiMoottorivayla),
            other => Err(UnrecognizedClassificationCode {
                table: ClassificationTable::StreetClass,
                code: other.to_string(),
            }),
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Katuluokka::Tonttikatu => "Tonttikatu tai ajoyhteys",
            Katuluokka::PaikallinenKokoojakatu => "Paikallinen kokoojakatu",
            Katuluokka::AlueellinenKokoojakatu => "Alueellinen kokoojakatu",
            Katuluokka::PaakatuTaiMoottorivayla => "Pääkatu tai moottoriväylä",
        }
    }

    pub const fn bucket(self) -> u8 {
        match self {
            Katuluokka::Tonttikatu => 1,
            Katuluokka::PaikallinenKokoojakatu => 3,
            Katuluokka::AlueellinenKokoojakatu => 4,
            Katuluokka::PaakatuTaiMoottorivayla => 5,
        }
    }
}

pub const MAX_STREET_CLASS_BUCKET: u8 = 5;
pub const MAX_TRAFFIC_VOLUME_BUCKET: u8 = 5;
pub const MAX_TRAM_LANE_BUCKET: u8 = 4;

/// Highest street class among the intersected codes, `None` when no classified street is hit.
pub fn classify_street(
    codes: &BTreeSet<String>,
) -> Result<Option<Katuluokka>, UnrecognizedClassificationCode> {
    let mut highest = None;
    for code in codes {
        let class = Katuluokka::from_code(code)?;
        highest = highest.max(Some(class));
    }
    Ok(highest)
}

/// Vehicles per day to ordinal bucket. The same breakpoints apply to both radii.
pub const fn traffic_volume_bucket(volume: u32) -> u8 {
    match volume {
        0 => 0,
        1..=499 => 1,
        500..=1499 => 2,
        1500..=4999 => 3,
        5000..=9999 => 4,
        _ => 5,
    }
}

/// The 15 m maximum governs whenever it exists.
pub fn governing_traffic_volume(within_15m: Option<u32>, within_30m: Option<u32>) -> Option<u32> {
    within_15m.or(within_30m)
}

/// Tram track arrangement within the work area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TramLane {
    /// Tracks in a lane shared with car traffic.
    Shared,
    /// Tracks on their own lane.
    Dedicated,
}

impl TramLane {
    pub fn from_code(code: &str) -> Result<Self, UnrecognizedClassificationCode> {
        match code.trim() {
            "mixed" => Ok(TramLane::Shared),
            "dedicated" => Ok(TramLane::Dedicated),
            other => Err(UnrecognizedClassificationCode {
                table: ClassificationTable::TramLaneType,
                code: other.to_string(),
            }),
        }
    }

    pub const fn bucket(self) -> u8 {
        match self {
            TramLane::Shared => 3,
            TramLane::Dedicated => 4,
        }
    }
}

pub fn classify_tram_lane(
    codes: &BTreeSet<String>,
) -> Result<Option<TramLane>, UnrecognizedClassificationCode> {
    let mut highest = None;
    for code in codes {
        let lane = TramLane::from_code(code)?;
        highest = highest.max(Some(lane));
    }
    Ok(highest)
}

/// Most important cycling route touched by the work area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclingRoute {
    NoRoute,
    Main,
    Priority,
}

impl CyclingRoute {
    pub const fn from_flags(priority: bool, main: bool) -> Self {
        if priority {
            CyclingRoute::Priority
        } else if main {
            CyclingRoute::Main
        } else {
            CyclingRoute::NoRoute
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CyclingRoute::NoRoute => "no cycling route",
            CyclingRoute::Main => "main cycling route",
            CyclingRoute::Priority => "priority cycling route",
        }
    }
}

/// Duration of the declared nuisance in ordinal bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationBand {
    OneDay,
    UpToOneWeek,
    UpToOneMonth,
    OverOneMonth,
}

impl DurationBand {
    pub const MAX_ORDINAL: u8 = 3;

    pub const fn from_days(days: u32) -> Self {
        match days {
            0 | 1 => DurationBand::OneDay,
            2..=7 => DurationBand::UpToOneWeek,
            8..=30 => DurationBand::UpToOneMonth,
            _ => DurationBand::OverOneMonth,
        }
    }

    pub const fn ordinal(self) -> u8 {
        match self {
            DurationBand::OneDay => 0,
            DurationBand::UpToOneWeek => 1,
            DurationBand::UpToOneMonth => 2,
            DurationBand::OverOneMonth => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DurationBand::OneDay => "1 day",
            DurationBand::UpToOneWeek => "2-7 days",
            DurationBand::UpToOneMonth => "8-30 days",
            DurationBand::OverOneMonth => "over 30 days",
        }
    }
}

/// Classified inputs of one calculation, kept with the result for audit and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Luokittelu {
    /// Recorded for display; the street class bucket reads the classified segments alone.
    pub on_general_street: bool,
    pub katuluokka: Option<Katuluokka>,
    pub street_class_bucket: u8,
    pub traffic_volume: Option<u32>,
    pub traffic_volume_bucket: u8,
    pub in_central_business_district: bool,
    pub on_transit_critical_segment: bool,
    pub bus_routes: BTreeSet<String>,
    pub tram_lane: Option<TramLane>,
    pub tram_lane_bucket: u8,
    pub cycling_route: CyclingRoute,
    pub lane_impact: LaneImpact,
    pub lane_impact_length: LaneImpactLength,
    pub noise: NuisanceLevel,
    pub dust: NuisanceLevel,
    pub vibration: NuisanceLevel,
    pub duration_days: u32,
    pub duration_band: DurationBand,
}

impl Luokittelu {
    pub fn bus_route_count(&self) -> usize {
        self.bus_routes.len()
    }
}

/// Runs every table over the resolver answers and the declared nuisance.
pub fn classify(
    facts: &SpatialFacts,
    nuisance: &DeclaredNuisance,
) -> Result<Luokittelu, UnrecognizedClassificationCode> {
    let katuluokka = classify_street(&facts.street_classes)?;
    let tram_lane = classify_tram_lane(&facts.tram_lane_types)?;
    let traffic_volume =
        governing_traffic_volume(facts.max_traffic_volume_15m, facts.max_traffic_volume_30m);
    let duration_days = nuisance.duration_days();

    Ok(Luokittelu {
        on_general_street: facts.on_general_street,
        katuluokka,
        street_class_bucket: katuluokka.map_or(0, Katuluokka::bucket),
        traffic_volume,
        traffic_volume_bucket: traffic_volume.map_or(0, traffic_volume_bucket),
        in_central_business_district: facts.in_central_business_district,
        on_transit_critical_segment: facts.on_transit_critical_segment,
        bus_routes: facts.bus_routes.clone(),
        tram_lane,
        tram_lane_bucket: tram_lane.map_or(0, TramLane::bucket),
        cycling_route: CyclingRoute::from_flags(
            facts.priority_cycling_route,
            facts.main_cycling_route,
        ),
        lane_impact: nuisance.lane_impact,
        lane_impact_length: nuisance.lane_impact_length,
        noise: nuisance.noise,
        dust: nuisance.dust,
        vibration: nuisance.vibration,
        duration_days,
        duration_band: DurationBand::from_days(duration_days),
    })
}
