use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::calculator::DurationPolicy;
use super::classification::Luokittelu;

/// Severity on the 0.0..=5.0 scale with one decimal, held as whole tenths so equal inputs
/// always compare equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexValue(u8);

impl IndexValue {
    pub const ZERO: IndexValue = IndexValue(0);
    pub const MAX: IndexValue = IndexValue(50);

    /// Clamps into range and rounds half up to one decimal.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        let tenths = (value.clamp(0.0, 5.0) * 10.0).round();
        Self(tenths as u8)
    }

    pub const fn from_tenths(tenths: u8) -> Self {
        if tenths > 50 {
            Self::MAX
        } else {
            Self(tenths)
        }
    }

    pub const fn tenths(self) -> u8 {
        self.0
    }

    pub fn value(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl fmt::Display for IndexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

impl Serialize for IndexValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

impl<'de> Deserialize<'de> for IndexValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Self::from_f64)
    }
}

/// Category that governs the combined traffic-disturbance index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndeksiTyyppi {
    Perusindeksi,
    Joukkoliikenneindeksi,
}

impl IndeksiTyyppi {
    pub const fn label(self) -> &'static str {
        match self {
            IndeksiTyyppi::Perusindeksi => "perusindeksi",
            IndeksiTyyppi::Joukkoliikenneindeksi => "joukkoliikenneindeksi",
        }
    }
}

/// Headline index together with the category it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiikennehaittaIndeksi {
    pub indeksi: IndexValue,
    pub tyyppi: IndeksiTyyppi,
}

impl LiikennehaittaIndeksi {
    /// Worst of the base and transit indices; ties go to the base index.
    pub fn from_subindices(perusindeksi: IndexValue, joukkoliikenneindeksi: IndexValue) -> Self {
        if joukkoliikenneindeksi > perusindeksi {
            Self {
                indeksi: joukkoliikenneindeksi,
                tyyppi: IndeksiTyyppi::Joukkoliikenneindeksi,
            }
        } else {
            Self {
                indeksi: perusindeksi,
                tyyppi: IndeksiTyyppi::Perusindeksi,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexCategory {
    Perusindeksi,
    Pyorailyindeksi,
    Joukkoliikenneindeksi,
    Liikennehaittaindeksi,
    MuutHaitat,
}

impl IndexCategory {
    pub const ALL: [IndexCategory; 5] = [
        IndexCategory::Perusindeksi,
        IndexCategory::Pyorailyindeksi,
        IndexCategory::Joukkoliikenneindeksi,
        IndexCategory::Liikennehaittaindeksi,
        IndexCategory::MuutHaitat,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            IndexCategory::Perusindeksi => "perusindeksi",
            IndexCategory::Pyorailyindeksi => "pyorailyindeksi",
            IndexCategory::Joukkoliikenneindeksi => "joukkoliikenneindeksi",
            IndexCategory::Liikennehaittaindeksi => "liikennehaittaindeksi",
            IndexCategory::MuutHaitat => "muut_haitat_indeksi",
        }
    }
}

/// Input that contributed points to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexFactor {
    StreetClass,
    TrafficVolume,
    CentralBusinessDistrict,
    LaneImpact,
    LaneImpactLength,
    CyclingRoute,
    TransitCriticalSegment,
    BusRoutes,
    TramLane,
    Noise,
    Dust,
    Vibration,
}

/// Discrete contribution to a category index, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexComponent {
    pub category: IndexCategory,
    pub factor: IndexFactor,
    pub points: f64,
    pub notes: String,
}

/// Outcome of one work-area calculation. Superseded wholesale by the next calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TormaystarkasteluResult {
    pub perusindeksi: IndexValue,
    pub pyorailyindeksi: IndexValue,
    pub joukkoliikenneindeksi: IndexValue,
    pub liikennehaittaindeksi: LiikennehaittaIndeksi,
    /// Noise, dust and vibration weighted by duration; present only under the weighted
    /// duration policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muut_haitat_indeksi: Option<IndexValue>,
    pub duration_policy: DurationPolicy,
    pub luokittelu: Luokittelu,
    pub components: Vec<IndexComponent>,
}

impl TormaystarkasteluResult {
    pub fn index(&self, category: IndexCategory) -> Option<IndexValue> {
        match category {
            IndexCategory::Perusindeksi => Some(self.perusindeksi),
            IndexCategory::Pyorailyindeksi => Some(self.pyorailyindeksi),
            IndexCategory::Joukkoliikenneindeksi => Some(self.joukkoliikenneindeksi),
            IndexCategory::Liikennehaittaindeksi => Some(self.liikennehaittaindeksi.indeksi),
            IndexCategory::MuutHaitat => self.muut_haitat_indeksi,
        }
    }

    pub fn components_for(
        &self,
        category: IndexCategory,
    ) -> impl Iterator<Item = &IndexComponent> + '_ {
        self.components
            .iter()
            .filter(move |component| component.category == category)
    }
}
