use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NuisanceValidationError {
    #[error("{field} ordinal {value} is outside the allowed range 0..={max}")]
    OrdinalOutOfRange {
        field: &'static str,
        value: u8,
        max: u8,
    },
    #[error("nuisance end date {end} precedes start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

/// Declared effect on the car-traffic lane arrangement (kaistahaitta).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LaneImpact {
    NoImpact,
    ReducesOneLaneInOneDirection,
    ReducesOneLaneInBothDirections,
    ReducesSeveralLanesInBothDirections,
    ReducesSeveralLanesInSeveralDirections,
}

impl LaneImpact {
    pub const MAX_ORDINAL: u8 = 4;

    pub const fn ordinal(self) -> u8 {
        match self {
            LaneImpact::NoImpact => 0,
            LaneImpact::ReducesOneLaneInOneDirection => 1,
            LaneImpact::ReducesOneLaneInBothDirections => 2,
            LaneImpact::ReducesSeveralLanesInBothDirections => 3,
            LaneImpact::ReducesSeveralLanesInSeveralDirections => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            LaneImpact::NoImpact => "no impact",
            LaneImpact::ReducesOneLaneInOneDirection => "reduces one lane in one direction",
            LaneImpact::ReducesOneLaneInBothDirections => "reduces one lane in both directions",
            LaneImpact::ReducesSeveralLanesInBothDirections => {
                "reduces several lanes in both directions"
            }
            LaneImpact::ReducesSeveralLanesInSeveralDirections => {
                "reduces several lanes in several directions"
            }
        }
    }
}

impl TryFrom<u8> for LaneImpact {
    type Error = NuisanceValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LaneImpact::NoImpact),
            1 => Ok(LaneImpact::ReducesOneLaneInOneDirection),
            2 => Ok(LaneImpact::ReducesOneLaneInBothDirections),
            3 => Ok(LaneImpact::ReducesSeveralLanesInBothDirections),
            4 => Ok(LaneImpact::ReducesSeveralLanesInSeveralDirections),
            _ => Err(NuisanceValidationError::OrdinalOutOfRange {
                field: "lane impact",
                value,
                max: Self::MAX_ORDINAL,
            }),
        }
    }
}

impl From<LaneImpact> for u8 {
    fn from(value: LaneImpact) -> Self {
        value.ordinal()
    }
}

/// Length of the declared lane impact along the street.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LaneImpactLength {
    NoImpact,
    Under10Metres,
    From10To99Metres,
    From100To499Metres,
    AtLeast500Metres,
}

impl LaneImpactLength {
    pub const MAX_ORDINAL: u8 = 4;

    pub const fn ordinal(self) -> u8 {
        match self {
            LaneImpactLength::NoImpact => 0,
            LaneImpactLength::Under10Metres => 1,
            LaneImpactLength::From10To99Metres => 2,
            LaneImpactLength::From100To499Metres => 3,
            LaneImpactLength::AtLeast500Metres => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            LaneImpactLength::NoImpact => "no impact",
            LaneImpactLength::Under10Metres => "under 10 m",
            LaneImpactLength::From10To99Metres => "10-99 m",
            LaneImpactLength::From100To499Metres => "100-499 m",
            LaneImpactLength::AtLeast500Metres => "500 m or more",
        }
    }
}

impl TryFrom<u8> for LaneImpactLength {
    type Error = NuisanceValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LaneImpactLength::NoImpact),
            1 => Ok(LaneImpactLength::Under10Metres),
            2 => Ok(LaneImpactLength::From10To99Metres),
            3 => Ok(LaneImpactLength::From100To499Metres),
            4 => Ok(LaneImpactLength::AtLeast500Metres),
            _ => Err(NuisanceValidationError::OrdinalOutOfRange {
                field: "lane impact length",
                value,
                max: Self::MAX_ORDINAL,
            }),
        }
    }
}

impl From<LaneImpactLength> for u8 {
    fn from(value: LaneImpactLength) -> Self {
        value.ordinal()
    }
}

/// Shared scale for declared noise, dust and vibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum NuisanceLevel {
    NoNuisance,
    Occasional,
    Repeated,
    Continuous,
}

impl NuisanceLevel {
    pub const MAX_ORDINAL: u8 = 3;

    pub const fn ordinal(self) -> u8 {
        match self {
            NuisanceLevel::NoNuisance => 0,
            NuisanceLevel::Occasional => 1,
            NuisanceLevel::Repeated => 2,
            NuisanceLevel::Continuous => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            NuisanceLevel::NoNuisance => "none",
            NuisanceLevel::Occasional => "occasional",
            NuisanceLevel::Repeated => "repeated",
            NuisanceLevel::Continuous => "continuous",
        }
    }
}

impl TryFrom<u8> for NuisanceLevel {
    type Error = NuisanceValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(NuisanceLevel::NoNuisance),
            1 => Ok(NuisanceLevel::Occasional),
            2 => Ok(NuisanceLevel::Repeated),
            3 => Ok(NuisanceLevel::Continuous),
            _ => Err(NuisanceValidationError::OrdinalOutOfRange {
                field: "nuisance level",
                value,
                max: Self::MAX_ORDINAL,
            }),
        }
    }
}

impl From<NuisanceLevel> for u8 {
    fn from(value: NuisanceLevel) -> Self {
        value.ordinal()
    }
}

/// User-declared nuisance of one work area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredNuisance {
    pub lane_impact: LaneImpact,
    pub lane_impact_length: LaneImpactLength,
    pub noise: NuisanceLevel,
    pub dust: NuisanceLevel,
    pub vibration: NuisanceLevel,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DeclaredNuisance {
    pub fn validate(&self) -> Result<(), NuisanceValidationError> {
        if self.end_date < self.start_date {
            return Err(NuisanceValidationError::EndBeforeStart {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Inclusive day count; a nuisance starting and ending on the same day lasts one day.
    pub fn duration_days(&self) -> u32 {
        let days = (self.end_date - self.start_date).num_days() + 1;
        u32::try_from(days).unwrap_or(0)
    }
}
