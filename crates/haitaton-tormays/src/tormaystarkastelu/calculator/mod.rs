mod config;
mod rules;

pub use config::{CalculatorConfig, DurationPolicy, IndexWeights};

use super::classification::{classify, Luokittelu, UnrecognizedClassificationCode};
use super::nuisance::{DeclaredNuisance, NuisanceValidationError};
use super::resolver::SpatialFacts;
use super::result::{LiikennehaittaIndeksi, TormaystarkasteluResult};

/// Stateless calculator applying the weight table to classified facts.
#[derive(Debug, Clone, Default)]
pub struct IndexCalculator {
    config: CalculatorConfig,
}

impl IndexCalculator {
    pub fn new(config: CalculatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Validates the declared nuisance, classifies the facts and computes every index.
    pub fn calculate(
        &self,
        facts: &SpatialFacts,
        nuisance: &DeclaredNuisance,
    ) -> Result<TormaystarkasteluResult, CalculationError> {
        nuisance.validate()?;
        let luokittelu = classify(facts, nuisance)?;
        Ok(self.score(luokittelu))
    }

    /// Computes the indices of already classified inputs.
    pub fn score(&self, luokittelu: Luokittelu) -> TormaystarkasteluResult {
        let weights = &self.config.weights;

        let (perusindeksi, mut components) = rules::perusindeksi(&luokittelu, weights);
        let (pyorailyindeksi, cycling) = rules::pyorailyindeksi(&luokittelu, weights);
        let (joukkoliikenneindeksi, transit) = rules::joukkoliikenneindeksi(&luokittelu, weights);
        components.extend(cycling);
        components.extend(transit);

        let muut_haitat_indeksi = match self.config.duration_policy {
            DurationPolicy::ReportOnly => None,
            DurationPolicy::Weighted => {
                let (index, nuisance) = rules::muut_haitat_indeksi(&luokittelu, weights);
                components.extend(nuisance);
                Some(index)
            }
        };

        TormaystarkasteluResult {
            perusindeksi,
            pyorailyindeksi,
            joukkoliikenneindeksi,
            liikennehaittaindeksi: LiikennehaittaIndeksi::from_subindices(
                perusindeksi,
                joukkoliikenneindeksi,
            ),
            muut_haitat_indeksi,
            duration_policy: self.config.duration_policy,
            luokittelu,
            components,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalculationError {
    #[error(transparent)]
    InvalidDeclaredNuisance(#[from] NuisanceValidationError),
    #[error(transparent)]
    UnrecognizedClassificationCode(#[from] UnrecognizedClassificationCode),
}
