pub mod filters;
pub mod mix;
pub mod seeded;
pub mod weighted;

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::combination::{Combination, History};
use crate::config::EngineConfig;
use crate::error::{EngineError, Fallback};
use crate::sampling;
use crate::statistics::Statistics;

/// Données en lecture seule auxquelles une stratégie a accès.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub history: &'a History,
    pub stats: &'a Statistics,
    pub config: &'a EngineConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    UniformRandom,
    FrequencyWeighted,
    InverseFrequencyWeighted,
    BalancedParity,
    RangeStratified,
    PrimeInclusive,
    SumRange,
    ConsecutiveInclusive,
    HotColdMix,
    FrequentPairs,
    EndingPattern,
    StatisticalOptimal,
    CarryoverUnseenMix,
    SameEndingMix,
    CompatibilityFiltered,
    DataDrivenMix,
    AllMethodsMix,
}

impl Strategy {
    /// Toutes les stratégies, dans l'ordre du menu.
    pub const ALL: [Strategy; 17] = [
        Strategy::UniformRandom,
        Strategy::FrequencyWeighted,
        Strategy::InverseFrequencyWeighted,
        Strategy::BalancedParity,
        Strategy::RangeStratified,
        Strategy::PrimeInclusive,
        Strategy::SumRange,
        Strategy::ConsecutiveInclusive,
        Strategy::HotColdMix,
        Strategy::FrequentPairs,
        Strategy::EndingPattern,
        Strategy::StatisticalOptimal,
        Strategy::CarryoverUnseenMix,
        Strategy::SameEndingMix,
        Strategy::CompatibilityFiltered,
        Strategy::DataDrivenMix,
        Strategy::AllMethodsMix,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::UniformRandom => "uniform-random",
            Strategy::FrequencyWeighted => "frequency-weighted",
            Strategy::InverseFrequencyWeighted => "inverse-frequency-weighted",
            Strategy::BalancedParity => "balanced-parity",
            Strategy::RangeStratified => "range-stratified",
            Strategy::PrimeInclusive => "prime-inclusive",
            Strategy::SumRange => "sum-range",
            Strategy::ConsecutiveInclusive => "consecutive-inclusive",
            Strategy::HotColdMix => "hot-cold-mix",
            Strategy::FrequentPairs => "frequent-pairs",
            Strategy::EndingPattern => "ending-pattern",
            Strategy::StatisticalOptimal => "statistical-optimal",
            Strategy::CarryoverUnseenMix => "carryover-unseen-mix",
            Strategy::SameEndingMix => "same-ending-mix",
            Strategy::CompatibilityFiltered => "compatibility-filtered",
            Strategy::DataDrivenMix => "data-driven-mix",
            Strategy::AllMethodsMix => "all-methods-mix",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::UniformRandom => "Aléatoire uniforme",
            Strategy::FrequencyWeighted => "Pondéré par fréquence",
            Strategy::InverseFrequencyWeighted => "Pondéré par rareté",
            Strategy::BalancedParity => "Équilibre pair/impair",
            Strategy::RangeStratified => "Répartition par tranches",
            Strategy::PrimeInclusive => "Avec nombres premiers",
            Strategy::SumRange => "Somme dans l'intervalle historique",
            Strategy::ConsecutiveInclusive => "Avec numéros consécutifs",
            Strategy::HotColdMix => "Mélange chauds/froids",
            Strategy::FrequentPairs => "Paires fréquentes",
            Strategy::EndingPattern => "Motif de terminaisons",
            Strategy::StatisticalOptimal => "Optimum statistique",
            Strategy::CarryoverUnseenMix => "Report + non sortis",
            Strategy::SameEndingMix => "Même terminaison",
            Strategy::CompatibilityFiltered => "Sans paires incompatibles",
            Strategy::DataDrivenMix => "Mélange des méthodes sur données",
            Strategy::AllMethodsMix => "Mélange de toutes les méthodes",
        }
    }

    pub fn is_data_dependent(&self) -> bool {
        !matches!(
            self,
            Strategy::UniformRandom
                | Strategy::BalancedParity
                | Strategy::RangeStratified
                | Strategy::PrimeInclusive
                | Strategy::ConsecutiveInclusive
        )
    }

    pub fn is_mix(&self) -> bool {
        matches!(self, Strategy::DataDrivenMix | Strategy::AllMethodsMix)
    }

    /// Sans historique, ces stratégies se replient sur le tirage uniforme.
    /// `sum-range` a ses bornes par défaut et n'en fait pas partie.
    pub fn requires_history(&self) -> bool {
        self.is_data_dependent() && *self != Strategy::SumRange
    }

    /// Stratégies proposées à l'utilisateur selon la présence de données.
    pub fn available(has_history: bool) -> Vec<Strategy> {
        Self::ALL
            .into_iter()
            .filter(|s| has_history || !s.is_data_dependent())
            .collect()
    }

    /// Exécute l'algorithme propre à la stratégie, sans repli.
    pub fn attempt<R: Rng + ?Sized>(
        self,
        ctx: &Context<'_>,
        rng: &mut R,
    ) -> Result<Combination, Fallback> {
        if self.requires_history() && ctx.history.is_empty() {
            return Err(Fallback::InsufficientData { required: 1, available: 0 });
        }
        match self {
            Strategy::UniformRandom => Ok(sampling::uniform(rng)),
            Strategy::FrequencyWeighted => weighted::frequency_weighted(ctx, rng),
            Strategy::InverseFrequencyWeighted => weighted::inverse_frequency_weighted(ctx, rng),
            Strategy::BalancedParity => filters::balanced_parity(ctx, rng),
            Strategy::RangeStratified => Ok(seeded::range_stratified(rng)),
            Strategy::PrimeInclusive => filters::prime_inclusive(ctx, rng),
            Strategy::SumRange => filters::sum_range(ctx, rng),
            Strategy::ConsecutiveInclusive => filters::consecutive_inclusive(ctx, rng),
            Strategy::HotColdMix => Ok(seeded::hot_cold_mix(ctx, rng)),
            Strategy::FrequentPairs => seeded::frequent_pairs(ctx, rng),
            Strategy::EndingPattern => Ok(seeded::ending_pattern(rng)),
            Strategy::StatisticalOptimal => filters::statistical_optimal(ctx, rng),
            Strategy::CarryoverUnseenMix => seeded::carryover_unseen_mix(ctx, rng),
            Strategy::SameEndingMix => Ok(seeded::same_ending_mix(rng)),
            Strategy::CompatibilityFiltered => filters::compatibility_filtered(ctx, rng),
            Strategy::DataDrivenMix => Ok(mix::data_driven_mix(ctx, rng)),
            Strategy::AllMethodsMix => Ok(mix::all_methods_mix(ctx, rng)),
        }
    }

    /// Comme `attempt`, mais tout échec donne un tirage uniforme.
    pub fn generate<R: Rng + ?Sized>(self, ctx: &Context<'_>, rng: &mut R) -> Combination {
        match self.attempt(ctx, rng) {
            Ok(combination) => combination,
            Err(reason) => {
                log::debug!("{} : repli sur le tirage uniforme ({})", self, reason);
                sampling::uniform(rng)
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Strategy {
    type Err = EngineError;

    /// Accepte l'identifiant (`hot-cold-mix`) ou le numéro du menu (`9`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        if let Ok(index) = key.parse::<usize>() {
            return index
                .checked_sub(1)
                .and_then(|i| Self::ALL.get(i).copied())
                .ok_or_else(|| EngineError::UnknownStrategy(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name() == key)
            .ok_or_else(|| EngineError::UnknownStrategy(s.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::statistics::analyze;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Historique de `n` tirages, 7 présent à chaque tirage.
    pub(crate) fn sample_history(n: usize) -> History {
        let others: Vec<u8> = (1..=44).filter(|&x| x != 7).collect();
        let draws: Vec<Vec<u8>> = (0..n)
            .map(|i| {
                let mut draw = vec![7];
                draw.extend((0..5).map(|k| others[(i * 5 + k) % others.len()]));
                draw
            })
            .collect();
        History::new(draws).unwrap()
    }

    #[test]
    fn test_names_unique_and_parse_back() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.name().parse::<Strategy>().unwrap(), strategy);
        }
        let mut names: Vec<&str> = Strategy::ALL.iter().map(|s| s.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 17);
    }

    #[test]
    fn test_parse_menu_index_and_case() {
        assert_eq!("1".parse::<Strategy>().unwrap(), Strategy::UniformRandom);
        assert_eq!("17".parse::<Strategy>().unwrap(), Strategy::AllMethodsMix);
        assert_eq!(" Hot-Cold-Mix ".parse::<Strategy>().unwrap(), Strategy::HotColdMix);
    }

    #[test]
    fn test_parse_unknown() {
        for bad in ["0", "18", "lucky", ""] {
            assert_eq!(
                bad.parse::<Strategy>(),
                Err(EngineError::UnknownStrategy(bad.to_string()))
            );
        }
    }

    #[test]
    fn test_available_without_history() {
        let available = Strategy::available(false);
        assert_eq!(available.len(), 5);
        assert!(available.iter().all(|s| !s.is_data_dependent()));
        assert_eq!(Strategy::available(true).len(), 17);
    }

    #[test]
    fn test_data_dependent_degrade_without_history() {
        let history = History::empty();
        let stats = analyze(&history);
        let config = EngineConfig::default();
        let ctx = Context { history: &history, stats: &stats, config: &config };
        let mut rng = StdRng::seed_from_u64(9);

        for strategy in Strategy::ALL.into_iter().filter(|s| s.requires_history()) {
            assert_eq!(
                strategy.attempt(&ctx, &mut rng),
                Err(Fallback::InsufficientData { required: 1, available: 0 }),
                "{strategy}"
            );
        }
        assert!(Strategy::SumRange.attempt(&ctx, &mut rng).is_ok());
    }

    #[test]
    fn test_generate_always_valid() {
        let history = sample_history(20);
        let stats = analyze(&history);
        let config = EngineConfig::default();
        let ctx = Context { history: &history, stats: &stats, config: &config };
        let mut rng = StdRng::seed_from_u64(21);

        for strategy in Strategy::ALL {
            for _ in 0..50 {
                let c = strategy.generate(&ctx, &mut rng);
                assert!(Combination::new(c.numbers()).is_ok(), "{strategy}: {c}");
            }
        }
    }
}
