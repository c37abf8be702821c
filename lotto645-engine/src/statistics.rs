use std::collections::{BTreeMap, BTreeSet};

use crate::combination::{universe, History, Pair};
use crate::config::EngineConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SumBounds {
    pub min: u32,
    pub max: u32,
    pub mean: f64,
}

/// Instantané des statistiques d'un historique. Calculé une fois, lu ensuite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    pub frequency: BTreeMap<u8, u32>,
    /// Fréquence > moyenne, par fréquence décroissante.
    pub hot: Vec<u8>,
    /// Fréquence < moyenne (numéros jamais sortis compris), par fréquence croissante.
    pub cold: Vec<u8>,
    pub pair_frequency: BTreeMap<Pair, u32>,
    pub incompatible_pairs: BTreeSet<Pair>,
    pub long_term_unseen: Vec<u8>,
    pub sum_bounds: SumBounds,
}

impl Statistics {
    pub fn frequency_of(&self, n: u8) -> u32 {
        self.frequency.get(&n).copied().unwrap_or(0)
    }

    pub fn max_frequency(&self) -> u32 {
        self.frequency.values().copied().max().unwrap_or(0)
    }

    /// Moyenne sur les numéros effectivement sortis.
    pub fn mean_frequency(&self) -> f64 {
        let distinct = self.frequency.len();
        if distinct == 0 {
            return 0.0;
        }
        let total: u32 = self.frequency.values().sum();
        total as f64 / distinct as f64
    }

    /// Les `n` paires les plus fréquentes ; à égalité, l'ordre des paires départage.
    pub fn top_pairs(&self, n: usize) -> Vec<(Pair, u32)> {
        let mut pairs: Vec<(Pair, u32)> = self.pair_frequency.iter().map(|(&p, &c)| (p, c)).collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1));
        pairs.truncate(n);
        pairs
    }
}

pub fn analyze(history: &History) -> Statistics {
    analyze_with(history, &EngineConfig::default())
}

pub fn analyze_with(history: &History, config: &EngineConfig) -> Statistics {
    if history.is_empty() {
        return Statistics::default();
    }

    let mut frequency: BTreeMap<u8, u32> = BTreeMap::new();
    let mut pair_frequency: BTreeMap<Pair, u32> = BTreeMap::new();
    for draw in history.draws() {
        for &n in draw.numbers() {
            *frequency.entry(n).or_insert(0) += 1;
        }
        for p in draw.pairs() {
            *pair_frequency.entry(p).or_insert(0) += 1;
        }
    }

    let mut stats = Statistics {
        frequency,
        pair_frequency,
        ..Statistics::default()
    };
    let mean = stats.mean_frequency();

    // Tri stable : à fréquence égale, l'ordre numérique est conservé.
    let mut hot: Vec<u8> = stats
        .frequency
        .iter()
        .filter(|&(_, &f)| f as f64 > mean)
        .map(|(&n, _)| n)
        .collect();
    hot.sort_by(|a, b| stats.frequency_of(*b).cmp(&stats.frequency_of(*a)));

    let mut cold: Vec<u8> = universe()
        .filter(|&n| (stats.frequency_of(n) as f64) < mean)
        .collect();
    cold.sort_by_key(|&n| stats.frequency_of(n));

    stats.hot = hot;
    stats.cold = cold;

    stats.incompatible_pairs = stats
        .pair_frequency
        .iter()
        .filter(|&(_, &c)| c <= config.incompatible_max_count)
        .map(|(&p, _)| p)
        .collect();

    let recent: BTreeSet<u8> = history
        .recent(config.recent_window)
        .iter()
        .flat_map(|d| d.numbers().iter().copied())
        .collect();
    stats.long_term_unseen = universe().filter(|n| !recent.contains(n)).collect();

    let sums: Vec<u32> = history.draws().iter().map(|d| d.sum()).collect();
    stats.sum_bounds = SumBounds {
        min: sums.iter().copied().min().unwrap_or(0),
        max: sums.iter().copied().max().unwrap_or(0),
        mean: sums.iter().sum::<u32>() as f64 / sums.len() as f64,
    };

    log::info!(
        "Analyse de {} tirages : {} chauds, {} froids, {} paires incompatibles, {} non sortis",
        history.len(),
        stats.hot.len(),
        stats.cold.len(),
        stats.incompatible_pairs.len(),
        stats.long_term_unseen.len()
    );

    stats
}
