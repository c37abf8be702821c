//! Primitives de tirage partagées par toutes les stratégies.

use std::collections::BTreeSet;

use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::seq::{index, IndexedRandom};
use rand::Rng;

use crate::combination::{Combination, MAX_NUMBER, MIN_NUMBER, PICK_COUNT};
use crate::error::Fallback;

/// Six numéros distincts tirés uniformément dans 1..=45.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R) -> Combination {
    let set: BTreeSet<u8> = index::sample(rng, MAX_NUMBER as usize, PICK_COUNT)
        .into_iter()
        .map(|i| i as u8 + MIN_NUMBER)
        .collect();
    Combination::from_set(&set)
}

/// Génère-et-teste borné : premier candidat uniforme accepté par `accept`.
pub fn rejection_sample<R, F>(rng: &mut R, trials: usize, accept: F) -> Result<Combination, Fallback>
where
    R: Rng + ?Sized,
    F: Fn(&Combination) -> bool,
{
    for _ in 0..trials {
        let candidate = uniform(rng);
        if accept(&candidate) {
            return Ok(candidate);
        }
    }
    Err(Fallback::SamplingExhausted { trials })
}

/// Complète l'ensemble avec des numéros uniformes jusqu'à six, puis en
/// retient six au hasard s'il en contient davantage.
pub fn complete<R: Rng + ?Sized>(mut candidates: BTreeSet<u8>, rng: &mut R) -> Combination {
    candidates.retain(|n| (MIN_NUMBER..=MAX_NUMBER).contains(n));
    while candidates.len() < PICK_COUNT {
        candidates.insert(rng.random_range(MIN_NUMBER..=MAX_NUMBER));
    }
    if candidates.len() > PICK_COUNT {
        let pool: Vec<u8> = candidates.into_iter().collect();
        candidates = pool.choose_multiple(rng, PICK_COUNT).copied().collect();
    }
    Combination::from_set(&candidates)
}

/// Tire un numéro à la fois selon `weights`, en dédoublonnant, jusqu'à six
/// numéros distincts ou épuisement des `attempts`.
pub fn weighted_distinct<R: Rng + ?Sized>(
    population: &[u8],
    weights: &[u32],
    attempts: usize,
    rng: &mut R,
) -> Result<Combination, Fallback> {
    let dist = WeightedIndex::new(weights).map_err(|_| Fallback::DegenerateWeights)?;
    let mut selected = BTreeSet::new();
    for _ in 0..attempts {
        if selected.len() == PICK_COUNT {
            break;
        }
        selected.insert(population[dist.sample(rng)]);
    }
    if selected.len() < PICK_COUNT {
        return Err(Fallback::SamplingExhausted { trials: attempts });
    }
    Ok(Combination::from_set(&selected))
}

/// Jusqu'à `k` éléments distincts de `pool`, sans remise.
pub fn pick<R: Rng + ?Sized>(pool: &[u8], k: usize, rng: &mut R) -> Vec<u8> {
    pool.choose_multiple(rng, k.min(pool.len())).copied().collect()
}
