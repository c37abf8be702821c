//! Stratégies à graine : quelques numéros choisis par heuristique, complétés
//! au hasard jusqu'à six.

use std::collections::BTreeSet;

use rand::seq::IndexedRandom;
use rand::Rng;

use super::Context;
use crate::combination::{universe, Combination};
use crate::error::Fallback;
use crate::sampling::{complete, pick};

pub const BANDS: [(u8, u8); 3] = [(1, 15), (16, 30), (31, 45)];

/// Numéros de l'univers regroupés par chiffre des unités (indice 0 à 9).
pub fn ending_groups() -> Vec<Vec<u8>> {
    let mut groups = vec![Vec::new(); 10];
    for n in universe() {
        groups[(n % 10) as usize].push(n);
    }
    groups
}

pub fn range_stratified<R: Rng + ?Sized>(rng: &mut R) -> Combination {
    let mut seed = BTreeSet::new();
    for (start, end) in BANDS {
        let band: Vec<u8> = (start..=end).collect();
        seed.extend(pick(&band, 2, rng));
    }
    complete(seed, rng)
}

pub fn hot_cold_mix<R: Rng + ?Sized>(ctx: &Context<'_>, rng: &mut R) -> Combination {
    let mut seed = BTreeSet::new();
    seed.extend(pick(&ctx.stats.hot, 3, rng));
    seed.extend(pick(&ctx.stats.cold, 3, rng));
    complete(seed, rng)
}

pub fn frequent_pairs<R: Rng + ?Sized>(ctx: &Context<'_>, rng: &mut R) -> Result<Combination, Fallback> {
    let top = ctx.stats.top_pairs(ctx.config.top_pairs);
    let &((a, b), _) = top
        .choose(rng)
        .ok_or(Fallback::InsufficientData { required: 1, available: 0 })?;
    Ok(complete(BTreeSet::from([a, b]), rng))
}

pub fn ending_pattern<R: Rng + ?Sized>(rng: &mut R) -> Combination {
    let groups = ending_groups();
    let mut seed = BTreeSet::new();
    // Les chiffres sont tirés avec remise : un même groupe peut revenir.
    for _ in 0..rng.random_range(1..=3) {
        let digit = rng.random_range(0..groups.len());
        if let Some(&n) = groups[digit].choose(rng) {
            seed.insert(n);
        }
    }
    complete(seed, rng)
}

pub fn carryover_unseen_mix<R: Rng + ?Sized>(ctx: &Context<'_>, rng: &mut R) -> Result<Combination, Fallback> {
    let required = ctx.config.carryover_min_history;
    let available = ctx.history.len();
    let latest = match ctx.history.latest() {
        Some(latest) if available >= required => latest,
        _ => return Err(Fallback::InsufficientData { required, available }),
    };

    let mut seed = BTreeSet::new();
    let carried = rng.random_range(1..=2);
    seed.extend(pick(latest.numbers(), carried, rng));
    let unseen = rng.random_range(2..=3);
    seed.extend(pick(&ctx.stats.long_term_unseen, unseen, rng));
    Ok(complete(seed, rng))
}

pub fn same_ending_mix<R: Rng + ?Sized>(rng: &mut R) -> Combination {
    let groups: Vec<Vec<u8>> = ending_groups().into_iter().filter(|g| g.len() >= 2).collect();
    let seed: BTreeSet<u8> = match groups.choose(rng) {
        Some(group) => pick(group, 2, rng).into_iter().collect(),
        None => BTreeSet::new(),
    };
    complete(seed, rng)
}
