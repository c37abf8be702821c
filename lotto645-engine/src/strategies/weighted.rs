use rand::Rng;

use super::Context;
use crate::combination::{universe, Combination};
use crate::error::Fallback;
use crate::sampling::weighted_distinct;

/// Poids = fréquence ; seuls les numéros déjà sortis peuvent être tirés.
pub fn frequency_weighted<R: Rng + ?Sized>(ctx: &Context<'_>, rng: &mut R) -> Result<Combination, Fallback> {
    let population: Vec<u8> = ctx.stats.frequency.keys().copied().collect();
    let weights: Vec<u32> = ctx.stats.frequency.values().copied().collect();
    weighted_distinct(&population, &weights, ctx.config.weighted_attempts, rng)
}

/// Poids = (fréquence max - fréquence) + 1 sur tout l'univers.
pub fn inverse_frequency_weighted<R: Rng + ?Sized>(ctx: &Context<'_>, rng: &mut R) -> Result<Combination, Fallback> {
    let max = ctx.stats.max_frequency();
    let population: Vec<u8> = universe().collect();
    let weights: Vec<u32> = population
        .iter()
        .map(|&n| max - ctx.stats.frequency_of(n) + 1)
        .collect();
    weighted_distinct(&population, &weights, ctx.config.weighted_attempts, rng)
}
