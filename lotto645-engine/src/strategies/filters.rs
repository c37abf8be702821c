//! Stratégies par rejet : tirages uniformes filtrés par un prédicat.

use rand::Rng;

use super::Context;
use crate::combination::{pair, Combination};
use crate::error::Fallback;
use crate::sampling::rejection_sample;

pub const PRIMES: [u8; 14] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43];

pub fn is_balanced(c: &Combination) -> bool {
    (2..=4).contains(&c.even_count())
}

pub fn has_consecutive(c: &Combination) -> bool {
    c.numbers().windows(2).any(|w| w[1] == w[0] + 1)
}

pub fn prime_count(c: &Combination) -> usize {
    c.numbers().iter().filter(|&&n| PRIMES.contains(&n)).count()
}

pub fn balanced_parity<R: Rng + ?Sized>(ctx: &Context<'_>, rng: &mut R) -> Result<Combination, Fallback> {
    rejection_sample(rng, ctx.config.filter_trials, is_balanced)
}

pub fn prime_inclusive<R: Rng + ?Sized>(ctx: &Context<'_>, rng: &mut R) -> Result<Combination, Fallback> {
    rejection_sample(rng, ctx.config.filter_trials, |c| prime_count(c) >= 2)
}

pub fn consecutive_inclusive<R: Rng + ?Sized>(ctx: &Context<'_>, rng: &mut R) -> Result<Combination, Fallback> {
    rejection_sample(rng, ctx.config.filter_trials, has_consecutive)
}

/// Bornes de somme : celles de l'historique, sinon les valeurs par défaut.
pub fn sum_bounds(ctx: &Context<'_>) -> (u32, u32) {
    if ctx.history.is_empty() {
        (ctx.config.default_sum_min, ctx.config.default_sum_max)
    } else {
        (ctx.stats.sum_bounds.min, ctx.stats.sum_bounds.max)
    }
}

pub fn sum_range<R: Rng + ?Sized>(ctx: &Context<'_>, rng: &mut R) -> Result<Combination, Fallback> {
    let (min, max) = sum_bounds(ctx);
    sum_range_between(min, max, ctx.config.filter_trials, rng)
}

pub fn sum_range_between<R: Rng + ?Sized>(
    min: u32,
    max: u32,
    trials: usize,
    rng: &mut R,
) -> Result<Combination, Fallback> {
    rejection_sample(rng, trials, |c| (min..=max).contains(&c.sum()))
}

pub fn statistical_optimal<R: Rng + ?Sized>(ctx: &Context<'_>, rng: &mut R) -> Result<Combination, Fallback> {
    let (min, max) = (ctx.stats.sum_bounds.min, ctx.stats.sum_bounds.max);
    rejection_sample(rng, ctx.config.strict_filter_trials, |c| {
        is_balanced(c) && (min..=max).contains(&c.sum())
    })
}

pub fn compatibility_filtered<R: Rng + ?Sized>(ctx: &Context<'_>, rng: &mut R) -> Result<Combination, Fallback> {
    let incompatible = &ctx.stats.incompatible_pairs;
    rejection_sample(rng, ctx.config.strict_filter_trials, |c| {
        !c.pairs().any(|(a, b)| incompatible.contains(&pair(a, b)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combination::History;
    use crate::config::EngineConfig;
    use crate::statistics::{analyze, Statistics};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn combo(numbers: [u8; 6]) -> Combination {
        Combination::new(&numbers).unwrap()
    }

    #[test]
    fn test_predicates() {
        assert!(is_balanced(&combo([1, 2, 3, 4, 5, 7])));
        assert!(!is_balanced(&combo([1, 3, 5, 7, 9, 2])));
        assert!(!is_balanced(&combo([2, 4, 6, 8, 10, 1])));
        assert!(has_consecutive(&combo([1, 3, 5, 7, 9, 10])));
        assert!(!has_consecutive(&combo([1, 3, 5, 7, 9, 11])));
        assert_eq!(prime_count(&combo([2, 3, 4, 6, 8, 10])), 2);
        assert_eq!(prime_count(&combo([1, 4, 6, 8, 9, 10])), 0);
    }

    #[test]
    fn test_filters_hold() {
        let history = History::empty();
        let stats = Statistics::default();
        let config = EngineConfig::default();
        let ctx = Context { history: &history, stats: &stats, config: &config };
        let mut rng = StdRng::seed_from_u64(17);

        for _ in 0..200 {
            assert!(is_balanced(&balanced_parity(&ctx, &mut rng).unwrap()));
            assert!(prime_count(&prime_inclusive(&ctx, &mut rng).unwrap()) >= 2);
            assert!(has_consecutive(&consecutive_inclusive(&ctx, &mut rng).unwrap()));
        }
    }

    #[test]
    fn test_sum_range_default_bounds_without_history() {
        let history = History::empty();
        let stats = Statistics::default();
        let config = EngineConfig::default();
        let ctx = Context { history: &history, stats: &stats, config: &config };
        assert_eq!(sum_bounds(&ctx), (111, 170));
    }

    #[test]
    fn test_sum_range_uses_history_bounds() {
        // sommes 111 et 170
        let history = History::new([[1u8, 2, 3, 30, 35, 40], [10, 20, 30, 35, 37, 38]]).unwrap();
        let stats = analyze(&history);
        let config = EngineConfig::default();
        let ctx = Context { history: &history, stats: &stats, config: &config };
        assert_eq!(sum_bounds(&ctx), (111, 170));

        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..1000 {
            let c = sum_range(&ctx, &mut rng).unwrap();
            assert!((111..=170).contains(&c.sum()), "somme {} hors bornes", c.sum());
        }
    }

    #[test]
    fn test_sum_range_impossible_bounds_exhaust() {
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(
            sum_range_between(300, 400, 100, &mut rng),
            Err(Fallback::SamplingExhausted { trials: 100 })
        );
    }

    #[test]
    fn test_statistical_optimal_conditions() {
        let history = History::new([[1u8, 2, 3, 30, 35, 40], [10, 20, 30, 35, 37, 38]]).unwrap();
        let stats = analyze(&history);
        let config = EngineConfig::default();
        let ctx = Context { history: &history, stats: &stats, config: &config };
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..300 {
            let c = statistical_optimal(&ctx, &mut rng).unwrap();
            assert!(is_balanced(&c));
            assert!((111..=170).contains(&c.sum()));
        }
    }

    #[test]
    fn test_compatibility_avoids_incompatible_pairs() {
        let history = History::new([[1u8, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12]]).unwrap();
        let stats = analyze(&history);
        let config = EngineConfig::default();
        let ctx = Context { history: &history, stats: &stats, config: &config };
        let mut rng = StdRng::seed_from_u64(12);

        for _ in 0..300 {
            let c = compatibility_filtered(&ctx, &mut rng).unwrap();
            assert!(c.pairs().all(|p| !stats.incompatible_pairs.contains(&p)), "{c}");
        }
    }
}
