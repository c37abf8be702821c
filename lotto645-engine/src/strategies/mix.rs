use std::collections::BTreeSet;

use rand::Rng;

use super::{Context, Strategy};
use crate::combination::Combination;
use crate::sampling::complete;

/// Union des numéros produits par chaque stratégie, ramenée à six.
/// Une stratégie qui se replie apporte son tirage uniforme comme les autres.
pub fn union_of<R, I>(strategies: I, ctx: &Context<'_>, rng: &mut R) -> Combination
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = Strategy>,
{
    let mut candidates = BTreeSet::new();
    for strategy in strategies {
        let combination = strategy.generate(ctx, rng);
        log::trace!("mélange : {} -> {}", strategy, combination);
        candidates.extend(combination.numbers().iter().copied());
    }
    complete(candidates, rng)
}

pub fn data_driven_mix<R: Rng + ?Sized>(ctx: &Context<'_>, rng: &mut R) -> Combination {
    let sources = Strategy::ALL
        .into_iter()
        .filter(|s| s.is_data_dependent() && !s.is_mix());
    union_of(sources, ctx, rng)
}

pub fn all_methods_mix<R: Rng + ?Sized>(ctx: &Context<'_>, rng: &mut R) -> Combination {
    let sources = Strategy::ALL.into_iter().filter(|s| !s.is_mix());
    union_of(sources, ctx, rng)
}
