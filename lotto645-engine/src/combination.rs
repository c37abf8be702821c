use std::collections::BTreeSet;
use std::fmt;

use crate::error::{CombinationError, EngineError};

pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 45;
pub const PICK_COUNT: usize = 6;

/// Paire non ordonnée, toujours stockée avec `.0 < .1`.
pub type Pair = (u8, u8);

pub fn pair(a: u8, b: u8) -> Pair {
    if a <= b { (a, b) } else { (b, a) }
}

pub fn universe() -> impl Iterator<Item = u8> {
    MIN_NUMBER..=MAX_NUMBER
}

/// Six numéros distincts de 1 à 45, triés par ordre croissant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Combination([u8; PICK_COUNT]);

impl Combination {
    /// Valide et trie une suite de numéros quelconque.
    pub fn new(numbers: &[u8]) -> Result<Self, CombinationError> {
        if numbers.len() != PICK_COUNT {
            return Err(CombinationError::WrongLength(numbers.len()));
        }
        let mut sorted = [0u8; PICK_COUNT];
        sorted.copy_from_slice(numbers);
        sorted.sort_unstable();

        for &n in &sorted {
            if !(MIN_NUMBER..=MAX_NUMBER).contains(&n) {
                return Err(CombinationError::OutOfRange(n));
            }
        }
        if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(CombinationError::Duplicate(w[0]));
        }
        Ok(Self(sorted))
    }

    /// Construit depuis un ensemble déjà réduit à exactement six numéros valides.
    pub(crate) fn from_set(set: &BTreeSet<u8>) -> Self {
        debug_assert_eq!(set.len(), PICK_COUNT);
        let mut numbers = [0u8; PICK_COUNT];
        for (slot, &n) in numbers.iter_mut().zip(set.iter()) {
            *slot = n;
        }
        Self(numbers)
    }

    pub fn numbers(&self) -> &[u8; PICK_COUNT] {
        &self.0
    }

    pub fn contains(&self, n: u8) -> bool {
        self.0.binary_search(&n).is_ok()
    }

    pub fn sum(&self) -> u32 {
        self.0.iter().map(|&n| n as u32).sum()
    }

    pub fn even_count(&self) -> usize {
        self.0.iter().filter(|&&n| n % 2 == 0).count()
    }

    /// Les 15 paires de la combinaison.
    pub fn pairs(&self) -> impl Iterator<Item = Pair> + '_ {
        (0..PICK_COUNT).flat_map(move |i| ((i + 1)..PICK_COUNT).map(move |j| (self.0[i], self.0[j])))
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|n| format!("{:2}", n)).collect();
        write!(f, "{}", parts.join(" - "))
    }
}

impl TryFrom<[u8; PICK_COUNT]> for Combination {
    type Error = CombinationError;

    fn try_from(numbers: [u8; PICK_COUNT]) -> Result<Self, Self::Error> {
        Self::new(&numbers)
    }
}

/// Historique des tirages, du plus ancien au plus récent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    draws: Vec<Combination>,
}

impl History {
    /// Rejette tout l'historique au premier tirage malformé.
    pub fn new<I, N>(draws: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<[u8]>,
    {
        let draws = draws
            .into_iter()
            .enumerate()
            .map(|(index, numbers)| {
                Combination::new(numbers.as_ref())
                    .map_err(|source| EngineError::MalformedDraw { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { draws })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn draws(&self) -> &[Combination] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn latest(&self) -> Option<&Combination> {
        self.draws.last()
    }

    /// Les `n` tirages les plus récents, en ordre chronologique.
    pub fn recent(&self, n: usize) -> &[Combination] {
        let start = self.draws.len().saturating_sub(n);
        &self.draws[start..]
    }
}

impl From<Vec<Combination>> for History {
    fn from(draws: Vec<Combination>) -> Self {
        Self { draws }
    }
}
