use anyhow::{bail, Result};

pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 45;
pub const PICK_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub round: u32,
    pub draw_date: String,
    pub numbers: [u8; PICK_COUNT],
    pub bonus: u8,
}

impl Draw {
    /// Numéros principaux triés par ordre croissant (le bonus est exclu).
    pub fn sorted_numbers(&self) -> [u8; PICK_COUNT] {
        let mut numbers = self.numbers;
        numbers.sort_unstable();
        numbers
    }
}

fn in_range(n: u8) -> bool {
    (MIN_NUMBER..=MAX_NUMBER).contains(&n)
}

pub fn validate_draw(numbers: &[u8; PICK_COUNT], bonus: u8) -> Result<()> {
    for &n in numbers {
        if !in_range(n) {
            bail!("Numéro {} hors limites ({}-{})", n, MIN_NUMBER, MAX_NUMBER);
        }
    }
    if !in_range(bonus) {
        bail!("Bonus {} hors limites ({}-{})", bonus, MIN_NUMBER, MAX_NUMBER);
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    if numbers.contains(&bonus) {
        bail!("Le bonus {} figure déjà parmi les numéros", bonus);
    }
    Ok(())
}
