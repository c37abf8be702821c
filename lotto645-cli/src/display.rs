use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::import::ImportResult;
use lotto645_db::models::Draw;
use lotto645_engine::{Combination, Statistics, Strategy};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table(vec!["Tour", "Date", "Numéros", "Bonus"]);
    for draw in draws {
        table.add_row(vec![
            draw.round.to_string(),
            draw.draw_date.clone(),
            join_numbers(&draw.sorted_numbers()),
            format!("{:2}", draw.bonus),
        ]);
    }
    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_stats(stats: &Statistics, draw_count: usize, pair_count: usize) {
    println!("\n📊 Statistiques sur {} tirages\n", draw_count);

    let mean = stats.mean_frequency();
    let mut table = new_table(vec!["Numéro", "Fréquence", "Tag"]);
    let mut numbers: Vec<u8> = (1..=45).collect();
    numbers.sort_by(|a, b| stats.frequency_of(*b).cmp(&stats.frequency_of(*a)));
    for n in numbers {
        let frequency = stats.frequency_of(n);
        let (tag, color) = if stats.hot.contains(&n) {
            ("CHAUD", Color::Green)
        } else if stats.cold.contains(&n) {
            ("FROID", Color::Red)
        } else {
            ("-", Color::White)
        };
        table.add_row(vec![
            Cell::new(format!("{:2}", n)),
            Cell::new(frequency.to_string()),
            Cell::new(tag).fg(color),
        ]);
    }
    println!("{table}");
    println!("Fréquence moyenne : {:.2}", mean);

    println!("\n── Paires les plus fréquentes ──");
    let mut table = new_table(vec!["Paire", "Occurrences"]);
    for ((a, b), count) in stats.top_pairs(pair_count) {
        table.add_row(vec![format!("{:2} - {:2}", a, b), count.to_string()]);
    }
    println!("{table}");
    println!("Paires incompatibles : {}", stats.incompatible_pairs.len());

    println!("\n── Non sortis récemment ──");
    if stats.long_term_unseen.is_empty() {
        println!("Aucun");
    } else {
        println!("{}", join_numbers(&stats.long_term_unseen));
    }

    let bounds = &stats.sum_bounds;
    println!(
        "\nSomme des tirages : min {} / max {} / moyenne {:.1}",
        bounds.min, bounds.max, bounds.mean
    );
}

pub fn display_strategies(available: &[Strategy]) {
    let mut table = new_table(vec!["#", "Identifiant", "Description", "Données", "Disponible"]);
    for (i, strategy) in Strategy::ALL.iter().enumerate() {
        let usable = available.contains(strategy);
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(strategy.name()),
            Cell::new(strategy.label()),
            Cell::new(if strategy.is_data_dependent() { "oui" } else { "non" }),
            Cell::new(if usable { "oui" } else { "non" })
                .fg(if usable { Color::Green } else { Color::Red }),
        ]);
    }
    println!("{table}");
}

pub fn display_combinations(strategy: Strategy, combinations: &[Combination]) {
    println!("\n🎲 {} ({})\n", strategy.label(), strategy.name());

    let mut table = new_table(vec!["#", "Numéros", "Somme", "Pairs"]);
    for (i, combination) in combinations.iter().enumerate() {
        table.add_row(vec![
            format!("{}", i + 1),
            join_numbers(combination.numbers()),
            combination.sum().to_string(),
            combination.even_count().to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_distribution(strategy: Strategy, counts: &[u32; 46], trials: usize, fallbacks: usize) {
    println!("\n📈 Taux d'inclusion : {} sur {} tirages\n", strategy.name(), trials);

    let uniform = 6.0 / 45.0;
    let mut table = new_table(vec!["Numéro", "Inclusions", "Taux", "Ratio / uniforme"]);
    for n in 1..=45usize {
        let rate = counts[n] as f64 / trials.max(1) as f64;
        let ratio = rate / uniform;
        let color = if ratio > 1.3 {
            Color::Green
        } else if ratio < 0.7 {
            Color::Red
        } else {
            Color::White
        };
        table.add_row(vec![
            Cell::new(format!("{:2}", n)),
            Cell::new(counts[n]),
            Cell::new(format!("{:.4}", rate)),
            Cell::new(format!("{:.2}", ratio)).fg(color),
        ]);
    }
    println!("{table}");
    println!(
        "Replis sur le tirage uniforme : {} ({:.1} %)",
        fallbacks,
        100.0 * fallbacks as f64 / trials.max(1) as f64
    );
}
