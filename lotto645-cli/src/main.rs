mod display;
mod import;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::display::{
    display_combinations, display_distribution, display_draws, display_import_summary,
    display_stats, display_strategies,
};
use crate::import::parse_date;
use lotto645_db::db::{
    count_draws, db_path, fetch_all_draws, fetch_draw, fetch_draws_by_range, fetch_last_draws, insert_draw,
    latest_round, migrate, open_db,
};
use lotto645_db::models::{validate_draw, Draw};
use lotto645_db::rusqlite::Connection;
use lotto645_engine::{EngineConfig, GenerationEngine, History, Strategy};

const EMPTY_DB: &str = "Base vide. Lancez d'abord : lotto645 import";

#[derive(Parser)]
#[command(name = "lotto645", about = "Analyse et génération de grilles Lotto 6/45")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier CSV
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long, default_value = "lotto_data.csv")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Afficher un tour précis ou une plage de tours
    Query {
        /// Tour unique (prioritaire sur la plage)
        #[arg(short, long)]
        round: Option<u32>,

        /// Premier tour (défaut : dernier tour - 4)
        #[arg(long)]
        from: Option<u32>,

        /// Dernier tour (défaut : dernier tour)
        #[arg(long)]
        to: Option<u32>,
    },

    /// Afficher les statistiques (fréquences, paires, sommes)
    Stats {
        /// Nombre de paires fréquentes à afficher
        #[arg(short, long, default_value = "10")]
        pairs: usize,

        /// Fichier de configuration JSON du moteur
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Lister les stratégies de génération
    Strategies,

    /// Générer des grilles
    Generate {
        /// Stratégie (identifiant ou numéro 1-17)
        #[arg(short, long, default_value = "uniform-random")]
        strategy: String,

        /// Nombre de grilles
        #[arg(short, long, default_value = "5")]
        count: usize,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Fichier de configuration JSON du moteur
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Mesurer le taux d'inclusion de chaque numéro pour une stratégie
    Distribution {
        /// Stratégie (identifiant ou numéro 1-17)
        #[arg(short, long, default_value = "uniform-random")]
        strategy: String,

        /// Nombre de grilles générées
        #[arg(short, long, default_value = "1000")]
        trials: usize,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Fichier de configuration JSON du moteur
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Ajouter un tirage manuellement
    Add,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Query { round, from, to } => cmd_query(&conn, round, from, to),
        Command::Stats { pairs, config } => cmd_stats(&conn, pairs, config.as_deref()),
        Command::Strategies => cmd_strategies(&conn),
        Command::Generate {
            strategy,
            count,
            seed,
            config,
        } => cmd_generate(&conn, &strategy, count, seed, config.as_deref()),
        Command::Distribution {
            strategy,
            trials,
            seed,
            config,
        } => cmd_distribution(&conn, &strategy, trials, seed, config.as_deref()),
        Command::Add => cmd_add(&conn),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::load(p)
            .with_context(|| format!("Configuration illisible: {}", p.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// Historique chronologique construit depuis la base.
fn load_engine(conn: &Connection, config: Option<&Path>) -> Result<GenerationEngine> {
    let config = load_config(config)?;
    let draws = fetch_all_draws(conn)?;
    let history = History::new(draws.iter().map(|d| d.numbers))
        .context("Historique invalide en base")?;
    Ok(GenerationEngine::with_config(history, config))
}

fn parse_strategy(raw: &str) -> Result<Strategy> {
    raw.parse::<Strategy>()
        .with_context(|| "Lancez `lotto645 strategies` pour la liste des stratégies")
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

fn cmd_import(conn: &Connection, file: &Path) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &Connection, last: u32) -> Result<()> {
    if count_draws(conn)? == 0 {
        println!("{EMPTY_DB}");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_query(conn: &Connection, round: Option<u32>, from: Option<u32>, to: Option<u32>) -> Result<()> {
    if count_draws(conn)? == 0 {
        println!("{EMPTY_DB}");
        return Ok(());
    }
    let draws = query_draws(conn, round, from, to)?;
    if draws.is_empty() {
        if let Some(r) = round {
            println!("Tour {} introuvable.", r);
            return Ok(());
        }
    }
    display_draws(&draws);
    Ok(())
}

/// Un tour précis, sinon la plage `from..=to` (défaut : les 5 derniers tours).
fn query_draws(conn: &Connection, round: Option<u32>, from: Option<u32>, to: Option<u32>) -> Result<Vec<Draw>> {
    if let Some(r) = round {
        return Ok(fetch_draw(conn, r)?.into_iter().collect());
    }
    let Some(latest) = latest_round(conn)? else {
        return Ok(Vec::new());
    };
    let to = to.unwrap_or(latest);
    let from = from.unwrap_or_else(|| to.saturating_sub(4).max(1));
    if from > to {
        bail!("Plage invalide : {} > {}", from, to);
    }
    fetch_draws_by_range(conn, from, to)
}

fn cmd_stats(conn: &Connection, pairs: usize, config: Option<&Path>) -> Result<()> {
    let engine = load_engine(conn, config)?;
    if engine.history().is_empty() {
        println!("{EMPTY_DB}");
        return Ok(());
    }
    display_stats(engine.statistics(), engine.history().len(), pairs);
    Ok(())
}

fn cmd_strategies(conn: &Connection) -> Result<()> {
    let has_history = count_draws(conn)? > 0;
    if !has_history {
        println!("{EMPTY_DB}");
        println!("Seules les stratégies sans données sont disponibles.\n");
    }
    display_strategies(&Strategy::available(has_history));
    Ok(())
}

fn cmd_generate(
    conn: &Connection,
    strategy: &str,
    count: usize,
    seed: Option<u64>,
    config: Option<&Path>,
) -> Result<()> {
    let strategy = parse_strategy(strategy)?;
    let engine = load_engine(conn, config)?;
    if engine.history().is_empty() && strategy.is_data_dependent() {
        println!("{EMPTY_DB}");
        println!("La stratégie {} se replie sur le tirage uniforme.", strategy.name());
    }

    let mut rng = make_rng(seed);
    let combinations = engine.generate_many(strategy, count, &mut rng);
    display_combinations(strategy, &combinations);
    Ok(())
}

fn cmd_distribution(
    conn: &Connection,
    strategy: &str,
    trials: usize,
    seed: Option<u64>,
    config: Option<&Path>,
) -> Result<()> {
    let strategy = parse_strategy(strategy)?;
    let engine = load_engine(conn, config)?;
    let mut rng = make_rng(seed);

    let pb = ProgressBar::new(trials as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Template de barre invalide")?
            .progress_chars("=> "),
    );
    pb.set_message(strategy.name());

    let mut counts = [0u32; 46];
    let mut fallbacks = 0usize;
    for _ in 0..trials {
        let combination = match engine.attempt(strategy, &mut rng) {
            Ok(c) => c,
            Err(_) => {
                fallbacks += 1;
                engine.generate(Strategy::UniformRandom, &mut rng)
            }
        };
        for &n in combination.numbers() {
            counts[n as usize] += 1;
        }
        pb.inc(1);
    }
    pb.finish_with_message("terminé");

    display_distribution(strategy, &counts, trials, fallbacks);
    Ok(())
}

fn cmd_add(conn: &Connection) -> Result<()> {
    println!("Ajout d'un tirage manuellement\n");

    let next = latest_round(conn)?.map_or(1, |r| r + 1);
    let raw_round = prompt(&format!("Numéro du tour (défaut {}) : ", next))?;
    let round = if raw_round.is_empty() {
        next
    } else {
        raw_round
            .parse::<u32>()
            .with_context(|| format!("Numéro de tour invalide: '{}'", raw_round))?
    };

    let draw_date = parse_date(&prompt("Date (AAAA-MM-JJ) : ")?)?;
    let (numbers, bonus) = prompt_numbers()?;

    let draw = Draw {
        round,
        draw_date,
        numbers,
        bonus,
    };

    println!("\nTirage à insérer :");
    display_draws(std::slice::from_ref(&draw));

    let confirm = prompt("\nConfirmer l'insertion ? (o/n) : ")?;
    if confirm.trim().to_lowercase() == "o" {
        if insert_draw(conn, &draw)? {
            println!("Tirage inséré avec succès.");
        } else {
            println!("Ce tour existe déjà (doublon ignoré).");
        }
    } else {
        println!("Insertion annulée.");
    }

    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    prompt_from(&mut io::stdin().lock(), msg)
}

fn prompt_from<R: BufRead>(input: &mut R, msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut line = String::new();
    let read = input.read_line(&mut line).context("Erreur de lecture")?;
    if read == 0 {
        bail!("Entrée fermée, saisie interrompue");
    }
    Ok(line.trim().to_string())
}

fn prompt_numbers() -> Result<([u8; 6], u8)> {
    prompt_numbers_from(&mut io::stdin().lock())
}

fn prompt_numbers_from<R: BufRead>(input: &mut R) -> Result<([u8; 6], u8)> {
    loop {
        let answer = prompt_from(input, "6 numéros puis le bonus (séparés par des espaces, 1-45) : ")?;
        let nums: Result<Vec<u8>, _> = answer.split_whitespace().map(|s| s.parse::<u8>()).collect();
        match nums {
            Ok(v) if v.len() == 7 => {
                let numbers = [v[0], v[1], v[2], v[3], v[4], v[5]];
                match validate_draw(&numbers, v[6]) {
                    Ok(()) => return Ok((numbers, v[6])),
                    Err(e) => println!("{e}. Réessayez."),
                }
            }
            _ => println!("Entrez exactement 7 numéros. Réessayez."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn memory_db(rounds: &[u32]) -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        for &round in rounds {
            let draw = Draw {
                round,
                draw_date: "2024-01-06".to_string(),
                numbers: [3, 11, 19, 27, 35, 43],
                bonus: 8,
            };
            insert_draw(&conn, &draw).unwrap();
        }
        conn
    }

    #[test]
    fn test_prompt_fails_on_closed_input() {
        let mut input = Cursor::new("");
        assert!(prompt_from(&mut input, "> ").is_err());
    }

    #[test]
    fn test_prompt_numbers_stops_at_end_of_input() {
        let mut input = Cursor::new("1 2 3\n1 1 2 3 4 5 6\n");
        assert!(prompt_numbers_from(&mut input).is_err());
    }

    #[test]
    fn test_prompt_numbers_retries_then_accepts() {
        let mut input = Cursor::new("1 2 3\n1 2 3 4 5 6 6\n 6 5 4 3 2 1 45 \n");
        assert_eq!(prompt_numbers_from(&mut input).unwrap(), ([6, 5, 4, 3, 2, 1], 45));
    }

    #[test]
    fn test_query_single_round() {
        let conn = memory_db(&[1, 2, 3]);
        let draws = query_draws(&conn, Some(2), None, None).unwrap();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].round, 2);
        assert!(query_draws(&conn, Some(9), None, None).unwrap().is_empty());
    }

    #[test]
    fn test_query_default_range_is_last_five() {
        let conn = memory_db(&(1..=8).collect::<Vec<_>>());
        let rounds: Vec<u32> = query_draws(&conn, None, None, None)
            .unwrap()
            .iter()
            .map(|d| d.round)
            .collect();
        assert_eq!(rounds, vec![8, 7, 6, 5, 4]);
        assert!(query_draws(&conn, None, Some(6), Some(3)).is_err());
    }
}
