use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use lotto645_db::rusqlite::Connection;
use std::io::Read;
use std::path::Path;

use lotto645_db::db::insert_draw;
use lotto645_db::models::{validate_draw, Draw};

/// Accepte `AAAA-MM-JJ` ou `AAAA.MM.JJ`, rend toujours `AAAA-MM-JJ`.
pub fn parse_date(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y.%m.%d"))
        .with_context(|| format!("Format de date invalide: '{}'", raw))?;
    Ok(date.format("%Y-%m-%d").to_string())
}

fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let get_u8 = |idx: usize| -> Result<u8> {
        let s = get(idx)?;
        s.parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))
    };

    let raw_round = get(0)?;
    let round: u32 = raw_round
        .parse()
        .with_context(|| format!("Numéro de tour invalide: '{}'", raw_round))?;
    if round == 0 {
        bail!("Le numéro de tour commence à 1");
    }

    let numbers = [get_u8(1)?, get_u8(2)?, get_u8(3)?, get_u8(4)?, get_u8(5)?, get_u8(6)?];
    let bonus = get_u8(7)?;
    validate_draw(&numbers, bonus)?;

    let draw_date = parse_date(&get(8)?)?;

    Ok(Draw {
        round,
        draw_date,
        numbers,
        bonus,
    })
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

/// Import depuis un CSV à en-tête `round,num1,...,num6,bonus,draw_date`.
pub fn import_reader<R: Read>(conn: &Connection, input: R) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult::default();

    for record_result in reader.records() {
        result.total_records += 1;
        let line = result.total_records;
        let draw = match record_result {
            Ok(record) => parse_record(&record),
            Err(e) => Err(e.into()),
        };
        match draw {
            Ok(draw) => match insert_draw(&tx, &draw) {
                Ok(true) => result.inserted += 1,
                Ok(false) => result.skipped += 1,
                Err(e) => {
                    log::warn!("Erreur insertion ligne {}: {:#}", line, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                log::warn!("Ligne {} rejetée: {:#}", line, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(result)
}

pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;
    import_reader(conn, file)
}
