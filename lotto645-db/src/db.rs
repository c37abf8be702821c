use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row};
use std::path::Path;

use crate::models::Draw;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    round      INTEGER PRIMARY KEY,
    draw_date  TEXT NOT NULL,
    num1       INTEGER NOT NULL,
    num2       INTEGER NOT NULL,
    num3       INTEGER NOT NULL,
    num4       INTEGER NOT NULL,
    num5       INTEGER NOT NULL,
    num6       INTEGER NOT NULL,
    bonus      INTEGER NOT NULL
);
";

const SELECT_COLUMNS: &str =
    "SELECT round, draw_date, num1, num2, num3, num4, num5, num6, bonus FROM draws";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lotto645.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (round, draw_date, num1, num2, num3, num4, num5, num6, bonus)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            draw.round,
            draw.draw_date,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.numbers[5],
            draw.bonus,
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

fn row_to_draw(row: &Row<'_>) -> rusqlite::Result<Draw> {
    Ok(Draw {
        round: row.get(0)?,
        draw_date: row.get(1)?,
        numbers: [
            row.get::<_, u8>(2)?,
            row.get::<_, u8>(3)?,
            row.get::<_, u8>(4)?,
            row.get::<_, u8>(5)?,
            row.get::<_, u8>(6)?,
            row.get::<_, u8>(7)?,
        ],
        bonus: row.get(8)?,
    })
}

/// Tous les tirages en ordre chronologique (le plus ancien en premier).
pub fn fetch_all_draws(conn: &Connection) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY round ASC"))?;
    let draws = stmt
        .query_map([], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

/// Les `limit` derniers tirages, le plus récent en premier.
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY round DESC LIMIT ?1"))?;
    let draws = stmt
        .query_map([limit], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

/// Tirages dont le numéro de tour est dans `[from, to]`, par tour décroissant.
pub fn fetch_draws_by_range(conn: &Connection, from: u32, to: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} WHERE round BETWEEN ?1 AND ?2 ORDER BY round DESC"
    ))?;
    let draws = stmt
        .query_map([from, to], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn fetch_draw(conn: &Connection, round: u32) -> Result<Option<Draw>> {
    let draw = conn
        .query_row(&format!("{SELECT_COLUMNS} WHERE round = ?1"), [round], row_to_draw)
        .optional()?;
    Ok(draw)
}

pub fn latest_round(conn: &Connection) -> Result<Option<u32>> {
    let round: Option<u32> = conn.query_row("SELECT MAX(round) FROM draws", [], |row| row.get(0))?;
    Ok(round)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draw(round: u32) -> Draw {
        Draw {
            round,
            draw_date: format!("2024-01-{:02}", (round % 28) + 1),
            numbers: [1, 2, 3, 4, 5, 6],
            bonus: 7,
        }
    }

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_and_count() {
        let conn = memory_db();
        assert_eq!(count_draws(&conn).unwrap(), 0);

        insert_draw(&conn, &test_draw(1)).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_ignored() {
        let conn = memory_db();

        let inserted = insert_draw(&conn, &test_draw(1)).unwrap();
        assert!(inserted);
        let inserted = insert_draw(&conn, &test_draw(1)).unwrap();
        assert!(!inserted);
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_fetch_all_chronological() {
        let conn = memory_db();

        insert_draw(&conn, &test_draw(3)).unwrap();
        insert_draw(&conn, &test_draw(1)).unwrap();
        insert_draw(&conn, &test_draw(2)).unwrap();

        let draws = fetch_all_draws(&conn).unwrap();
        let rounds: Vec<u32> = draws.iter().map(|d| d.round).collect();
        assert_eq!(rounds, vec![1, 2, 3]);
        assert_eq!(draws[0].numbers, [1, 2, 3, 4, 5, 6]);
        assert_eq!(draws[0].bonus, 7);
    }

    #[test]
    fn test_fetch_last_order() {
        let conn = memory_db();
        for round in 1..=5 {
            insert_draw(&conn, &test_draw(round)).unwrap();
        }

        let draws = fetch_last_draws(&conn, 2).unwrap();
        let rounds: Vec<u32> = draws.iter().map(|d| d.round).collect();
        assert_eq!(rounds, vec![5, 4]);
    }

    #[test]
    fn test_fetch_by_range() {
        let conn = memory_db();
        for round in 1..=10 {
            insert_draw(&conn, &test_draw(round)).unwrap();
        }

        let draws = fetch_draws_by_range(&conn, 4, 6).unwrap();
        let rounds: Vec<u32> = draws.iter().map(|d| d.round).collect();
        assert_eq!(rounds, vec![6, 5, 4]);
    }

    #[test]
    fn test_fetch_single_draw() {
        let conn = memory_db();
        insert_draw(&conn, &test_draw(42)).unwrap();

        assert_eq!(fetch_draw(&conn, 42).unwrap(), Some(test_draw(42)));
        assert_eq!(fetch_draw(&conn, 43).unwrap(), None);
    }

    #[test]
    fn test_latest_round() {
        let conn = memory_db();
        assert_eq!(latest_round(&conn).unwrap(), None);

        insert_draw(&conn, &test_draw(12)).unwrap();
        insert_draw(&conn, &test_draw(7)).unwrap();
        assert_eq!(latest_round(&conn).unwrap(), Some(12));
    }
}
