use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

/// One normalized (country, GDP in billions USD) row, as persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct GdpRecord {
    pub country: String,
    pub gdp_usd_billions: f64,
}

pub fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("opening database {}", path.display()))?;
    Ok(conn)
}

/// Write the full table under `table_name` with replace semantics: any
/// existing table of that name is dropped first, so loading twice leaves
/// exactly one copy.
pub fn replace_table(conn: &Connection, table_name: &str, records: &[GdpRecord]) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {table};
         CREATE TABLE {table} (
             Country          TEXT,
             GDP_USD_billions REAL
         );",
        table = table_name
    ))?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {} (Country, GDP_USD_billions) VALUES (?1, ?2)",
            table_name
        ))?;
        for r in records {
            stmt.execute(rusqlite::params![r.country, r.gdp_usd_billions])?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Run a read query returning (Country, GDP_USD_billions) rows in the
/// order the store yields them.
pub fn query_records(conn: &Connection, sql: &str) -> Result<Vec<GdpRecord>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(GdpRecord {
                country: row.get(0)?,
                gdp_usd_billions: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count_rows(conn: &Connection, table_name: &str) -> Result<usize> {
    let count: usize = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", table_name),
        [],
        |r| r.get(0),
    )?;
    Ok(count)
}
