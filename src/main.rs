mod db;
mod extract;
mod load;
mod progress;
mod transform;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rusqlite::Connection;

use db::GdpRecord;

const DEFAULT_URL: &str = "https://web.archive.org/web/20230902185326/https://en.wikipedia.org/wiki/List_of_countries_by_GDP_%28nominal%29";

#[derive(Parser)]
#[command(name = "gdp_etl", about = "Countries-by-GDP ETL: scrape, normalize, persist, verify")]
struct Cli {
    /// Source page holding the GDP table
    #[arg(long, default_value = DEFAULT_URL)]
    url: String,
    /// Output CSV path
    #[arg(long, default_value = "Countries_by_GDP.csv")]
    csv_path: PathBuf,
    /// Output SQLite database path
    #[arg(long, default_value = "World_Economies.db")]
    db_path: PathBuf,
    /// Destination table name
    #[arg(long, default_value = "Countries_by_GDP")]
    table_name: String,
    /// Progress log path
    #[arg(long, default_value = "etl_project_log.txt")]
    log_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    run(&cli).await
}

async fn run(cli: &Cli) -> Result<()> {
    progress::log_progress(&cli.log_path, "Initiating ETL process.");

    let client = reqwest::Client::new();
    let rows = extract::extract(&client, &cli.url).await?;
    progress::log_progress(
        &cli.log_path,
        "Extraction complete now initiating transformation process.",
    );

    let outcome = transform::transform(rows);
    if !outcome.skipped.is_empty() {
        println!(
            "Skipped {} rows with unparseable GDP figures.",
            outcome.skipped.len()
        );
    }
    print_table(&outcome.records);
    progress::log_progress(
        &cli.log_path,
        "Data transformation complete now initiating loading process.",
    );

    load::write_csv(&outcome.records, &cli.csv_path)?;
    progress::log_progress(&cli.log_path, "Data saved to CSV file.");

    let conn = db::connect(&cli.db_path)?;
    progress::log_progress(&cli.log_path, "SQLite connection established.");

    db::replace_table(&conn, &cli.table_name, &outcome.records)?;
    println!(
        "Loaded {} rows into table {}",
        db::count_rows(&conn, &cli.table_name)?,
        cli.table_name
    );
    progress::log_progress(
        &cli.log_path,
        "Data loaded to database as a table, running the query.",
    );

    let query = format!(
        "SELECT * FROM {} WHERE GDP_USD_billions >= 100",
        cli.table_name
    );
    run_query(&conn, &query)?;
    progress::log_progress(&cli.log_path, "ETL process complete.");

    conn.close().map_err(|(_, e)| e)?;
    Ok(())
}

fn print_table(records: &[GdpRecord]) {
    println!("{:>4} | {:<32} | {:>16}", "#", "Country", "GDP_USD_billions");
    println!("{}", "-".repeat(58));
    for (i, r) in records.iter().enumerate() {
        println!("{:>4} | {:<32} | {:>16.2}", i, r.country, r.gdp_usd_billions);
    }
}

fn run_query(conn: &Connection, query: &str) -> Result<()> {
    println!("{}", query);
    let rows = db::query_records(conn, query)?;
    for r in &rows {
        println!("{:<32} {:>16.2}", r.country, r.gdp_usd_billions);
    }
    println!("{} rows", rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_end_to_end() {
        let html = std::fs::read_to_string("tests/fixtures/gdp_page.html").unwrap();
        let rows = extract::parse_gdp_table(&html).unwrap();
        // World (no link) and Monaco (em dash) rows are filtered out.
        assert_eq!(rows.len(), 4);

        let outcome = transform::transform(rows);
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.records.len(), 4);
        assert_eq!(outcome.records[0].country, "United States");
        assert_eq!(outcome.records[0].gdp_usd_billions, 25462.7);

        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("Countries_by_GDP.csv");
        load::write_csv(&outcome.records, &csv_path).unwrap();
        let csv = std::fs::read_to_string(&csv_path).unwrap();
        assert!(csv.starts_with(",Country,GDP_USD_billions\n0,United States,25462.7\n"));

        let conn = db::connect(&dir.path().join("World_Economies.db")).unwrap();
        db::replace_table(&conn, "Countries_by_GDP", &outcome.records).unwrap();
        let hits = db::query_records(
            &conn,
            "SELECT * FROM Countries_by_GDP WHERE GDP_USD_billions >= 100",
        )
        .unwrap();
        let names: Vec<&str> = hits.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["United States", "China", "Germany"]);
    }
}
