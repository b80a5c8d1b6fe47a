use anyhow::{bail, Context, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::info;

/// Placeholder used by the source page for "data not available".
const NOT_AVAILABLE: char = '\u{2014}';

/// One unnormalized row as scraped: country display name and the GDP
/// figure exactly as it appears in the cell (thousands separators intact).
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub country: String,
    pub gdp_raw: String,
}

/// Fetch the source page and extract all valid country rows, in source order.
pub async fn extract(client: &reqwest::Client, url: &str) -> Result<Vec<RawRecord>> {
    let html = fetch_page(client, url).await?;
    parse_gdp_table(&html)
}

pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String> {
    info!("Fetching source page: {}", url);
    let html = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("requesting {}", url))?
        .error_for_status()
        .context("source page returned an error status")?
        .text()
        .await
        .context("reading source page body")?;
    Ok(html)
}

/// Locate the GDP table and pull one record per valid row.
///
/// The table is selected by its header signature (a "Country" header cell
/// plus a "GDP" header cell) rather than by document position, and the scan
/// fails if no table or more than one table matches. Row filters: rows with
/// no data cells are skipped, as are rows whose first cell has no link
/// (subtotals, footnotes) and rows whose third cell carries the em dash
/// placeholder.
pub fn parse_gdp_table(html: &str) -> Result<Vec<RawRecord>> {
    let doc = Html::parse_document(html);
    let table = find_gdp_table(&doc)?;

    let tr_sel = Selector::parse("tr").expect("Invalid CSS selector for rows");
    let td_sel = Selector::parse("td").expect("Invalid CSS selector for cells");
    let a_sel = Selector::parse("a").expect("Invalid CSS selector for links");

    let mut records = Vec::new();
    for row in table.select(&tr_sel) {
        let cells: Vec<ElementRef> = row.select(&td_sel).collect();
        if cells.len() < 3 {
            continue;
        }
        let Some(link) = cells[0].select(&a_sel).next() else {
            continue;
        };
        if cell_text(&cells[2]).contains(NOT_AVAILABLE) {
            continue;
        }
        let country = link.text().collect::<String>().trim().to_string();
        let gdp_raw = cell_text(&cells[1]);
        records.push(RawRecord { country, gdp_raw });
    }

    info!("Extracted {} country rows", records.len());
    Ok(records)
}

fn find_gdp_table<'a>(doc: &'a Html) -> Result<ElementRef<'a>> {
    let table_sel = Selector::parse("table").expect("Invalid CSS selector for tables");
    let th_sel = Selector::parse("th").expect("Invalid CSS selector for header cells");

    let matches: Vec<ElementRef> = doc
        .select(&table_sel)
        .filter(|table| {
            let headers: Vec<String> = table.select(&th_sel).map(|th| cell_text(&th)).collect();
            headers.iter().any(|h| h.contains("Country"))
                && headers.iter().any(|h| h.contains("GDP"))
        })
        .collect();

    match matches.len() {
        0 => bail!("no table with Country/GDP header signature found"),
        1 => Ok(matches[0]),
        n => bail!("{} tables match the Country/GDP header signature", n),
    }
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}
