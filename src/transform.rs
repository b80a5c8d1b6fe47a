use tracing::warn;

use crate::db::GdpRecord;
use crate::extract::RawRecord;

/// A row whose GDP figure did not parse as a number after separator removal.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub country: String,
    pub gdp_raw: String,
}

pub struct TransformOutcome {
    pub records: Vec<GdpRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// Convert raw GDP figures (millions USD as text, thousands separators
/// allowed) into billions rounded to 2 decimal places. Row order is
/// preserved; unparseable figures are collected into `skipped` instead of
/// aborting the batch.
pub fn transform(rows: Vec<RawRecord>) -> TransformOutcome {
    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();

    for row in rows {
        match parse_millions(&row.gdp_raw) {
            Some(millions) => records.push(GdpRecord {
                country: row.country,
                gdp_usd_billions: round_half_even(millions / 1000.0, 2),
            }),
            None => {
                warn!("Skipping {}: unparseable GDP figure {:?}", row.country, row.gdp_raw);
                skipped.push(SkippedRow { country: row.country, gdp_raw: row.gdp_raw });
            }
        }
    }

    TransformOutcome { records, skipped }
}

fn parse_millions(raw: &str) -> Option<f64> {
    raw.trim().replace(',', "").parse::<f64>().ok()
}

/// Round to `digits` decimal places, ties to even (banker's rounding).
fn round_half_even(x: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    let scaled = x * factor;
    let floor = scaled.floor();
    let rounded = if scaled - floor == 0.5 {
        if (floor as i64) % 2 == 0 {
            floor
        } else {
            floor + 1.0
        }
    } else {
        scaled.round()
    };
    rounded / factor
}
