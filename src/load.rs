use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;
use tracing::info;

use crate::db::GdpRecord;

/// Serialize the table as comma-delimited text with a header row and a
/// leading row-index column starting at 0, overwriting any existing file.
pub fn write_csv(records: &[GdpRecord], path: &Path) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer.write_record(["", "Country", "GDP_USD_billions"])?;
    for (i, r) in records.iter().enumerate() {
        writer.write_record([
            i.to_string(),
            r.country.clone(),
            format!("{:?}", r.gdp_usd_billions),
        ])?;
    }
    writer.flush()?;

    info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}
