use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::MovieView;
use crate::error::DashboardError;

/// Write the rows of `view` as CSV, keeping the source header order.
///
/// Numbers are written in their shortest exact form so the output parses
/// back to the same values.
pub fn write_csv<W: Write>(view: &MovieView<'_>, writer: W) -> Result<()> {
    let columns = &view.table().columns;
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(columns).context("writing CSV header")?;

    for (n, movie) in view.iter().enumerate() {
        let record = columns
            .iter()
            .map(|col| movie.field_text(col).unwrap_or_default().into_owned());
        out.write_record(record)
            .with_context(|| format!("writing CSV row {n}"))?;
    }
    out.flush().context("flushing CSV output")?;
    Ok(())
}

/// Export `view` to a CSV file at `path`.
pub fn export_csv(view: &MovieView<'_>, path: &Path) -> Result<(), DashboardError> {
    let write = || -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        write_csv(view, std::io::BufWriter::new(file))
    };
    write().map_err(|e| DashboardError::Export(format!("{e:#}")))?;
    log::info!("Exported {} movies to {}", view.len(), path.display());
    Ok(())
}
