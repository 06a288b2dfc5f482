use crate::statement::NormalizedStatement;
use anyhow::{Context, Result};
use parquet::arrow::ArrowWriter;
use parquet::basic::{BrotliLevel, Compression};
use parquet::file::properties::WriterProperties;
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Write the normalized statement as one Parquet file. The file is written
/// to a `.tmp` sibling first and renamed into place. Returns bytes on disk.
#[instrument(level = "info", skip(table, out_path), fields(out = %out_path.as_ref().display()))]
pub fn write_parquet<P: AsRef<Path>>(table: &NormalizedStatement, out_path: P) -> Result<u64> {
    let out_path = out_path.as_ref();
    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output dir {}", parent.display()))?;
    }

    let batch = table
        .to_record_batch()
        .context("building record batch")?;
    debug!(rows = batch.num_rows(), columns = batch.num_columns(), "writing batch");

    let props = WriterProperties::builder()
        .set_compression(Compression::BROTLI(BrotliLevel::try_new(5)?))
        .set_dictionary_enabled(true)
        .build();

    let temp_path = out_path.with_extension("tmp");
    let file = File::create(&temp_path)
        .with_context(|| format!("creating {}", temp_path.display()))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    fs::rename(&temp_path, out_path)
        .with_context(|| format!("renaming {} → {}", temp_path.display(), out_path.display()))?;

    let bytes = fs::metadata(out_path)?.len();
    info!(rows = batch.num_rows(), bytes, "parquet written");
    Ok(bytes)
}
