//! Geocoded CSV output.

use std::io;
use std::path::Path;

use litter_core::Result;

use crate::geocode::GeocodedBlock;

/// Columns appended to the input columns.
pub const GEOCODE_COLUMNS: [&str; 3] = ["geocode_result", "lat", "lng"];

/// Writes the input rows plus [`GEOCODE_COLUMNS`] to `path`.
///
/// Parent directories are created. Blocks that failed geocoding keep their
/// row with the three extra columns left empty.
pub fn write_geocoded(path: &Path, headers: &[String], blocks: &[GeocodedBlock]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_geocoded_to(file, headers, blocks)?;
    tracing::debug!(path = %path.display(), rows = blocks.len(), "Wrote geocoded CSV");
    Ok(())
}

/// Writes the geocoded CSV to any writer.
pub fn write_geocoded_to<W: io::Write>(
    writer: W,
    headers: &[String],
    blocks: &[GeocodedBlock],
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header_row: Vec<&str> = headers.iter().map(String::as_str).collect();
    header_row.extend(GEOCODE_COLUMNS);
    csv_writer.write_record(&header_row)?;

    for geocoded in blocks {
        let mut row = geocoded.block.record.clone();
        match &geocoded.result {
            Some(result) => {
                row.push(result.to_json_string()?);
                row.push(result.lat().to_string());
                row.push(result.lng().to_string());
            }
            None => row.extend(std::iter::repeat_n(String::new(), GEOCODE_COLUMNS.len())),
        }
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}
