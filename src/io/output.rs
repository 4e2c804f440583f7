//! Destinations for the combined pyramid table written at finalize.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::pyramid::PyramidRow;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to encode json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported output format for {0}, expected .csv or .json")]
    UnsupportedFormat(PathBuf),
}

/// Receives the full pyramid table once, at the end of a run.
pub trait PyramidSink {
    fn write(&mut self, rows: &[PyramidRow]) -> Result<(), OutputError>;
    fn describe(&self) -> String;
}

/// Writes `year,sex,ageBand,persons` rows with a header line.
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PyramidSink for CsvSink {
    fn write(&mut self, rows: &[PyramidRow]) -> Result<(), OutputError> {
        create_parent(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;
        // Written explicitly so an empty table still carries its schema.
        writer.write_record(["year", "sex", "ageBand", "persons"])?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Writes the rows as a JSON array of objects.
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PyramidSink for JsonSink {
    fn write(&mut self, rows: &[PyramidRow]) -> Result<(), OutputError> {
        create_parent(&self.path)?;
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, rows)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Picks a sink from the file extension of `path`.
pub fn sink_for_path(path: impl AsRef<Path>) -> Result<Box<dyn PyramidSink>, OutputError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("csv") => Ok(Box::new(CsvSink::new(path))),
        Some("json") => Ok(Box::new(JsonSink::new(path))),
        _ => Err(OutputError::UnsupportedFormat(path.to_path_buf())),
    }
}

impl PyramidSink for Box<dyn PyramidSink> {
    fn write(&mut self, rows: &[PyramidRow]) -> Result<(), OutputError> {
        (**self).write(rows)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

fn create_parent(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::Sex;
    use crate::pyramid::AgeBand;

    fn rows() -> Vec<PyramidRow> {
        vec![
            PyramidRow {
                year: 2021,
                sex: Sex::Male,
                age_band: AgeBand::A95Plus,
                persons: 3,
            },
            PyramidRow {
                year: 2022,
                sex: Sex::Female,
                age_band: AgeBand::A00To04,
                persons: 12,
            },
        ]
    }

    #[test]
    fn csv_sink_writes_header_and_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("pyramids.csv");
        CsvSink::new(&path).write(&rows()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "year,sex,ageBand,persons\n2021,MALE,A95+,3\n2022,FEMALE,A00-04,12\n"
        );
    }

    #[test]
    fn csv_sink_writes_header_for_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        CsvSink::new(&path).write(&[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "year,sex,ageBand,persons\n");
    }

    #[test]
    fn json_sink_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pyramids.json");
        JsonSink::new(&path).write(&rows()).unwrap();
        let decoded: Vec<PyramidRow> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(decoded, rows());
    }

    #[test]
    fn sink_chosen_by_extension() {
        assert!(sink_for_path("out/p.CSV").is_ok());
        assert!(sink_for_path("out/p.json").is_ok());
        assert!(matches!(
            sink_for_path("out/p.parquet"),
            Err(OutputError::UnsupportedFormat(_))
        ));
    }
}
