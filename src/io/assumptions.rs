//! Rate assumptions stored as CSV, one row per year of age starting at zero.

use std::io::Read;
use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::rates::{RateTableError, RateTables};

#[derive(Debug, Error)]
pub enum AssumptionsError {
    #[error("failed to open assumptions file {path}: {source}")]
    Open { path: PathBuf, source: csv::Error },
    #[error("assumptions row for age {age} is malformed: {source}")]
    Row { age: usize, source: csv::Error },
    #[error("invalid assumptions: {0}")]
    Invalid(#[from] RateTableError),
}

#[derive(Debug, Deserialize)]
struct AssumptionRow {
    #[serde(rename = "Birth Rate - Female")]
    birth_rate: f64,
    #[serde(rename = "Mortality Rate - Female")]
    female_mortality: f64,
    #[serde(rename = "Mortality Rate - Male")]
    male_mortality: f64,
}

/// The three per-age columns of an assumptions file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assumptions {
    pub birth_rate: Vec<f64>,
    pub female_mortality: Vec<f64>,
    pub male_mortality: Vec<f64>,
}

impl Assumptions {
    pub fn from_reader(reader: impl Read) -> Result<Self, AssumptionsError> {
        let mut rows = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut assumptions = Assumptions::default();
        for (age, result) in rows.deserialize::<AssumptionRow>().enumerate() {
            let row = result.map_err(|source| AssumptionsError::Row { age, source })?;
            assumptions.birth_rate.push(row.birth_rate);
            assumptions.female_mortality.push(row.female_mortality);
            assumptions.male_mortality.push(row.male_mortality);
        }
        Ok(assumptions)
    }

    pub fn into_rate_tables(self) -> Result<RateTables, AssumptionsError> {
        let tables = RateTables::from_vectors(
            &self.birth_rate,
            &self.female_mortality,
            &self.male_mortality,
        )?;
        Ok(tables)
    }
}

/// Reads and validates an assumptions CSV into rate tables.
pub fn load_csv(path: impl AsRef<Path>) -> Result<RateTables, AssumptionsError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|err| AssumptionsError::Open {
        path: path.to_path_buf(),
        source: csv::Error::from(err),
    })?;
    let tables = Assumptions::from_reader(file)?.into_rate_tables()?;
    info!("Loaded rate assumptions from {}", path.display());
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::Sex;
    use crate::rates::TABLE_ROWS;

    fn csv_text(rows: usize, birth: &str) -> String {
        let mut text =
            String::from("Birth Rate - Female,Mortality Rate - Female,Mortality Rate - Male\n");
        for _ in 0..rows {
            text.push_str(&format!("{birth},0.01,0.02\n"));
        }
        text
    }

    #[test]
    fn reads_columns_by_header() {
        let tables = Assumptions::from_reader(csv_text(TABLE_ROWS, "0.05").as_bytes())
            .unwrap()
            .into_rate_tables()
            .unwrap();
        assert_eq!(tables.birth_rate(30), Some(0.05));
        assert_eq!(tables.mortality_rate(Sex::Female, 30), Some(0.01));
        assert_eq!(tables.mortality_rate(Sex::Male, 30), Some(0.02));
    }

    #[test]
    fn non_numeric_value_is_fatal() {
        let err = Assumptions::from_reader(csv_text(3, "lots").as_bytes()).unwrap_err();
        assert!(matches!(err, AssumptionsError::Row { age: 0, .. }));
    }

    #[test]
    fn short_table_is_fatal() {
        let err = Assumptions::from_reader(csv_text(80, "0.05").as_bytes())
            .unwrap()
            .into_rate_tables()
            .unwrap_err();
        assert!(matches!(
            err,
            AssumptionsError::Invalid(RateTableError::Length { found: 80, .. })
        ));
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = load_csv("/nonexistent/assumptions.csv").unwrap_err();
        assert!(matches!(err, AssumptionsError::Open { .. }));
    }
}
