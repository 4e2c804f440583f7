//! Population pyramids: counts of persons by sex and five-year age band.
//!
//! Tabulation is sparse. A (sex, band) group with nobody in it produces no
//! row, so consumers must treat missing rows as zero.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::population::{Population, Sex};

const BAND_WIDTH: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    #[serde(rename = "A00-04")]
    A00To04,
    #[serde(rename = "A05-09")]
    A05To09,
    #[serde(rename = "A10-14")]
    A10To14,
    #[serde(rename = "A15-19")]
    A15To19,
    #[serde(rename = "A20-24")]
    A20To24,
    #[serde(rename = "A25-29")]
    A25To29,
    #[serde(rename = "A30-34")]
    A30To34,
    #[serde(rename = "A35-39")]
    A35To39,
    #[serde(rename = "A40-44")]
    A40To44,
    #[serde(rename = "A45-49")]
    A45To49,
    #[serde(rename = "A50-54")]
    A50To54,
    #[serde(rename = "A55-59")]
    A55To59,
    #[serde(rename = "A60-64")]
    A60To64,
    #[serde(rename = "A65-69")]
    A65To69,
    #[serde(rename = "A70-74")]
    A70To74,
    #[serde(rename = "A75-79")]
    A75To79,
    #[serde(rename = "A80-84")]
    A80To84,
    #[serde(rename = "A85-89")]
    A85To89,
    #[serde(rename = "A90-94")]
    A90To94,
    #[serde(rename = "A95+")]
    A95Plus,
}

impl AgeBand {
    pub const ALL: [AgeBand; 20] = [
        AgeBand::A00To04,
        AgeBand::A05To09,
        AgeBand::A10To14,
        AgeBand::A15To19,
        AgeBand::A20To24,
        AgeBand::A25To29,
        AgeBand::A30To34,
        AgeBand::A35To39,
        AgeBand::A40To44,
        AgeBand::A45To49,
        AgeBand::A50To54,
        AgeBand::A55To59,
        AgeBand::A60To64,
        AgeBand::A65To69,
        AgeBand::A70To74,
        AgeBand::A75To79,
        AgeBand::A80To84,
        AgeBand::A85To89,
        AgeBand::A90To94,
        AgeBand::A95Plus,
    ];

    /// Band for an age using half-open bins `[0,5)`, `[5,10)`, ..., `[95, inf)`.
    pub fn from_age(age_years: u32) -> Self {
        let index = (age_years / BAND_WIDTH) as usize;
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    pub fn lower_bound(self) -> u32 {
        self as u32 * BAND_WIDTH
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBand::A00To04 => "A00-04",
            AgeBand::A05To09 => "A05-09",
            AgeBand::A10To14 => "A10-14",
            AgeBand::A15To19 => "A15-19",
            AgeBand::A20To24 => "A20-24",
            AgeBand::A25To29 => "A25-29",
            AgeBand::A30To34 => "A30-34",
            AgeBand::A35To39 => "A35-39",
            AgeBand::A40To44 => "A40-44",
            AgeBand::A45To49 => "A45-49",
            AgeBand::A50To54 => "A50-54",
            AgeBand::A55To59 => "A55-59",
            AgeBand::A60To64 => "A60-64",
            AgeBand::A65To69 => "A65-69",
            AgeBand::A70To74 => "A70-74",
            AgeBand::A75To79 => "A75-79",
            AgeBand::A80To84 => "A80-84",
            AgeBand::A85To89 => "A85-89",
            AgeBand::A90To94 => "A90-94",
            AgeBand::A95Plus => "A95+",
        }
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PyramidRow {
    pub year: i32,
    pub sex: Sex,
    #[serde(rename = "ageBand")]
    pub age_band: AgeBand,
    pub persons: u64,
}

/// One year's pyramid, immutable once tabulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyramidSnapshot {
    year: i32,
    rows: Vec<PyramidRow>,
}

impl PyramidSnapshot {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn rows(&self) -> &[PyramidRow] {
        &self.rows
    }

    pub fn total_persons(&self) -> u64 {
        self.rows.iter().map(|row| row.persons).sum()
    }

    pub fn persons(&self, sex: Sex, age_band: AgeBand) -> u64 {
        self.rows
            .iter()
            .find(|row| row.sex == sex && row.age_band == age_band)
            .map(|row| row.persons)
            .unwrap_or(0)
    }
}

/// Counts `population` by (sex, band), ordered by sex then band.
pub fn tabulate(population: &Population, year: i32) -> PyramidSnapshot {
    let mut counts: BTreeMap<(Sex, AgeBand), u64> = BTreeMap::new();
    for person in population.iter() {
        *counts
            .entry((person.sex, AgeBand::from_age(person.age_years)))
            .or_insert(0) += 1;
    }
    let rows = counts
        .into_iter()
        .map(|((sex, age_band), persons)| PyramidRow {
            year,
            sex,
            age_band,
            persons,
        })
        .collect();
    PyramidSnapshot { year, rows }
}

/// Concatenates snapshots into one table in accumulation order.
pub fn concat(snapshots: &[PyramidSnapshot]) -> Vec<PyramidRow> {
    snapshots
        .iter()
        .flat_map(|snapshot| snapshot.rows.iter().copied())
        .collect()
}
