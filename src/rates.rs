//! Age and sex indexed rate tables.

use std::collections::HashMap;
use std::hash::Hash;

use thiserror::Error;

use crate::population::Sex;

/// Rate tables cover ages `0..=MAX_TABLE_AGE`, one row per year of age.
pub const MAX_TABLE_AGE: u32 = 100;
pub const TABLE_ROWS: usize = MAX_TABLE_AGE as usize + 1;

#[derive(Debug, Error)]
pub enum RateTableError {
    #[error("{column} has {found} rows, expected {expected}")]
    Length {
        column: &'static str,
        found: usize,
        expected: usize,
    },
    #[error("{column} at age {age} is not a finite number")]
    NotFinite { column: &'static str, age: usize },
    #[error("{column} at age {age} is {value}, outside [0, 1]")]
    OutOfRange {
        column: &'static str,
        age: usize,
        value: f64,
    },
}

/// Immutable keyed lookup of probabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable<K: Eq + Hash> {
    rates: HashMap<K, f64>,
}

impl<K: Eq + Hash> RateTable<K> {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (K, f64)>) -> Self {
        Self {
            rates: pairs.into_iter().collect(),
        }
    }

    pub fn get(&self, key: &K) -> Option<f64> {
        self.rates.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Decides a stochastic transition. A key missing from the rate table never
/// triggers the transition; otherwise it happens when `draw < rate`.
pub fn trial_occurs(rate: Option<f64>, draw: f64) -> bool {
    match rate {
        Some(rate) => draw < rate,
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateTables {
    pub birth: RateTable<u32>,
    pub mortality: RateTable<(Sex, u32)>,
}

impl RateTables {
    /// Builds the tables from per-age vectors where position equals age in years.
    /// Values are validated, never clamped.
    pub fn from_vectors(
        birth: &[f64],
        female_mortality: &[f64],
        male_mortality: &[f64],
    ) -> Result<Self, RateTableError> {
        validate_column("birth rate", birth)?;
        validate_column("female mortality rate", female_mortality)?;
        validate_column("male mortality rate", male_mortality)?;

        let birth = RateTable::from_pairs(ages().zip(birth.iter().copied()));
        let mortality = RateTable::from_pairs(
            ages()
                .zip(female_mortality.iter().copied())
                .map(|(age, rate)| ((Sex::Female, age), rate))
                .chain(
                    ages()
                        .zip(male_mortality.iter().copied())
                        .map(|(age, rate)| ((Sex::Male, age), rate)),
                ),
        );
        Ok(Self { birth, mortality })
    }

    pub fn birth_rate(&self, age_years: u32) -> Option<f64> {
        self.birth.get(&age_years)
    }

    pub fn mortality_rate(&self, sex: Sex, age_years: u32) -> Option<f64> {
        self.mortality.get(&(sex, age_years))
    }
}

fn ages() -> impl Iterator<Item = u32> {
    0..=MAX_TABLE_AGE
}

fn validate_column(column: &'static str, values: &[f64]) -> Result<(), RateTableError> {
    if values.len() != TABLE_ROWS {
        return Err(RateTableError::Length {
            column,
            found: values.len(),
            expected: TABLE_ROWS,
        });
    }
    for (age, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(RateTableError::NotFinite { column, age });
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(RateTableError::OutOfRange { column, age, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(value: f64) -> Vec<f64> {
        vec![value; TABLE_ROWS]
    }

    #[test]
    fn absent_rate_never_triggers() {
        assert!(!trial_occurs(None, 0.0));
        assert!(!trial_occurs(Some(0.0), 0.0));
        assert!(trial_occurs(Some(1.0), 0.999_999));
        assert!(trial_occurs(Some(0.5), 0.25));
        assert!(!trial_occurs(Some(0.5), 0.5));
    }

    #[test]
    fn lookups_are_keyed_by_sex_and_age() {
        let mut female = flat(0.01);
        female[70] = 0.2;
        let mut male = flat(0.02);
        male[70] = 1.0;
        let tables = RateTables::from_vectors(&flat(0.0), &female, &male).unwrap();
        assert_eq!(tables.mortality_rate(Sex::Female, 70), Some(0.2));
        assert_eq!(tables.mortality_rate(Sex::Male, 70), Some(1.0));
        assert_eq!(tables.mortality_rate(Sex::Male, 101), None);
        assert_eq!(tables.birth_rate(100), Some(0.0));
        assert_eq!(tables.birth_rate(101), None);
        assert_eq!(tables.mortality.len(), 2 * TABLE_ROWS);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = RateTables::from_vectors(&flat(0.1)[..50], &flat(0.1), &flat(0.1)).unwrap_err();
        assert!(matches!(
            err,
            RateTableError::Length {
                found: 50,
                expected: TABLE_ROWS,
                ..
            }
        ));
    }

    #[test]
    fn out_of_range_is_rejected_not_clamped() {
        let mut male = flat(0.1);
        male[42] = 1.5;
        let err = RateTables::from_vectors(&flat(0.1), &flat(0.1), &male).unwrap_err();
        assert!(matches!(err, RateTableError::OutOfRange { age: 42, .. }));

        let mut birth = flat(0.1);
        birth[3] = f64::NAN;
        let err = RateTables::from_vectors(&birth, &flat(0.1), &flat(0.1)).unwrap_err();
        assert!(matches!(err, RateTableError::NotFinite { age: 3, .. }));
    }
}
