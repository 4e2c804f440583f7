//! Synthetic population records stored as JSON.
//!
//! ```json
//! { "people": [ { "demographics": { "age_years": 30, "sex": "FEMALE", "ethnicity": "WHITE" },
//!                 "health": { "life_satisfaction": "HIGH", "has_cardiovascular_disease": false,
//!                             "has_diabetes": false, "has_high_blood_pressure": true, "bmi": 24.1 } } ] }
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::population::{Ethnicity, LifeSatisfaction, Person, Population, Sex, MAX_AGE_YEARS};

#[derive(Debug, Error)]
pub enum PopulationLoadError {
    #[error("failed to read population file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode population records: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("person {index} has invalid bmi {bmi}")]
    InvalidBmi { index: usize, bmi: f64 },
    #[error("person {index} has implausible age {age}")]
    InvalidAge { index: usize, age: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Demographics {
    pub age_years: u32,
    pub sex: Sex,
    pub ethnicity: Ethnicity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Health {
    pub life_satisfaction: LifeSatisfaction,
    pub has_cardiovascular_disease: bool,
    pub has_diabetes: bool,
    pub has_high_blood_pressure: bool,
    pub bmi: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRecord {
    pub demographics: Demographics,
    pub health: Health,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PopulationFile {
    pub people: Vec<PersonRecord>,
}

impl From<PersonRecord> for Person {
    fn from(record: PersonRecord) -> Self {
        Person {
            age_years: record.demographics.age_years,
            sex: record.demographics.sex,
            ethnicity: record.demographics.ethnicity,
            life_satisfaction: record.health.life_satisfaction,
            has_cardiovascular_disease: record.health.has_cardiovascular_disease,
            has_diabetes: record.health.has_diabetes,
            has_high_blood_pressure: record.health.has_high_blood_pressure,
            bmi: record.health.bmi,
        }
    }
}

impl From<&Person> for PersonRecord {
    fn from(person: &Person) -> Self {
        PersonRecord {
            demographics: Demographics {
                age_years: person.age_years,
                sex: person.sex,
                ethnicity: person.ethnicity,
            },
            health: Health {
                life_satisfaction: person.life_satisfaction,
                has_cardiovascular_disease: person.has_cardiovascular_disease,
                has_diabetes: person.has_diabetes,
                has_high_blood_pressure: person.has_high_blood_pressure,
                bmi: person.bmi,
            },
        }
    }
}

impl PopulationFile {
    pub fn from_reader(reader: impl Read) -> Result<Self, PopulationLoadError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn into_population(self) -> Result<Population, PopulationLoadError> {
        let mut people = Vec::with_capacity(self.people.len());
        for (index, record) in self.people.into_iter().enumerate() {
            let bmi = record.health.bmi;
            if !bmi.is_finite() || bmi < 0.0 {
                return Err(PopulationLoadError::InvalidBmi { index, bmi });
            }
            let age = record.demographics.age_years;
            if age > MAX_AGE_YEARS {
                return Err(PopulationLoadError::InvalidAge { index, age });
            }
            people.push(Person::from(record));
        }
        Ok(Population::from_people(people))
    }
}

impl From<&Population> for PopulationFile {
    fn from(population: &Population) -> Self {
        PopulationFile {
            people: population.iter().map(PersonRecord::from).collect(),
        }
    }
}

pub fn load_json(path: impl AsRef<Path>) -> Result<Population, PopulationLoadError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| PopulationLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let population = PopulationFile::from_reader(std::io::BufReader::new(file))?.into_population()?;
    info!(
        "Loaded {} persons from {}",
        population.len(),
        path.display()
    );
    Ok(population)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_PEOPLE: &str = r#"{ "people": [
        { "demographics": { "age_years": 30, "sex": "FEMALE", "ethnicity": "ASIAN" },
          "health": { "life_satisfaction": "LOW", "has_cardiovascular_disease": false,
                      "has_diabetes": true, "has_high_blood_pressure": false, "bmi": 22.5 } },
        { "demographics": { "age_years": 70, "sex": "MALE", "ethnicity": "WHITE" },
          "health": { "life_satisfaction": "HIGH", "has_cardiovascular_disease": true,
                      "has_diabetes": false, "has_high_blood_pressure": true, "bmi": 29.0 } }
    ] }"#;

    #[test]
    fn decodes_nested_records() {
        let population = PopulationFile::from_reader(TWO_PEOPLE.as_bytes())
            .unwrap()
            .into_population()
            .unwrap();
        assert_eq!(population.len(), 2);
        let mother = &population.people()[0];
        assert_eq!(mother.sex, Sex::Female);
        assert_eq!(mother.ethnicity, Ethnicity::Asian);
        assert!(mother.has_diabetes);
        assert_eq!(population.people()[1].age_years, 70);
    }

    #[test]
    fn unknown_sex_code_is_fatal() {
        let text = TWO_PEOPLE.replacen("\"MALE\"", "\"UNKNOWN\"", 1);
        let err = PopulationFile::from_reader(text.as_bytes()).unwrap_err();
        assert!(matches!(err, PopulationLoadError::Decode(_)));
    }

    #[test]
    fn negative_age_is_fatal() {
        let text = TWO_PEOPLE.replacen("\"age_years\": 30", "\"age_years\": -3", 1);
        assert!(PopulationFile::from_reader(text.as_bytes()).is_err());
    }

    #[test]
    fn implausible_age_is_fatal() {
        let text = TWO_PEOPLE.replacen("\"age_years\": 70", "\"age_years\": 4294967295", 1);
        let err = PopulationFile::from_reader(text.as_bytes())
            .unwrap()
            .into_population()
            .unwrap_err();
        assert!(matches!(
            err,
            PopulationLoadError::InvalidAge { index: 1, age: u32::MAX }
        ));

        let text = TWO_PEOPLE.replacen("\"age_years\": 70", "\"age_years\": 150", 1);
        let population = PopulationFile::from_reader(text.as_bytes())
            .unwrap()
            .into_population()
            .unwrap();
        assert_eq!(population.people()[1].age_years, MAX_AGE_YEARS);
    }

    #[test]
    fn empty_people_is_valid() {
        let population = PopulationFile::from_reader(r#"{ "people": [] }"#.as_bytes())
            .unwrap()
            .into_population()
            .unwrap();
        assert!(population.is_empty());
    }

    #[test]
    fn records_survive_a_file_round_trip() {
        let population = PopulationFile::from_reader(TWO_PEOPLE.as_bytes())
            .unwrap()
            .into_population()
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.json");
        let file = PopulationFile::from(&population);
        std::fs::write(&path, serde_json::to_string(&file).unwrap()).unwrap();
        assert_eq!(load_json(&path).unwrap(), population);
    }
}
