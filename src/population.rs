use serde::{Deserialize, Serialize};

use crate::rates::RateTable;

/// BMI assigned to every newborn.
pub const NEWBORN_BMI: f64 = 10.0;

/// Oldest age accepted from a population file.
pub const MAX_AGE_YEARS: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ethnicity {
    White,
    Black,
    Asian,
    Mixed,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifeSatisfaction {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub age_years: u32,
    pub sex: Sex,
    pub ethnicity: Ethnicity,
    pub life_satisfaction: LifeSatisfaction,
    pub has_cardiovascular_disease: bool,
    pub has_diabetes: bool,
    pub has_high_blood_pressure: bool,
    pub bmi: f64,
}

impl Person {
    /// A person aged zero carrying the mother's ethnicity and default health markers.
    pub fn newborn(ethnicity: Ethnicity, sex: Sex) -> Self {
        Self {
            age_years: 0,
            sex,
            ethnicity,
            life_satisfaction: LifeSatisfaction::Medium,
            has_cardiovascular_disease: false,
            has_diabetes: false,
            has_high_blood_pressure: false,
            bmi: NEWBORN_BMI,
        }
    }
}

/// A row of the store paired with the rate looked up for it.
///
/// Joined views borrow the store and are dropped once a transition has been
/// decided, so looked-up rates and draws never become columns of the store.
#[derive(Debug, Clone, Copy)]
pub struct Joined<'a> {
    pub person: &'a Person,
    pub rate: Option<f64>,
}

/// Row-oriented store of the living population.
///
/// No operation depends on row order; the order is kept stable only so that
/// random draws are consumed identically for a given seed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    people: Vec<Person>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_people(people: Vec<Person>) -> Self {
        Self { people }
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.people.iter()
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn filter_by_sex(&self, sex: Sex) -> Vec<&Person> {
        self.people.iter().filter(|p| p.sex == sex).collect()
    }

    pub fn count_by_sex(&self, sex: Sex) -> usize {
        self.people.iter().filter(|p| p.sex == sex).count()
    }

    /// Left join of `rows` against `table` on the key produced by `key`.
    /// Rows whose key is missing from the table carry `rate: None`.
    pub fn join_by_key<'a, K, I, F>(rows: I, table: &RateTable<K>, key: F) -> Vec<Joined<'a>>
    where
        K: Eq + std::hash::Hash,
        I: IntoIterator<Item = &'a Person>,
        F: Fn(&Person) -> K,
    {
        rows.into_iter()
            .map(|person| Joined {
                person,
                rate: table.get(&key(person)),
            })
            .collect()
    }

    pub fn append_rows(&mut self, rows: impl IntoIterator<Item = Person>) -> usize {
        let before = self.people.len();
        self.people.extend(rows);
        self.people.len() - before
    }

    /// Drops every person for which `predicate(position, person)` holds and
    /// returns how many were removed. Positions refer to the store before removal.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(usize, &Person) -> bool,
    {
        let before = self.people.len();
        let mut position = 0;
        self.people.retain(|person| {
            let remove = predicate(position, person);
            position += 1;
            !remove
        });
        before - self.people.len()
    }

    pub fn increment_age(&mut self, delta: u32) {
        for person in &mut self.people {
            person.age_years = person.age_years.saturating_add(delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(sex: Sex, age_years: u32) -> Person {
        Person {
            age_years,
            sex,
            ethnicity: Ethnicity::Asian,
            life_satisfaction: LifeSatisfaction::High,
            has_cardiovascular_disease: true,
            has_diabetes: false,
            has_high_blood_pressure: true,
            bmi: 27.5,
        }
    }

    #[test]
    fn filter_by_sex_leaves_store_untouched() {
        let population = Population::from_people(vec![
            person(Sex::Female, 30),
            person(Sex::Male, 40),
            person(Sex::Female, 50),
        ]);
        let females = population.filter_by_sex(Sex::Female);
        assert_eq!(females.len(), 2);
        assert!(females.iter().all(|p| p.sex == Sex::Female));
        assert_eq!(population.len(), 3);
    }

    #[test]
    fn join_marks_missing_keys_as_absent() {
        let table = RateTable::from_pairs([(30_u32, 0.25)]);
        let population =
            Population::from_people(vec![person(Sex::Female, 30), person(Sex::Female, 30), person(Sex::Female, 101)]);
        let joined = Population::join_by_key(population.iter(), &table, |p| p.age_years);
        assert_eq!(joined[0].rate, Some(0.25));
        assert_eq!(joined[1].rate, Some(0.25));
        assert_eq!(joined[2].rate, None);
    }

    #[test]
    fn remove_where_reports_positions_in_order() {
        let mut population = Population::from_people(vec![
            person(Sex::Male, 1),
            person(Sex::Male, 2),
            person(Sex::Male, 3),
        ]);
        let mut seen = Vec::new();
        let removed = population.remove_where(|position, p| {
            seen.push(position);
            p.age_years == 2
        });
        assert_eq!(removed, 1);
        assert_eq!(seen, vec![0, 1, 2]);
        let ages: Vec<u32> = population.iter().map(|p| p.age_years).collect();
        assert_eq!(ages, vec![1, 3]);
    }

    #[test]
    fn increment_age_has_no_ceiling() {
        let mut population = Population::from_people(vec![person(Sex::Female, 119)]);
        population.increment_age(1);
        population.increment_age(1);
        assert_eq!(population.people()[0].age_years, 121);
    }

    #[test]
    fn increment_age_saturates() {
        let mut population = Population::from_people(vec![person(Sex::Male, u32::MAX - 1)]);
        population.increment_age(5);
        assert_eq!(population.people()[0].age_years, u32::MAX);
    }

    #[test]
    fn newborn_defaults() {
        let baby = Person::newborn(Ethnicity::Mixed, Sex::Male);
        assert_eq!(baby.age_years, 0);
        assert_eq!(baby.ethnicity, Ethnicity::Mixed);
        assert_eq!(baby.life_satisfaction, LifeSatisfaction::Medium);
        assert!(!baby.has_cardiovascular_disease && !baby.has_diabetes && !baby.has_high_blood_pressure);
        assert_eq!(baby.bmi, NEWBORN_BMI);
    }
}
