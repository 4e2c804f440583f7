use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    population::{Person, Population, Sex},
    rates::trial_occurs,
    rng::RandomStream,
    world::World,
};

/// Probability that a newborn is male.
const MALE_BIRTH_PROBABILITY: f64 = 0.5;

/// Applies the age specific birth rate to every female.
///
/// One draw is taken per female, in store order, before any newborn's sex is
/// drawn; then one further draw per birth decides that newborn's sex.
pub struct BirthSystem;

impl BirthSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BirthSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for BirthSystem {
    fn name(&self) -> &str {
        "births"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut dyn RandomStream,
    ) -> Result<()> {
        let females = world.population.filter_by_sex(Sex::Female);
        let joined = Population::join_by_key(females, &ctx.rates.birth, |p| p.age_years);
        let draws = rng.uniforms(joined.len());

        let mothers: Vec<_> = joined
            .iter()
            .zip(draws)
            .filter(|(row, draw)| trial_occurs(row.rate, *draw))
            .map(|(row, _)| row.person.ethnicity)
            .collect();

        let newborns: Vec<Person> = mothers
            .into_iter()
            .map(|ethnicity| {
                let sex = if rng.next_uniform() < MALE_BIRTH_PROBABILITY {
                    Sex::Male
                } else {
                    Sex::Female
                };
                Person::newborn(ethnicity, sex)
            })
            .collect();

        let births = world.population.append_rows(newborns);
        world.events.births += births as u64;
        Ok(())
    }
}
