use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    population::Population,
    rates::trial_occurs,
    rng::RandomStream,
    world::World,
};

/// Applies the sex and age specific mortality rate to every person.
///
/// A person survives when their draw is at least their rate; anyone whose
/// (sex, age) has no rate survives.
pub struct DeathSystem;

impl DeathSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DeathSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for DeathSystem {
    fn name(&self) -> &str {
        "deaths"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut dyn RandomStream,
    ) -> Result<()> {
        let joined = Population::join_by_key(world.population.iter(), &ctx.rates.mortality, |p| {
            (p.sex, p.age_years)
        });
        let draws = rng.uniforms(joined.len());
        let dies: Vec<bool> = joined
            .iter()
            .zip(draws)
            .map(|(row, draw)| trial_occurs(row.rate, draw))
            .collect();

        let deaths = world.population.remove_where(|position, _| dies[position]);
        world.events.deaths += deaths as u64;
        Ok(())
    }
}
