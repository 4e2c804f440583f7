use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::RandomStream,
    world::World,
};

/// Every person gets one year older. Ages are not capped.
pub struct AgingSystem {
    years_per_step: u32,
}

impl AgingSystem {
    pub fn new() -> Self {
        Self { years_per_step: 1 }
    }
}

impl Default for AgingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for AgingSystem {
    fn name(&self) -> &str {
        "aging"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        world: &mut World,
        _rng: &mut dyn RandomStream,
    ) -> Result<()> {
        world.population.increment_age(self.years_per_step);
        Ok(())
    }
}
