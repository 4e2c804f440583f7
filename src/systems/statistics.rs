use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    pyramid,
    rng::RandomStream,
    world::World,
};

/// Tabulates the post-transition population into this year's pyramid.
pub struct StatisticsSystem;

impl StatisticsSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StatisticsSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for StatisticsSystem {
    fn name(&self) -> &str {
        "statistics"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut dyn RandomStream,
    ) -> Result<()> {
        let snapshot = pyramid::tabulate(&world.population, ctx.year);
        world.pyramids.push(snapshot);
        Ok(())
    }
}
