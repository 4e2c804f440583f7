use anyhow::{Context, Result};
use log::{debug, info, trace};
use thiserror::Error;

use crate::{
    io::output::{OutputError, PyramidSink},
    population::Population,
    pyramid::{self, PyramidRow, PyramidSnapshot},
    rates::RateTables,
    rng::{RandomStream, SeededStream},
    systems::{AgingSystem, BirthSystem, DeathSystem, StatisticsSystem},
    timeline::Timeline,
    world::{World, WorldSnapshot},
};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model has already been finalized")]
    AlreadyFinalized,
    #[error("cannot step a model after it has been finalized")]
    Finalized,
    #[error("timeline exhausted after {steps} steps")]
    TimelineExhausted { steps: u64 },
    #[error("failed to write pyramids: {0}")]
    Output(#[from] OutputError),
}

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub timeline: Timeline,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    rates: RateTables,
    population: Population,
    stream: Option<Box<dyn RandomStream>>,
    sink: Option<Box<dyn PyramidSink>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings, rates: RateTables, population: Population) -> Self {
        Self {
            settings,
            rates,
            population,
            stream: None,
            sink: None,
        }
    }

    /// Replaces the seeded stream with a caller supplied source of draws.
    pub fn with_stream(mut self, stream: impl RandomStream + 'static) -> Self {
        self.stream = Some(Box::new(stream));
        self
    }

    pub fn with_sink(mut self, sink: impl PyramidSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn build(self) -> Engine {
        let rng: Box<dyn RandomStream> = match self.stream {
            Some(stream) => stream,
            None => Box::new(SeededStream::new(self.settings.seed)),
        };
        let total_steps = self.settings.timeline.steps();
        // Births, deaths, aging, statistics: this order fixes how draws are consumed.
        let systems: Vec<Box<dyn System>> = vec![
            Box::new(BirthSystem::new()),
            Box::new(DeathSystem::new()),
            Box::new(AgingSystem::new()),
            Box::new(StatisticsSystem::new()),
        ];
        Engine {
            rng,
            systems,
            world: World::new(self.population),
            rates: self.rates,
            sink: self.sink,
            settings: self.settings,
            total_steps,
            finalized: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSummary {
    pub tick: u64,
    pub year: i32,
    pub births: u64,
    pub deaths: u64,
    pub population: u64,
}

pub struct Engine {
    rng: Box<dyn RandomStream>,
    systems: Vec<Box<dyn System>>,
    world: World,
    rates: RateTables,
    sink: Option<Box<dyn PyramidSink>>,
    settings: EngineSettings,
    total_steps: u64,
    finalized: bool,
}

impl Engine {
    /// Runs one simulated year: births, deaths, aging, then tabulation.
    pub fn step(&mut self) -> Result<StepSummary> {
        if self.finalized {
            return Err(ModelError::Finalized.into());
        }
        let tick = self.world.tick();
        let year = self
            .settings
            .timeline
            .year_at(tick)
            .ok_or(ModelError::TimelineExhausted { steps: tick })?;

        self.world.begin_step();
        let ctx = SystemContext {
            tick,
            year,
            rates: &self.rates,
        };
        for system in &mut self.systems {
            system
                .run(&ctx, &mut self.world, &mut *self.rng)
                .with_context(|| format!("system '{}' failed in {year}", system.name()))?;
            trace!("{} finished for {year} (tick {})", system.name(), ctx.tick);
        }
        self.world.advance_time();

        let events = self.world.events();
        let summary = StepSummary {
            tick: self.world.tick(),
            year,
            births: events.births,
            deaths: events.deaths,
            population: self.world.total_population(),
        };
        debug!(
            "{year}: {} births, {} deaths, population {}",
            summary.births, summary.deaths, summary.population
        );
        Ok(summary)
    }

    /// Concatenates every pyramid produced so far and hands the table to the sink.
    ///
    /// Finalizing is terminal: a second call fails with
    /// [`ModelError::AlreadyFinalized`]. Finalizing before any step writes an
    /// empty table.
    pub fn finalize(&mut self) -> Result<Vec<PyramidRow>> {
        if self.finalized {
            return Err(ModelError::AlreadyFinalized.into());
        }
        let table = self.pyramid_table();
        if let Some(sink) = self.sink.as_mut() {
            sink.write(&table)
                .map_err(ModelError::from)
                .with_context(|| format!("failed to finalize into {}", sink.describe()))?;
            info!("Wrote {} pyramid rows to {}", table.len(), sink.describe());
        }
        self.finalized = true;
        Ok(table)
    }

    /// Steps through the remainder of the timeline, then finalizes.
    pub fn run(&mut self) -> Result<Vec<PyramidRow>> {
        self.run_with_hook(|_| {})
    }

    /// As [`Engine::run`], calling `hook` after every step.
    pub fn run_with_hook<F>(&mut self, mut hook: F) -> Result<Vec<PyramidRow>>
    where
        F: FnMut(WorldSnapshot),
    {
        while self.remaining_steps() > 0 {
            self.step()?;
            hook(self.world.snapshot(&self.settings.scenario_name));
        }
        self.finalize()
    }

    pub fn remaining_steps(&self) -> u64 {
        self.total_steps.saturating_sub(self.world.tick())
    }

    pub fn pyramid_table(&self) -> Vec<PyramidRow> {
        pyramid::concat(self.world.pyramids())
    }

    pub fn pyramids(&self) -> &[PyramidSnapshot] {
        self.world.pyramids()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn current_tick(&self) -> u64 {
        self.world.tick()
    }

    pub fn scenario_name(&self) -> &str {
        &self.settings.scenario_name
    }

    pub fn rates(&self) -> &RateTables {
        &self.rates
    }

    pub fn draws_consumed(&self) -> u64 {
        self.rng.draws()
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}

pub struct SystemContext<'a> {
    pub tick: u64,
    pub year: i32,
    pub rates: &'a RateTables,
}

pub trait System {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut dyn RandomStream,
    ) -> Result<()>;
}
