use serde::Serialize;

use crate::{
    population::{Population, Sex},
    pyramid::PyramidSnapshot,
};

/// Transition counts for the step currently being executed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepEvents {
    pub births: u64,
    pub deaths: u64,
}

/// Summary of the state at a point in the run, cheap to log or serialise.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub scenario: String,
    pub tick: u64,
    pub total_population: u64,
    pub females: u64,
    pub males: u64,
    pub last_step: StepEvents,
}

/// Model-owned state: the population store and what the run has produced so far.
pub struct World {
    tick: u64,
    pub(crate) population: Population,
    pub(crate) events: StepEvents,
    pub(crate) pyramids: Vec<PyramidSnapshot>,
}

impl World {
    pub fn new(population: Population) -> Self {
        Self {
            tick: 0,
            population,
            events: StepEvents::default(),
            pyramids: Vec::new(),
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub(crate) fn begin_step(&mut self) {
        self.events = StepEvents::default();
    }

    pub(crate) fn advance_time(&mut self) {
        self.tick += 1;
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn total_population(&self) -> u64 {
        self.population.len() as u64
    }

    pub fn events(&self) -> StepEvents {
        self.events
    }

    pub fn pyramids(&self) -> &[PyramidSnapshot] {
        &self.pyramids
    }

    pub fn snapshot(&self, scenario: &str) -> WorldSnapshot {
        WorldSnapshot {
            scenario: scenario.to_string(),
            tick: self.tick,
            total_population: self.total_population(),
            females: self.population.count_by_sex(Sex::Female) as u64,
            males: self.population.count_by_sex(Sex::Male) as u64,
            last_step: self.events,
        }
    }
}
