use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::{
    engine::{Engine, EngineBuilder, EngineSettings},
    io::{assumptions, output, population},
    rng::DEFAULT_SEED,
    timeline::Timeline,
};

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_start() -> NaiveDate {
    Timeline::default().start()
}

fn default_end() -> NaiveDate {
    Timeline::default().end()
}

fn default_step_years() -> u32 {
    1
}

fn default_output() -> PathBuf {
    PathBuf::from("output/population_pyramids.csv")
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_start")]
    pub start: NaiveDate,
    #[serde(default = "default_end")]
    pub end: NaiveDate,
    #[serde(default = "default_step_years")]
    pub step_years: u32,
    pub assumptions: PathBuf,
    pub population: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Scenario {
    pub fn timeline(&self) -> Result<Timeline> {
        let timeline = Timeline::new(self.start, self.end, self.step_years)
            .with_context(|| format!("Invalid timeline in scenario '{}'", self.name))?;
        Ok(timeline)
    }

    /// Replaces the end date so that the run covers `years` steps from the start.
    pub fn with_years(mut self, years: u32) -> Result<Self> {
        let timeline = Timeline::annual(self.start.year(), years)
            .context("Invalid year override")?;
        self.start = timeline.start();
        self.end = timeline.end();
        self.step_years = 1;
        Ok(self)
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario.timeline()?;
        Ok(scenario)
    }

    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.base_dir.join(path)
    }

    /// Loads the scenario's inputs and wires an engine that writes to its output.
    /// Any malformed input fails here, before a single step runs.
    pub fn build_engine(&self, scenario: &Scenario) -> Result<Engine> {
        let assumptions_path = self.resolve(&scenario.assumptions);
        let rates = assumptions::load_csv(&assumptions_path).with_context(|| {
            format!("Failed to load assumptions {}", assumptions_path.display())
        })?;
        let population_path = self.resolve(&scenario.population);
        let people = population::load_json(&population_path).with_context(|| {
            format!("Failed to load population {}", population_path.display())
        })?;
        let sink = output::sink_for_path(self.resolve(&scenario.output))?;

        let settings = EngineSettings {
            scenario_name: scenario.name.clone(),
            seed: scenario.seed,
            timeline: scenario.timeline()?,
        };
        Ok(EngineBuilder::new(settings, rates, people)
            .with_sink(sink)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in_the_timeline_and_seed() {
        let scenario: Scenario = serde_yaml::from_str(
            "name: minimal\nassumptions: a.csv\npopulation: p.json\n",
        )
        .unwrap();
        assert_eq!(scenario.seed, DEFAULT_SEED);
        let timeline = scenario.timeline().unwrap();
        assert_eq!(timeline.steps(), 20);
        assert_eq!(timeline.year_at(0), Some(2021));
        assert_eq!(scenario.output, default_output());
    }

    #[test]
    fn year_override_moves_the_end_date() {
        let scenario: Scenario = serde_yaml::from_str(
            "name: short\nstart: 2030-01-01\nassumptions: a.csv\npopulation: p.json\n",
        )
        .unwrap();
        let timeline = scenario.with_years(3).unwrap().timeline().unwrap();
        assert_eq!(timeline.steps(), 3);
        assert_eq!(timeline.year_at(2), Some(2032));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<Scenario, serde_yaml::Error> = serde_yaml::from_str(
            "name: typo\nasumptions: a.csv\nassumptions: a.csv\npopulation: p.json\n",
        );
        assert!(result.is_err());
    }
}
