pub mod engine;
pub mod io;
pub mod population;
pub mod pyramid;
pub mod rates;
pub mod rng;
pub mod scenario;
pub mod systems;
pub mod timeline;
pub mod world;

pub use engine::{Engine, EngineBuilder, EngineSettings, ModelError, StepSummary};
pub use population::{Ethnicity, LifeSatisfaction, Person, Population, Sex};
pub use pyramid::{AgeBand, PyramidRow, PyramidSnapshot};
pub use rates::RateTables;
pub use timeline::Timeline;
