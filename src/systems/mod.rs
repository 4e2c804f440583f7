mod aging;
mod births;
mod deaths;
mod statistics;

pub use aging::AgingSystem;
pub use births::BirthSystem;
pub use deaths::DeathSystem;
pub use statistics::StatisticsSystem;
