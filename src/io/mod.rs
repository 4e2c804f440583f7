//! Boundary with the files a run reads from and writes to.

pub mod assumptions;
pub mod output;
pub mod population;
