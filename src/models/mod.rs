// src/models/mod.rs
pub mod gbm;

pub use gbm::{Gbm, SimulatedPaths};
