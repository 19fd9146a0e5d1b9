// src/mc/mod.rs
pub mod mc_engine;
pub mod payoffs;
