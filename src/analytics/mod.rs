// src/analytics/mod.rs
pub mod bs_analytic;
