//! Nuisance-index calculation engine for excavation work areas.
//!
//! The [`tormaystarkastelu`] module resolves spatial facts for a work-area geometry, classifies
//! them, and combines them with the declared nuisance into normalized severity indices.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod tormaystarkastelu;
