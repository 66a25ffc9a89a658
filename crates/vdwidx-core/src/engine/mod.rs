//! # Engine Module
//!
//! The stateful scoring term.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Named runtime options and their validation
//! - **Setup** ([`atom_set`], [`partition`]) - Validated atom groups, pair categories
//! - **Interaction Structure** ([`interactions`]) - Grids over static atoms and pair lists
//!   built once per receptor/solvent setup
//! - **Scoring** ([`aggregator`], [`annotation`], [`score_map`]) - Per-pose sums,
//!   threshold counters, lipophilic annotations and named results
//! - **Entry Point** ([`scorer`]) - [`scorer::VdwIdxScorer`]
//! - **Error Handling** ([`error`]) - Setup and scoring errors

pub mod aggregator;
pub mod annotation;
pub mod atom_set;
pub mod config;
pub mod error;
pub mod interactions;
pub mod partition;
pub mod score_map;
pub mod scorer;
