//! # vdwidx Core Library
//!
//! An indexed-grid intermolecular van der Waals scoring term for docking. A receptor
//! (optionally with flexible regions), a ligand and an optional set of explicit solvent
//! atoms are set up once; poses are then scored repeatedly by moving mobile atoms.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Atom`, `Partition`), the pair
//!   potential and its switching function, and the uniform spatial grid.
//!
//! - **[`engine`]: The Scoring Term.** The stateful layer: setup validation, interaction
//!   list construction, the score aggregator, threshold counters, lipophilic annotations
//!   and the named score map. [`engine::scorer::VdwIdxScorer`] is the entry point.

pub mod core;
pub mod engine;
