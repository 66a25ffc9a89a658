//! # Core Module
//!
//! Stateless building blocks of the scoring term.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues and partition labels
//! - **Energy Calculations** ([`forcefield`]) - The switched van der Waals pair potential
//!   and the sub-score breakdown
//! - **Spatial Indexing** ([`spatial`]) - Uniform cell grid for cutoff neighbour queries

pub mod forcefield;
pub mod models;
pub mod spatial;
