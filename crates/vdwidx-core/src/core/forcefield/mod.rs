//! # Force Field Module
//!
//! The van der Waals pair potential used by the scoring term.
//!
//! - [`vdw`] - Parameterized, validated potential: a capped 12-6 or 8-4 well scaled by a
//!   switching function and exactly zero past the cutoff
//! - [`term`] - Named sub-scores of one scoring call

pub(crate) mod potentials;
pub mod term;
pub mod vdw;
