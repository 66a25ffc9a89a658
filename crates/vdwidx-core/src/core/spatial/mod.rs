//! Spatial indexing for cutoff queries.

pub mod grid;
