use thiserror::Error;

use super::config::ConfigError;
use super::partition::{AtomGroup, AtomRef};
use crate::core::models::atom::Partition;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum SetupError {
    #[error("At least one {group} atom is required")]
    EmptyAtomSet { group: AtomGroup },

    #[error("Atom {index} ('{name}') has partition {partition:?}, not valid for the {group}")]
    InconsistentPartition {
        group: AtomGroup,
        index: usize,
        name: String,
        partition: Partition,
    },

    #[error("Atom {index} ('{name}') of the {group} has invalid van der Waals radius {radius}")]
    InvalidRadius {
        group: AtomGroup,
        index: usize,
        name: String,
        radius: f64,
    },

    #[error("Atom {index} ('{name}') of the {group} has a non-finite coordinate")]
    NonFiniteCoordinate {
        group: AtomGroup,
        index: usize,
        name: String,
    },

    #[error("Too many {group} atoms: {count}")]
    TooManyAtoms { group: AtomGroup, count: usize },
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum EngineError {
    #[error("Scoring function is not built: receptor and ligand must both be set up")]
    NotBuilt,

    #[error("Setup failed: {source}")]
    Setup {
        #[from]
        source: SetupError,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Expected {expected} {group} positions, got {actual}")]
    PositionCountMismatch {
        group: AtomGroup,
        expected: usize,
        actual: usize,
    },

    #[error("Atom {atom:?} does not exist")]
    UnknownAtom { atom: AtomRef },

    #[error("Atom {atom:?} is static; its position only changes through setup")]
    ImmobileAtom { atom: AtomRef },

    #[error("Non-finite position for atom {atom:?}")]
    NonFinitePosition { atom: AtomRef },
}
