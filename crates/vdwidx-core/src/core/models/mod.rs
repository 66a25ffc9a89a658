//! # Core Models Module
//!
//! Atom records as handed to the scoring term. Each atom carries its residue, position,
//! van der Waals radius, lipophilicity flag and the [`atom::Partition`] that decides which
//! pairs it takes part in and whether it may move after setup.
//!
//! ```ignore
//! use vdwidx::core::models::atom::{Atom, Partition, ResidueKey};
//!
//! let atom = Atom::new("CD1", ResidueKey::new('A', 12, "LEU"), Point3::origin(), 1.9)
//!     .with_partition(Partition::Rigid)
//!     .with_lipophilic(true);
//! ```

pub mod atom;
