use super::error::{EngineError, SetupError};
use super::partition::{AtomGroup, AtomRef};
use crate::core::models::atom::Atom;
use nalgebra::Point3;
use std::sync::Arc;

/// One setup group: immutable atom data shared between clones plus the current
/// positions, which only change for mobile atoms.
#[derive(Debug, Clone)]
pub struct AtomSet {
    group: AtomGroup,
    atoms: Arc<[Atom]>,
    radii: Arc<[f64]>,
    positions: Vec<Point3<f64>>,
}

impl AtomSet {
    pub fn empty(group: AtomGroup) -> Self {
        Self {
            group,
            atoms: Arc::from(Vec::new()),
            radii: Arc::from(Vec::new()),
            positions: Vec::new(),
        }
    }

    /// Validates `atoms` for `group` and takes ownership of them.
    ///
    /// Every atom must carry a partition legal for the group, a finite positive radius
    /// and finite coordinates. With `require_atoms`, an empty input is rejected.
    pub fn new(
        group: AtomGroup,
        atoms: Vec<Atom>,
        require_atoms: bool,
    ) -> Result<Self, SetupError> {
        if require_atoms && atoms.is_empty() {
            return Err(SetupError::EmptyAtomSet { group });
        }
        if atoms.len() > u32::MAX as usize {
            return Err(SetupError::TooManyAtoms {
                group,
                count: atoms.len(),
            });
        }

        for (index, atom) in atoms.iter().enumerate() {
            if !group.accepts(atom.partition) {
                return Err(SetupError::InconsistentPartition {
                    group,
                    index,
                    name: atom.name.clone(),
                    partition: atom.partition,
                });
            }
            if !atom.vdw_radius.is_finite() || atom.vdw_radius <= 0.0 {
                return Err(SetupError::InvalidRadius {
                    group,
                    index,
                    name: atom.name.clone(),
                    radius: atom.vdw_radius,
                });
            }
            if !atom.position.iter().all(|c| c.is_finite()) {
                return Err(SetupError::NonFiniteCoordinate {
                    group,
                    index,
                    name: atom.name.clone(),
                });
            }
        }

        let radii: Vec<f64> = atoms.iter().map(|atom| atom.vdw_radius).collect();
        let positions: Vec<Point3<f64>> = atoms.iter().map(|atom| atom.position).collect();

        Ok(Self {
            group,
            atoms: Arc::from(atoms),
            radii: Arc::from(radii),
            positions,
        })
    }

    #[inline]
    pub fn group(&self) -> AtomGroup {
        self.group
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    #[inline]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    #[inline]
    pub fn atom(&self, index: u32) -> &Atom {
        &self.atoms[index as usize]
    }

    #[inline]
    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Indices of atoms whose partition satisfies `predicate`, in setup order.
    pub fn indices_where<F>(&self, predicate: F) -> Vec<u32>
    where
        F: Fn(&Atom) -> bool,
    {
        self.atoms
            .iter()
            .enumerate()
            .filter(|(_, atom)| predicate(atom))
            .map(|(idx, _)| idx as u32)
            .collect()
    }

    /// Moves a mobile atom. Static atoms are rejected.
    pub fn set_position(&mut self, index: u32, position: Point3<f64>) -> Result<(), EngineError> {
        let atom_ref = AtomRef::new(self.group, index);
        let atom = self
            .atoms
            .get(index as usize)
            .ok_or(EngineError::UnknownAtom { atom: atom_ref })?;
        if atom.partition.is_static() {
            return Err(EngineError::ImmobileAtom { atom: atom_ref });
        }
        if !position.iter().all(|c| c.is_finite()) {
            return Err(EngineError::NonFinitePosition { atom: atom_ref });
        }
        self.positions[index as usize] = position;
        Ok(())
    }

    /// Replaces every position at once; only valid for fully mobile groups.
    pub fn set_all_positions(&mut self, positions: &[Point3<f64>]) -> Result<(), EngineError> {
        if positions.len() != self.len() {
            return Err(EngineError::PositionCountMismatch {
                group: self.group,
                expected: self.len(),
                actual: positions.len(),
            });
        }
        if let Some(index) = self.atoms.iter().position(|atom| atom.partition.is_static()) {
            return Err(EngineError::ImmobileAtom {
                atom: AtomRef::new(self.group, index as u32),
            });
        }
        if let Some(index) = positions
            .iter()
            .position(|p| !p.iter().all(|c| c.is_finite()))
        {
            return Err(EngineError::NonFinitePosition {
                atom: AtomRef::new(self.group, index as u32),
            });
        }
        self.positions.copy_from_slice(positions);
        Ok(())
    }
}
