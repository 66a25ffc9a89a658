use nalgebra::Point3;
use serde::Serialize;
use std::fmt;

/// Identifier of a flexible receptor region.
///
/// Atoms sharing a region move together as one rigid fragment (e.g. a rotatable
/// OH or NH3+ group), so they never interact with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FlexRegionId(pub u32);

/// Logical partition of an atom within the docking system.
///
/// The partition decides which interaction rules apply to an atom and whether its
/// position may change between poses without a new setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Partition {
    /// Receptor atom whose position never changes between poses.
    #[default]
    Rigid,
    /// Receptor atom belonging to a flexible region; moves between poses.
    Flexible(FlexRegionId),
    /// Solvent atom held at a fixed location.
    SolventFixed,
    /// Solvent atom restrained near a reference location; only moved by setup.
    SolventTethered,
    /// Solvent atom free to move between poses.
    SolventFree,
    /// Ligand atom; moves with every pose.
    Ligand,
}

impl Partition {
    /// Returns `true` if the atom keeps its setup position for every pose.
    #[inline]
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            Partition::Rigid | Partition::SolventFixed | Partition::SolventTethered
        )
    }

    #[inline]
    pub fn is_receptor(&self) -> bool {
        matches!(self, Partition::Rigid | Partition::Flexible(_))
    }

    #[inline]
    pub fn is_solvent(&self) -> bool {
        matches!(
            self,
            Partition::SolventFixed | Partition::SolventTethered | Partition::SolventFree
        )
    }

    #[inline]
    pub fn flex_region(&self) -> Option<FlexRegionId> {
        match self {
            Partition::Flexible(region) => Some(*region),
            _ => None,
        }
    }
}

/// Identity of the residue an atom belongs to.
///
/// Used to exclude intra-residue solvent pairs and to group lipophilic annotations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResidueKey {
    pub chain_id: char,
    pub residue_number: isize,
    pub residue_name: String,
}

impl ResidueKey {
    pub fn new(chain_id: char, residue_number: isize, residue_name: &str) -> Self {
        Self {
            chain_id,
            residue_number,
            residue_name: residue_name.to_string(),
        }
    }
}

impl fmt::Display for ResidueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}{}",
            self.chain_id, self.residue_name, self.residue_number
        )
    }
}

/// An atom as handed over by the molecule layer.
///
/// Carries everything the van der Waals term needs: geometry, radius, logical
/// partition and the lipophilicity flag used for annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "O1").
    pub name: String,
    /// The residue this atom belongs to.
    pub residue: ResidueKey,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// The van der Waals radius in Angstroms.
    pub vdw_radius: f64,
    /// The logical partition of the atom.
    pub partition: Partition,
    /// Whether the atom is a non-polar carbon or hydrogen.
    pub lipophilic: bool,
}

impl Atom {
    /// Creates a new `Atom` with a rigid partition and no lipophilic flag.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `residue` - The residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    /// * `vdw_radius` - The van der Waals radius of the atom.
    pub fn new(name: &str, residue: ResidueKey, position: Point3<f64>, vdw_radius: f64) -> Self {
        Self {
            name: name.to_string(),
            residue,
            position,
            vdw_radius,
            partition: Partition::default(),
            lipophilic: false,
        }
    }

    pub fn with_partition(mut self, partition: Partition) -> Self {
        self.partition = partition;
        self
    }

    pub fn with_lipophilic(mut self, lipophilic: bool) -> Self {
        self.lipophilic = lipophilic;
        self
    }

    /// Label used in diagnostic output, e.g. `A:LEU12:CD1`.
    pub fn label(&self) -> String {
        format!("{}:{}", self.residue, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn residue() -> ResidueKey {
        ResidueKey::new('A', 12, "LEU")
    }

    #[test]
    fn new_atom_has_expected_default_fields() {
        let atom = Atom::new("CD1", residue(), Point3::new(1.0, 2.0, 3.0), 1.9);

        assert_eq!(atom.name, "CD1");
        assert_eq!(atom.residue, residue());
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.vdw_radius, 1.9);
        assert_eq!(atom.partition, Partition::Rigid);
        assert!(!atom.lipophilic);
    }

    #[test]
    fn builder_methods_override_partition_and_flag() {
        let atom = Atom::new("C1", residue(), Point3::origin(), 1.9)
            .with_partition(Partition::Ligand)
            .with_lipophilic(true);
        assert_eq!(atom.partition, Partition::Ligand);
        assert!(atom.lipophilic);
    }

    #[test]
    fn label_combines_residue_and_atom_name() {
        let atom = Atom::new("CD1", residue(), Point3::origin(), 1.9);
        assert_eq!(atom.label(), "A:LEU12:CD1");
    }

    #[test]
    fn static_partitions_are_rigid_fixed_and_tethered() {
        assert!(Partition::Rigid.is_static());
        assert!(Partition::SolventFixed.is_static());
        assert!(Partition::SolventTethered.is_static());
        assert!(!Partition::SolventFree.is_static());
        assert!(!Partition::Ligand.is_static());
        assert!(!Partition::Flexible(FlexRegionId(0)).is_static());
    }

    #[test]
    fn flex_region_is_only_reported_for_flexible_atoms() {
        assert_eq!(
            Partition::Flexible(FlexRegionId(3)).flex_region(),
            Some(FlexRegionId(3))
        );
        assert_eq!(Partition::Rigid.flex_region(), None);
    }

    #[test]
    fn residue_key_display_is_chain_name_number() {
        assert_eq!(ResidueKey::new('B', 301, "HOH").to_string(), "B:HOH301");
    }
}
