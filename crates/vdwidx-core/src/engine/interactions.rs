use super::atom_set::AtomSet;
use super::partition::{AtomGroup, Category, classify};
use crate::core::forcefield::vdw::VdwPotential;
use crate::core::models::atom::{Atom, ResidueKey};
use crate::core::spatial::grid::SpatialGrid;
use itertools::Itertools;
use nalgebra::{Point3, distance_squared};
use std::collections::HashMap;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Precomputed interaction structure for one receptor/solvent configuration.
///
/// Static atoms (rigid receptor, fixed and tethered solvent) are indexed in grids and
/// their mutual in-cutoff pairs are stored exactly. Mobile atoms (ligand, flexible
/// receptor, free solvent) query the grids from their current positions at score time,
/// and mobile pairs are kept as candidate lists checked by distance when scored.
/// Nothing here changes between poses.
#[derive(Debug, Clone)]
pub struct InteractionLists {
    cutoff: f64,
    receptor_grid: SpatialGrid,
    solvent_grid: SpatialGrid,
    flexible: Vec<u32>,
    free_solvent: Vec<u32>,
    solvent_residue: Vec<u32>,
    receptor_solvent_static: Vec<(u32, u32)>,
    solvent_static: Vec<(u32, u32)>,
    flexible_flexible: Vec<(u32, u32)>,
    flexible_free_solvent: Vec<(u32, u32)>,
    free_solvent_pairs: Vec<(u32, u32)>,
    solvent_static_score: f64,
}

impl InteractionLists {
    #[inline]
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Grid over rigid receptor atoms (receptor indices).
    #[inline]
    pub fn receptor_grid(&self) -> &SpatialGrid {
        &self.receptor_grid
    }

    /// Grid over fixed and tethered solvent atoms (solvent indices).
    #[inline]
    pub fn solvent_grid(&self) -> &SpatialGrid {
        &self.solvent_grid
    }

    /// Flexible receptor atoms, driving their grid lookups at score time.
    #[inline]
    pub fn flexible(&self) -> &[u32] {
        &self.flexible
    }

    /// Free solvent atoms, driving their grid lookups at score time.
    #[inline]
    pub fn free_solvent(&self) -> &[u32] {
        &self.free_solvent
    }

    /// Interned residue of a solvent atom, for same-residue exclusion.
    #[inline]
    pub fn solvent_residue(&self, index: u32) -> u32 {
        self.solvent_residue[index as usize]
    }

    /// Exact in-cutoff pairs (rigid receptor, static solvent).
    #[inline]
    pub fn receptor_solvent_static(&self) -> &[(u32, u32)] {
        &self.receptor_solvent_static
    }

    /// Exact in-cutoff pairs between static solvent atoms of different residues.
    #[inline]
    pub fn solvent_static(&self) -> &[(u32, u32)] {
        &self.solvent_static
    }

    /// Candidate pairs between flexible atoms of different regions.
    #[inline]
    pub fn flexible_flexible(&self) -> &[(u32, u32)] {
        &self.flexible_flexible
    }

    /// Candidate pairs (flexible receptor, free solvent).
    #[inline]
    pub fn flexible_free_solvent(&self) -> &[(u32, u32)] {
        &self.flexible_free_solvent
    }

    /// Candidate pairs between free solvent atoms of different residues.
    #[inline]
    pub fn free_solvent_pairs(&self) -> &[(u32, u32)] {
        &self.free_solvent_pairs
    }

    /// Energy of the static solvent self-interaction at setup time.
    #[inline]
    pub fn solvent_static_score(&self) -> f64 {
        self.solvent_static_score
    }

    /// Total number of explicitly stored pairs.
    pub fn stored_pairs(&self) -> usize {
        self.receptor_solvent_static.len()
            + self.solvent_static.len()
            + self.flexible_flexible.len()
            + self.flexible_free_solvent.len()
            + self.free_solvent_pairs.len()
    }
}

/// Sums the potential over a pair list in list order.
pub(crate) fn sum_pairs(
    potential: &VdwPotential,
    pairs: &[(u32, u32)],
    set_a: &AtomSet,
    set_b: &AtomSet,
) -> f64 {
    let cutoff_sq = potential.cutoff() * potential.cutoff();
    let (pos_a, rad_a) = (set_a.positions(), set_a.radii());
    let (pos_b, rad_b) = (set_b.positions(), set_b.radii());
    let mut sum = 0.0;
    for &(a, b) in pairs {
        let (a, b) = (a as usize, b as usize);
        let d2 = distance_squared(&pos_a[a], &pos_b[b]);
        if d2 <= cutoff_sq {
            sum += potential.evaluate(d2.sqrt(), rad_a[a], rad_b[b]);
        }
    }
    sum
}

pub struct InteractionListBuilder<'a> {
    potential: &'a VdwPotential,
}

impl<'a> InteractionListBuilder<'a> {
    pub fn new(potential: &'a VdwPotential) -> Self {
        Self { potential }
    }

    /// Builds the interaction structure for a receptor and a solvent set.
    ///
    /// A missing receptor or an empty solvent simply yields empty lists.
    pub fn build(&self, receptor: Option<&AtomSet>, solvent: &AtomSet) -> InteractionLists {
        let empty = AtomSet::empty(AtomGroup::Receptor);
        let receptor = receptor.unwrap_or(&empty);
        let cutoff = self.potential.cutoff();

        let rigid = receptor.indices_where(|atom| atom.partition.is_static());
        let flexible = receptor.indices_where(|atom| !atom.partition.is_static());
        let static_solvent = solvent.indices_where(|atom| atom.partition.is_static());
        let free_solvent = solvent.indices_where(|atom| !atom.partition.is_static());

        let receptor_grid = SpatialGrid::build_subset(cutoff, receptor.positions(), &rigid);
        let solvent_grid = SpatialGrid::build_subset(cutoff, solvent.positions(), &static_solvent);

        let solvent_residue = intern_residues(solvent.atoms());

        let receptor_solvent_static = self.pairs_from_grid(
            &static_solvent,
            solvent,
            &receptor_grid,
            receptor,
            |_, _| true,
        );
        let receptor_solvent_static: Vec<(u32, u32)> = receptor_solvent_static
            .into_iter()
            .map(|(s, r)| (r, s))
            .collect();

        let solvent_static = self.pairs_from_grid(
            &static_solvent,
            solvent,
            &solvent_grid,
            solvent,
            |a, b| b > a && solvent_residue[a as usize] != solvent_residue[b as usize],
        );

        let flexible_flexible = candidate_pairs_within(receptor, &flexible, Category::Receptor);
        let free_solvent_pairs = candidate_pairs_within(solvent, &free_solvent, Category::Solvent);
        let flexible_free_solvent: Vec<(u32, u32)> = flexible
            .iter()
            .copied()
            .cartesian_product(free_solvent.iter().copied())
            .collect();

        let solvent_static_score = sum_pairs(self.potential, &solvent_static, solvent, solvent);

        debug!(
            rigid = rigid.len(),
            flexible = flexible.len(),
            static_solvent = static_solvent.len(),
            free_solvent = free_solvent.len(),
            receptor_cells = receptor_grid.occupied_cells(),
            solvent_cells = solvent_grid.occupied_cells(),
            receptor_solvent_static = receptor_solvent_static.len(),
            solvent_static = solvent_static.len(),
            flexible_flexible = flexible_flexible.len(),
            flexible_free_solvent = flexible_free_solvent.len(),
            free_solvent_pairs = free_solvent_pairs.len(),
            "Built interaction lists."
        );

        InteractionLists {
            cutoff,
            receptor_grid,
            solvent_grid,
            flexible,
            free_solvent,
            solvent_residue,
            receptor_solvent_static,
            solvent_static,
            flexible_flexible,
            flexible_free_solvent,
            free_solvent_pairs,
            solvent_static_score,
        }
    }

    /// For each driver, queries `grid` around its position and keeps the candidates
    /// within the cutoff that `keep` accepts. Pairs come out as `(driver, candidate)`,
    /// grouped by driver in driver order.
    fn pairs_from_grid<F>(
        &self,
        drivers: &[u32],
        driver_set: &AtomSet,
        grid: &SpatialGrid,
        candidate_set: &AtomSet,
        keep: F,
    ) -> Vec<(u32, u32)>
    where
        F: Fn(u32, u32) -> bool + Sync,
    {
        let cutoff = self.potential.cutoff();
        let cutoff_sq = cutoff * cutoff;
        let driver_positions = driver_set.positions();
        let candidate_positions = candidate_set.positions();

        let neighbors = |&driver: &u32| -> Vec<(u32, u32)> {
            let position = &driver_positions[driver as usize];
            grid.query(position, cutoff)
                .filter(|&candidate| {
                    keep(driver, candidate)
                        && within(position, &candidate_positions[candidate as usize], cutoff_sq)
                })
                .map(|candidate| (driver, candidate))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let pairs = drivers.iter().flat_map(neighbors).collect();

        #[cfg(feature = "parallel")]
        let pairs = drivers.par_iter().flat_map_iter(neighbors).collect();

        pairs
    }
}

#[inline]
fn within(a: &Point3<f64>, b: &Point3<f64>, cutoff_sq: f64) -> bool {
    distance_squared(a, b) <= cutoff_sq
}

/// All unordered pairs of `members` that classify into `category`.
fn candidate_pairs_within(set: &AtomSet, members: &[u32], category: Category) -> Vec<(u32, u32)> {
    members
        .iter()
        .copied()
        .tuple_combinations()
        .filter(|&(a, b)| classify(set.atom(a), set.atom(b)) == Some(category))
        .collect()
}

fn intern_residues(atoms: &[Atom]) -> Vec<u32> {
    let mut ids: HashMap<&ResidueKey, u32> = HashMap::new();
    atoms
        .iter()
        .map(|atom| {
            let next = ids.len() as u32;
            *ids.entry(&atom.residue).or_insert(next)
        })
        .collect()
}
