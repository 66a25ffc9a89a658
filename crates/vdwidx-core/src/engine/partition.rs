use crate::core::forcefield::term::ScoreBreakdown;
use crate::core::models::atom::{Atom, Partition};
use serde::Serialize;
use std::fmt;

/// The three atom collections handed over by the setup calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AtomGroup {
    Receptor,
    Ligand,
    Solvent,
}

impl AtomGroup {
    /// Whether `partition` is a legal tag for an atom of this group.
    pub fn accepts(&self, partition: Partition) -> bool {
        match self {
            AtomGroup::Receptor => partition.is_receptor(),
            AtomGroup::Ligand => partition == Partition::Ligand,
            AtomGroup::Solvent => partition.is_solvent(),
        }
    }
}

impl fmt::Display for AtomGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AtomGroup::Receptor => "receptor",
            AtomGroup::Ligand => "ligand",
            AtomGroup::Solvent => "solvent",
        };
        f.write_str(name)
    }
}

/// Reference to an atom: its group and its index within that group's setup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AtomRef {
    pub group: AtomGroup,
    pub index: u32,
}

impl AtomRef {
    #[inline]
    pub fn new(group: AtomGroup, index: u32) -> Self {
        Self { group, index }
    }

    #[inline]
    pub fn receptor(index: u32) -> Self {
        Self::new(AtomGroup::Receptor, index)
    }

    #[inline]
    pub fn ligand(index: u32) -> Self {
        Self::new(AtomGroup::Ligand, index)
    }

    #[inline]
    pub fn solvent(index: u32) -> Self {
        Self::new(AtomGroup::Solvent, index)
    }
}

/// Sub-score a pair of atoms contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    Inter,
    Receptor,
    Solvent,
    ReceptorSolvent,
    LigandSolvent,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Inter,
        Category::Receptor,
        Category::Solvent,
        Category::ReceptorSolvent,
        Category::LigandSolvent,
    ];

    /// Stable name used in score maps.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Inter => "inter",
            Category::Receptor => "receptor",
            Category::Solvent => "solvent",
            Category::ReceptorSolvent => "receptor_solvent",
            Category::LigandSolvent => "ligand_solvent",
        }
    }

    /// This category's sub-score in `breakdown`.
    pub fn score_in(&self, breakdown: &ScoreBreakdown) -> f64 {
        match self {
            Category::Inter => breakdown.inter,
            Category::Receptor => breakdown.receptor,
            Category::Solvent => breakdown.solvent,
            Category::ReceptorSolvent => breakdown.receptor_solvent,
            Category::LigandSolvent => breakdown.ligand_solvent,
        }
    }

    /// Whether the pair has a ligand atom on one side.
    pub fn involves_ligand(&self) -> bool {
        matches!(self, Category::Inter | Category::LigandSolvent)
    }
}

/// Classifies an unordered pair of distinct atoms.
///
/// Returns `None` for pairs this term never scores: ligand-ligand, rigid-rigid,
/// two atoms of the same flexible region, and two solvent atoms of the same residue.
/// Every scored pair maps to exactly one category.
pub fn classify(a: &Atom, b: &Atom) -> Option<Category> {
    use Partition::*;

    match (a.partition, b.partition) {
        (Ligand, Ligand) => None,
        (Ligand, p) | (p, Ligand) => {
            if p.is_receptor() {
                Some(Category::Inter)
            } else {
                Some(Category::LigandSolvent)
            }
        }
        (Rigid, Rigid) => None,
        (Flexible(ra), Flexible(rb)) if ra == rb => None,
        (pa, pb) if pa.is_receptor() && pb.is_receptor() => Some(Category::Receptor),
        (pa, pb) if pa.is_solvent() && pb.is_solvent() => {
            if a.residue == b.residue {
                None
            } else {
                Some(Category::Solvent)
            }
        }
        _ => Some(Category::ReceptorSolvent),
    }
}
