use serde::Serialize;
use std::ops::{Add, AddAssign};

/// Named van der Waals sub-scores of one scoring call.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScoreBreakdown {
    /// Ligand versus rigid and flexible receptor.
    pub inter: f64,
    /// Flexible receptor versus the rest of the receptor.
    pub receptor: f64,
    /// Solvent versus solvent.
    pub solvent: f64,
    /// Receptor versus solvent.
    pub receptor_solvent: f64,
    /// Ligand versus solvent.
    pub ligand_solvent: f64,
}

impl ScoreBreakdown {
    pub fn new(
        inter: f64,
        receptor: f64,
        solvent: f64,
        receptor_solvent: f64,
        ligand_solvent: f64,
    ) -> Self {
        Self {
            inter,
            receptor,
            solvent,
            receptor_solvent,
            ligand_solvent,
        }
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.inter + self.receptor + self.solvent + self.receptor_solvent + self.ligand_solvent
    }
}

impl Add for ScoreBreakdown {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            inter: self.inter + rhs.inter,
            receptor: self.receptor + rhs.receptor,
            solvent: self.solvent + rhs.solvent,
            receptor_solvent: self.receptor_solvent + rhs.receptor_solvent,
            ligand_solvent: self.ligand_solvent + rhs.ligand_solvent,
        }
    }
}

impl AddAssign for ScoreBreakdown {
    fn add_assign(&mut self, rhs: Self) {
        self.inter += rhs.inter;
        self.receptor += rhs.receptor;
        self.solvent += rhs.solvent;
        self.receptor_solvent += rhs.receptor_solvent;
        self.ligand_solvent += rhs.ligand_solvent;
    }
}
