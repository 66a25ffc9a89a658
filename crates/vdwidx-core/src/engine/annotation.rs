use super::aggregator::PairDetail;
use super::atom_set::AtomSet;
use super::partition::{AtomGroup, AtomRef};
use crate::core::models::atom::{Atom, ResidueKey};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// A strong contact between two lipophilic atoms, one of them on the ligand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LipoContact {
    pub ligand_atom: String,
    pub partner_atom: String,
    pub distance: f64,
    pub energy: f64,
}

/// Lipophilic contacts of the ligand with one partner residue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResidueAnnotation {
    pub residue: ResidueKey,
    /// Most favourable first.
    pub contacts: Vec<LipoContact>,
    pub total: f64,
}

impl fmt::Display for ResidueAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} contacts, {:.3})",
            self.residue,
            self.contacts.len(),
            self.total
        )?;
        for contact in &self.contacts {
            write!(
                f,
                "\n  {} - {}: {:.3} at {:.2}",
                contact.ligand_atom, contact.partner_atom, contact.energy, contact.distance
            )?;
        }
        Ok(())
    }
}

/// Turns ligand pair detail into per-residue lipophilic annotations.
pub struct AnnotationRenderer<'a> {
    receptor: &'a AtomSet,
    ligand: &'a AtomSet,
    solvent: &'a AtomSet,
}

impl<'a> AnnotationRenderer<'a> {
    pub fn new(receptor: &'a AtomSet, ligand: &'a AtomSet, solvent: &'a AtomSet) -> Self {
        Self {
            receptor,
            ligand,
            solvent,
        }
    }

    fn atom(&self, atom_ref: AtomRef) -> &'a Atom {
        match atom_ref.group {
            AtomGroup::Receptor => self.receptor.atom(atom_ref.index),
            AtomGroup::Ligand => self.ligand.atom(atom_ref.index),
            AtomGroup::Solvent => self.solvent.atom(atom_ref.index),
        }
    }

    /// Keeps ligand pairs where both atoms are lipophilic and `|energy|` exceeds
    /// `threshold`, grouped by the partner's residue in residue order.
    pub fn render(&self, details: &[PairDetail], threshold: f64) -> Vec<ResidueAnnotation> {
        let mut by_residue: BTreeMap<&ResidueKey, Vec<LipoContact>> = BTreeMap::new();

        for detail in details.iter().filter(|d| d.category.involves_ligand()) {
            if detail.energy.abs() <= threshold {
                continue;
            }
            let (ligand_ref, partner_ref) = if detail.a.group == AtomGroup::Ligand {
                (detail.a, detail.b)
            } else {
                (detail.b, detail.a)
            };
            let ligand_atom = self.atom(ligand_ref);
            let partner = self.atom(partner_ref);
            if !(ligand_atom.lipophilic && partner.lipophilic) {
                continue;
            }

            by_residue
                .entry(&partner.residue)
                .or_default()
                .push(LipoContact {
                    ligand_atom: ligand_atom.label(),
                    partner_atom: partner.label(),
                    distance: detail.distance,
                    energy: detail.energy,
                });
        }

        by_residue
            .into_iter()
            .map(|(residue, mut contacts)| {
                contacts.sort_by(|a, b| {
                    a.energy
                        .partial_cmp(&b.energy)
                        .unwrap_or(Ordering::Equal)
                });
                let total = contacts.iter().map(|c| c.energy).sum();
                ResidueAnnotation {
                    residue: residue.clone(),
                    contacts,
                    total,
                }
            })
            .collect()
    }
}
