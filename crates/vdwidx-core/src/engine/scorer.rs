use super::aggregator::{LigandPairs, NoDetail, PairDetail, ScoreAggregator, ThresholdCounters};
use super::annotation::{AnnotationRenderer, ResidueAnnotation};
use super::atom_set::AtomSet;
use super::config::{ConfigError, ParamKey, ParamValue, VdwParams};
use super::error::EngineError;
use super::interactions::{InteractionListBuilder, InteractionLists};
use super::partition::{AtomGroup, AtomRef};
use super::score_map::ScoreMap;
use crate::core::forcefield::term::ScoreBreakdown;
use crate::core::forcefield::vdw::{VdwPotential, VdwPotentialBuilder};
use crate::core::models::atom::Atom;
use nalgebra::Point3;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_NAME: &str = "vdw";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerState {
    /// Receptor or ligand has not been set up yet.
    Unbuilt,
    /// Both receptor and ligand are set up; scoring is available.
    Built,
}

/// Result of a full scoring call.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    pub breakdown: ScoreBreakdown,
    pub counters: ThresholdCounters,
    /// Present when annotation is enabled.
    pub annotations: Option<Vec<ResidueAnnotation>>,
}

impl ScoreOutcome {
    pub fn total(&self) -> f64 {
        self.breakdown.total()
    }
}

/// Indexed-grid intermolecular van der Waals scoring term.
///
/// Receptor, ligand and solvent are handed over by separate setup calls. Setting up the
/// receptor or solvent rebuilds the grids and interaction lists; setting up the ligand
/// only replaces the ligand atoms. Poses are then scored by moving mobile atoms and
/// calling one of the scoring methods.
///
/// Cloning is cheap: atom data and interaction lists are shared, only positions are
/// copied. A clone can be moved to another thread and scored independently.
#[derive(Debug, Clone)]
pub struct VdwIdxScorer {
    name: String,
    potential: VdwPotential,
    params: VdwParams,
    receptor: Option<AtomSet>,
    ligand: Option<AtomSet>,
    solvent: AtomSet,
    lists: Arc<InteractionLists>,
}

impl VdwIdxScorer {
    pub fn new(potential: VdwPotential) -> Self {
        let solvent = AtomSet::empty(AtomGroup::Solvent);
        let lists = Arc::new(InteractionListBuilder::new(&potential).build(None, &solvent));
        Self {
            name: DEFAULT_NAME.to_string(),
            potential,
            params: VdwParams::default(),
            receptor: None,
            ligand: None,
            solvent,
            lists,
        }
    }

    /// Builds the potential and creates a scorer around it.
    pub fn from_builder(builder: VdwPotentialBuilder) -> Result<Self, EngineError> {
        let potential = builder.build().map_err(ConfigError::from)?;
        Ok(Self::new(potential))
    }

    /// Sets the instance name that prefixes score map keys.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_params(mut self, params: VdwParams) -> Result<Self, EngineError> {
        params.validate()?;
        self.params = params;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn potential(&self) -> &VdwPotential {
        &self.potential
    }

    pub fn params(&self) -> &VdwParams {
        &self.params
    }

    pub fn interaction_lists(&self) -> &InteractionLists {
        &self.lists
    }

    pub fn receptor(&self) -> Option<&AtomSet> {
        self.receptor.as_ref()
    }

    pub fn ligand(&self) -> Option<&AtomSet> {
        self.ligand.as_ref()
    }

    pub fn solvent(&self) -> &AtomSet {
        &self.solvent
    }

    pub fn state(&self) -> ScorerState {
        if self.receptor.is_some() && self.ligand.is_some() {
            ScorerState::Built
        } else {
            ScorerState::Unbuilt
        }
    }

    /// Installs the receptor and rebuilds the interaction structure.
    ///
    /// On error the previous receptor and lists are kept.
    #[instrument(skip_all, name = "vdw_setup_receptor")]
    pub fn setup_receptor(&mut self, atoms: Vec<Atom>) -> Result<(), EngineError> {
        let receptor = AtomSet::new(AtomGroup::Receptor, atoms, true)?;
        let lists =
            InteractionListBuilder::new(&self.potential).build(Some(&receptor), &self.solvent);
        info!(
            atoms = receptor.len(),
            flexible = lists.flexible().len(),
            stored_pairs = lists.stored_pairs(),
            "Receptor set up."
        );
        self.receptor = Some(receptor);
        self.lists = Arc::new(lists);
        Ok(())
    }

    /// Installs the ligand. Grids and lists are unaffected.
    #[instrument(skip_all, name = "vdw_setup_ligand")]
    pub fn setup_ligand(&mut self, atoms: Vec<Atom>) -> Result<(), EngineError> {
        let ligand = AtomSet::new(AtomGroup::Ligand, atoms, true)?;
        info!(atoms = ligand.len(), "Ligand set up.");
        self.ligand = Some(ligand);
        Ok(())
    }

    /// Installs the solvent (possibly empty) and rebuilds the interaction structure.
    #[instrument(skip_all, name = "vdw_setup_solvent")]
    pub fn setup_solvent(&mut self, atoms: Vec<Atom>) -> Result<(), EngineError> {
        let solvent = AtomSet::new(AtomGroup::Solvent, atoms, false)?;
        let lists =
            InteractionListBuilder::new(&self.potential).build(self.receptor.as_ref(), &solvent);
        info!(
            atoms = solvent.len(),
            free = lists.free_solvent().len(),
            static_score = lists.solvent_static_score(),
            "Solvent set up."
        );
        self.solvent = solvent;
        self.lists = Arc::new(lists);
        Ok(())
    }

    /// Moves every ligand atom, in setup order.
    pub fn set_ligand_positions(&mut self, positions: &[Point3<f64>]) -> Result<(), EngineError> {
        self.ligand
            .as_mut()
            .ok_or(EngineError::NotBuilt)?
            .set_all_positions(positions)
    }

    /// Moves one mobile atom: a ligand atom, a flexible receptor atom or a free solvent atom.
    pub fn set_atom_position(
        &mut self,
        atom: AtomRef,
        position: Point3<f64>,
    ) -> Result<(), EngineError> {
        let set = match atom.group {
            AtomGroup::Receptor => self.receptor.as_mut().ok_or(EngineError::NotBuilt)?,
            AtomGroup::Ligand => self.ligand.as_mut().ok_or(EngineError::NotBuilt)?,
            AtomGroup::Solvent => &mut self.solvent,
        };
        set.set_position(atom.index, position)
    }

    fn aggregator(&self) -> Result<ScoreAggregator<'_>, EngineError> {
        match (&self.receptor, &self.ligand) {
            (Some(receptor), Some(ligand)) => Ok(ScoreAggregator::new(
                &self.potential,
                &self.lists,
                receptor,
                ligand,
                &self.solvent,
            )),
            _ => Err(EngineError::NotBuilt),
        }
    }

    /// Total van der Waals score of the current configuration.
    pub fn raw_score(&self) -> Result<f64, EngineError> {
        let (breakdown, _) = self.aggregator()?.score(&self.params, &mut NoDetail);
        Ok(breakdown.total())
    }

    pub fn breakdown(&self) -> Result<ScoreBreakdown, EngineError> {
        let (breakdown, _) = self.aggregator()?.score(&self.params, &mut NoDetail);
        Ok(breakdown)
    }

    pub fn inter_score(&self) -> Result<f64, EngineError> {
        Ok(self.breakdown()?.inter)
    }

    pub fn receptor_score(&self) -> Result<f64, EngineError> {
        Ok(self.breakdown()?.receptor)
    }

    pub fn solvent_score(&self) -> Result<f64, EngineError> {
        Ok(self.breakdown()?.solvent)
    }

    pub fn receptor_solvent_score(&self) -> Result<f64, EngineError> {
        Ok(self.breakdown()?.receptor_solvent)
    }

    pub fn ligand_solvent_score(&self) -> Result<f64, EngineError> {
        Ok(self.breakdown()?.ligand_solvent)
    }

    /// Scores the current configuration with threshold counters and, when enabled,
    /// lipophilic annotations.
    pub fn score(&self) -> Result<ScoreOutcome, EngineError> {
        let aggregator = self.aggregator()?;

        if !self.params.annotate() {
            let (breakdown, counters) = aggregator.score(&self.params, &mut NoDetail);
            return Ok(ScoreOutcome {
                breakdown,
                counters,
                annotations: None,
            });
        }

        let mut pairs = LigandPairs::default();
        let (breakdown, counters) = aggregator.score(&self.params, &mut pairs);
        let annotations = self
            .renderer()?
            .render(&pairs.0, self.params.lipo_annotation());
        debug!(
            ligand_pairs = pairs.0.len(),
            annotated_residues = annotations.len(),
            "Rendered lipophilic annotations."
        );
        Ok(ScoreOutcome {
            breakdown,
            counters,
            annotations: Some(annotations),
        })
    }

    fn renderer(&self) -> Result<AnnotationRenderer<'_>, EngineError> {
        match (&self.receptor, &self.ligand) {
            (Some(receptor), Some(ligand)) => {
                Ok(AnnotationRenderer::new(receptor, ligand, &self.solvent))
            }
            _ => Err(EngineError::NotBuilt),
        }
    }

    /// Named results keyed under this instance's name.
    pub fn score_map(&self) -> Result<ScoreMap, EngineError> {
        let outcome = self.score()?;
        Ok(ScoreMap::from_outcome(
            &self.name,
            &outcome.breakdown,
            &outcome.counters,
            outcome.annotations,
        ))
    }

    /// Every pair within the cutoff for the current configuration, with its category.
    pub fn in_range_pairs(&self) -> Result<Vec<PairDetail>, EngineError> {
        let mut pairs = Vec::new();
        self.aggregator()?.score(&self.params, &mut pairs);
        Ok(pairs)
    }

    /// Changes a named option. Takes effect on the next scoring call.
    pub fn update_parameter(
        &mut self,
        name: &str,
        value: impl Into<ParamValue>,
    ) -> Result<ParamKey, EngineError> {
        let value = value.into();
        match self.params.update(name, value) {
            Ok(key) => {
                debug!(parameter = key.name(), %value, "Updated van der Waals option.");
                Ok(key)
            }
            Err(err) => {
                warn!(parameter = name, %value, error = %err, "Rejected van der Waals option.");
                Err(err.into())
            }
        }
    }
}
