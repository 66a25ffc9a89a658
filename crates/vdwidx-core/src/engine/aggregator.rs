use super::atom_set::AtomSet;
use super::config::VdwParams;
use super::interactions::{InteractionLists, sum_pairs};
use super::partition::{AtomRef, Category};
use crate::core::forcefield::term::ScoreBreakdown;
use crate::core::forcefield::vdw::VdwPotential;
use crate::core::spatial::grid::SpatialGrid;
use nalgebra::{Point3, distance_squared};
use serde::Serialize;

/// Ligand atoms whose summed contributions cross the attractive or repulsive threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ThresholdCounters {
    pub attractive: usize,
    pub repulsive: usize,
}

impl ThresholdCounters {
    /// Counts one ligand atom. An atom increments at most one counter.
    #[inline]
    pub fn tally(&mut self, atom_total: f64, params: &VdwParams) {
        if atom_total < 0.0 && atom_total <= -params.attractive_threshold() {
            self.attractive += 1;
        } else if atom_total > 0.0 && atom_total >= params.repulsive_threshold() {
            self.repulsive += 1;
        }
    }
}

/// One scored in-cutoff pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairDetail {
    pub category: Category,
    /// Ligand atom first for ligand pairs; receptor before solvent otherwise.
    pub a: AtomRef,
    pub b: AtomRef,
    pub distance: f64,
    pub energy: f64,
}

/// Receiver of per-pair detail during aggregation.
pub trait PairSink {
    /// Whether cached sub-sums must still be walked pair by pair.
    const WANTS_EVERY_PAIR: bool;

    fn record(&mut self, detail: PairDetail);
}

/// Discards all detail; the raw-score path.
pub struct NoDetail;

impl PairSink for NoDetail {
    const WANTS_EVERY_PAIR: bool = false;

    #[inline(always)]
    fn record(&mut self, _detail: PairDetail) {}
}

/// Keeps only pairs involving a ligand atom, as needed for annotations.
#[derive(Debug, Default)]
pub struct LigandPairs(pub Vec<PairDetail>);

impl PairSink for LigandPairs {
    const WANTS_EVERY_PAIR: bool = false;

    #[inline]
    fn record(&mut self, detail: PairDetail) {
        if detail.category.involves_ligand() {
            self.0.push(detail);
        }
    }
}

/// Keeps every pair.
impl PairSink for Vec<PairDetail> {
    const WANTS_EVERY_PAIR: bool = true;

    #[inline]
    fn record(&mut self, detail: PairDetail) {
        self.push(detail);
    }
}

/// Walks the interaction structure for the current positions and sums the potential.
pub struct ScoreAggregator<'a> {
    potential: &'a VdwPotential,
    lists: &'a InteractionLists,
    receptor: &'a AtomSet,
    ligand: &'a AtomSet,
    solvent: &'a AtomSet,
    cutoff_sq: f64,
}

impl<'a> ScoreAggregator<'a> {
    pub fn new(
        potential: &'a VdwPotential,
        lists: &'a InteractionLists,
        receptor: &'a AtomSet,
        ligand: &'a AtomSet,
        solvent: &'a AtomSet,
    ) -> Self {
        let cutoff = potential.cutoff();
        Self {
            potential,
            lists,
            receptor,
            ligand,
            solvent,
            cutoff_sq: cutoff * cutoff,
        }
    }

    /// Scores the current configuration.
    ///
    /// Sub-scores and threshold counters are produced fresh on every call; `sink` sees
    /// each in-cutoff pair exactly once.
    pub fn score<S: PairSink>(
        &self,
        params: &VdwParams,
        sink: &mut S,
    ) -> (ScoreBreakdown, ThresholdCounters) {
        let mut breakdown = ScoreBreakdown::default();
        let mut counters = ThresholdCounters::default();

        self.score_ligand(params, &mut breakdown, &mut counters, sink);
        self.score_flexible_receptor(&mut breakdown, sink);
        self.score_free_solvent(&mut breakdown, sink);
        self.score_static_pairs(params, &mut breakdown, sink);

        (breakdown, counters)
    }

    #[inline]
    fn pair(
        &self,
        pos_a: &Point3<f64>,
        radius_a: f64,
        pos_b: &Point3<f64>,
        radius_b: f64,
    ) -> Option<(f64, f64)> {
        let d2 = distance_squared(pos_a, pos_b);
        if d2 > self.cutoff_sq {
            return None;
        }
        let distance = d2.sqrt();
        Some((distance, self.potential.evaluate(distance, radius_a, radius_b)))
    }

    /// Scores `driver` against every static atom of `grid` near it.
    ///
    /// Returns the sum of contributions. Candidates rejected by `skip` are ignored.
    #[inline]
    #[allow(clippy::too_many_arguments)]
    fn drive_grid<S, F>(
        &self,
        driver: AtomRef,
        position: &Point3<f64>,
        radius: f64,
        grid: &SpatialGrid,
        partners: &AtomSet,
        category: Category,
        skip: F,
        sink: &mut S,
    ) -> f64
    where
        S: PairSink,
        F: Fn(u32) -> bool,
    {
        let positions = partners.positions();
        let radii = partners.radii();
        let mut sum = 0.0;
        for candidate in grid.query(position, self.lists.cutoff()) {
            if skip(candidate) {
                continue;
            }
            let c = candidate as usize;
            if let Some((distance, energy)) = self.pair(position, radius, &positions[c], radii[c]) {
                sum += energy;
                sink.record(PairDetail {
                    category,
                    a: driver,
                    b: AtomRef::new(partners.group(), candidate),
                    distance,
                    energy,
                });
            }
        }
        sum
    }

    /// Scores a stored pair list between `set_a` and `set_b`.
    fn walk_pairs<S: PairSink>(
        &self,
        pairs: &[(u32, u32)],
        set_a: &AtomSet,
        set_b: &AtomSet,
        category: Category,
        sink: &mut S,
    ) -> f64 {
        let (pos_a, rad_a) = (set_a.positions(), set_a.radii());
        let (pos_b, rad_b) = (set_b.positions(), set_b.radii());
        let mut sum = 0.0;
        for &(a, b) in pairs {
            let (ai, bi) = (a as usize, b as usize);
            if let Some((distance, energy)) =
                self.pair(&pos_a[ai], rad_a[ai], &pos_b[bi], rad_b[bi])
            {
                sum += energy;
                sink.record(PairDetail {
                    category,
                    a: AtomRef::new(set_a.group(), a),
                    b: AtomRef::new(set_b.group(), b),
                    distance,
                    energy,
                });
            }
        }
        sum
    }

    /// Scores `driver` against each listed mobile atom of `partners`.
    #[inline]
    #[allow(clippy::too_many_arguments)]
    fn drive_list<S: PairSink>(
        &self,
        driver: AtomRef,
        position: &Point3<f64>,
        radius: f64,
        members: &[u32],
        partners: &AtomSet,
        category: Category,
        sink: &mut S,
    ) -> f64 {
        let positions = partners.positions();
        let radii = partners.radii();
        let mut sum = 0.0;
        for &member in members {
            let m = member as usize;
            if let Some((distance, energy)) = self.pair(position, radius, &positions[m], radii[m]) {
                sum += energy;
                sink.record(PairDetail {
                    category,
                    a: driver,
                    b: AtomRef::new(partners.group(), member),
                    distance,
                    energy,
                });
            }
        }
        sum
    }

    /// Ligand atoms are driven one at a time so each atom's running total is complete
    /// before it is counted.
    fn score_ligand<S: PairSink>(
        &self,
        params: &VdwParams,
        breakdown: &mut ScoreBreakdown,
        counters: &mut ThresholdCounters,
        sink: &mut S,
    ) {
        let positions = self.ligand.positions();
        let radii = self.ligand.radii();
        let lists = self.lists;

        for (idx, (position, &radius)) in positions.iter().zip(radii).enumerate() {
            let driver = AtomRef::ligand(idx as u32);

            let inter = self.drive_grid(
                driver,
                position,
                radius,
                lists.receptor_grid(),
                self.receptor,
                Category::Inter,
                |_| false,
                sink,
            ) + self.drive_list(
                driver,
                position,
                radius,
                lists.flexible(),
                self.receptor,
                Category::Inter,
                sink,
            );

            let solvent = self.drive_grid(
                driver,
                position,
                radius,
                lists.solvent_grid(),
                self.solvent,
                Category::LigandSolvent,
                |_| false,
                sink,
            ) + self.drive_list(
                driver,
                position,
                radius,
                lists.free_solvent(),
                self.solvent,
                Category::LigandSolvent,
                sink,
            );

            breakdown.inter += inter;
            breakdown.ligand_solvent += solvent;
            counters.tally(inter + solvent, params);
        }
    }

    fn score_flexible_receptor<S: PairSink>(&self, breakdown: &mut ScoreBreakdown, sink: &mut S) {
        let positions = self.receptor.positions();
        let radii = self.receptor.radii();
        let lists = self.lists;

        for &flex in lists.flexible() {
            let driver = AtomRef::receptor(flex);
            let position = &positions[flex as usize];
            let radius = radii[flex as usize];

            breakdown.receptor += self.drive_grid(
                driver,
                position,
                radius,
                lists.receptor_grid(),
                self.receptor,
                Category::Receptor,
                |_| false,
                sink,
            );
            breakdown.receptor_solvent += self.drive_grid(
                driver,
                position,
                radius,
                lists.solvent_grid(),
                self.solvent,
                Category::ReceptorSolvent,
                |_| false,
                sink,
            );
        }

        breakdown.receptor += self.walk_pairs(
            lists.flexible_flexible(),
            self.receptor,
            self.receptor,
            Category::Receptor,
            sink,
        );
        breakdown.receptor_solvent += self.walk_pairs(
            lists.flexible_free_solvent(),
            self.receptor,
            self.solvent,
            Category::ReceptorSolvent,
            sink,
        );
    }

    fn score_free_solvent<S: PairSink>(&self, breakdown: &mut ScoreBreakdown, sink: &mut S) {
        let positions = self.solvent.positions();
        let radii = self.solvent.radii();
        let lists = self.lists;

        for &free in lists.free_solvent() {
            let driver = AtomRef::solvent(free);
            let position = &positions[free as usize];
            let radius = radii[free as usize];
            let residue = lists.solvent_residue(free);

            breakdown.receptor_solvent += self.drive_grid(
                driver,
                position,
                radius,
                lists.receptor_grid(),
                self.receptor,
                Category::ReceptorSolvent,
                |_| false,
                sink,
            );
            breakdown.solvent += self.drive_grid(
                driver,
                position,
                radius,
                lists.solvent_grid(),
                self.solvent,
                Category::Solvent,
                |other| lists.solvent_residue(other) == residue,
                sink,
            );
        }

        breakdown.solvent += self.walk_pairs(
            lists.free_solvent_pairs(),
            self.solvent,
            self.solvent,
            Category::Solvent,
            sink,
        );
    }

    fn score_static_pairs<S: PairSink>(
        &self,
        params: &VdwParams,
        breakdown: &mut ScoreBreakdown,
        sink: &mut S,
    ) {
        let lists = self.lists;

        breakdown.receptor_solvent += self.walk_pairs(
            lists.receptor_solvent_static(),
            self.receptor,
            self.solvent,
            Category::ReceptorSolvent,
            sink,
        );

        if params.fast_solvent() {
            if S::WANTS_EVERY_PAIR {
                self.walk_pairs(
                    lists.solvent_static(),
                    self.solvent,
                    self.solvent,
                    Category::Solvent,
                    sink,
                );
            }
            breakdown.solvent += lists.solvent_static_score();
        } else {
            breakdown.solvent += self.walk_pairs(
                lists.solvent_static(),
                self.solvent,
                self.solvent,
                Category::Solvent,
                sink,
            );
        }
    }

    /// Recomputes the static solvent self-interaction the way setup caches it.
    pub fn static_solvent_sum(&self) -> f64 {
        sum_pairs(
            self.potential,
            self.lists.solvent_static(),
            self.solvent,
            self.solvent,
        )
    }
}
