use nalgebra::Point3;
use std::collections::BTreeSet;
use vdwidx::core::forcefield::term::ScoreBreakdown;
use vdwidx::core::forcefield::vdw::{VdwExponents, VdwPotential};
use vdwidx::core::models::atom::{Atom, FlexRegionId, Partition, ResidueKey};
use vdwidx::engine::atom_set::AtomSet;
use vdwidx::engine::partition::{AtomRef, Category, classify};
use vdwidx::engine::scorer::VdwIdxScorer;

const TOLERANCE: f64 = 1e-9;

fn f64_approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOLERANCE * (1.0 + a.abs().max(b.abs()))
}

/// Small deterministic generator so the layouts are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    fn point(&mut self, extent: f64) -> Point3<f64> {
        Point3::new(
            self.next_f64() * extent,
            self.next_f64() * extent,
            self.next_f64() * extent,
        )
    }

    fn radius(&mut self) -> f64 {
        1.2 + self.next_f64() * 0.8
    }
}

fn atom(
    name: &str,
    residue: isize,
    position: Point3<f64>,
    radius: f64,
    partition: Partition,
) -> Atom {
    Atom::new(name, ResidueKey::new('A', residue, "RES"), position, radius)
        .with_partition(partition)
        .with_lipophilic(residue % 2 == 0)
}

fn potential() -> VdwPotential {
    VdwPotential::builder()
        .well_depth(0.3)
        .switch_on(4.0)
        .cutoff(5.0)
        .build()
        .unwrap()
}

struct Layout {
    receptor: Vec<Atom>,
    ligand: Vec<Atom>,
    solvent: Vec<Atom>,
}

fn layout(seed: u64) -> Layout {
    let mut rng = Lcg(seed);
    let extent = 16.0;

    let receptor = (0..80)
        .map(|i| {
            let partition = match i % 10 {
                0 | 1 => Partition::Flexible(FlexRegionId((i / 20) as u32)),
                _ => Partition::Rigid,
            };
            atom("C", (i / 4) as isize, rng.point(extent), rng.radius(), partition)
        })
        .collect();

    let ligand = (0..12)
        .map(|_| atom("L", 900, rng.point(extent), rng.radius(), Partition::Ligand))
        .collect();

    let solvent = (0..30)
        .map(|i| {
            let partition = match i % 3 {
                0 => Partition::SolventFixed,
                1 => Partition::SolventTethered,
                _ => Partition::SolventFree,
            };
            atom("O", 300 + (i / 2) as isize, rng.point(extent), 1.5, partition)
        })
        .collect();

    Layout {
        receptor,
        ligand,
        solvent,
    }
}

fn build(potential: VdwPotential, layout: Layout) -> VdwIdxScorer {
    let mut scorer = VdwIdxScorer::new(potential);
    scorer.setup_receptor(layout.receptor).unwrap();
    scorer.setup_solvent(layout.solvent).unwrap();
    scorer.setup_ligand(layout.ligand).unwrap();
    scorer
}

fn all_atoms(scorer: &VdwIdxScorer) -> Vec<(AtomRef, Atom, Point3<f64>)> {
    let mut out = Vec::new();
    let mut push = |set: &AtomSet| {
        for (idx, (atom, position)) in set.atoms().iter().zip(set.positions()).enumerate() {
            out.push((AtomRef::new(set.group(), idx as u32), atom.clone(), *position));
        }
    };
    push(scorer.receptor().unwrap());
    push(scorer.ligand().unwrap());
    push(scorer.solvent());
    out
}

type CategorizedPair = (AtomRef, AtomRef, Category);

fn brute_force(scorer: &VdwIdxScorer) -> (ScoreBreakdown, BTreeSet<CategorizedPair>) {
    let atoms = all_atoms(scorer);
    let potential = scorer.potential();
    let mut breakdown = ScoreBreakdown::default();
    let mut pairs = BTreeSet::new();

    for i in 0..atoms.len() {
        for j in (i + 1)..atoms.len() {
            let (ref_a, atom_a, pos_a) = &atoms[i];
            let (ref_b, atom_b, pos_b) = &atoms[j];
            let Some(category) = classify(atom_a, atom_b) else {
                continue;
            };
            let distance = nalgebra::distance(pos_a, pos_b);
            if distance > potential.cutoff() {
                continue;
            }
            let energy = potential.evaluate(distance, atom_a.vdw_radius, atom_b.vdw_radius);
            match category {
                Category::Inter => breakdown.inter += energy,
                Category::Receptor => breakdown.receptor += energy,
                Category::Solvent => breakdown.solvent += energy,
                Category::ReceptorSolvent => breakdown.receptor_solvent += energy,
                Category::LigandSolvent => breakdown.ligand_solvent += energy,
            }
            pairs.insert(ordered(*ref_a, *ref_b, category));
        }
    }
    (breakdown, pairs)
}

fn ordered(a: AtomRef, b: AtomRef, category: Category) -> CategorizedPair {
    if a <= b {
        (a, b, category)
    } else {
        (b, a, category)
    }
}

fn assert_breakdown_eq(actual: &ScoreBreakdown, expected: &ScoreBreakdown) {
    for category in Category::ALL {
        let (a, e) = (category.score_in(actual), category.score_in(expected));
        assert!(f64_approx_equal(a, e), "{}: {a} != {e}", category.key());
    }
}

#[test]
fn matches_brute_force_for_random_layouts() {
    for seed in [1, 7, 42] {
        let scorer = build(potential(), layout(seed));
        let (expected, _) = brute_force(&scorer);
        let actual = scorer.breakdown().unwrap();

        assert_breakdown_eq(&actual, &expected);
        assert!(f64_approx_equal(scorer.raw_score().unwrap(), expected.total()));
    }
}

#[test]
fn matches_brute_force_with_four_eight_exponents() {
    let potential = VdwPotential::builder()
        .exponents(VdwExponents::FourEight)
        .cutoff(5.0)
        .switch_on(3.5)
        .build()
        .unwrap();
    let scorer = build(potential, layout(3));
    let (expected, _) = brute_force(&scorer);
    assert_breakdown_eq(&scorer.breakdown().unwrap(), &expected);
}

#[test]
fn in_range_pairs_are_exactly_the_scored_pairs() {
    let scorer = build(potential(), layout(11));
    let (_, expected) = brute_force(&scorer);

    let reported = scorer.in_range_pairs().unwrap();
    let unique: BTreeSet<_> = reported
        .iter()
        .map(|d| ordered(d.a, d.b, d.category))
        .collect();

    assert_eq!(unique.len(), reported.len(), "a pair was scored twice");
    assert_eq!(unique, expected);
}

#[test]
fn moved_mobile_atoms_still_match_brute_force() {
    let mut scorer = build(potential(), layout(5));
    let mut rng = Lcg(99);

    let flexible: Vec<u32> = scorer.interaction_lists().flexible().to_vec();
    for index in flexible {
        let position = rng.point(16.0);
        scorer
            .set_atom_position(AtomRef::receptor(index), position)
            .unwrap();
    }
    let free: Vec<u32> = scorer.interaction_lists().free_solvent().to_vec();
    for index in free {
        let position = rng.point(16.0);
        scorer
            .set_atom_position(AtomRef::solvent(index), position)
            .unwrap();
    }
    let ligand: Vec<Point3<f64>> = (0..12).map(|_| rng.point(16.0)).collect();
    scorer.set_ligand_positions(&ligand).unwrap();

    let (expected, pairs) = brute_force(&scorer);
    assert_breakdown_eq(&scorer.breakdown().unwrap(), &expected);
    assert_eq!(scorer.in_range_pairs().unwrap().len(), pairs.len());
}

#[test]
fn distant_atoms_do_not_change_the_score() {
    let base = layout(21);
    let scorer = build(potential(), layout(21));
    let before = scorer.raw_score().unwrap();

    let mut extended = base;
    let far = Point3::new(500.0, 500.0, 500.0);
    extended
        .receptor
        .push(atom("C", 77, far, 1.5, Partition::Rigid));
    extended.solvent.push(atom(
        "O",
        777,
        far + nalgebra::Vector3::new(50.0, 0.0, 0.0),
        1.5,
        Partition::SolventFixed,
    ));
    let scorer = build(potential(), extended);

    assert!(f64_approx_equal(scorer.raw_score().unwrap(), before));
}

#[test]
fn fast_solvent_cache_matches_recomputation() {
    let mut scorer = build(potential(), layout(8));
    let fast = scorer.breakdown().unwrap();

    scorer.update_parameter("fast_solvent", false).unwrap();
    let slow = scorer.breakdown().unwrap();

    assert_eq!(fast.solvent, slow.solvent);
    assert_breakdown_eq(&fast, &slow);
}

#[test]
fn counters_are_bounded_by_ligand_size() {
    let mut scorer = build(potential(), layout(13));
    let ligand_atoms = scorer.ligand().unwrap().len();

    for threshold in [0.0, 0.05, 0.5, 5.0] {
        scorer.update_parameter("threshold_attr", threshold).unwrap();
        scorer.update_parameter("threshold_rep", threshold).unwrap();
        let counters = scorer.score().unwrap().counters;
        assert!(counters.attractive + counters.repulsive <= ligand_atoms);
    }
}

#[test]
fn raising_the_attractive_threshold_never_increases_the_count() {
    let mut scorer = build(potential(), layout(17));
    let mut previous = usize::MAX;
    for threshold in [0.0, 0.01, 0.1, 0.3, 1.0, 10.0] {
        scorer.update_parameter("threshold_attr", threshold).unwrap();
        let attractive = scorer.score().unwrap().counters.attractive;
        assert!(attractive <= previous);
        previous = attractive;
    }
}

#[test]
fn disabling_annotation_leaves_numbers_untouched() {
    let mut scorer = build(potential(), layout(4));
    scorer.update_parameter("annotation_lipo", 0.0).unwrap();
    let annotated = scorer.score_map().unwrap();

    scorer.update_parameter("annotate", false).unwrap();
    let plain = scorer.score_map().unwrap();

    assert!(annotated.contains_key("vdw.annotations"));
    assert!(!plain.contains_key("vdw.annotations"));
    for key in [
        "vdw",
        "vdw.inter",
        "vdw.receptor",
        "vdw.solvent",
        "vdw.receptor_solvent",
        "vdw.ligand_solvent",
    ] {
        assert_eq!(annotated.score(key), plain.score(key), "{key}");
    }
    assert_eq!(annotated.count("vdw.nattr"), plain.count("vdw.nattr"));
    assert_eq!(annotated.count("vdw.nrep"), plain.count("vdw.nrep"));
}

#[test]
fn empty_solvent_and_rigid_only_receptor_give_zero_side_scores() {
    let mut layout = layout(2);
    layout.receptor.iter_mut().for_each(|a| a.partition = Partition::Rigid);
    layout.solvent.clear();
    let scorer = build(potential(), layout);
    let breakdown = scorer.breakdown().unwrap();

    assert_eq!(breakdown.receptor, 0.0);
    assert_eq!(breakdown.solvent, 0.0);
    assert_eq!(breakdown.receptor_solvent, 0.0);
    assert_eq!(breakdown.ligand_solvent, 0.0);
}
