//! Property-based tests for ranking, sampling, blending and selection.
//!
//! Run with: cargo test -p vertex-restore -- proptest

use nalgebra::{Point3, Vector3};
use proptest::prelude::*;
use vertex_restore::{
    BlendConfiguration, CurvePoint, EditSession, FalloffTable, Mesh, SelectionPolicy, Vertex,
    VertexRecord, rank_movement, reconcile,
};

// =============================================================================
// Strategies
// =============================================================================

fn arb_position() -> impl Strategy<Value = [f64; 3]> {
    prop::array::uniform3(-100.0..100.0f64)
}

/// Saved and live positions for the same vertices.
fn arb_moves(max: usize) -> impl Strategy<Value = Vec<([f64; 3], [f64; 3])>> {
    prop::collection::vec((arb_position(), arb_position()), 1..max)
}

fn records_for(moves: &[([f64; 3], [f64; 3])]) -> Vec<VertexRecord> {
    moves
        .iter()
        .enumerate()
        .map(|(i, (saved, _))| VertexRecord {
            saved_position: Point3::from(*saved),
            saved_normal: Vector3::z(),
            index: i as u32,
        })
        .collect()
}

/// A selected mesh at the saved positions plus a copy moved to the live ones.
fn saved_and_live(moves: &[([f64; 3], [f64; 3])]) -> (EditSession, Mesh) {
    let mut mesh = Mesh::new();
    for (saved, _) in moves {
        mesh.vertices
            .push(Vertex::from_coords(saved[0], saved[1], saved[2]).selected());
    }
    let mut session = EditSession::new();
    session.save(&mesh).unwrap();
    for (v, (_, live)) in mesh.vertices.iter_mut().zip(moves) {
        v.position = Point3::from(*live);
    }
    (session, mesh)
}

fn arb_flags_and_indices() -> impl Strategy<Value = (Vec<bool>, Vec<u32>)> {
    (1usize..40).prop_flat_map(|n| {
        (
            prop::collection::vec(any::<bool>(), n),
            prop::collection::vec(0..n as u32, 0..n),
        )
    })
}

// =============================================================================
// Ranking Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Rank never decreases as magnitude increases.
    #[test]
    fn proptest_rank_monotonic(moves in arb_moves(60), roughness in 0.0..5.0f64) {
        let records = records_for(&moves);
        let mut ranked = rank_movement(
            &records,
            |r| Point3::from(moves[r.index as usize].1),
            roughness,
            None,
        );
        ranked.sort_by(|a, b| a.magnitude.total_cmp(&b.magnitude));

        for pair in ranked.windows(2) {
            prop_assert!(pair[0].rank_position <= pair[1].rank_position);
        }
        for r in &ranked {
            prop_assert!((0.0..=1.0).contains(&r.rank_position));
        }
    }

    /// With zero roughness and distinct magnitudes, the largest mover ranks 1.0.
    #[test]
    fn proptest_max_mover_ranks_one(moves in arb_moves(40)) {
        let records = records_for(&moves);
        let ranked = rank_movement(
            &records,
            |r| Point3::from(moves[r.index as usize].1),
            0.0,
            None,
        );
        let max = ranked
            .iter()
            .max_by(|a, b| a.magnitude.total_cmp(&b.magnitude))
            .unwrap();
        let tied = ranked.iter().filter(|r| r.magnitude == max.magnitude).count();
        prop_assume!(max.magnitude > 0.0 && tied == 1);
        prop_assert_eq!(max.rank_position, 1.0);
    }

    /// Ranking is a pure function of its inputs.
    #[test]
    fn proptest_rank_deterministic(moves in arb_moves(30), roughness in 0.0..1.0f64) {
        let records = records_for(&moves);
        let live = |r: &VertexRecord| Point3::from(moves[r.index as usize].1);
        let mut a = rank_movement(&records, live, roughness, None);
        let mut b = rank_movement(&records, live, roughness, None);
        a.sort_by_key(|r| r.index);
        b.sort_by_key(|r| r.index);
        prop_assert_eq!(a, b);
    }
}

// =============================================================================
// Falloff Properties
// =============================================================================

proptest! {
    #[test]
    fn proptest_table_length(segments in 0usize..2000, rate in -100.0..100.0f64) {
        let table = FalloffTable::sample(&CurvePoint::linear(), rate, segments).unwrap();
        prop_assert_eq!(table.len(), segments + 10);
    }

    /// Every lookup stays inside the table.
    #[test]
    fn proptest_lookup_in_bounds(segments in 0usize..500, rank in -1.0..2.0f64) {
        let table = FalloffTable::sample(&CurvePoint::linear(), 1.0, segments).unwrap();
        prop_assert!(table.index_for(rank) < table.len());
    }

    /// Samples of a curve stay within the range of its control point y values.
    #[test]
    fn proptest_samples_bounded(ys in prop::collection::vec(-1.0..1.0f64, 2..8)) {
        let n = ys.len();
        let points: Vec<CurvePoint> = ys
            .iter()
            .enumerate()
            .map(|(i, &y)| CurvePoint::new(i as f64 / (n - 1) as f64, y))
            .collect();
        let lo = ys.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let table = FalloffTable::sample(&points, 1.0, 50).unwrap();
        for &s in table.samples() {
            prop_assert!(s >= lo - 1e-12 && s <= hi + 1e-12);
        }
    }
}

// =============================================================================
// Blend Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn proptest_rate_zero_is_noop(moves in arb_moves(30)) {
        let (session, mut mesh) = saved_and_live(&moves);
        let before = mesh.clone();
        session.restore(&mut mesh, &mut BlendConfiguration::constant(0)).unwrap();
        prop_assert_eq!(mesh, before);
    }

    #[test]
    fn proptest_rate_hundred_restores(moves in arb_moves(30)) {
        let (session, mut mesh) = saved_and_live(&moves);
        session.restore(&mut mesh, &mut BlendConfiguration::constant(100)).unwrap();
        for (v, (saved, _)) in mesh.vertices.iter().zip(&moves) {
            prop_assert_eq!(v.position, Point3::from(*saved));
        }
    }

    #[test]
    fn proptest_full_restore_any_config(moves in arb_moves(30), rate in 0u8..=100, curve in any::<bool>()) {
        let (session, mut mesh) = saved_and_live(&moves);
        let config = if curve {
            BlendConfiguration::curve(f64::from(rate) / 10.0, CurvePoint::linear())
        } else {
            BlendConfiguration::constant(rate)
        };
        let mut config = config.with_full_restore(true);
        session.restore(&mut mesh, &mut config).unwrap();
        for (v, (saved, _)) in mesh.vertices.iter().zip(&moves) {
            prop_assert_eq!(v.position, Point3::from(*saved));
        }
    }

    /// Constant-mode results lie on the segment between live and saved.
    #[test]
    fn proptest_constant_between_endpoints(moves in arb_moves(20), rate in 0u8..=100) {
        let (session, mut mesh) = saved_and_live(&moves);
        session.restore(&mut mesh, &mut BlendConfiguration::constant(rate)).unwrap();
        for (v, (saved, live)) in mesh.vertices.iter().zip(&moves) {
            for axis in 0..3 {
                let lo = saved[axis].min(live[axis]) - 1e-9;
                let hi = saved[axis].max(live[axis]) + 1e-9;
                prop_assert!(v.position[axis] >= lo && v.position[axis] <= hi);
            }
        }
    }
}

// =============================================================================
// Selection Properties
// =============================================================================

proptest! {
    #[test]
    fn proptest_replace_idempotent((flags, indices) in arb_flags_and_indices()) {
        let once = reconcile(&flags, indices.iter().copied(), SelectionPolicy::Replace);
        let twice = reconcile(&once, indices.iter().copied(), SelectionPolicy::Replace);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn proptest_symmetric_difference_involution((flags, indices) in arb_flags_and_indices()) {
        let once = reconcile(&flags, indices.iter().copied(), SelectionPolicy::SymmetricDifference);
        let twice = reconcile(&once, indices.iter().copied(), SelectionPolicy::SymmetricDifference);
        prop_assert_eq!(twice, flags);
    }

    #[test]
    fn proptest_subtract_never_selects((flags, indices) in arb_flags_and_indices()) {
        let next = reconcile(&flags, indices.iter().copied(), SelectionPolicy::Subtract);
        for (before, after) in flags.iter().zip(&next) {
            prop_assert!(!after || *before);
        }
    }

    /// Only Replace touches vertices outside the saved set.
    #[test]
    fn proptest_untouched_outside_saved((flags, indices) in arb_flags_and_indices()) {
        for policy in [
            SelectionPolicy::Union,
            SelectionPolicy::Subtract,
            SelectionPolicy::SymmetricDifference,
        ] {
            let next = reconcile(&flags, indices.iter().copied(), policy);
            for (i, (before, after)) in flags.iter().zip(&next).enumerate() {
                if !indices.contains(&(i as u32)) {
                    prop_assert_eq!(before, after);
                }
            }
        }
    }
}
