//! Edge case tests for save, restore and select.
//!
//! Unusual inputs the editor can produce: single-vertex selections, meshes
//! where nothing moved, fully hidden selections and degenerate curves.

#[cfg(test)]
mod tests {
    use crate::config::{Axis, AxisLocks, BlendConfiguration, EvalReference};
    use crate::falloff::{CurvePoint, FalloffTable};
    use crate::rank::{RankMap, rank_movement};
    use crate::selection::SelectionPolicy;
    use crate::session::EditSession;
    use crate::{ErrorCode, Mesh, Vertex};
    use nalgebra::Point3;

    fn selected_mesh(positions: &[[f64; 3]]) -> Mesh {
        let mut mesh = Mesh::from_positions(positions.iter().copied());
        for v in &mut mesh.vertices {
            v.selected = true;
        }
        mesh
    }

    // ==================== Single Vertex Tests ====================

    #[test]
    fn test_single_vertex_curve_restore() {
        let mut mesh = selected_mesh(&[[0.0, 0.0, 0.0]]);
        let mut session = EditSession::new();
        session.save(&mesh).unwrap();
        mesh.vertices[0].position = Point3::new(3.0, 0.0, 0.0);

        // The only mover ranks 1.0, so a linear curve restores it fully.
        let mut config = BlendConfiguration::curve(1.0, CurvePoint::linear());
        session.restore(&mut mesh, &mut config).unwrap();
        assert_eq!(mesh.vertices[0].position, Point3::origin());
    }

    #[test]
    fn test_single_vertex_table() {
        let table = FalloffTable::sample(&CurvePoint::linear(), 1.0, 1).unwrap();
        assert_eq!(table.len(), 11);
        assert_eq!(table.lookup(1.0), 1.0);
    }

    // ==================== Nothing Moved Tests ====================

    #[test]
    fn test_restore_when_nothing_moved() {
        let mut mesh = selected_mesh(&[[0.0; 3], [1.0; 3], [2.0; 3]]);
        let mut session = EditSession::new();
        session.save(&mesh).unwrap();
        let before = mesh.clone();

        for mut config in [
            BlendConfiguration::constant(100),
            BlendConfiguration::curve(5.0, CurvePoint::linear()),
        ] {
            let report = session.restore(&mut mesh, &mut config).unwrap();
            assert_eq!(report.max_displacement, 0.0);
            assert_eq!(mesh, before);
        }
    }

    #[test]
    fn test_all_ranks_zero_when_nothing_moved() {
        let mesh = selected_mesh(&[[0.0; 3], [1.0; 3]]);
        let snapshot = crate::Snapshot::capture(&mesh).unwrap();
        let ranks = RankMap::from(rank_movement(
            snapshot.records(),
            |r| r.saved_position,
            0.0,
            None,
        ));
        assert_eq!(ranks.get(0), 0.0);
        assert_eq!(ranks.get(1), 0.0);
    }

    // ==================== Hidden Vertex Tests ====================

    #[test]
    fn test_all_hidden_selection() {
        let mut mesh = selected_mesh(&[[0.0; 3], [1.0; 3]]);
        for v in &mut mesh.vertices {
            v.hidden = true;
        }
        let mut session = EditSession::new();
        session.save(&mesh).unwrap();
        mesh.vertices[0].position = Point3::new(5.0, 5.0, 5.0);
        mesh.vertices[1].position = Point3::new(-5.0, 5.0, 5.0);

        let mut config = BlendConfiguration::curve(0.0, CurvePoint::linear());
        let report = session.restore(&mut mesh, &mut config).unwrap();
        assert_eq!(report.hidden_restored, 2);
        assert_eq!(mesh.vertices[0].position, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(mesh.vertices[1].position, Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_hidden_unsaved_vertex_untouched() {
        let mut mesh = selected_mesh(&[[0.0; 3]]);
        mesh.vertices.push(Vertex::from_coords(7.0, 7.0, 7.0).hidden());
        let mut session = EditSession::new();
        session.save(&mesh).unwrap();

        mesh.vertices[1].position = Point3::new(8.0, 8.0, 8.0);
        session
            .restore(&mut mesh, &mut BlendConfiguration::constant(100))
            .unwrap();
        assert_eq!(mesh.vertices[1].position, Point3::new(8.0, 8.0, 8.0));
    }

    // ==================== Axis Lock Tests ====================

    #[test]
    fn test_all_axes_locked_equals_full_restore() {
        let mut a = selected_mesh(&[[0.0; 3], [1.0; 3]]);
        let mut session = EditSession::new();
        session.save(&a).unwrap();
        a.vertices[0].position = Point3::new(2.0, -2.0, 4.0);
        a.vertices[1].position = Point3::new(3.0, 3.0, -3.0);
        let mut b = a.clone();

        let locks: AxisLocks = Axis::ALL.into_iter().collect();
        session
            .restore(&mut a, &mut BlendConfiguration::constant(0).with_axis_locks(locks))
            .unwrap();
        session
            .restore(&mut b, &mut BlendConfiguration::constant(0).with_full_restore(true))
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.vertices[1].position, Point3::new(1.0, 1.0, 1.0));
    }

    // ==================== Reference Point Tests ====================

    #[test]
    fn test_reference_point_on_vertex() {
        // A vertex sitting exactly on the reference ranks zero and is not pulled in curve mode.
        let mut mesh = selected_mesh(&[[0.0; 3], [1.0, 0.0, 0.0]]);
        let mut session = EditSession::new();
        session.save(&mesh).unwrap();
        mesh.vertices[0].position = Point3::new(0.0, 2.0, 0.0);
        mesh.vertices[1].position = Point3::new(4.0, 0.0, 0.0);

        let mut config = BlendConfiguration::curve(1.0, CurvePoint::linear())
            .with_reference(EvalReference::FixedPoint(Point3::new(0.0, 2.0, 0.0)));
        session.restore(&mut mesh, &mut config).unwrap();
        assert_eq!(mesh.vertices[0].position, Point3::new(0.0, 2.0, 0.0));
        assert_eq!(mesh.vertices[1].position, Point3::new(1.0, 0.0, 0.0));
    }

    // ==================== Topology Change Tests ====================

    #[test]
    fn test_added_vertex_blocks_everything() {
        let mut mesh = selected_mesh(&[[0.0; 3], [1.0; 3]]);
        let mut session = EditSession::new();
        session.save(&mesh).unwrap();
        mesh.vertices.push(Vertex::from_coords(9.0, 9.0, 9.0));

        let err = session
            .restore(&mut mesh, &mut BlendConfiguration::constant(100))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::StructuralMismatch);
        for policy in SelectionPolicy::ALL {
            assert!(session.select_saved(&mut mesh, policy).is_err());
        }
        assert!(!session.is_valid(mesh.vertex_count()));

        // Removing the extra vertex again makes the snapshot usable.
        mesh.vertices.pop();
        assert!(session.is_valid(mesh.vertex_count()));
    }

    // ==================== Curve Edge Tests ====================

    #[test]
    fn test_flat_and_vertical_curves() {
        let flat = [CurvePoint::new(0.0, 0.5), CurvePoint::new(1.0, 0.5)];
        let table = FalloffTable::sample(&flat, 1.0, 20).unwrap();
        assert!(table.samples().iter().all(|&y| y == 0.5));

        let vertical = [CurvePoint::new(0.5, 0.0), CurvePoint::new(0.5, 1.0)];
        let table = FalloffTable::sample(&vertical, 1.0, 0).unwrap();
        assert_eq!(table.samples()[0], 0.0);
        assert_eq!(table.samples()[9], 1.0);
    }

    #[test]
    fn test_zero_rate_curve_moves_nothing() {
        let mut mesh = selected_mesh(&[[0.0; 3], [1.0; 3]]);
        let mut session = EditSession::new();
        session.save(&mesh).unwrap();
        mesh.vertices[0].position = Point3::new(0.5, 0.5, 0.5);
        let before = mesh.clone();

        let mut config = BlendConfiguration::curve(0.0, CurvePoint::linear());
        session.restore(&mut mesh, &mut config).unwrap();
        assert_eq!(mesh, before);
    }
}
