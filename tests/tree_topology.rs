// tests/tree_topology.rs
use arbor_lsystem::{ArborError, TaperPolicy, TreeParams, TurtleInterpreter, TurtleOp};
use glam::Vec3;

fn setup(params: TreeParams) -> TurtleInterpreter {
    let mut interpreter = TurtleInterpreter::standard(params);
    // Marker so tests can see where the turtle is after a pop.
    interpreter.set_op('M', TurtleOp::Draw);
    interpreter
}

fn close(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-5
}

#[test]
fn test_trunk_grows_along_z() {
    let interpreter = setup(TreeParams {
        segment_length: 1.0,
        ..Default::default()
    });
    let skeleton = interpreter.interpret("FFf").unwrap();

    assert_eq!(skeleton.len(), 2, "f moves without drawing");
    assert!(close(skeleton.segments[0].start, Vec3::ZERO));
    assert!(close(skeleton.segments[0].end, Vec3::Z));
    assert!(close(skeleton.segments[1].end, Vec3::new(0.0, 0.0, 2.0)));
    assert_eq!(skeleton.segments[0].kind, 'F');
}

#[test]
fn test_bracket_restores_frame() {
    for angle_deg in [10.0, 22.5, 45.0, 90.0, 137.5] {
        let interpreter = setup(TreeParams {
            angle_deg,
            ..Default::default()
        });
        // A rotated, rolled branch, then a marker segment after `]`.
        let skeleton = interpreter.interpret("F&/[+F^F\\F]M").unwrap();
        let before = &skeleton.segments[0];
        let after = skeleton.segments.last().unwrap();

        assert_eq!(after.kind, 'M');
        assert!(close(after.start, before.end));
        // Same heading as before the branch opened.
        let reference = setup(TreeParams {
            angle_deg,
            ..Default::default()
        })
        .interpret("F&/M")
        .unwrap();
        let expected = reference.segments.last().unwrap();
        assert!(close(after.end, expected.end));
        assert_eq!(after.diameter, expected.diameter);
        assert_eq!(after.depth, 0);
    }
}

#[test]
fn test_segment_after_pop_starts_where_branch_started() {
    let interpreter = setup(TreeParams::default());
    let skeleton = interpreter.interpret("[F]F").unwrap();
    assert_eq!(skeleton.len(), 2);
    assert!(close(skeleton.segments[0].start, skeleton.segments[1].start));
}

#[test]
fn test_unbalanced_pop_is_fatal() {
    let interpreter = setup(TreeParams::default());
    let err = interpreter.interpret("F[F]]F").unwrap_err();
    assert_eq!(
        err,
        ArborError::MalformedGrammar {
            position: 4,
            symbol: ']'
        }
    );
}

#[test]
fn test_unclosed_push_is_tolerated() {
    let interpreter = setup(TreeParams::default());
    let skeleton = interpreter.interpret("F[+F").unwrap();
    assert_eq!(skeleton.len(), 2);
}

#[test]
fn test_branch_levels_taper() {
    let interpreter = setup(TreeParams {
        initial_diameter: 1.0,
        diameter_scale: 0.5,
        taper: TaperPolicy::PerBranchLevel,
        ..Default::default()
    });
    let skeleton = interpreter.interpret("FF[+F[-F]F]F").unwrap();
    let by_depth = |d: u32| -> Vec<f32> {
        skeleton
            .iter()
            .filter(|s| s.depth == d)
            .map(|s| s.diameter)
            .collect()
    };

    assert_eq!(by_depth(0), vec![1.0, 1.0, 1.0]);
    assert_eq!(by_depth(1), vec![0.5, 0.5]);
    assert_eq!(by_depth(2), vec![0.25]);
}

#[test]
fn test_children_thinner_than_parents_at_any_scale() {
    for taper in [TaperPolicy::PerBranchLevel, TaperPolicy::PerSegment] {
        for scale in [0.3, 0.7, 0.95] {
            let interpreter = setup(TreeParams {
                diameter_scale: scale,
                taper,
                ..Default::default()
            });
            let skeleton = interpreter.interpret("F[&F[+F[/F]]][-F]F").unwrap();
            for depth in 1..=3 {
                let parent_max = skeleton
                    .iter()
                    .filter(|s| s.depth == depth - 1)
                    .map(|s| s.diameter)
                    .fold(f32::MIN, f32::max);
                let child_max = skeleton
                    .iter()
                    .filter(|s| s.depth == depth)
                    .map(|s| s.diameter)
                    .fold(f32::MIN, f32::max);
                assert!(
                    child_max < parent_max,
                    "depth {depth} at scale {scale} under {taper:?}"
                );
            }
        }
    }
}

#[test]
fn test_per_segment_taper() {
    let interpreter = setup(TreeParams {
        initial_diameter: 1.0,
        diameter_scale: 0.5,
        taper: TaperPolicy::PerSegment,
        ..Default::default()
    });
    let skeleton = interpreter.interpret("FF[F]F").unwrap();
    let diameters: Vec<f32> = skeleton.iter().map(|s| s.diameter).collect();
    // `[` thins the branch on top of the per-segment steps; the pop restores 0.25.
    assert_eq!(diameters, vec![1.0, 0.5, 0.125, 0.25]);
}

#[test]
fn test_per_segment_branch_thinner_than_next_trunk_segment() {
    let interpreter = setup(TreeParams {
        initial_diameter: 1.0,
        diameter_scale: 0.5,
        taper: TaperPolicy::PerSegment,
        ..Default::default()
    });
    let skeleton = interpreter.interpret("F[F]F").unwrap();
    let diameters: Vec<f32> = skeleton.iter().map(|s| s.diameter).collect();
    assert_eq!(diameters, vec![1.0, 0.25, 0.5]);
    assert!(skeleton.segments[1].diameter < skeleton.segments[2].diameter);
}

#[test]
fn test_turn_around_reverses_heading() {
    let interpreter = setup(TreeParams {
        segment_length: 1.0,
        ..Default::default()
    });
    let skeleton = interpreter.interpret("F|F").unwrap();
    assert!(close(skeleton.segments[1].end, Vec3::ZERO));
}

#[test]
fn test_yaw_and_pitch_are_inverse_pairs() {
    let interpreter = setup(TreeParams::default());
    let straight = interpreter.interpret("FF").unwrap();
    let undone = interpreter.interpret("F+-&^\\/F").unwrap();
    assert!(close(straight.segments[1].end, undone.segments[1].end));
}

#[test]
fn test_grammar_markers_are_ignored() {
    let interpreter = setup(TreeParams::default());
    let plain = interpreter.interpret("F[+F]F").unwrap();
    let marked = interpreter.interpret("TAF[+FL]'F{}").unwrap();
    assert_eq!(plain, marked);
}
