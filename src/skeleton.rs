use bevy_heavy::ComputeMassProperties3d as _;
use bevy_math::primitives::Cylinder;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One straight element of a tree skeleton.
///
/// Segments are emitted in symbol order and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BranchSegment {
    /// World-space start of the centerline.
    pub start: Vec3,

    /// World-space end of the centerline.
    pub end: Vec3,

    /// The symbol that drew this segment (`F`, `S`, ...).
    pub kind: char,

    /// Diameter of the branch along this segment.
    pub diameter: f32,

    /// Bracket nesting level of the turtle when the segment was drawn.
    pub depth: u32,
}

impl BranchSegment {
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Unit vector from `start` to `end`.
    pub fn direction(&self) -> Vec3 {
        (self.end - self.start).normalize_or_zero()
    }

    /// The segment as a solid cylinder, for mass-property computation.
    pub fn to_cylinder(&self) -> Cylinder {
        Cylinder::new(self.diameter / 2.0, self.length())
    }
}

/// The complete centerline skeleton of one interpreted tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeSkeleton {
    pub segments: Vec<BranchSegment>,
}

impl TreeSkeleton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: BranchSegment) {
        self.segments.push(segment);
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BranchSegment> {
        self.segments.iter()
    }

    /// Aggregates the skeleton, treating every segment as a cylinder of wood
    /// with the given `density` (kg/m³).
    pub fn summary(&self, density: f32) -> SkeletonSummary {
        let mut summary = SkeletonSummary {
            segment_count: self.segments.len(),
            ..Default::default()
        };

        for segment in &self.segments {
            let cylinder = segment.to_cylinder();
            summary.total_length += segment.length();
            summary.wood_volume += cylinder.mass(1.0);
            summary.mass += cylinder.mass(density);
            summary.max_depth = summary.max_depth.max(segment.depth);
            *summary.kind_counts.entry(segment.kind).or_insert(0) += 1;

            let (lo, hi) = summary
                .bounds
                .unwrap_or((segment.start, segment.start));
            summary.bounds = Some((
                lo.min(segment.start).min(segment.end),
                hi.max(segment.start).max(segment.end),
            ));
        }

        summary
    }
}

impl<'a> IntoIterator for &'a TreeSkeleton {
    type Item = &'a BranchSegment;
    type IntoIter = std::slice::Iter<'a, BranchSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Aggregate measurements of a [`TreeSkeleton`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SkeletonSummary {
    pub segment_count: usize,
    pub total_length: f32,
    /// Volume in m³, from `bevy_heavy` cylinder mass at unit density.
    pub wood_volume: f32,
    pub mass: f32,
    /// Axis-aligned `(min, max)` corners; `None` for an empty skeleton.
    pub bounds: Option<(Vec3, Vec3)>,
    pub max_depth: u32,
    pub kind_counts: BTreeMap<char, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn segment(start: Vec3, end: Vec3, kind: char, diameter: f32, depth: u32) -> BranchSegment {
        BranchSegment {
            start,
            end,
            kind,
            diameter,
            depth,
        }
    }

    #[test]
    fn empty_summary() {
        let summary = TreeSkeleton::new().summary(500.0);
        assert_eq!(summary.segment_count, 0);
        assert_eq!(summary.bounds, None);
        assert_eq!(summary.mass, 0.0);
    }

    #[test]
    fn summary_accumulates_segments() {
        let mut skeleton = TreeSkeleton::new();
        skeleton.push(segment(Vec3::ZERO, Vec3::Z, 'F', 0.2, 0));
        skeleton.push(segment(Vec3::Z, Vec3::new(1.0, 0.0, 1.0), 'S', 0.1, 1));

        let summary = skeleton.summary(2.0);
        assert_eq!(summary.segment_count, 2);
        assert!((summary.total_length - 2.0).abs() < 1e-5);

        let expected_volume = PI * 0.1 * 0.1 + PI * 0.05 * 0.05;
        assert!((summary.wood_volume - expected_volume).abs() < 1e-4);
        assert!((summary.mass - 2.0 * expected_volume).abs() < 1e-4);

        assert_eq!(summary.max_depth, 1);
        assert_eq!(summary.kind_counts[&'F'], 1);
        assert_eq!(summary.kind_counts[&'S'], 1);
        assert_eq!(
            summary.bounds,
            Some((Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0)))
        );
    }

    #[test]
    fn direction_is_unit() {
        let s = segment(Vec3::ONE, Vec3::new(1.0, 4.0, 1.0), 'F', 0.1, 0);
        assert!((s.direction() - Vec3::Y).length() < 1e-6);
        assert!((s.length() - 3.0).abs() < 1e-6);
    }
}
