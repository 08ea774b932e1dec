//! Turtle state and operations for tree interpretation.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// How finely branch diameters shrink by the configured scale factor.
///
/// Every `[` starts a thinner branch level under both policies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaperPolicy {
    /// Segments within a branch level share a diameter.
    #[default]
    PerBranchLevel,
    /// Additionally, every drawn segment is thinner than the one before it.
    PerSegment,
}

/// One frame of the tree-building turtle.
///
/// A copy of this frame is saved on `[` and restored on `]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleState {
    /// Current world-space position of the cursor.
    pub position: Vec3,

    /// Current world-space orientation.
    pub rotation: Quat,

    /// Diameter given to the next drawn segment.
    pub diameter: f32,

    /// Bracket nesting level, 0 on the trunk.
    pub depth: u32,
}

impl TurtleState {
    /// A trunk frame at the origin heading `+Z`.
    pub fn new(diameter: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            diameter,
            depth: 0,
        }
    }

    /// Returns the heading (local Z axis) in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Returns the turtle's local up direction (Y axis) in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Returns the turtle's local left direction (X axis) in world space.
    pub fn left(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Rotates around the local X axis by `angle` radians (Pitch).
    pub fn rotate_local_x(&mut self, angle: f32) {
        let rot = Quat::from_axis_angle(Vec3::X, angle);
        self.rotation = (self.rotation * rot).normalize();
    }

    /// Rotates around the local Y axis by `angle` radians (Yaw).
    pub fn rotate_local_y(&mut self, angle: f32) {
        let rot = Quat::from_axis_angle(Vec3::Y, angle);
        self.rotation = (self.rotation * rot).normalize();
    }

    /// Rotates around the local Z axis by `angle` radians (Roll).
    pub fn rotate_local_z(&mut self, angle: f32) {
        let rot = Quat::from_axis_angle(Vec3::Z, angle);
        self.rotation = (self.rotation * rot).normalize();
    }

    /// Moves the cursor `distance` along its heading.
    pub fn advance(&mut self, distance: f32) {
        self.position += self.forward() * distance;
    }
}

/// Operations that can be performed by the tree turtle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TurtleOp {
    /// Draw a segment along the heading and move to its end (`F`, `S`, `I`, `C`).
    Draw,
    /// Move forward without drawing (`f`).
    Move,
    /// Rotate around local up (`+`/`-`).
    Yaw(f32),
    /// Rotate around local left (`&`/`^`).
    Pitch(f32),
    /// Rotate around the heading (`\` / `/`).
    Roll(f32),
    /// Turn 180 degrees (`|`).
    TurnAround,
    /// Scale the current diameter by the taper factor (`!`).
    Taper,
    /// Save the full turtle state onto the stack (`[`).
    Push,
    /// Restore the most recently pushed turtle state (`]`).
    Pop,
    /// No-op: grammar-only marker with no geometric meaning.
    Ignore,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_frame_points_up_the_z_axis() {
        let t = TurtleState::new(0.1);
        assert!(approx(t.forward(), Vec3::Z));
        assert!(approx(t.up(), Vec3::Y));
        assert!(approx(t.left(), Vec3::X));
    }

    #[test]
    fn rotations_compose_about_local_axes() {
        let mut t = TurtleState::new(0.1);
        // Yaw 90: heading swings toward the left axis.
        t.rotate_local_y(FRAC_PI_2);
        assert!(approx(t.forward(), Vec3::X));
        // Roll 90 about the new heading, then pitch: the pitch axis has moved with us.
        t.rotate_local_z(FRAC_PI_2);
        t.rotate_local_x(FRAC_PI_2);
        let f = t.forward();
        assert!((f.length() - 1.0).abs() < 1e-5);
        assert!(f.x.abs() < 1e-5);
        assert!((t.forward().dot(t.up())).abs() < 1e-5);
        assert!((t.forward().dot(t.left())).abs() < 1e-5);
    }

    #[test]
    fn new_frame_carries_the_given_diameter() {
        let t = TurtleState::new(0.35);
        assert_eq!(t.diameter, 0.35);
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.depth, 0);
    }

    #[test]
    fn advance_follows_heading() {
        let mut t = TurtleState::new(0.1);
        t.advance(2.0);
        assert!(approx(t.position, Vec3::new(0.0, 0.0, 2.0)));
    }
}
