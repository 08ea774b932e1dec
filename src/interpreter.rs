//! Interpreter that converts a finished L-System string into a [`TreeSkeleton`].
//!
//! The entry point is [`TurtleInterpreter`]. Configure it with [`TreeParams`],
//! register symbol-to-operation mappings via [`TurtleInterpreter::set_op`] or
//! [`TurtleInterpreter::populate_standard_symbols`], then call
//! [`TurtleInterpreter::interpret`] with the rewritten symbol string.

use crate::error::ArborError;
use crate::skeleton::{BranchSegment, TreeSkeleton};
use crate::turtle::{TaperPolicy, TurtleOp, TurtleState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f32::consts::PI;

/// Geometric parameters for tree interpretation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    /// Length of every drawn or moved step.
    pub segment_length: f32,
    /// Rotation angle (in degrees) for Yaw/Pitch/Roll.
    pub angle_deg: f32,
    /// Diameter of the first trunk segment.
    pub initial_diameter: f32,
    /// Factor applied to the diameter at every taper step.
    pub diameter_scale: f32,
    /// Where taper steps happen besides explicit `!`.
    pub taper: TaperPolicy,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            segment_length: 0.2,
            angle_deg: 22.5,
            initial_diameter: 0.10,
            diameter_scale: 0.9,
            taper: TaperPolicy::PerBranchLevel,
        }
    }
}

impl TreeParams {
    /// Checks that all lengths, angles and diameters are positive and finite.
    pub fn validate(&self) -> Result<(), ArborError> {
        let checks = [
            ("segment_length", self.segment_length),
            ("angle_deg", self.angle_deg),
            ("initial_diameter", self.initial_diameter),
            ("diameter_scale", self.diameter_scale),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(ArborError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

/// Interprets a symbol string to build a [`TreeSkeleton`].
#[derive(Clone, Debug)]
pub struct TurtleInterpreter {
    op_map: HashMap<char, TurtleOp>,
    params: TreeParams,
}

impl TurtleInterpreter {
    /// Creates a new interpreter with the given parameters and an empty symbol map.
    ///
    /// Register operations with [`set_op`](Self::set_op) or
    /// [`populate_standard_symbols`](Self::populate_standard_symbols) before calling
    /// [`interpret`](Self::interpret).
    pub fn new(params: TreeParams) -> Self {
        Self {
            op_map: HashMap::new(),
            params,
        }
    }

    /// Creates an interpreter with the conventional symbol table already registered.
    pub fn standard(params: TreeParams) -> Self {
        let mut interpreter = Self::new(params);
        interpreter.populate_standard_symbols();
        interpreter
    }

    /// Replaces the entire symbol-to-operation map in one step (builder pattern).
    ///
    /// Any symbol missing from `map` is treated as [`TurtleOp::Ignore`].
    pub fn with_map(mut self, map: HashMap<char, TurtleOp>) -> Self {
        self.op_map = map;
        self
    }

    /// Assigns a single [`TurtleOp`] to a symbol.
    pub fn set_op(&mut self, symbol: char, op: TurtleOp) {
        self.op_map.insert(symbol, op);
    }

    pub fn op(&self, symbol: char) -> TurtleOp {
        self.op_map.get(&symbol).copied().unwrap_or(TurtleOp::Ignore)
    }

    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    /// Registers the conventional symbol-to-operation mappings.
    ///
    /// Grammar variables such as `A`, `T`, `L` stay unmapped and are ignored.
    pub fn populate_standard_symbols(&mut self) {
        let mappings = [
            // Segments
            ('F', TurtleOp::Draw),
            ('S', TurtleOp::Draw),
            ('I', TurtleOp::Draw), // Internode
            ('C', TurtleOp::Draw), // Leaf detail
            ('f', TurtleOp::Move),
            // Spatial
            ('+', TurtleOp::Yaw(1.0)),
            ('-', TurtleOp::Yaw(-1.0)),
            ('&', TurtleOp::Pitch(1.0)),
            ('^', TurtleOp::Pitch(-1.0)),
            ('∧', TurtleOp::Pitch(-1.0)),
            ('\\', TurtleOp::Roll(1.0)),
            ('/', TurtleOp::Roll(-1.0)),
            ('|', TurtleOp::TurnAround),
            // Width
            ('!', TurtleOp::Taper),
            // Flow
            ('[', TurtleOp::Push),
            (']', TurtleOp::Pop),
        ];

        for (sym, op) in mappings {
            self.set_op(sym, op);
        }
    }

    /// Interprets `symbols` and returns the resulting [`TreeSkeleton`].
    ///
    /// Walks every symbol in order, dispatching each to its registered
    /// [`TurtleOp`]. The turtle starts at the world origin heading `+Z` with the
    /// configured initial diameter. Symbols with no registered mapping are ignored.
    ///
    /// # Push / Pop
    ///
    /// `[` saves the full turtle frame (position, rotation, diameter, depth) onto a
    /// stack and thins the new branch by `diameter_scale`.
    /// `]` restores the saved frame. A `]` with nothing to restore aborts with
    /// [`ArborError::MalformedGrammar`]; continuing would misplace every
    /// following segment.
    pub fn interpret(&self, symbols: &str) -> Result<TreeSkeleton, ArborError> {
        self.params.validate()?;

        let mut skeleton = TreeSkeleton::new();
        let mut turtle = TurtleState::new(self.params.initial_diameter);
        let mut stack: Vec<TurtleState> = Vec::new();
        let angle = self.params.angle_deg.to_radians();
        let scale = self.params.diameter_scale;

        for (position, symbol) in symbols.chars().enumerate() {
            match self.op(symbol) {
                // --- SEGMENTS ---
                TurtleOp::Draw => {
                    let start = turtle.position;
                    turtle.advance(self.params.segment_length);
                    skeleton.push(BranchSegment {
                        start,
                        end: turtle.position,
                        kind: symbol,
                        diameter: turtle.diameter,
                        depth: turtle.depth,
                    });
                    if self.params.taper == TaperPolicy::PerSegment {
                        turtle.diameter *= scale;
                    }
                }
                TurtleOp::Move => turtle.advance(self.params.segment_length),

                // --- SPATIAL ---
                TurtleOp::Yaw(s) => turtle.rotate_local_y(angle * s),
                TurtleOp::Pitch(s) => turtle.rotate_local_x(angle * s),
                TurtleOp::Roll(s) => turtle.rotate_local_z(angle * s),
                TurtleOp::TurnAround => turtle.rotate_local_y(PI),

                // --- WIDTH ---
                TurtleOp::Taper => turtle.diameter *= scale,

                // --- FLOW ---
                TurtleOp::Push => {
                    stack.push(turtle.clone());
                    turtle.depth += 1;
                    turtle.diameter *= scale;
                }
                TurtleOp::Pop => match stack.pop() {
                    Some(saved) => turtle = saved,
                    None => {
                        tracing::debug!(position, "pop with an empty frame stack");
                        return Err(ArborError::MalformedGrammar { position, symbol });
                    }
                },
                TurtleOp::Ignore => {}
            }
        }

        if !stack.is_empty() {
            tracing::debug!(open = stack.len(), "string ended with unclosed branches");
        }

        Ok(skeleton)
    }
}
