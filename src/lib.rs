//! # arbor-lsystem
//!
//! Procedural botanical tree skeletons from stochastic L-Systems, using glam.
//!
//! Two pieces do the work. The [`rewriter`] expands an axiom under a weighted
//! [`RuleTable`] with longest-match-wins priority and probabilistic tie-breaking,
//! drawing from an injected random stream. The [`interpreter`] walks the finished
//! string once with a 3D turtle and emits a [`TreeSkeleton`]: directed centerline
//! segments with a tapering diameter. The [`batch`] driver repeats both for many
//! independent "worlds", sequentially or on the rayon pool.
//!
//! ```
//! use arbor_lsystem::{ProductionRule, RuleTable, TreeParams, TreeRng, TurtleInterpreter, expand};
//!
//! let rules = RuleTable::new(vec![ProductionRule::new("F", "F[+F]F", 1.0)]).unwrap();
//! let mut rng = TreeRng::from_seed_u64(7);
//! let (symbols, _stats) = expand("F", &rules, 2, &mut rng);
//! let skeleton = TurtleInterpreter::standard(TreeParams::default())
//!     .interpret(&symbols)
//!     .unwrap();
//! assert_eq!(skeleton.len(), 9);
//! ```

pub mod batch;
pub mod error;
pub mod interpreter;
pub mod presets;
pub mod rewriter;
pub mod rng;
pub mod rules;
pub mod skeleton;
pub mod turtle;

pub use batch::*;
pub use error::*;
pub use interpreter::*;
pub use rewriter::*;
pub use rng::*;
pub use rules::*;
pub use skeleton::*;
pub use turtle::*;
