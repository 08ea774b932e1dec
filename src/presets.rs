//! Reference grammars.
//!
//! Symbols follow the standard turtle table (see
//! [`TurtleInterpreter::populate_standard_symbols`](crate::TurtleInterpreter::populate_standard_symbols)):
//!
//! | Symbol | Meaning |
//! |--------|---------|
//! | `A` | apex / bud where new growth occurs |
//! | `T` | trunk seed |
//! | `F`, `S`, `I`, `C` | drawn segments (internode, long segment, trunk internode, leaf detail) |
//! | `L` | leaf marker |
//! | `f` | move without drawing |
//! | `!` | thin the branch |

use crate::batch::TreeRecipe;
use crate::error::ArborError;
use crate::interpreter::TreeParams;
use crate::rules::{ProductionRule, RuleTable};
use crate::turtle::TaperPolicy;

fn table(rules: &[(&str, &str, f64)]) -> Result<RuleTable, ArborError> {
    RuleTable::new(
        rules
            .iter()
            .map(|&(pattern, replacement, weight)| {
                ProductionRule::new(pattern, replacement, weight)
            })
            .collect(),
    )
}

/// `FR` with `F -> FRF`; the zero-weight `F -> FFFR` never fires.
pub fn basic() -> Result<TreeRecipe, ArborError> {
    let rules = table(&[("F", "FRF", 1.0), ("F", "FFFR", 0.0)])?;
    Ok(TreeRecipe::new("basic", "FR", rules).with_generations(2))
}

/// Classic 2D-style fractal plant rewritten with two equally likely `X` rules.
///
/// The `X` markers stay in the final string; they draw nothing.
pub fn binary_tree() -> Result<TreeRecipe, ArborError> {
    let rules = table(&[
        ("X", "F-[[X]+X]+F[+FX]-X", 0.5),
        ("X", "F-[[X]+X]+F[+FX]-X", 0.5),
        ("F", "FF", 1.0),
    ])?;
    Ok(TreeRecipe::new("binary_tree", "X", rules)
        .with_generations(4)
        .with_params(TreeParams {
            segment_length: 1.0,
            angle_deg: 25.0,
            ..Default::default()
        }))
}

/// Stochastic three-dimensional tree with a tapering trunk and rolled branches.
pub fn zono_tree() -> Result<TreeRecipe, ArborError> {
    let rules = table(&[
        ("T", "III!IIII!IIII!IIII!!!A", 1.0),
        ("A", "[FL!A][&FL!A]/////'[&&FL!A]////////'[&FL!A]", 0.6),
        (
            "A",
            "/////'[&&&FL!A]/////'[&FL!A]////////'[&&FL!A]////////'[&&FL!A]",
            0.15,
        ),
        ("A", "'[&&&FL!A]", 0.25),
        ("F", "S/////F", 0.7),
        ("F", "S", 0.3),
        ("S", "!FL", 0.7),
        ("S", "L", 0.3),
    ])?;
    Ok(TreeRecipe::new("zono_tree", "T", rules)
        .with_generations(7)
        .with_strip_symbol('A')
        .with_params(TreeParams {
            segment_length: 0.2,
            angle_deg: 22.5,
            initial_diameter: 0.10,
            diameter_scale: 0.9,
            taper: TaperPolicy::PerBranchLevel,
        }))
}

/// Three-way bush after Prusinkiewicz & Lindenmayer.
pub fn bush_3d() -> Result<TreeRecipe, ArborError> {
    let rules = table(&[
        ("A", "[&FL!A]/////'[&FL!A]////////'[&FL!A]", 1.0),
        ("F", "S/////F", 1.0),
        ("S", "FL", 1.0),
        ("L", "[''^∧∧{-C+C+C-|-C+C+C}]", 1.0),
    ])?;
    Ok(TreeRecipe::new("bush_3d", "A", rules).with_generations(5))
}

/// Dense shrub where `FF -> F` outranks `F` expansion on every adjacent pair.
pub fn seth_tree() -> Result<TreeRecipe, ArborError> {
    let rules = table(&[
        ("F", "FF&[!&F^F^F]\\[!\\F/F/F]^[!^F&F&F]/[!/F\\F\\F]", 1.0),
        ("FF", "F", 1.0),
    ])?;
    Ok(TreeRecipe::new("seth_tree", "F", rules).with_generations(3))
}

/// Seven trunk internodes under a crown that splits four ways or stops in a leaf.
pub fn realistic_tree() -> Result<TreeRecipe, ArborError> {
    let rules = table(&[
        ("T", "IIIIIIIA", 1.0),
        ("A", "F[^FL!A][&FL!A][+FL!A][-FL!A]", 0.9),
        ("A", "FL", 0.1),
        ("F", "FS[&L][+L]", 0.4),
        ("F", "FS[&L]", 0.3),
        ("F", "FS", 0.2),
        ("F", "F", 0.1),
        ("S", "FC", 0.75),
        ("S", "F", 0.25),
        ("L", "[''^∧∧{-C+C+C-|-C+C+C}]", 1.0),
        ("C", "C", 1.0),
    ])?;
    Ok(TreeRecipe::new("realistic_tree", "T", rules)
        .with_generations(5)
        .with_strip_symbol('A'))
}

/// Herbaceous plant with whorls of leaves (`W`, `V`) around each node.
pub fn plant_system() -> Result<TreeRecipe, ArborError> {
    let rules = table(&[
        ("A", "F+[A+W]--//[--L]F[++L]-[AW]++AW", 1.0),
        ("F", "FS[//&&L][//^^L]FS", 1.0),
        ("S", "SFS", 1.0),
        ("L", "['^∧∧{-C+C+C-|-C+C+C}]", 1.0),
        ("W", "[&&&V]///V///V///V", 1.0),
        ("V", "[^^F][&&&&{-C+C|-C+C}]", 1.0),
        ("C", "C", 1.0),
    ])?;
    Ok(TreeRecipe::new("plant_system", "A", rules)
        .with_generations(3)
        .with_params(TreeParams {
            angle_deg: 18.0,
            ..Default::default()
        }))
}

/// All presets, in declaration order.
pub fn all() -> Result<Vec<TreeRecipe>, ArborError> {
    Ok(vec![
        basic()?,
        binary_tree()?,
        zono_tree()?,
        bush_3d()?,
        seth_tree()?,
        realistic_tree()?,
        plant_system()?,
    ])
}
