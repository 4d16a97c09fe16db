//! # Dice Expressions
//!
//! Expression entities carry a small arithmetic language over dice:
//!
//! ```text
//! 1d20+5        Binary(+, DiceRoll(20, 1), Literal(5))
//! max(4d6)      Max(DiceRoll(6, 4))
//! 4dF           FateDice(4)
//! ```
//!
//! Two tree types keep evaluation all-or-nothing:
//! - [`ExprNode`] is the unevaluated tree, built from records by
//!   [`build_node`], which normalizes faces and bounds counts and depth.
//! - [`Evaluated`] is the result of [`evaluate`]; every node carries its
//!   outcomes and a value, or an [`EvalFault`] when it cannot be evaluated.
//!
//! Randomness is injected through [`DiceSource`].

mod convert;
pub mod dice;
mod eval;
pub mod evaluated;
pub mod face;
mod render;
pub mod types;

pub use convert::build_node;
pub use dice::{DiceSource, RandSource, Scripted};
pub use eval::{POOL_MAX_SUCCESSES, evaluate};
pub use evaluated::{Computed, EvalFault, Evaluated, SuccessLevel};
pub use face::{FaceSpec, normalize_face};
pub use render::{UNSUPPORTED, ValueText};
pub use types::{CocRoll, CocVariant, DicePool, DiceRoll, ExprNode, Keep, Operator};
