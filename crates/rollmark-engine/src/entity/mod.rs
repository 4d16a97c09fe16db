//! # Entity Tree
//!
//! A message renders as a flat, ordered list of [`Entity`] values, one per
//! input record. Formatting entities wrap a [`Child`]: either bare text or a
//! single level of styling around text.
//!
//! ```text
//! "hi **you** 1d20"
//!  Text{0,3}  Styled(Strong){3,7}  Text{10,1}  Expr{11,4}
//!                └─ Text{5,3}
//! ```
//!
//! Trees are built once by [`build_entities`] and never mutated; expression
//! payloads are swapped from [`ExprNode`](crate::expr::ExprNode) to
//! [`Evaluated`](crate::expr::Evaluated) with [`Entity::map_expr`].

pub mod builder;
pub mod invariants;
pub mod types;

pub use builder::{Rejection, build_entities, build_entity, try_build};
pub use types::{Child, Entity, EntityKind, Href, Style};
