pub mod entity;
pub mod export;
pub mod expr;
pub mod interpreter;
pub mod limits;
pub mod record;
pub mod span;

// Re-export key types for easier usage
pub use entity::{Child, Entity, EntityKind, Href, Rejection, Style, build_entities};
pub use export::{ExportEntity, export, to_bbcode, to_markdown};
pub use expr::{
    Computed, DiceSource, EvalFault, Evaluated, ExprNode, Operator, RandSource, Scripted,
    build_node, evaluate, normalize_face,
};
pub use interpreter::Interpreter;
pub use limits::Limits;
pub use record::{Message, RawRecord};
pub use span::{Source, Span, TextUnits, substring};
