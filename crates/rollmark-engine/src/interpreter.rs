use serde::{Deserialize, Serialize};

use crate::entity::{Entity, build_entities};
use crate::expr::{DiceSource, Evaluated, ExprNode, RandSource, evaluate};
use crate::limits::Limits;
use crate::record::{Message, RawRecord};
use crate::span::{Source, TextUnits};

/// Message interpreter: builds entity trees and evaluates their expressions.
///
/// ## Usage Pattern
///
/// ```rust
/// # use rollmark_engine::{Interpreter, RawRecord, Scripted};
/// # use serde_json::json;
/// let records: Vec<RawRecord> = serde_json::from_value(json!([
///     {"type": "Text", "start": 0, "len": 5},
///     {"type": "Expr", "start": 5, "len": 6, "node": {
///         "type": "Binary", "op": "+",
///         "l": {"type": "Roll", "face": 20, "counter": 1},
///         "r": {"type": "Num", "value": 5}
///     }}
/// ])).unwrap();
///
/// let entities = Interpreter::default().interpret("roll 1d20+5", &records, &mut Scripted::constant(14));
/// assert_eq!(entities[1].expr().unwrap().value(), Ok(19));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpreter {
    pub limits: Limits,
    pub units: TextUnits,
}

impl Interpreter {
    pub fn new(limits: Limits, units: TextUnits) -> Self {
        Self { limits, units }
    }

    pub fn source<'a>(&self, text: &'a str) -> Source<'a> {
        Source::new(text, self.units)
    }

    /// Builds the unevaluated entity tree.
    pub fn build(&self, text: &str, records: &[RawRecord]) -> Vec<Entity<ExprNode>> {
        build_entities(&self.source(text), records, &self.limits)
    }

    /// Evaluates every expression entity, in order, from one dice source.
    pub fn evaluate<S: DiceSource + ?Sized>(
        &self,
        entities: Vec<Entity<ExprNode>>,
        dice: &mut S,
    ) -> Vec<Entity<Evaluated>> {
        entities
            .into_iter()
            .map(|entity| {
                let span = entity.span();
                entity.map_expr(|node| {
                    let evaluated = evaluate(&node, dice);
                    log::trace!("expression at {span:?}: {evaluated}");
                    evaluated
                })
            })
            .collect()
    }

    pub fn interpret<S: DiceSource + ?Sized>(
        &self,
        text: &str,
        records: &[RawRecord],
        dice: &mut S,
    ) -> Vec<Entity<Evaluated>> {
        self.evaluate(self.build(text, records), dice)
    }

    /// Interprets a message, rolling from its own seed when it carries a
    /// four-part one and from entropy otherwise.
    pub fn interpret_message(&self, message: &Message) -> Vec<Entity<Evaluated>> {
        match message.seed_value() {
            Some(seed) => {
                let mut dice = RandSource::seeded(seed);
                self.interpret(&message.text, &message.entities, &mut dice)
            }
            None => {
                let mut dice = RandSource::from_entropy();
                self.interpret(&message.text, &message.entities, &mut dice)
            }
        }
    }
}
