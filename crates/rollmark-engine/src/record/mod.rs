//! # Entity Records
//!
//! Wire shapes for the `(text, entities)` pairs an upstream producer emits.
//! Records are `type`-tagged JSON objects with flattened `start`/`len` spans:
//!
//! ```json
//! { "type": "Strong", "start": 0, "len": 8, "child": { "type": "Text", "start": 2, "len": 4 } }
//! ```
//!
//! Decoding is lenient at two levels:
//! - [`RawRecord`] decodes from any JSON value. A record that does not match a
//!   known shape becomes [`RawRecord::Unrecognized`] instead of failing the
//!   whole message.
//! - Nested expression nodes that do not match a known shape decode as
//!   [`ExprRecord::Unknown`] in place, leaving their siblings intact.
//!
//! Records carry raw producer values (floating point numbers, face strings).
//! Validation and normalization happen when the entity tree is built.

pub mod entity;
pub mod expr;
mod lenient;

pub use entity::{
    ChildRecord, EntityRecord, ExprEntityRecord, HrefRecord, LinkRecord, NestedRecord, TextRecord,
    WrapRecord,
};
pub use expr::{CocKindRecord, DicePoolRecord, ExprRecord, FaceRecord, FilterRecord};

use serde::Deserialize;
use serde_json::Value;

use crate::span::Span;

/// One input record, decoded without ever failing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum RawRecord {
    Known(EntityRecord),
    Unrecognized {
        /// The record's `type` tag, if it had a string one.
        tag: Option<String>,
        /// The record's outer span, if one could be read.
        span: Option<Span>,
        /// Why decoding failed.
        reason: String,
    },
}

impl RawRecord {
    pub fn from_json(value: &Value) -> Self {
        match EntityRecord::deserialize(value) {
            Ok(record) => Self::Known(record),
            Err(err) => Self::Unrecognized {
                tag: value.get("type").and_then(Value::as_str).map(str::to_owned),
                span: Span::deserialize(value).ok(),
                reason: err.to_string(),
            },
        }
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        Self::from_json(&value)
    }
}

impl From<EntityRecord> for RawRecord {
    fn from(record: EntityRecord) -> Self {
        Self::Known(record)
    }
}

/// A chat message as delivered by the producer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Message {
    pub text: String,
    #[serde(default)]
    pub entities: Vec<RawRecord>,
    /// Four numbers seeding reproducible dice rolls for this message. A seed
    /// of any other shape is dropped rather than failing the message.
    #[serde(default, deserialize_with = "lenient::seed")]
    pub seed: Option<Vec<u64>>,
}

impl Message {
    /// The seed folded into one integer, base 256 with wrapping overflow.
    /// `None` unless exactly four parts were sent.
    pub fn seed_value(&self) -> Option<u64> {
        match self.seed.as_deref() {
            Some(parts) if parts.len() == 4 => Some(
                parts
                    .iter()
                    .fold(0_u64, |acc, part| acc.wrapping_mul(256).wrapping_add(*part)),
            ),
            _ => None,
        }
    }
}
