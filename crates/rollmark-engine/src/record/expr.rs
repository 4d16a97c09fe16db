use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;
use crate::expr::face::{self, FaceSpec};

fn one() -> f64 {
    1.0
}

/// An expression node as emitted by the producer.
///
/// Tags follow the producer (`Num`, `Roll`, `FateRoll`, `SubExpr`); the
/// interpreter's own names are accepted as aliases. Child nodes decode
/// leniently: a malformed child becomes [`ExprRecord::Unknown`] on its own.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExprRecord {
    #[serde(alias = "Literal")]
    Num { value: f64 },
    #[serde(alias = "DiceRoll")]
    Roll {
        #[serde(default)]
        face: FaceRecord,
        #[serde(default = "one", alias = "count")]
        counter: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filter: Option<(FilterRecord, f64)>,
    },
    #[serde(alias = "FateDice")]
    FateRoll {
        #[serde(default = "one", alias = "count")]
        counter: f64,
    },
    Binary {
        op: String,
        #[serde(default, alias = "left", deserialize_with = "lenient::node")]
        l: Box<ExprRecord>,
        #[serde(default, alias = "right", deserialize_with = "lenient::node")]
        r: Box<ExprRecord>,
    },
    Max {
        #[serde(default, deserialize_with = "lenient::node")]
        node: Box<ExprRecord>,
    },
    Min {
        #[serde(default, deserialize_with = "lenient::node")]
        node: Box<ExprRecord>,
    },
    #[serde(alias = "Group")]
    SubExpr {
        #[serde(default, deserialize_with = "lenient::node")]
        node: Box<ExprRecord>,
    },
    Repeat {
        #[serde(default, deserialize_with = "lenient::node")]
        node: Box<ExprRecord>,
        #[serde(default = "one")]
        count: f64,
    },
    DicePool(DicePoolRecord),
    CocRoll {
        #[serde(default, rename = "subType")]
        sub_type: CocKindRecord,
        #[serde(
            default,
            deserialize_with = "lenient::optional_node",
            skip_serializing_if = "Option::is_none"
        )]
        target: Option<Box<ExprRecord>>,
    },
    #[default]
    #[serde(other)]
    Unknown,
}

/// A face count as the producer sent it: a number, a string such as `"d20"`,
/// or anything else (which normalizes to the default face).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FaceRecord {
    Number(f64),
    Text(String),
    Other(Value),
}

impl Default for FaceRecord {
    fn default() -> Self {
        Self::Other(Value::Null)
    }
}

impl FaceRecord {
    /// The face count clamped to the supported range.
    pub fn normalized(&self) -> u32 {
        match self {
            Self::Number(n) => face::normalize_face(*n),
            Self::Text(s) => face::normalize_face(s.as_str()),
            Self::Other(_) => face::normalize_face(FaceSpec::Other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterRecord {
    High,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DicePoolRecord {
    pub counter: f64,
    pub face: f64,
    pub min: f64,
    #[serde(default)]
    pub addition: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fumble: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CocKindRecord {
    #[default]
    #[serde(rename = "NORMAL")]
    Normal,
    #[serde(rename = "BONUS")]
    Bonus,
    #[serde(rename = "BONUS_2")]
    Bonus2,
    #[serde(rename = "PENALTY")]
    Penalty,
    #[serde(rename = "PENALTY_2")]
    Penalty2,
}
