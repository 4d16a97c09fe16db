use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{CocVariant, DicePool, DiceRoll, Operator};

/// Why a node has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum EvalFault {
    #[error("division by zero")]
    DivisionByZero,
    #[error("unsupported expression")]
    Unsupported,
    #[error("no outcomes to aggregate")]
    EmptyOutcomes,
}

/// The value of an evaluated node, or why it cannot be evaluated.
pub type Computed = Result<i64, EvalFault>;

/// An evaluated expression tree, parallel to [`ExprNode`](super::ExprNode).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Evaluated {
    Literal {
        value: i64,
    },
    DiceRoll {
        roll: DiceRoll,
        values: Vec<i64>,
        /// Dice kept by the roll's filter.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kept: Option<Vec<i64>>,
        value: i64,
    },
    FateDice {
        values: Vec<i64>,
        value: i64,
    },
    DicePool {
        pool: DicePool,
        values: Vec<i64>,
        value: i64,
    },
    CocRoll {
        variant: CocVariant,
        rolled: i64,
        /// Extra tens dice, in draw order.
        modifiers: Vec<i64>,
        value: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<Box<Evaluated>>,
    },
    Binary {
        op: Operator,
        left: Box<Evaluated>,
        right: Box<Evaluated>,
        value: Computed,
    },
    Max {
        inner: Box<Evaluated>,
        value: Computed,
    },
    Min {
        inner: Box<Evaluated>,
        value: Computed,
    },
    Group {
        inner: Box<Evaluated>,
        value: Computed,
    },
    Repeat {
        results: Vec<Evaluated>,
        value: Computed,
    },
    Unknown,
}

impl Evaluated {
    pub fn value(&self) -> Computed {
        match self {
            Self::Literal { value }
            | Self::DiceRoll { value, .. }
            | Self::FateDice { value, .. }
            | Self::DicePool { value, .. }
            | Self::CocRoll { value, .. } => Ok(*value),
            Self::Binary { value, .. }
            | Self::Max { value, .. }
            | Self::Min { value, .. }
            | Self::Group { value, .. }
            | Self::Repeat { value, .. } => *value,
            Self::Unknown => Err(EvalFault::Unsupported),
        }
    }

    /// Per-die outcomes of a multi-valued node; kept dice for filtered rolls.
    pub fn outcomes(&self) -> Option<&[i64]> {
        match self {
            Self::DiceRoll {
                kept: Some(kept), ..
            } => Some(kept),
            Self::DiceRoll { values, .. }
            | Self::FateDice { values, .. }
            | Self::DicePool { values, .. } => Some(values),
            _ => None,
        }
    }

    /// Success level of a CoC roll against its evaluated target.
    pub fn success_level(&self) -> Option<SuccessLevel> {
        let Self::CocRoll {
            value,
            target: Some(target),
            ..
        } = self
        else {
            return None;
        };
        target
            .value()
            .ok()
            .map(|target| SuccessLevel::grade(*value, target))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

/// Outcome of a percentile roll against a skill value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuccessLevel {
    Fumble,
    Critical,
    Failure,
    Extreme,
    Hard,
    Regular,
}

impl SuccessLevel {
    pub fn grade(value: i64, target: i64) -> Self {
        if value == 100 || (target < 50 && value > 95) {
            Self::Fumble
        } else if value == 1 {
            Self::Critical
        } else if value > target {
            Self::Failure
        } else if value <= target.div_euclid(5) {
            Self::Extreme
        } else if value <= target >> 1 {
            Self::Hard
        } else {
            Self::Regular
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Fumble => "fumble",
            Self::Critical => "critical success",
            Self::Failure => "failure",
            Self::Extreme => "extreme success",
            Self::Hard => "hard success",
            Self::Regular => "regular success",
        }
    }
}
