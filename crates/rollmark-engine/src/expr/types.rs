use serde::{Deserialize, Serialize};

use super::evaluated::{Computed, EvalFault};

/// Arithmetic operator of a [`ExprNode::Binary`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "×", alias = "*")]
    Mul,
    #[serde(rename = "÷", alias = "/")]
    Div,
}

impl Operator {
    /// Accepts both the ASCII and the typographic spelling of each operator.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" | "×" => Some(Self::Mul),
            "/" | "÷" => Some(Self::Div),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "×",
            Self::Div => "÷",
        }
    }

    /// Applies the operator. Overflow saturates; division floors and fails
    /// only on a zero divisor.
    pub fn apply(self, left: i64, right: i64) -> Computed {
        match self {
            Self::Add => Ok(left.saturating_add(right)),
            Self::Sub => Ok(left.saturating_sub(right)),
            Self::Mul => Ok(left.saturating_mul(right)),
            Self::Div => floor_div(left, right),
        }
    }
}

fn floor_div(left: i64, right: i64) -> Computed {
    if right == 0 {
        return Err(EvalFault::DivisionByZero);
    }
    // only i64::MIN / -1 overflows
    let Some(quotient) = left.checked_div(right) else {
        return Ok(i64::MAX);
    };
    if left % right != 0 && (left < 0) != (right < 0) {
        Ok(quotient - 1)
    } else {
        Ok(quotient)
    }
}

/// Keep-filter of a dice roll: keep the `n` highest or lowest dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Keep {
    High(u32),
    Low(u32),
}

impl Keep {
    pub fn count(self) -> u32 {
        match self {
            Self::High(n) | Self::Low(n) => n,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High(_) => "HIGH",
            Self::Low(_) => "LOW",
        }
    }

    /// The kept dice, highest first for `High` and lowest first for `Low`.
    pub fn select(self, values: &[i64]) -> Vec<i64> {
        let mut sorted = values.to_vec();
        match self {
            Self::High(_) => sorted.sort_unstable_by(|a, b| b.cmp(a)),
            Self::Low(_) => sorted.sort_unstable(),
        }
        sorted.truncate(self.count() as usize);
        sorted
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub face: u32,
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep: Option<Keep>,
}

/// Success-counting pool: every die at or above `min` is one success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicePool {
    pub counter: u32,
    pub face: u32,
    pub min: u32,
    /// Dice at or above this value add another die, when it exceeds half the face.
    #[serde(default)]
    pub addition: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fumble: Option<u32>,
    /// Upper bound on dice drawn, extra dice included.
    pub max_draws: u32,
}

impl DicePool {
    pub fn explodes(&self) -> bool {
        self.addition > self.face / 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CocVariant {
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

impl CocVariant {
    /// Extra tens dice drawn by this variant.
    pub fn modifier_dice(self) -> usize {
        match self {
            Self::Normal => 0,
            Self::Bonus | Self::Penalty => 1,
            Self::Bonus2 | Self::Penalty2 => 2,
        }
    }

    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::Normal => None,
            Self::Bonus => Some("bonus"),
            Self::Bonus2 => Some("bonus²"),
            Self::Penalty => Some("penalty"),
            Self::Penalty2 => Some("penalty²"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CocRoll {
    pub variant: CocVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Box<ExprNode>>,
}

/// An unevaluated expression tree.
///
/// Built from records by [`build_node`](super::build_node), which normalizes
/// faces, clamps counts and bounds depth, so evaluating any `ExprNode` does a
/// bounded amount of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExprNode {
    Literal {
        value: i64,
    },
    DiceRoll(DiceRoll),
    FateDice {
        count: u32,
    },
    DicePool(DicePool),
    CocRoll(CocRoll),
    Binary {
        op: Operator,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
    },
    Max {
        inner: Box<ExprNode>,
    },
    Min {
        inner: Box<ExprNode>,
    },
    Group {
        inner: Box<ExprNode>,
    },
    Repeat {
        node: Box<ExprNode>,
        count: u32,
    },
    Unknown,
}

impl ExprNode {
    pub fn literal(value: i64) -> Self {
        Self::Literal { value }
    }

    pub fn roll(face: u32, count: u32) -> Self {
        Self::DiceRoll(DiceRoll {
            face,
            count,
            keep: None,
        })
    }

    pub fn binary(op: Operator, left: ExprNode, right: ExprNode) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Upper bound on the work of evaluating this node once: one unit per
    /// node evaluated plus one per die drawn. Never zero.
    pub fn cost(&self) -> u64 {
        let own = match self {
            Self::Literal { .. } | Self::Unknown => 0,
            Self::DiceRoll(roll) => u64::from(roll.count),
            Self::FateDice { count } => u64::from(*count),
            Self::DicePool(pool) => u64::from(pool.max_draws),
            Self::CocRoll(coc) => {
                let dice = 2 + coc.variant.modifier_dice() as u64;
                dice.saturating_add(coc.target.as_deref().map_or(0, Self::cost))
            }
            Self::Binary { left, right, .. } => left.cost().saturating_add(right.cost()),
            Self::Max { inner } | Self::Min { inner } | Self::Group { inner } => inner.cost(),
            Self::Repeat { node, count } => node.cost().saturating_mul(u64::from(*count)),
        };
        own.saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(7, 2, 3)]
    #[case(-7, 2, -4)]
    #[case(7, -2, -4)]
    #[case(-7, -2, 3)]
    #[case(6, 3, 2)]
    #[case(-6, 3, -2)]
    #[case(0, 5, 0)]
    #[case(i64::MIN, -1, i64::MAX)]
    fn division_floors(#[case] left: i64, #[case] right: i64, #[case] expected: i64) {
        assert_eq!(Operator::Div.apply(left, right), Ok(expected));
    }

    #[test]
    fn division_by_zero_is_a_fault() {
        assert_eq!(Operator::Div.apply(5, 0), Err(EvalFault::DivisionByZero));
    }

    #[test]
    fn arithmetic_saturates() {
        assert_eq!(Operator::Add.apply(i64::MAX, 1), Ok(i64::MAX));
        assert_eq!(Operator::Sub.apply(i64::MIN, 1), Ok(i64::MIN));
        assert_eq!(Operator::Mul.apply(i64::MAX, -2), Ok(i64::MIN));
    }

    #[rstest]
    #[case("+", Some(Operator::Add))]
    #[case("-", Some(Operator::Sub))]
    #[case("*", Some(Operator::Mul))]
    #[case("×", Some(Operator::Mul))]
    #[case("/", Some(Operator::Div))]
    #[case("÷", Some(Operator::Div))]
    #[case("%", None)]
    #[case("", None)]
    fn operator_symbols(#[case] symbol: &str, #[case] expected: Option<Operator>) {
        assert_eq!(Operator::from_symbol(symbol), expected);
    }

    #[test]
    fn operator_serde_accepts_ascii_aliases() {
        let op: Operator = serde_json::from_str(r#""*""#).unwrap();
        assert_eq!(op, Operator::Mul);
        assert_eq!(serde_json::to_string(&Operator::Div).unwrap(), r#""÷""#);
    }

    #[test]
    fn keep_selects_extremes() {
        let values = [3, 6, 1, 4];
        assert_eq!(Keep::High(2).select(&values), vec![6, 4]);
        assert_eq!(Keep::Low(3).select(&values), vec![1, 3, 4]);
        assert_eq!(Keep::High(9).select(&values), vec![6, 4, 3, 1]);
    }

    #[test]
    fn cost_multiplies_through_repeat() {
        let node = ExprNode::Repeat {
            node: Box::new(ExprNode::binary(
                Operator::Add,
                ExprNode::roll(6, 3),
                ExprNode::FateDice { count: 4 },
            )),
            count: 10,
        };
        // 1 + 10 * (binary 1 + roll 4 + fate 5)
        assert_eq!(node.cost(), 101);
        assert_eq!(ExprNode::literal(3).cost(), 1);
        assert_eq!(ExprNode::Unknown.cost(), 1);
    }

    #[test]
    fn repeat_over_literals_still_costs_each_evaluation() {
        let inner = ExprNode::Repeat {
            node: Box::new(ExprNode::literal(1)),
            count: 2048,
        };
        let outer = ExprNode::Repeat {
            node: Box::new(inner),
            count: 2048,
        };
        assert_eq!(outer.cost(), 1 + 2048 * (1 + 2048));
    }
}
