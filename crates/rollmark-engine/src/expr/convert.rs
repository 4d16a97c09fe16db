//! Record to expression tree conversion.

use super::face::{self, MAX_FACE};
use super::types::{CocRoll, CocVariant, DicePool, DiceRoll, ExprNode, Keep, Operator};
use crate::limits::Limits;
use crate::record::{CocKindRecord, DicePoolRecord, ExprRecord, FilterRecord};

/// Builds an [`ExprNode`] from a decoded record.
///
/// Faces are normalized, counts clamped to `limits.max_count`, subtrees
/// deeper than `limits.max_depth` and `Repeat` nodes costing more than
/// `limits.max_draws` become [`ExprNode::Unknown`], as do unknown operators.
pub fn build_node(record: &ExprRecord, limits: &Limits) -> ExprNode {
    convert(record, limits, 0)
}

fn convert(record: &ExprRecord, limits: &Limits, depth: usize) -> ExprNode {
    if depth > limits.max_depth {
        log::debug!("expression deeper than {} levels", limits.max_depth);
        return ExprNode::Unknown;
    }
    let child = |record: &ExprRecord| Box::new(convert(record, limits, depth + 1));

    match record {
        ExprRecord::Num { value } => {
            if value.is_finite() {
                ExprNode::literal(value.trunc() as i64)
            } else {
                log::debug!("non-finite literal {value}");
                ExprNode::Unknown
            }
        }
        ExprRecord::Roll {
            face,
            counter,
            filter,
        } => {
            let count = limits.clamp_count(*counter);
            let keep = filter.map(|(kind, n)| {
                let n = limits.clamp_count(n).min(count);
                match kind {
                    FilterRecord::High => Keep::High(n),
                    FilterRecord::Low => Keep::Low(n),
                }
            });
            ExprNode::DiceRoll(DiceRoll {
                face: face.normalized(),
                count,
                keep,
            })
        }
        ExprRecord::FateRoll { counter } => ExprNode::FateDice {
            count: limits.clamp_count(*counter),
        },
        ExprRecord::Binary { op, l, r } => match Operator::from_symbol(op) {
            Some(op) => ExprNode::Binary {
                op,
                left: child(l),
                right: child(r),
            },
            None => {
                log::debug!("unknown operator {op:?}");
                ExprNode::Unknown
            }
        },
        ExprRecord::Max { node } => ExprNode::Max { inner: child(node) },
        ExprRecord::Min { node } => ExprNode::Min { inner: child(node) },
        ExprRecord::SubExpr { node } => ExprNode::Group { inner: child(node) },
        ExprRecord::Repeat { node, count } => {
            let repeated = ExprNode::Repeat {
                node: child(node),
                count: limits.clamp_count(*count),
            };
            if repeated.cost() > limits.max_draws {
                log::debug!("repeat would cost more than {}", limits.max_draws);
                return ExprNode::Unknown;
            }
            repeated
        }
        ExprRecord::DicePool(pool) => ExprNode::DicePool(build_pool(pool, limits)),
        ExprRecord::CocRoll { sub_type, target } => ExprNode::CocRoll(CocRoll {
            variant: coc_variant(*sub_type),
            target: target.as_deref().map(child),
        }),
        ExprRecord::Unknown => ExprNode::Unknown,
    }
}

fn build_pool(record: &DicePoolRecord, limits: &Limits) -> DicePool {
    let counter = limits.clamp_count(record.counter);
    DicePool {
        counter,
        // a pool keeps faces of 0 and 1, which need no dice
        face: if record.face.is_nan() {
            face::DEFAULT_FACE
        } else {
            clamp_u32(record.face, MAX_FACE)
        },
        min: clamp_u32(record.min, MAX_FACE + 1),
        addition: clamp_u32(record.addition, MAX_FACE + 1),
        critical: record.critical.map(|n| clamp_u32(n, MAX_FACE)),
        fumble: record.fumble.map(|n| clamp_u32(n, MAX_FACE)),
        // a zero max_count still lets the single clamped die roll
        max_draws: limits.max_count.max(1),
    }
}

fn clamp_u32(raw: f64, max: u32) -> u32 {
    if raw.is_nan() {
        return 0;
    }
    raw.trunc().clamp(0.0, f64::from(max)) as u32
}

fn coc_variant(kind: CocKindRecord) -> CocVariant {
    match kind {
        CocKindRecord::Normal => CocVariant::Normal,
        CocKindRecord::Bonus => CocVariant::Bonus,
        CocKindRecord::Bonus2 => CocVariant::Bonus2,
        CocKindRecord::Penalty => CocVariant::Penalty,
        CocKindRecord::Penalty2 => CocVariant::Penalty2,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn build(value: serde_json::Value) -> ExprNode {
        let record: ExprRecord = serde_json::from_value(value).unwrap();
        build_node(&record, &Limits::default())
    }

    #[test]
    fn roll_is_normalized_and_clamped() {
        let node = build(json!({"type": "Roll", "face": "d1", "counter": 1e9}));
        assert_eq!(node, ExprNode::roll(2, 65_536));
    }

    #[test]
    fn keep_count_never_exceeds_dice() {
        let node = build(json!({"type": "Roll", "face": 20, "counter": 2, "filter": ["LOW", 5]}));
        assert_eq!(
            node,
            ExprNode::DiceRoll(DiceRoll {
                face: 20,
                count: 2,
                keep: Some(Keep::Low(2)),
            })
        );
    }

    #[test]
    fn binary_with_ascii_operator() {
        let node = build(json!({
            "type": "Binary", "op": "*",
            "l": {"type": "Num", "value": 3},
            "r": {"type": "Num", "value": 4.7}
        }));
        assert_eq!(
            node,
            ExprNode::binary(Operator::Mul, ExprNode::literal(3), ExprNode::literal(4))
        );
    }

    #[test]
    fn unknown_operator_is_unknown() {
        let node = build(json!({
            "type": "Binary", "op": "^",
            "l": {"type": "Num", "value": 3},
            "r": {"type": "Num", "value": 4}
        }));
        assert_eq!(node, ExprNode::Unknown);
    }

    #[test]
    fn deep_nesting_is_cut_off() {
        let mut record = ExprRecord::Num { value: 1.0 };
        for _ in 0..100 {
            record = ExprRecord::SubExpr {
                node: Box::new(record),
            };
        }
        let limits = Limits {
            max_depth: 3,
            ..Limits::default()
        };
        let node = build_node(&record, &limits);
        let mut depth = 0;
        let mut cursor = &node;
        while let ExprNode::Group { inner } = cursor {
            depth += 1;
            cursor = &**inner;
        }
        assert_eq!(depth, 4);
        assert_eq!(*cursor, ExprNode::Unknown);
    }

    #[test]
    fn expensive_repeat_is_unknown() {
        let node = build(json!({
            "type": "Repeat", "count": 65536,
            "node": {"type": "Roll", "face": 6, "counter": 65536}
        }));
        assert_eq!(node, ExprNode::Unknown);
    }

    #[test]
    fn nested_literal_repeats_are_bounded() {
        let node = build(json!({
            "type": "Repeat", "count": 65536,
            "node": {"type": "Repeat", "count": 65536,
                "node": {"type": "Repeat", "count": 65536,
                    "node": {"type": "Num", "value": 1}}}
        }));
        assert!(node.cost() <= Limits::default().max_draws);
        let ExprNode::Repeat { node: middle, .. } = node else {
            panic!("expected Repeat");
        };
        assert_eq!(*middle, ExprNode::Unknown);
    }

    #[test]
    fn repeat_budget_applies_to_zero_draw_subtrees() {
        let record: ExprRecord = serde_json::from_value(json!({
            "type": "Repeat", "count": 2048,
            "node": {"type": "Repeat", "count": 2048, "node": {"type": "Num", "value": 1}}
        }))
        .unwrap();
        let limits = Limits {
            max_draws: 16,
            ..Limits::default()
        };
        assert_eq!(build_node(&record, &limits), ExprNode::Unknown);
    }

    #[test]
    fn pool_with_zero_max_count_draws_one_die() {
        let record: ExprRecord = serde_json::from_value(json!({
            "type": "DicePool", "counter": 5, "face": 10, "min": 8
        }))
        .unwrap();
        let limits = Limits {
            max_count: 0,
            ..Limits::default()
        };
        let ExprNode::DicePool(pool) = build_node(&record, &limits) else {
            panic!("expected DicePool");
        };
        assert_eq!((pool.counter, pool.max_draws), (1, 1));
    }

    #[test]
    fn pool_keeps_raw_small_faces() {
        let node = build(json!({"type": "DicePool", "counter": 3, "face": 1, "min": 1}));
        let ExprNode::DicePool(pool) = node else {
            panic!("expected DicePool");
        };
        assert_eq!((pool.counter, pool.face, pool.min, pool.addition), (3, 1, 1, 0));
        assert_eq!(pool.max_draws, 65_536);
    }

    #[test]
    fn coc_target_is_converted() {
        let node = build(json!({
            "type": "CocRoll", "subType": "PENALTY",
            "target": {"type": "Num", "value": 55}
        }));
        assert_eq!(
            node,
            ExprNode::CocRoll(CocRoll {
                variant: CocVariant::Penalty,
                target: Some(Box::new(ExprNode::literal(55))),
            })
        );
    }

    #[test]
    fn non_finite_literal_is_unknown() {
        let record = ExprRecord::Num { value: f64::NAN };
        assert_eq!(build_node(&record, &Limits::default()), ExprNode::Unknown);
    }
}
