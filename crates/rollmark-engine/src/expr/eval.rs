//! Tree-walking evaluator.
//!
//! Children are evaluated depth first, left before right, and dice are drawn
//! only at dice leaves, so a fixed [`DiceSource`] output sequence always gives
//! the same evaluated tree.

use super::dice::DiceSource;
use super::evaluated::{Computed, EvalFault, Evaluated};
use super::types::{CocRoll, CocVariant, DicePool, DiceRoll, ExprNode};

/// Successes after which a pool stops rolling.
pub const POOL_MAX_SUCCESSES: i64 = 1024;

/// Evaluates `node`, drawing dice from `dice`. Total: faults are stored on
/// the nodes they occur in.
pub fn evaluate<S: DiceSource + ?Sized>(node: &ExprNode, dice: &mut S) -> Evaluated {
    match node {
        ExprNode::Literal { value } => Evaluated::Literal { value: *value },
        ExprNode::DiceRoll(roll) => roll_dice(roll, dice),
        ExprNode::FateDice { count } => fate_dice(*count, dice),
        ExprNode::DicePool(pool) => roll_pool(pool, dice),
        ExprNode::CocRoll(coc) => roll_coc(coc, dice),
        ExprNode::Binary { op, left, right } => {
            let left = evaluate(left, dice);
            let right = evaluate(right, dice);
            let value = match (left.value(), right.value()) {
                (Ok(l), Ok(r)) => op.apply(l, r),
                (Err(fault), _) | (_, Err(fault)) => Err(fault),
            };
            Evaluated::Binary {
                op: *op,
                left: Box::new(left),
                right: Box::new(right),
                value,
            }
        }
        ExprNode::Max { inner } => {
            let inner = evaluate(inner, dice);
            let value = aggregate(&inner, |outcomes| outcomes.iter().copied().max());
            Evaluated::Max {
                inner: Box::new(inner),
                value,
            }
        }
        ExprNode::Min { inner } => {
            let inner = evaluate(inner, dice);
            let value = aggregate(&inner, |outcomes| outcomes.iter().copied().min());
            Evaluated::Min {
                inner: Box::new(inner),
                value,
            }
        }
        ExprNode::Group { inner } => {
            let inner = evaluate(inner, dice);
            let value = inner.value();
            Evaluated::Group {
                inner: Box::new(inner),
                value,
            }
        }
        ExprNode::Repeat { node, count } => {
            let results: Vec<Evaluated> = (0..*count).map(|_| evaluate(node, dice)).collect();
            let value = results
                .iter()
                .try_fold(0_i64, |sum, result| Ok(sum.saturating_add(result.value()?)));
            Evaluated::Repeat { results, value }
        }
        ExprNode::Unknown => Evaluated::Unknown,
    }
}

fn draw<S: DiceSource + ?Sized>(dice: &mut S, faces: u32) -> i64 {
    i64::from(dice.roll(faces).clamp(1, faces.max(1)))
}

/// Max or min over a node's outcomes, or over its single value.
fn aggregate(inner: &Evaluated, pick: impl Fn(&[i64]) -> Option<i64>) -> Computed {
    match inner.outcomes() {
        Some(outcomes) => pick(outcomes).ok_or(EvalFault::EmptyOutcomes),
        None => inner.value(),
    }
}

fn roll_dice<S: DiceSource + ?Sized>(roll: &DiceRoll, dice: &mut S) -> Evaluated {
    let values: Vec<i64> = (0..roll.count).map(|_| draw(dice, roll.face)).collect();
    let kept = roll.keep.map(|keep| keep.select(&values));
    let value = kept.as_deref().unwrap_or(&values[..]).iter().sum();
    Evaluated::DiceRoll {
        roll: roll.clone(),
        values,
        kept,
        value,
    }
}

/// Fate dice are d4s read as `-`, blank, blank, `+`.
fn fate_dice<S: DiceSource + ?Sized>(count: u32, dice: &mut S) -> Evaluated {
    let values: Vec<i64> = (0..count)
        .map(|_| match draw(dice, 4) {
            1 => -1,
            4 => 1,
            _ => 0,
        })
        .collect();
    let value = values.iter().sum();
    Evaluated::FateDice { values, value }
}

fn roll_pool<S: DiceSource + ?Sized>(pool: &DicePool, dice: &mut S) -> Evaluated {
    if pool.face <= 1 {
        let face = i64::from(pool.face);
        return Evaluated::DicePool {
            pool: pool.clone(),
            values: vec![face; pool.counter as usize],
            value: face * i64::from(pool.counter),
        };
    }

    let explodes = pool.explodes();
    let min = i64::from(pool.min);
    let addition = i64::from(pool.addition);
    let mut values = Vec::new();
    let mut remaining = pool.counter;
    let mut successes = 0_i64;
    while remaining > 0 && successes < POOL_MAX_SUCCESSES && values.len() < pool.max_draws as usize {
        let x = draw(dice, pool.face);
        values.push(x);
        if !(explodes && x >= addition) {
            remaining -= 1;
        }
        if x >= min {
            successes += 1;
        }
    }
    Evaluated::DicePool {
        pool: pool.clone(),
        values,
        value: successes,
    }
}

fn roll_coc<S: DiceSource + ?Sized>(coc: &CocRoll, dice: &mut S) -> Evaluated {
    let mut digit = || draw(dice, 10) - 1;
    let ones = digit();
    let tens = digit() * 10;
    let rolled = match tens + ones {
        0 => 100,
        n => n,
    };

    let mut value = rolled;
    let mut modifiers = Vec::with_capacity(coc.variant.modifier_dice());
    match coc.variant {
        CocVariant::Normal => {}
        CocVariant::Bonus | CocVariant::Bonus2 => {
            let first = digit() * 10;
            modifiers.push(first);
            value = with_bonus(value, first, ones);
            if coc.variant == CocVariant::Bonus2 {
                let second = digit() * 10;
                modifiers.push(second);
                if second <= first {
                    value = with_bonus(value, second, ones);
                }
            }
        }
        CocVariant::Penalty | CocVariant::Penalty2 => {
            let first = digit() * 10;
            modifiers.push(first);
            value = with_penalty(value, first, tens, ones);
            if coc.variant == CocVariant::Penalty2 {
                let second = digit() * 10;
                modifiers.push(second);
                if second >= first {
                    value = with_penalty(value, second, tens, ones);
                }
            }
        }
    }

    let target = coc
        .target
        .as_deref()
        .map(|target| Box::new(evaluate(target, dice)));
    Evaluated::CocRoll {
        variant: coc.variant,
        rolled,
        modifiers,
        value,
        target,
    }
}

/// A bonus tens die replaces the result when lower; a candidate of 0 is ignored.
fn with_bonus(value: i64, tens: i64, ones: i64) -> i64 {
    let candidate = tens + ones;
    if candidate != 0 && candidate < value {
        candidate
    } else {
        value
    }
}

/// A penalty tens die replaces the result when its tens are higher; 00 reads as 100.
fn with_penalty(value: i64, modifier: i64, tens: i64, ones: i64) -> i64 {
    if modifier > tens || (modifier == 0 && ones == 0) {
        match modifier + ones {
            0 => 100,
            n => n,
        }
    } else {
        value
    }
}
