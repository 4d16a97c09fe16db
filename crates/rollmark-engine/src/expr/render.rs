use std::fmt::{self, Display};

use super::evaluated::{Computed, Evaluated};
use super::types::Operator;

pub const UNSUPPORTED: &str = "[unsupported]";

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Formats a computed value, `?` when it cannot be evaluated.
pub struct ValueText<'a>(pub &'a Computed);

impl Display for ValueText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Ok(value) => write!(f, "{value}"),
            Err(_) => f.write_str("?"),
        }
    }
}

struct List<'a>(&'a [i64]);

impl Display for List<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}

fn fate_symbol(value: i64) -> char {
    match value.signum() {
        1 => '+',
        -1 => '-',
        _ => '▢',
    }
}

/// Compact roll text, e.g. `1d20=14+5=19`.
impl Display for Evaluated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value } => write!(f, "{value}"),
            Self::DiceRoll {
                roll,
                values,
                kept,
                value,
            } => {
                write!(f, "{}d{}", roll.count, roll.face)?;
                if values.len() > 1 {
                    write!(f, "={}", List(values))?;
                }
                if let (Some(keep), Some(kept)) = (roll.keep, kept)
                    && kept.len() != values.len()
                {
                    write!(f, "| {} {}={}", keep.label(), keep.count(), List(kept))?;
                }
                write!(f, "={value}")
            }
            Self::FateDice { values, value } => {
                for die in values {
                    write!(f, "{}", fate_symbol(*die))?;
                }
                write!(f, "={value}")
            }
            Self::DicePool { pool, values, value } => write!(
                f,
                "{}d{} {} ≥ {} ⇒ {value}",
                pool.counter,
                pool.face,
                List(values),
                pool.min
            ),
            Self::CocRoll {
                variant,
                rolled,
                modifiers,
                value,
                target,
            } => {
                write!(f, "{value}")?;
                if let Some(label) = variant.label() {
                    write!(f, "={rolled} {label}{}", List(modifiers))?;
                }
                if let Some(target) = target {
                    let target_value = target.value();
                    write!(f, ": (target {})", ValueText(&target_value))?;
                    if let Some(level) = self.success_level() {
                        write!(f, " {}", level.label())?;
                    }
                }
                Ok(())
            }
            Self::Binary {
                op,
                left,
                right,
                value,
            } => write!(f, "{left}{op}{right}={}", ValueText(value)),
            Self::Max { inner, value } => write!(f, "max({inner})={}", ValueText(value)),
            Self::Min { inner, value } => write!(f, "min({inner})={}", ValueText(value)),
            Self::Group { inner, value } => write!(f, "({inner})={}", ValueText(value)),
            Self::Repeat { results, .. } => {
                for (i, result) in results.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{result}")?;
                }
                Ok(())
            }
            Self::Unknown => f.write_str(UNSUPPORTED),
        }
    }
}
