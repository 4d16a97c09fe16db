use serde::{Deserialize, Serialize};

/// Bounds applied while building expression trees.
///
/// Every count that drives a loop in the evaluator is clamped against these
/// when the tree is built, so evaluating a built tree is bounded by its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Largest dice count (and repeat count) a single node may request.
    pub max_count: u32,
    /// Deepest expression nesting kept; deeper subtrees become `Unknown`.
    pub max_depth: usize,
    /// Largest [`cost`](crate::expr::ExprNode::cost) one `Repeat` node may
    /// have, counting nodes evaluated as well as dice drawn.
    pub max_draws: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_count: 65_536,
            max_depth: 64,
            max_draws: 1 << 20,
        }
    }
}

impl Limits {
    /// Truncates a producer count toward zero and clamps it to
    /// `[1, max_count]`. NaN counts as one.
    pub fn clamp_count(&self, raw: f64) -> u32 {
        if raw.is_nan() {
            return 1;
        }
        let max = self.max_count.max(1);
        raw.trunc().clamp(1.0, f64::from(max)) as u32
    }
}
