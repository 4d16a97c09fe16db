// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use rollmark_engine::RawRecord;
use serde_json::json;

/// A message of `size` repetitions of `"**hit** 2d6+3 "`, with its records.
#[allow(dead_code)]
pub fn generate_message(size: usize) -> (String, Vec<RawRecord>) {
    let chunk = "**hit** 2d6+3 ";
    let mut records = Vec::with_capacity(size * 3);
    for i in 0..size {
        let base = i * chunk.len();
        records.push(RawRecord::from(json!({
            "type": "Strong", "start": base, "len": 7,
            "child": {"type": "Text", "start": base + 2, "len": 3}
        })));
        records.push(RawRecord::from(json!({"type": "Text", "start": base + 7, "len": 1})));
        records.push(RawRecord::from(json!({
            "type": "Expr", "start": base + 8, "len": 6,
            "node": {"type": "Binary", "op": "+",
                "l": {"type": "Roll", "face": 6, "counter": 2},
                "r": {"type": "Num", "value": 3}}
        })));
    }
    (chunk.repeat(size), records)
}

/// Nested `SubExpr` groups `depth` levels deep around one roll.
#[allow(dead_code)]
pub fn generate_deep_expression(depth: usize) -> RawRecord {
    let mut node = json!({"type": "Roll", "face": 20, "counter": 1});
    for _ in 0..depth {
        node = json!({"type": "SubExpr", "node": node});
    }
    RawRecord::from(json!({"type": "Expr", "start": 0, "len": 0, "node": node}))
}
