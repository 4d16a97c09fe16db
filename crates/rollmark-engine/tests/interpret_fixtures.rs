use pretty_assertions::assert_eq;
use rollmark_engine::entity::invariants;
use rollmark_engine::{
    EntityKind, Interpreter, Limits, RawRecord, Scripted, Span, TextUnits, export, to_markdown,
};
use serde::Deserialize;

#[test]
fn fixture_roll_scenario() {
    assert_fixture("roll_scenario");
}

#[test]
fn fixture_formatting() {
    assert_fixture("formatting");
}

#[test]
fn fixture_malformed() {
    assert_fixture("malformed");
}

#[test]
fn fixture_utf16_offsets() {
    assert_fixture("utf16_offsets");
}

#[test]
fn fixture_supplemented_rolls() {
    assert_fixture("supplemented_rolls");
}

#[derive(Deserialize)]
struct Fixture {
    text: String,
    entities: Vec<RawRecord>,
    #[serde(default)]
    units: TextUnits,
    dice: Vec<u32>,
    expected: Expected,
}

#[derive(Deserialize)]
struct Expected {
    kinds: Vec<EntityKind>,
    #[serde(default)]
    spans: Option<Vec<(usize, usize)>>,
    /// Values of the expression entities, in order; `null` where evaluation faulted.
    values: Vec<Option<i64>>,
    markdown: String,
}

fn assert_fixture(name: &str) {
    let json = std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.json",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();
    let fixture: Fixture = serde_json::from_str(&json).unwrap();

    let interpreter = Interpreter::new(Limits::default(), fixture.units);
    let source = interpreter.source(&fixture.text);
    let entities = interpreter.interpret(
        &fixture.text,
        &fixture.entities,
        &mut Scripted::new(fixture.dice),
    );

    assert_eq!(entities.len(), fixture.entities.len(), "{name}: one entity per record");
    invariants::check(&source, &entities);

    let kinds: Vec<EntityKind> = entities.iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, fixture.expected.kinds, "{name}: kinds");

    if let Some(spans) = fixture.expected.spans {
        let expected: Vec<Span> = spans.into_iter().map(|(s, l)| Span::new(s, l)).collect();
        let actual: Vec<Span> = entities.iter().map(|e| e.span()).collect();
        assert_eq!(actual, expected, "{name}: spans");
    }

    let values: Vec<Option<i64>> = entities
        .iter()
        .filter_map(|e| e.expr())
        .map(|node| node.value().ok())
        .collect();
    assert_eq!(values, fixture.expected.values, "{name}: values");

    let exported = export(&source, &entities);
    assert_eq!(to_markdown(&exported), fixture.expected.markdown, "{name}: markdown");
}

/// Every valid span slices back to exactly `len` units of the source
#[test]
fn substring_length_matches_span_length() {
    let text = "a 🎲 b é";
    let utf8 = rollmark_engine::Source::utf8(text);
    for start in 0..=text.len() {
        for len in 0..=text.len() - start {
            let span = Span::new(start, len);
            if let Some(slice) = utf8.slice(span) {
                assert_eq!(slice.len(), len);
            }
        }
    }

    let utf16 = rollmark_engine::Source::utf16(text);
    let units = utf16.len();
    for start in 0..=units {
        for len in 0..=units - start {
            let span = Span::new(start, len);
            if let Some(slice) = utf16.slice(span) {
                assert_eq!(slice.encode_utf16().count(), len);
            }
        }
    }
}
