use serde::{Deserialize, Serialize};

use super::{expr::ExprRecord, lenient};
use crate::span::Span;

/// An entity record as emitted by the producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntityRecord {
    Text(Span),
    Emphasis(WrapRecord),
    Strong(WrapRecord),
    StrongEmphasis(WrapRecord),
    Code(WrapRecord),
    CodeBlock(WrapRecord),
    Link(LinkRecord),
    Expr(ExprEntityRecord),
}

impl EntityRecord {
    /// The record's outer span.
    pub fn span(&self) -> Span {
        match self {
            Self::Text(span) => *span,
            Self::Emphasis(w)
            | Self::Strong(w)
            | Self::StrongEmphasis(w)
            | Self::Code(w)
            | Self::CodeBlock(w) => w.span,
            Self::Link(link) => link.span,
            Self::Expr(expr) => expr.span,
        }
    }
}

/// A formatting record wrapping a child.
///
/// Older producers omit `child`; the outer span then doubles as the child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrapRecord {
    #[serde(flatten)]
    pub span: Span,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<ChildRecord>,
}

/// The child of a formatting or link record: literal text, or one level of
/// styling around literal text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChildRecord {
    Text(Span),
    Emphasis(NestedRecord),
    Strong(NestedRecord),
    StrongEmphasis(NestedRecord),
    Code(NestedRecord),
    CodeBlock(NestedRecord),
}

/// A styled child. Its own child must be literal text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedRecord {
    #[serde(flatten)]
    pub span: Span,
    pub child: TextRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TextRecord {
    Text(Span),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    #[serde(flatten)]
    pub span: Span,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<ChildRecord>,
    pub href: HrefRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A link target: a literal URL, or a span of the message text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HrefRecord {
    Url(String),
    Span(Span),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprEntityRecord {
    #[serde(flatten)]
    pub span: Span,
    #[serde(default, deserialize_with = "lenient::node")]
    pub node: Box<ExprRecord>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn decode(value: serde_json::Value) -> EntityRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn strong_with_text_child() {
        let record = decode(json!({
            "type": "Strong", "start": 0, "len": 8,
            "child": {"type": "Text", "start": 2, "len": 4}
        }));
        assert_eq!(
            record,
            EntityRecord::Strong(WrapRecord {
                span: Span::new(0, 8),
                child: Some(ChildRecord::Text(Span::new(2, 4))),
            })
        );
    }

    #[test]
    fn legacy_emphasis_without_child() {
        let record = decode(json!({"type": "Emphasis", "start": 1, "offset": 5}));
        assert_eq!(
            record,
            EntityRecord::Emphasis(WrapRecord {
                span: Span::new(1, 5),
                child: None,
            })
        );
    }

    #[test]
    fn strong_around_emphasis() {
        let record = decode(json!({
            "type": "Strong", "start": 0, "len": 10,
            "child": {
                "type": "Emphasis", "start": 2, "len": 6,
                "child": {"type": "Text", "start": 3, "len": 4}
            }
        }));
        let EntityRecord::Strong(wrap) = record else {
            panic!("expected Strong");
        };
        assert_eq!(
            wrap.child,
            Some(ChildRecord::Emphasis(NestedRecord {
                span: Span::new(2, 6),
                child: TextRecord::Text(Span::new(3, 4)),
            }))
        );
    }

    #[test]
    fn link_href_as_url_or_span() {
        let by_url = decode(json!({
            "type": "Link", "start": 0, "len": 4,
            "child": {"type": "Text", "start": 1, "len": 2},
            "href": "http://example.com"
        }));
        let by_span = decode(json!({
            "type": "Link", "start": 0, "len": 4,
            "child": {"type": "Text", "start": 0, "len": 4},
            "href": {"start": 0, "len": 4},
            "title": "home"
        }));
        let EntityRecord::Link(by_url) = by_url else {
            panic!("expected Link");
        };
        let EntityRecord::Link(by_span) = by_span else {
            panic!("expected Link");
        };
        assert_eq!(by_url.href, HrefRecord::Url("http://example.com".into()));
        assert_eq!(by_span.href, HrefRecord::Span(Span::new(0, 4)));
        assert_eq!(by_span.title.as_deref(), Some("home"));
    }

    #[test]
    fn expr_with_unknown_node_keeps_the_entity() {
        let record = decode(json!({
            "type": "Expr", "start": 0, "len": 3,
            "node": {"type": "Teleport", "distance": 9}
        }));
        assert_eq!(record.span(), Span::new(0, 3));
        let EntityRecord::Expr(expr) = record else {
            panic!("expected Expr");
        };
        assert_eq!(*expr.node, ExprRecord::Unknown);
    }
}
