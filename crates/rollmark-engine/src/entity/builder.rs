//! Builds entity trees from decoded records.
//!
//! Building is total: every record yields exactly one entity. A record that
//! fails validation becomes [`Entity::Unknown`] carrying its outer span when
//! that span is valid for the source, and [`Span::EMPTY`] otherwise.

use thiserror::Error;

use super::types::{Child, Entity, Href, Style};
use crate::expr::{ExprNode, build_node};
use crate::limits::Limits;
use crate::record::{ChildRecord, EntityRecord, HrefRecord, NestedRecord, RawRecord, TextRecord};
use crate::span::{Source, Span, preview};

/// Why a record became [`Entity::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("unrecognized record (type {tag:?}): {reason}")]
    Unrecognized { tag: Option<String>, reason: String },
    #[error("span {span:?} is not valid for a source of length {len}")]
    OutOfBounds { span: Span, len: usize },
    #[error("child span {child:?} is not contained in {outer:?}")]
    NotContained { outer: Span, child: Span },
}

/// Builds one entity per record, in order.
pub fn build_entities(
    source: &Source<'_>,
    records: &[RawRecord],
    limits: &Limits,
) -> Vec<Entity<ExprNode>> {
    records
        .iter()
        .map(|record| build_entity(source, record, limits))
        .collect()
}

pub fn build_entity(source: &Source<'_>, record: &RawRecord, limits: &Limits) -> Entity<ExprNode> {
    try_build(source, record, limits).unwrap_or_else(|rejection| {
        let span = fallback_span(source, record);
        log::debug!(
            "entity {:?} degraded to Unknown: {rejection}",
            preview(source, span, 24)
        );
        Entity::Unknown { span }
    })
}

/// Builds an entity, or explains why the record is rejected.
pub fn try_build(
    source: &Source<'_>,
    record: &RawRecord,
    limits: &Limits,
) -> Result<Entity<ExprNode>, Rejection> {
    let record = match record {
        RawRecord::Known(record) => record,
        RawRecord::Unrecognized { tag, reason, .. } => {
            return Err(Rejection::Unrecognized {
                tag: tag.clone(),
                reason: reason.clone(),
            });
        }
    };

    let span = record.span();
    in_bounds(source, span)?;

    match record {
        EntityRecord::Text(_) => Ok(Entity::Text { span }),
        EntityRecord::Emphasis(wrap) => styled(source, Style::Emphasis, span, wrap.child.as_ref()),
        EntityRecord::Strong(wrap) => styled(source, Style::Strong, span, wrap.child.as_ref()),
        EntityRecord::StrongEmphasis(wrap) => {
            styled(source, Style::StrongEmphasis, span, wrap.child.as_ref())
        }
        EntityRecord::Code(wrap) => styled(source, Style::Code, span, wrap.child.as_ref()),
        EntityRecord::CodeBlock(wrap) => {
            styled(source, Style::CodeBlock, span, wrap.child.as_ref())
        }
        EntityRecord::Link(link) => {
            let child = build_child(source, span, link.child.as_ref())?;
            let href = match &link.href {
                HrefRecord::Url(url) => Href::Url(url.clone()),
                HrefRecord::Span(href) => {
                    in_bounds(source, *href)?;
                    Href::Span(*href)
                }
            };
            Ok(Entity::Link {
                span,
                child,
                href,
                title: link.title.clone(),
            })
        }
        EntityRecord::Expr(expr) => Ok(Entity::Expr {
            span,
            node: build_node(&expr.node, limits),
        }),
    }
}

fn styled(
    source: &Source<'_>,
    style: Style,
    span: Span,
    child: Option<&ChildRecord>,
) -> Result<Entity<ExprNode>, Rejection> {
    let child = build_child(source, span, child)?;
    Ok(Entity::Styled { style, span, child })
}

/// Validates a child against its parent. A missing child is the outer span.
fn build_child(
    source: &Source<'_>,
    outer: Span,
    child: Option<&ChildRecord>,
) -> Result<Child, Rejection> {
    let Some(child) = child else {
        return Ok(Child::Text(outer));
    };
    let (style, nested) = match child {
        ChildRecord::Text(span) => {
            contained(source, outer, *span)?;
            return Ok(Child::Text(*span));
        }
        ChildRecord::Emphasis(nested) => (Style::Emphasis, nested),
        ChildRecord::Strong(nested) => (Style::Strong, nested),
        ChildRecord::StrongEmphasis(nested) => (Style::StrongEmphasis, nested),
        ChildRecord::Code(nested) => (Style::Code, nested),
        ChildRecord::CodeBlock(nested) => (Style::CodeBlock, nested),
    };
    let NestedRecord {
        span,
        child: TextRecord::Text(text),
    } = nested;
    contained(source, outer, *span)?;
    contained(source, *span, *text)?;
    Ok(Child::Styled {
        style,
        span: *span,
        text: *text,
    })
}

fn in_bounds(source: &Source<'_>, span: Span) -> Result<(), Rejection> {
    if source.contains(span) {
        Ok(())
    } else {
        Err(Rejection::OutOfBounds {
            span,
            len: source.len(),
        })
    }
}

fn contained(source: &Source<'_>, outer: Span, child: Span) -> Result<(), Rejection> {
    in_bounds(source, child)?;
    if outer.contains(child) {
        Ok(())
    } else {
        Err(Rejection::NotContained { outer, child })
    }
}

fn fallback_span(source: &Source<'_>, record: &RawRecord) -> Span {
    let span = match record {
        RawRecord::Known(record) => Some(record.span()),
        RawRecord::Unrecognized { span, .. } => *span,
    };
    span.filter(|span| source.contains(*span))
        .unwrap_or(Span::EMPTY)
}
