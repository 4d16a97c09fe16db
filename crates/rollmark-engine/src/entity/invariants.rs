use super::types::{Child, Entity, Href};
use crate::span::Source;

/// Panics if any span in `entities` is invalid for `source` or escapes its
/// parent. Used by tests to check built trees.
pub fn check<N>(source: &Source<'_>, entities: &[Entity<N>]) {
    let n = source.len();
    for e in entities {
        let span = e.span();
        assert!(
            source.contains(span),
            "entity span out of bounds: {:?} (source len: {})",
            span,
            n
        );
        if let Some(child) = e.child() {
            assert!(
                source.contains(child.span()) && span.contains(child.span()),
                "child span not contained in entity span: child {:?}, entity {:?}",
                child.span(),
                span
            );
            if let Child::Styled { span: styled, text, .. } = child {
                assert!(
                    source.contains(*text) && styled.contains(*text),
                    "text span not contained in styled child: text {:?}, child {:?}",
                    text,
                    styled
                );
            }
        }
        if let Entity::Link {
            href: Href::Span(href),
            ..
        } = e
        {
            assert!(
                source.contains(*href),
                "href span out of bounds: {:?} (source len: {})",
                href,
                n
            );
        }
    }
}
