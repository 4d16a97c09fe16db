use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::expr::Evaluated;
use crate::span::{Source, Span};

/// Inline styling applied by a formatting entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    Emphasis,
    Strong,
    StrongEmphasis,
    Code,
    CodeBlock,
}

/// The child of a formatting entity or link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Child {
    Text(Span),
    /// One level of styling around literal text.
    Styled {
        style: Style,
        #[serde(flatten)]
        span: Span,
        /// The literal text inside the styling; contained in `span`.
        text: Span,
    },
}

impl Child {
    pub fn span(&self) -> Span {
        match self {
            Self::Text(span) | Self::Styled { span, .. } => *span,
        }
    }

    /// The literal text span at the bottom of the child.
    pub fn text_span(&self) -> Span {
        match self {
            Self::Text(span) | Self::Styled { text: span, .. } => *span,
        }
    }
}

/// A link target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Href {
    Url(String),
    /// The URL is written in the message text.
    Span(Span),
}

impl Href {
    pub fn resolve<'a>(&'a self, source: &Source<'a>) -> Cow<'a, str> {
        match self {
            Self::Url(url) => Cow::Borrowed(url),
            Self::Span(span) => Cow::Borrowed(source.substring(*span)),
        }
    }
}

/// A node of the entity tree.
///
/// `N` is the expression payload: [`ExprNode`](crate::expr::ExprNode) after
/// building, [`Evaluated`] after evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Entity<N = Evaluated> {
    Text {
        #[serde(flatten)]
        span: Span,
    },
    Styled {
        style: Style,
        #[serde(flatten)]
        span: Span,
        child: Child,
    },
    Link {
        #[serde(flatten)]
        span: Span,
        child: Child,
        href: Href,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Expr {
        #[serde(flatten)]
        span: Span,
        node: N,
    },
    /// A record that could not be classified or validated.
    Unknown {
        #[serde(flatten)]
        span: Span,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Text,
    Emphasis,
    Strong,
    StrongEmphasis,
    Code,
    CodeBlock,
    Link,
    Expr,
    Unknown,
}

impl From<Style> for EntityKind {
    fn from(style: Style) -> Self {
        match style {
            Style::Emphasis => Self::Emphasis,
            Style::Strong => Self::Strong,
            Style::StrongEmphasis => Self::StrongEmphasis,
            Style::Code => Self::Code,
            Style::CodeBlock => Self::CodeBlock,
        }
    }
}

impl<N> Entity<N> {
    pub fn span(&self) -> Span {
        match self {
            Self::Text { span }
            | Self::Styled { span, .. }
            | Self::Link { span, .. }
            | Self::Expr { span, .. }
            | Self::Unknown { span } => *span,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Text { .. } => EntityKind::Text,
            Self::Styled { style, .. } => (*style).into(),
            Self::Link { .. } => EntityKind::Link,
            Self::Expr { .. } => EntityKind::Expr,
            Self::Unknown { .. } => EntityKind::Unknown,
        }
    }

    pub fn child(&self) -> Option<&Child> {
        match self {
            Self::Styled { child, .. } | Self::Link { child, .. } => Some(child),
            _ => None,
        }
    }

    pub fn expr(&self) -> Option<&N> {
        match self {
            Self::Expr { node, .. } => Some(node),
            _ => None,
        }
    }

    /// Replaces the expression payload, keeping every other entity as is.
    pub fn map_expr<M>(self, f: impl FnOnce(N) -> M) -> Entity<M> {
        match self {
            Self::Text { span } => Entity::Text { span },
            Self::Styled { style, span, child } => Entity::Styled { style, span, child },
            Self::Link {
                span,
                child,
                href,
                title,
            } => Entity::Link {
                span,
                child,
                href,
                title,
            },
            Self::Expr { span, node } => Entity::Expr {
                span,
                node: f(node),
            },
            Self::Unknown { span } => Entity::Unknown { span },
        }
    }
}
