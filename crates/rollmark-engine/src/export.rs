//! Flattened, text-resolved entities and whole-message serializations.

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};
use crate::expr::Evaluated;
use crate::span::{Source, Span};

/// An evaluated entity with its text resolved against the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntity {
    pub kind: EntityKind,
    #[serde(flatten)]
    pub span: Span,
    /// Child text for formatting entities and links, trimmed source text for
    /// expressions, the covered text otherwise.
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<Evaluated>,
    /// Rendered roll text of an expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expr_text: Option<String>,
}

pub fn export(source: &Source<'_>, entities: &[Entity]) -> Vec<ExportEntity> {
    entities
        .iter()
        .map(|entity| export_entity(source, entity))
        .collect()
}

pub fn export_entity(source: &Source<'_>, entity: &Entity) -> ExportEntity {
    let span = entity.span();
    let mut exported = ExportEntity {
        kind: entity.kind(),
        span,
        text: String::new(),
        href: None,
        title: None,
        node: None,
        expr_text: None,
    };
    match entity {
        Entity::Text { .. } | Entity::Unknown { .. } => {
            exported.text = source.substring(span).to_owned();
        }
        Entity::Styled { child, .. } => {
            exported.text = source.substring(child.text_span()).to_owned();
        }
        Entity::Link {
            child, href, title, ..
        } => {
            exported.text = source.substring(child.text_span()).to_owned();
            exported.href = Some(href.resolve(source).into_owned());
            exported.title = title.clone();
        }
        Entity::Expr { node, .. } => {
            exported.text = source.substring(span).trim_end().to_owned();
            exported.expr_text = Some(node.to_string());
            exported.node = Some(node.clone());
        }
    }
    exported
}

/// Serializes a message as Markdown.
pub fn to_markdown(entities: &[ExportEntity]) -> String {
    entities.iter().map(markdown_entity).collect()
}

/// Serializes a message as forum BBCode.
pub fn to_bbcode(entities: &[ExportEntity]) -> String {
    entities.iter().map(bbcode_entity).collect()
}

fn markdown_entity(entity: &ExportEntity) -> String {
    let text = &entity.text;
    match entity.kind {
        EntityKind::Text => text.clone(),
        EntityKind::Emphasis => format!("*{text}*"),
        EntityKind::Strong => format!("**{text}**"),
        EntityKind::StrongEmphasis => format!("***{text}***"),
        EntityKind::Code => format!("`{text}`"),
        EntityKind::CodeBlock => format!("\n```\n{text}\n```\n"),
        EntityKind::Link => format!("[{text}]({})", entity.href.as_deref().unwrap_or_default()),
        EntityKind::Expr => format!("{{{}}}", entity.expr_text.as_deref().unwrap_or_default()),
        EntityKind::Unknown => "[???]".to_owned(),
    }
}

fn bbcode_entity(entity: &ExportEntity) -> String {
    let text = &entity.text;
    match entity.kind {
        EntityKind::Text => text.clone(),
        EntityKind::Emphasis => format!("[i]{text}[/i]"),
        EntityKind::Strong => format!("[b]{text}[/b]"),
        EntityKind::StrongEmphasis => format!("[b][i]{text}[/i][/b]"),
        EntityKind::Code => format!("[tt]{text}[/tt]"),
        EntityKind::CodeBlock => format!("\n[code]{text}[/code]\n"),
        EntityKind::Link => format!(
            "[url={}]{text}[/url]",
            entity.href.as_deref().unwrap_or_default()
        ),
        EntityKind::Expr => format!(
            "[tt]{{{}}}[/tt]",
            entity.expr_text.as_deref().unwrap_or_default()
        ),
        EntityKind::Unknown => "[???]".to_owned(),
    }
}
