//! Doc and plain comments preceding a member.

use super::{ExtractCx, TokenExtractor};
use crate::token::{NodeId, TokenKind};

/// Moves every comment token into the pending comments of the context.
#[derive(Debug, Default)]
pub struct CommentExtractor {
    found: Option<String>,
}

impl CommentExtractor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenExtractor for CommentExtractor {
    fn name(&self) -> &'static str {
        "comment"
    }

    fn accept_next(&mut self, node: NodeId, cx: &mut ExtractCx<'_>) -> bool {
        let token = cx.token(node);
        if token.kind != TokenKind::Comment {
            return false;
        }
        self.found = Some(strip_comment(&token.text));
        true
    }

    fn block_complete(&mut self, _cx: &mut ExtractCx<'_>) {}

    fn is_idle(&self) -> bool {
        self.found.is_none()
    }

    fn is_complete(&self) -> bool {
        self.found.is_some()
    }

    fn is_failed(&self) -> bool {
        false
    }

    fn finish(&mut self, cx: &mut ExtractCx<'_>) {
        if let Some(comment) = self.found.take() {
            cx.pending_comments.push(comment);
        }
    }

    fn reset(&mut self) {
        self.found = None;
    }
}

/// Comment text without its `//`, `///`, `/*`, `/**` and `*/` markers.
pub fn strip_comment(text: &str) -> String {
    let text = text.trim();
    let body = if let Some(rest) = text.strip_prefix("///") {
        rest
    } else if let Some(rest) = text.strip_prefix("//") {
        rest
    } else if text.starts_with("/*") && text.ends_with("*/") && text.len() >= 4 {
        let inner = &text[2..text.len() - 2];
        inner.strip_prefix('*').unwrap_or(inner)
    } else {
        text
    };
    body.trim().to_string()
}
