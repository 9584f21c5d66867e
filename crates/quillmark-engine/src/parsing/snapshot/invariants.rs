use crate::document::Document;
use crate::rules::RuleRegistry;
use crate::token::{Body, Token, TokenKind};

/// Leaves whose children came out of the inline scanner.
fn hosts_inline(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::Paragraph | TokenKind::Heading | TokenKind::BlockText
    ) || token.kind == TokenKind::Plugin("table_cell")
}

/// Validates parser output invariants.
///
/// Asserts that:
/// - Every tag belongs to the registry's closed tag set
/// - No pending inline body survived the inline phase
/// - All block spans are within the normalized source
/// - Child block spans are contained in their built-in parents' spans
/// - Inline children tile their source from byte 0 without gaps or overlap
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(doc: &Document, rules: &RuleRegistry) {
    let n = doc.source.len();
    doc.root.walk(&mut |t| {
        assert!(
            rules.knows_tag(t.kind.tag()),
            "unknown tag '{}' at {:?}",
            t.kind,
            t.span
        );
        assert!(
            !matches!(t.body, Body::Inline(_)),
            "pending inline body left in {} at {:?}",
            t.kind,
            t.span
        );
    });
    check_block(&doc.root, n);
    for (_, def) in doc.used_footnotes() {
        for child in &def.children {
            check_block(child, n);
        }
    }
}

fn check_block(token: &Token, n: usize) {
    assert!(
        token.span.start <= token.span.end && token.span.end <= n,
        "block span out of bounds: {} {:?} (source len: {n})",
        token.kind,
        token.span
    );
    if hosts_inline(token) {
        let Some(len) = token.inline_len else {
            panic!("{} {:?} was never inline-scanned", token.kind, token.span);
        };
        check_coverage(token.children(), len);
        return;
    }
    let builtin_parent = !matches!(token.kind, TokenKind::Plugin(_));
    for child in token.children() {
        if builtin_parent {
            assert!(
                token.span.contains(child.span),
                "child {} {:?} not contained in {} {:?}",
                child.kind,
                child.span,
                token.kind,
                token.span
            );
        }
        check_block(child, n);
    }
}

/// Checks that `tokens` cover a contiguous byte range starting at `from`,
/// recursing into inline containers.
pub fn check_tiling(tokens: &[Token], from: usize) {
    let mut at = from;
    for t in tokens {
        assert_eq!(
            t.span.start, at,
            "inline {} {:?} does not start where its predecessor ended",
            t.kind, t.span
        );
        assert!(t.span.start <= t.span.end, "inverted span {:?}", t.span);
        check_inline_children(t);
        at = t.span.end;
    }
}

/// Marker bytes on each side of an inline container's content.
fn marker_width(kind: TokenKind) -> Option<usize> {
    match kind {
        TokenKind::Emphasis => Some(1),
        TokenKind::Strong | TokenKind::Plugin("strikethrough") => Some(2),
        _ => None,
    }
}

/// The children of an inline container tile one contiguous run inside it;
/// for paired markers that run is exactly the content between them.
fn check_inline_children(t: &Token) {
    let children = t.children();
    let (Some(first), Some(last)) = (children.first(), children.last()) else {
        return;
    };
    for child in children {
        assert!(
            t.span.contains(child.span),
            "inline child {} {:?} escapes {} {:?}",
            child.kind,
            child.span,
            t.kind,
            t.span
        );
    }
    check_tiling(children, first.span.start);
    if let Some(w) = marker_width(t.kind) {
        let content = (t.span.start + w, t.span.end.saturating_sub(w));
        assert_eq!(
            (first.span.start, last.span.end),
            content,
            "children of {} {:?} do not fill the space between its markers",
            t.kind,
            t.span
        );
    }
}

/// Inline tokens of a whole source must end exactly at its length.
pub fn check_coverage(tokens: &[Token], len: usize) {
    check_tiling(tokens, 0);
    let end = tokens.last().map_or(0, |t| t.span.end);
    assert_eq!(end, len, "inline tokens cover {end} of {len} bytes");
}
