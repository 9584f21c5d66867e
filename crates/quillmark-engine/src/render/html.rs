//! HTML output.
//!
//! Text is escaped with `html-escape`; link and image URLs are
//! percent-encoded and screened for script-capable schemes. With `escape`
//! on, raw HTML from the source is escaped as text instead of passed through.
//!
//! Plugin tags without an HTML hook render their content only.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::document::Document;
use crate::token::{Body, Token, TokenKind};

use super::{Hooks, Render};

/// Bytes percent-encoded in URLs. `%` is kept so existing escapes survive.
const URL_ENCODE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

const HARMFUL_SCHEMES: [&str; 4] = ["javascript:", "vbscript:", "file:", "data:"];
const SAFE_DATA_URLS: [&str; 4] = [
    "data:image/gif;",
    "data:image/png;",
    "data:image/jpeg;",
    "data:image/webp;",
];

/// Escapes `&`, `<`, `>` and `"`.
pub fn escape(s: &str) -> String {
    html_escape::encode_double_quoted_attribute(s).into_owned()
}

/// A URL ready for an attribute value.
pub fn safe_url(url: &str) -> String {
    let lower = url.trim_start().to_ascii_lowercase();
    let harmful = HARMFUL_SCHEMES.iter().any(|s| lower.starts_with(s))
        && !SAFE_DATA_URLS.iter().any(|s| lower.starts_with(s));
    if harmful {
        return "#harmful-link".to_string();
    }
    escape(&utf8_percent_encode(url, URL_ENCODE).to_string())
}

pub struct HtmlRenderer<'r> {
    hooks: Hooks<'r>,
    escape: bool,
}

impl<'r> HtmlRenderer<'r> {
    pub fn new(hooks: Hooks<'r>, escape: bool) -> Self {
        Self { hooks, escape }
    }

    fn children(&self, token: &Token) -> String {
        let mut out = String::new();
        for child in token.children() {
            self.token(child, &mut out);
        }
        out
    }

    /// Rendered children, or the escaped payload of a leaf.
    fn inner(&self, token: &Token) -> String {
        match &token.body {
            Body::Text(text) | Body::Inline(text) => escape(text),
            Body::Children(_) => self.children(token),
        }
    }

    fn payload(token: &Token) -> &str {
        token.text_payload().unwrap_or_default()
    }

    fn token(&self, token: &Token, out: &mut String) {
        if let Some(hook) = self.hooks.get(token) {
            out.push_str(&hook(token, &self.inner(token)));
            return;
        }
        match token.kind {
            TokenKind::Document | TokenKind::BlockText | TokenKind::Plugin(_) => {
                out.push_str(&self.inner(token));
            }
            TokenKind::Paragraph => {
                out.push_str(&format!("<p>{}</p>\n", self.children(token)));
            }
            TokenKind::Heading => {
                let level = token.attr_int("level").unwrap_or(1);
                out.push_str(&format!(
                    "<h{level}>{}</h{level}>\n",
                    self.children(token)
                ));
            }
            TokenKind::ThematicBreak => out.push_str("<hr />\n"),
            TokenKind::BlockCode => {
                let code = escape(Self::payload(token));
                match token.attr_str("info") {
                    Some(info) => out.push_str(&format!(
                        "<pre><code class=\"language-{}\">{code}</code></pre>\n",
                        escape(info)
                    )),
                    None => out.push_str(&format!("<pre><code>{code}</code></pre>\n")),
                }
            }
            TokenKind::BlockHtml => {
                let html = Self::payload(token);
                if self.escape {
                    out.push_str(&format!("<p>{}</p>\n", escape(html.trim())));
                } else {
                    out.push_str(html);
                }
            }
            TokenKind::BlockQuote => {
                out.push_str(&format!(
                    "<blockquote>\n{}</blockquote>\n",
                    self.children(token)
                ));
            }
            TokenKind::List => {
                let items = self.children(token);
                if !token.attr_bool("ordered") {
                    out.push_str(&format!("<ul>\n{items}</ul>\n"));
                    return;
                }
                match token.attr_int("start") {
                    Some(start) if start != 1 => {
                        out.push_str(&format!("<ol start=\"{start}\">\n{items}</ol>\n"));
                    }
                    _ => out.push_str(&format!("<ol>\n{items}</ol>\n")),
                }
            }
            TokenKind::ListItem => {
                out.push_str(&format!("<li>{}</li>\n", self.children(token)));
            }
            TokenKind::Text => out.push_str(&escape(Self::payload(token))),
            TokenKind::Emphasis => {
                out.push_str(&format!("<em>{}</em>", self.children(token)));
            }
            TokenKind::Strong => {
                out.push_str(&format!("<strong>{}</strong>", self.children(token)));
            }
            TokenKind::Codespan => {
                out.push_str(&format!("<code>{}</code>", escape(Self::payload(token))));
            }
            TokenKind::Linebreak => out.push_str("<br />\n"),
            TokenKind::Softbreak => out.push('\n'),
            TokenKind::InlineHtml => {
                let html = Self::payload(token);
                if self.escape {
                    out.push_str(&escape(html));
                } else {
                    out.push_str(html);
                }
            }
            TokenKind::Link => {
                let href = safe_url(token.attr_str("url").unwrap_or_default());
                out.push_str(&format!("<a href=\"{href}\"{}>", title(token)));
                out.push_str(&self.children(token));
                out.push_str("</a>");
            }
            TokenKind::Image => {
                let src = safe_url(token.attr_str("src").unwrap_or_default());
                let alt = escape(&token.plain_text());
                out.push_str(&format!(
                    "<img src=\"{src}\" alt=\"{alt}\"{} />",
                    title(token)
                ));
            }
        }
    }
}

fn title(token: &Token) -> String {
    token
        .attr_str("title")
        .map(|t| format!(" title=\"{}\"", escape(t)))
        .unwrap_or_default()
}

impl Render for HtmlRenderer<'_> {
    fn render(&self, doc: &Document) -> String {
        self.children(&doc.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_document;
    use crate::plugins;
    use crate::render::RendererKind;
    use crate::rules::RuleRegistry;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn html_with(md: &str, rules: &RuleRegistry, escape: bool) -> String {
        let doc = parse_document(md, rules);
        HtmlRenderer::new(Hooks::new(rules, RendererKind::Html), escape).render(&doc)
    }

    fn html(md: &str) -> String {
        html_with(md, &RuleRegistry::builtin(), false)
    }

    #[rstest]
    #[case("# Title\n\nSome *text* here.\n", "<h1>Title</h1>\n<p>Some <em>text</em> here.</p>\n")]
    #[case("- a\n- b\n", "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n")]
    #[case("3. a\n4. b", "<ol start=\"3\">\n<li>a</li>\n<li>b</li>\n</ol>\n")]
    #[case("1. a", "<ol>\n<li>a</li>\n</ol>\n")]
    #[case("> quote", "<blockquote>\n<p>quote</p>\n</blockquote>\n")]
    #[case("a  \nb", "<p>a<br />\nb</p>\n")]
    #[case("***", "<hr />\n")]
    #[case("`a<b`", "<p><code>a&lt;b</code></p>\n")]
    #[case("**b** & \"q\"", "<p><strong>b</strong> &amp; &quot;q&quot;</p>\n")]
    fn renders_builtin_blocks(#[case] md: &str, #[case] expected: &str) {
        assert_eq!(html(md), expected);
    }

    #[test]
    fn fenced_code_carries_language_class() {
        assert_snapshot!(html("```rust\nlet x = 1 < 2;\n```"), @r#"
        <pre><code class="language-rust">let x = 1 &lt; 2;
        </code></pre>
        "#);
    }

    #[test]
    fn loose_list_wraps_paragraphs() {
        assert_eq!(
            html("- a\n\n- b"),
            "<ul>\n<li><p>a</p>\n</li>\n<li><p>b</p>\n</li>\n</ul>\n"
        );
    }

    #[test]
    fn links_and_images() {
        assert_eq!(
            html("[a](/u \"T\") ![alt *x*](/i.png)"),
            "<p><a href=\"/u\" title=\"T\">a</a> <img src=\"/i.png\" alt=\"alt x\" /></p>\n"
        );
    }

    #[test]
    fn harmful_link_is_neutralised() {
        assert_eq!(
            html("[a](javascript:alert(1))"),
            "<p><a href=\"#harmful-link\">a</a></p>\n"
        );
    }

    #[rstest]
    #[case("/a b\"", "/a%20b%22")]
    #[case("/q?a=1&b=2", "/q?a=1&amp;b=2")]
    #[case("/caf%C3%A9", "/caf%C3%A9")]
    #[case("JavaScript:alert(1)", "#harmful-link")]
    #[case("vbscript:x", "#harmful-link")]
    #[case("data:text/html;base64,xx", "#harmful-link")]
    #[case("data:image/png;base64,xx", "data:image/png;base64,xx")]
    fn screens_urls(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(safe_url(url), expected);
    }

    #[test]
    fn raw_html_passes_through_unless_escaping() {
        let rules = RuleRegistry::builtin();
        let md = "<div>\nhi\n</div>\n\na <b>x</b>";
        assert_eq!(
            html_with(md, &rules, false),
            "<div>\nhi\n</div>\n<p>a <b>x</b></p>\n"
        );
        assert_eq!(
            html_with(md, &rules, true),
            "<p>&lt;div&gt;\nhi\n&lt;/div&gt;</p>\n<p>a &lt;b&gt;x&lt;/b&gt;</p>\n"
        );
    }

    #[test]
    fn plugin_hooks_render_their_tags() {
        let rules = RuleRegistry::compile(vec![plugins::strikethrough::plugin()]).unwrap();
        assert_eq!(
            html_with("~~gone~~ <", &rules, false),
            "<p><del>gone</del> &lt;</p>\n"
        );
    }

    #[test]
    fn plugin_tag_without_hook_renders_content() {
        let rules = RuleRegistry::compile(vec![plugins::strikethrough::plugin()]).unwrap();
        let doc = parse_document("~~a~~", &rules);
        // A registry without the plugin has no hook for its tag.
        let builtin = RuleRegistry::builtin();
        let out = HtmlRenderer::new(Hooks::new(&builtin, RendererKind::Html), false).render(&doc);
        assert_eq!(out, "<p>a</p>\n");
    }
}
