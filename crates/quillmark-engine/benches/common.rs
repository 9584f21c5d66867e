// Shared by every bench target; a target may use only some of these.
#![allow(dead_code)]

/// One screenful of builtin syntax, repeated `copies` times.
pub fn builtin_corpus(copies: usize) -> String {
    const PAGE: &str = "\
# Title

Setext heading
--------------

Paragraph with *some* **content**, `code` and a [link][ref].
A lazy second line with an <https://example.com> autolink.

- Bullet point
  - Nested item
- Another item

3. ordered
4. list

> Quoted paragraph
> > nested quote

    indented code

```rust
fn example() {}
```

<div>
raw html
</div>

[ref]: https://example.com \"Example\"

";
    PAGE.repeat(copies)
}

/// Documents exercising every built-in plugin, `sections` top-level
/// sections each holding `depth` nested subsections.
pub fn plugin_corpus(sections: usize, depth: usize) -> String {
    let mut out = String::new();
    for section in 0..sections {
        out.push_str(&format!("# Part {section}\n\n"));
        for level in 0..depth {
            push_subsection(&mut out, section, level);
        }
    }
    out
}

fn push_subsection(out: &mut String, section: usize, level: usize) {
    let hashes = "#".repeat((level + 2).min(6));
    let label = format!("s{section}l{level}");
    out.push_str(&format!("{hashes} Notes {level}\n\n"));
    out.push_str(&format!(
        "Text with ~~struck~~ words, a footnote[^{label}] and https://example.com/{label}.\n\n"
    ));
    let indent = "  ".repeat(level.min(3));
    out.push_str(&format!("{indent}- [ ] open task\n{indent}- [x] done task\n\n"));
    if level % 2 == 0 {
        out.push_str("| key | value |\n| :-- | ----: |\n| a | 1 |\n| b | 2 |\n\n");
    }
    out.push_str(&format!("[^{label}]: Footnote for {label}.\n\n"));
}

/// One single-line paragraph per unit, repeated `copies` times: many small
/// pairs, or openers with no closer in reach.
pub fn unclosed_runs(copies: usize) -> String {
    ["*a* ", "~~a ", "[a](", "**b "]
        .iter()
        .map(|unit| unit.repeat(copies))
        .collect::<Vec<_>>()
        .join("\n\n")
}
