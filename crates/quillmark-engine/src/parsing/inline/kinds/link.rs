//! Link syntax shared by inline links and reference definitions.

/// Longest label accepted between brackets.
pub const MAX_LABEL_LEN: usize = 999;

/// Deepest parenthesis nesting accepted in a raw destination.
pub const MAX_DESTINATION_PARENS: usize = 32;

/// Byte index of the `]` closing a label whose `[` was just consumed.
///
/// Labels may not contain unescaped brackets.
pub fn label_end(s: &str) -> Option<usize> {
    let b = s.as_bytes();
    let mut i = 0;
    while i < b.len() {
        match b[i] {
            b'\\' => i += 2,
            b'[' => return None,
            b']' => return (i <= MAX_LABEL_LEN).then_some(i),
            _ => i += 1,
        }
    }
    None
}

/// Parses a destination at the start of `s`: `<...>` or a raw run without
/// spaces and with balanced parentheses, nested at most
/// [`MAX_DESTINATION_PARENS`] deep. Returns the unescaped URL and the
/// bytes used.
pub fn parse_destination(s: &str) -> Option<(String, usize)> {
    let b = s.as_bytes();
    if b.first() == Some(&b'<') {
        let mut i = 1;
        while i < b.len() {
            match b[i] {
                b'\\' if i + 1 < b.len() => i += 2,
                b'>' => return Some((unescape(&s[1..i]), i + 1)),
                b'<' | b'\n' => return None,
                _ => i += 1,
            }
        }
        return None;
    }

    let mut depth = 0usize;
    let mut i = 0;
    while i < b.len() {
        match b[i] {
            b'\\' if b.get(i + 1).is_some_and(u8::is_ascii_punctuation) => i += 2,
            b'(' => {
                if depth == MAX_DESTINATION_PARENS {
                    return None;
                }
                depth += 1;
                i += 1;
            }
            b')' => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                i += 1;
            }
            c if c.is_ascii_whitespace() || c.is_ascii_control() => break,
            _ => i += 1,
        }
    }
    if i == 0 || depth != 0 {
        return None;
    }
    Some((unescape(&s[..i]), i))
}

/// Parses a `"title"`, `'title'` or `(title)` at the start of `s`.
pub fn parse_title(s: &str) -> Option<(String, usize)> {
    let b = s.as_bytes();
    let open = *b.first()?;
    let close = match open {
        b'"' => b'"',
        b'\'' => b'\'',
        b'(' => b')',
        _ => return None,
    };
    let mut i = 1;
    while i < b.len() {
        match b[i] {
            b'\\' if i + 1 < b.len() => i += 2,
            c if c == close => return Some((unescape(&s[1..i]), i + 1)),
            b'(' if open == b'(' => return None,
            _ => i += 1,
        }
    }
    None
}

/// Parses `(destination "title")` following a closing bracket.
///
/// Returns the URL, optional title and the bytes used including both
/// parentheses.
pub fn parse_inline_target(s: &str) -> Option<(String, Option<String>, usize)> {
    if !s.starts_with('(') {
        return None;
    }
    let mut i = 1;
    i += whitespace(&s[i..]);
    if s[i..].starts_with(')') {
        return Some((String::new(), None, i + 1));
    }
    let (url, used) = parse_destination(&s[i..])?;
    i += used;
    let gap = whitespace(&s[i..]);
    i += gap;
    let mut title = None;
    if gap > 0 {
        if let Some((t, used)) = parse_title(&s[i..]) {
            title = Some(t);
            i += used;
            i += whitespace(&s[i..]);
        }
    }
    s[i..].starts_with(')').then(|| (url, title, i + 1))
}

/// Removes backslashes that escape ASCII punctuation.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_punctuation() {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

fn whitespace(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_whitespace).count()
}
