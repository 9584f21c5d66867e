//! Input normalization run before block scanning.

/// Tab stops are every four columns.
pub const TAB_STOP: usize = 4;

/// Normalizes line endings to `\n` and expands tabs to the next tab stop.
///
/// After this pass every leading-whitespace column is exactly one byte, which
/// lets the block scanner measure indentation in bytes.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut col = 0usize;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
                col = 0;
            }
            '\n' => {
                out.push('\n');
                col = 0;
            }
            '\t' => {
                let width = TAB_STOP - (col % TAB_STOP);
                out.extend(std::iter::repeat_n(' ', width));
                col += width;
            }
            // NUL is replaced per the usual markdown security rule.
            '\0' => {
                out.push('\u{FFFD}');
                col += 1;
            }
            _ => {
                out.push(c);
                col += 1;
            }
        }
    }
    out
}
