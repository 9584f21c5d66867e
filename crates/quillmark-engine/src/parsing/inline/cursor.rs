/// A byte cursor over one inline source string.
///
/// Positions are byte offsets into `s`; inline spans are relative to the
/// start of the leaf's inline source.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being scanned.
    pub s: &'a str,
    /// Current byte index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// Checks if the remaining input starts with the given byte pattern.
    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.s.as_bytes()[self.i.min(self.s.len())..].starts_with(pat)
    }

    /// Whether the cursor sits on a UTF-8 character boundary.
    pub fn at_char_boundary(&self) -> bool {
        self.s.is_char_boundary(self.i.min(self.s.len()))
    }

    /// Length of the run of `b` starting at the cursor.
    pub fn run_len(&self, b: u8) -> usize {
        self.s.as_bytes()[self.i.min(self.s.len())..]
            .iter()
            .take_while(|c| **c == b)
            .count()
    }

    /// The character before the cursor.
    pub fn prev_char(&self) -> Option<char> {
        self.s[..self.i.min(self.s.len())].chars().next_back()
    }

    /// Advances by `n` bytes.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    /// Advances past the current character (one byte for ASCII).
    pub fn bump_char(&mut self) {
        let n = self.s[self.i.min(self.s.len())..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        self.i += n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cur = Cursor::new("hello");
        assert_eq!(cur.pos(), 0);
        assert!(!cur.eof());
        assert_eq!(cur.peek(), Some(b'h'));
        cur.bump_char();
        assert_eq!(cur.pos(), 1);
    }

    #[test]
    fn cursor_starts_with() {
        let cur = Cursor::new("![alt]");
        assert!(cur.starts_with(b"!["));
        assert!(!cur.starts_with(b"]]"));
    }

    #[test]
    fn empty_string_input() {
        let cur = Cursor::new("");
        assert!(cur.eof());
        assert_eq!(cur.peek(), None);
        assert_eq!(cur.prev_char(), None);
    }

    #[test]
    fn starts_with_at_eof() {
        let mut cur = Cursor::new("ab");
        cur.bump_n(2);
        assert!(cur.eof());
        assert!(cur.starts_with(b""));
        assert!(!cur.starts_with(b"a"));
    }

    #[test]
    fn bump_char_steps_over_multibyte() {
        let mut cur = Cursor::new("éa");
        cur.bump_char();
        assert_eq!(cur.pos(), 2);
        assert!(cur.at_char_boundary());
        assert_eq!(cur.prev_char(), Some('é'));
        assert_eq!(cur.peek(), Some(b'a'));
    }

    #[test]
    fn run_len_counts_identical_bytes() {
        let mut cur = Cursor::new("a***b");
        cur.bump_n(1);
        assert_eq!(cur.run_len(b'*'), 3);
        assert_eq!(cur.run_len(b'_'), 0);
    }
}
