/*!
The placeholder syntax understood inside raw patterns.

A placeholder is `~<` followed by one or more characters from
`[A-Za-z0-9_.-]` and a closing `>`. It is the only syntax this crate
interprets; every other byte of a raw pattern is opaque regex text. A `~<`
that is not followed by a well formed name and `>` is literal text too.
*/

use memchr::memmem;

const OPEN: &[u8] = b"~<";
const CLOSE: u8 = b'>';

/// A piece of a raw pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'p> {
    /// Text copied verbatim into the expanded pattern.
    Literal(&'p str),
    /// The name inside a `~<name>` placeholder.
    Reference(&'p str),
}

/// Returns true if `byte` may appear in a fragment name.
pub fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'.' | b'-')
}

/// Returns true if `name` is a valid fragment name.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(is_name_byte)
}

/// An iterator over the pieces of a raw pattern, left to right.
///
/// Adjacent literal text is always yielded as one piece, and empty literals
/// are never yielded.
#[derive(Debug, Clone)]
pub struct Pieces<'p> {
    pattern: &'p str,
    pos: usize,
    /// A reference found while scanning for the end of a literal.
    pending: Option<(usize, usize)>,
}

impl<'p> Pieces<'p> {
    /// Split `pattern` into literal text and placeholder references.
    pub fn new(pattern: &'p str) -> Pieces<'p> {
        Pieces { pattern, pos: 0, pending: None }
    }

    /// Find the next well formed placeholder at or after `from`, returning
    /// the span of the whole placeholder.
    fn next_placeholder(&self, mut from: usize) -> Option<(usize, usize)> {
        let bytes = self.pattern.as_bytes();
        while let Some(offset) = memmem::find(&bytes[from..], OPEN) {
            let start = from + offset;
            let name_start = start + OPEN.len();
            let name_len =
                bytes[name_start..].iter().take_while(|&&b| is_name_byte(b)).count();
            let close = name_start + name_len;
            if name_len > 0 && bytes.get(close) == Some(&CLOSE) {
                return Some((start, close + 1));
            }
            // Not a placeholder, but its '<' may still start one: "~<~<a>".
            from = start + 1;
        }
        None
    }
}

impl<'p> Iterator for Pieces<'p> {
    type Item = Piece<'p>;

    fn next(&mut self) -> Option<Piece<'p>> {
        if let Some((start, end)) = self.pending.take() {
            self.pos = end;
            return Some(Piece::Reference(&self.pattern[start + OPEN.len()..end - 1]));
        }
        if self.pos >= self.pattern.len() {
            return None;
        }
        match self.next_placeholder(self.pos) {
            Some((start, end)) if start == self.pos => {
                self.pos = end;
                Some(Piece::Reference(&self.pattern[start + OPEN.len()..end - 1]))
            }
            Some((start, end)) => {
                let literal = &self.pattern[self.pos..start];
                self.pending = Some((start, end));
                self.pos = start;
                Some(Piece::Literal(literal))
            }
            None => {
                let literal = &self.pattern[self.pos..];
                self.pos = self.pattern.len();
                Some(Piece::Literal(literal))
            }
        }
    }
}

/// Returns the names referenced directly by `pattern`, in order of
/// appearance and including repeats.
pub fn references<'p>(pattern: &'p str) -> impl Iterator<Item = &'p str> + 'p {
    Pieces::new(pattern).filter_map(|piece| match piece {
        Piece::Reference(name) => Some(name),
        Piece::Literal(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces(pattern: &str) -> Vec<Piece<'_>> {
        Pieces::new(pattern).collect()
    }

    #[test]
    fn plain_text_is_one_literal() {
        assert_eq!(pieces(r"\d+"), vec![Piece::Literal(r"\d+")]);
        assert_eq!(pieces(""), vec![]);
    }

    #[test]
    fn splits_around_placeholders() {
        assert_eq!(
            pieces(r"~<natural>\.~<natural>"),
            vec![
                Piece::Reference("natural"),
                Piece::Literal(r"\."),
                Piece::Reference("natural"),
            ]
        );
        assert_eq!(
            pieces(r"\(~<expr>\)"),
            vec![Piece::Literal(r"\("), Piece::Reference("expr"), Piece::Literal(r"\)")]
        );
    }

    #[test]
    fn adjacent_placeholders() {
        assert_eq!(
            pieces("~<a>~<b.c-d_1>"),
            vec![Piece::Reference("a"), Piece::Reference("b.c-d_1")]
        );
    }

    #[test]
    fn malformed_placeholders_are_literal() {
        assert_eq!(pieces("~<>"), vec![Piece::Literal("~<>")]);
        assert_eq!(pieces("~<a b>"), vec![Piece::Literal("~<a b>")]);
        assert_eq!(pieces("~<abc"), vec![Piece::Literal("~<abc")]);
        assert_eq!(pieces("a~b<c>"), vec![Piece::Literal("a~b<c>")]);
    }

    #[test]
    fn placeholder_after_broken_opener() {
        assert_eq!(
            pieces("x~<~<a>y"),
            vec![Piece::Literal("x~<"), Piece::Reference("a"), Piece::Literal("y")]
        );
    }

    #[test]
    fn non_ascii_text_passes_through() {
        assert_eq!(
            pieces("é~<a>ü"),
            vec![Piece::Literal("é"), Piece::Reference("a"), Piece::Literal("ü")]
        );
    }

    #[test]
    fn shallow_references() {
        let names: Vec<&str> = references(r"~<integer>\.~<natural>~<integer>").collect();
        assert_eq!(names, vec!["integer", "natural", "integer"]);
    }

    #[test]
    fn name_validation() {
        assert!(is_valid_name("positive_rational"));
        assert!(is_valid_name("a.b-c_9"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("a b"));
        assert!(!is_valid_name("a>"));
        assert!(!is_valid_name("ü"));
    }
}
