/// Byte cursor over a source slice that reports absolute positions.
///
/// `base` is the offset of `s` within the full document, so spans built from
/// [`Cursor::pos`] can be used directly against the document text.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being scanned.
    pub s: &'a str,
    /// Offset of `s` within the document.
    pub base: usize,
    /// Current local index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str, base: usize) -> Self {
        Self { s, base, i: 0 }
    }

    /// Current absolute byte position (base + local index).
    pub fn pos(&self) -> usize {
        self.base + self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// Advances by one byte, returning the consumed byte.
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.i += 1;
        Some(b)
    }

    /// Length of the run of `b` starting at the current position.
    pub fn run_len(&self, b: u8) -> usize {
        self.s.as_bytes()[self.i.min(self.s.len())..]
            .iter()
            .take_while(|&&c| c == b)
            .count()
    }

    /// Consumes a run of `b` and returns its length.
    pub fn bump_run(&mut self, b: u8) -> usize {
        let n = self.run_len(b);
        self.i += n;
        n
    }

    /// Advances until the next occurrence of `b` (or end of input).
    pub fn skip_until(&mut self, b: u8) {
        while let Some(c) = self.peek() {
            if c == b {
                break;
            }
            self.i += 1;
        }
    }
}
