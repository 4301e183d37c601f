/// A byte cursor with explicit position tracking.
///
/// Matching state lives in the cursor value the caller owns rather than in a
/// shared pattern object, so a scan can be saved and restored by cloning.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    pub s: &'a str,
    /// Byte index into `s`.
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

    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.i += 1;
        Some(b)
    }

    /// Advances to the next `byte` (not consuming it) or to the end.
    /// Returns the new position.
    pub fn skip_until(&mut self, byte: u8) -> usize {
        self.i = self.s.as_bytes()[self.i..]
            .iter()
            .position(|&b| b == byte)
            .map_or(self.s.len(), |offset| self.i + offset);
        self.i
    }
}
