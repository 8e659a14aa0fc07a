//! Minimal ESC/POS command builder.
//!
//! Alongside the raw bytes it keeps a plain-text transcript of what was
//! printed, which is what gets logged when no device is attached.

const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;
const LF: u8 = 0x0A;

/// Print width of an 80mm roll in the default font.
pub const LINE_WIDTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Character size and emphasis, as set by `ESC !`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Normal,
    DoubleHeight,
    BoldDoubleHeight,
    Large,
}

impl TextSize {
    const fn mode(self) -> u8 {
        match self {
            Self::Normal => 0x00,
            Self::DoubleHeight => 0x10,
            Self::BoldDoubleHeight => 0x18,
            Self::Large => 0x30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EscPos {
    bytes: Vec<u8>,
    transcript: Vec<String>,
    line: String,
}

impl Default for EscPos {
    fn default() -> Self {
        Self::new()
    }
}

impl EscPos {
    /// Start a document with `ESC @` (initialize).
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: vec![ESC, b'@'],
            transcript: Vec::new(),
            line: String::new(),
        }
    }

    pub fn align(&mut self, align: Align) -> &mut Self {
        let n = match align {
            Align::Left => 0x00,
            Align::Center => 0x01,
        };
        self.bytes.extend_from_slice(&[ESC, b'a', n]);
        self
    }

    pub fn size(&mut self, size: TextSize) -> &mut Self {
        self.bytes.extend_from_slice(&[ESC, b'!', size.mode()]);
        self
    }

    /// Append text. The printer runs a single-byte code page, so anything
    /// outside printable ASCII becomes `?`.
    pub fn text(&mut self, text: &str) -> &mut Self {
        for c in text.chars() {
            let byte = u8::try_from(c)
                .ok()
                .filter(|b| b.is_ascii_graphic() || *b == b' ')
                .unwrap_or(b'?');
            self.bytes.push(byte);
            self.line.push(char::from(byte));
        }
        self
    }

    /// Append text followed by a line feed.
    pub fn line(&mut self, text: &str) -> &mut Self {
        self.text(text).feed(1)
    }

    pub fn feed(&mut self, lines: usize) -> &mut Self {
        for _ in 0..lines {
            self.bytes.push(LF);
            self.transcript.push(std::mem::take(&mut self.line));
        }
        self
    }

    /// A full-width rule made of `c`.
    pub fn rule(&mut self, c: char) -> &mut Self {
        self.line(&c.to_string().repeat(LINE_WIDTH))
    }

    /// Full cut (`GS V 0`).
    pub fn cut(&mut self) -> &mut Self {
        self.bytes.extend_from_slice(&[GS, b'V', 0x00]);
        self
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Printed text, one entry per line.
    #[must_use]
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }
}
