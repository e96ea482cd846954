//! Byte-level scanning primitives for line-oriented text formats.
//!
//! The scanner walks a borrowed byte buffer and never copies: words and
//! lines are returned as sub-slices of the input. Words never cross a line
//! break, so a short record (`v 1 2`) cannot swallow the next line.

use thiserror::Error;

/// A line was longer than the working bound the caller allows.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("line {line} is {length} bytes long, limit is {limit}")]
pub struct LineTooLong {
    pub line: usize,
    pub length: usize,
    pub limit: usize,
}

/// Horizontal whitespace inside a line.
#[inline]
pub fn is_space(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Line terminators. NUL is treated as a terminator to tolerate padded buffers.
#[inline]
pub fn is_line_end(b: u8) -> bool {
    b == b'\n' || b == b'\r' || b == 0
}

/// Cursor over an input buffer with a line counter.
pub struct Scanner<'a> {
    data: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            line: 0,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Byte under the cursor.
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Byte `offset` positions past the cursor.
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.data.get(self.pos + offset).copied()
    }

    pub fn advance(&mut self, count: usize) {
        self.pos = (self.pos + count).min(self.data.len());
    }

    /// Number of lines fully consumed so far.
    pub fn lines_consumed(&self) -> usize {
        self.line
    }

    /// 1-based number of the line under the cursor, for diagnostics.
    pub fn line_number(&self) -> usize {
        self.line + 1
    }

    /// Skip spaces and tabs, stopping at anything else (including line ends).
    pub fn skip_spaces(&mut self) {
        while let Some(b) = self.peek() {
            if !is_space(b) {
                break;
            }
            self.pos += 1;
        }
    }

    /// Skip the directive keyword under the cursor (`usemtl`, `mtllib`, ...).
    pub fn skip_directive(&mut self) {
        while let Some(b) = self.peek() {
            if is_space(b) || is_line_end(b) {
                break;
            }
            self.pos += 1;
        }
    }

    /// Next whitespace-delimited word on the current line.
    ///
    /// Returns an empty slice when the line has no more words; the cursor is
    /// then left on the line terminator.
    pub fn next_word(&mut self) -> &'a [u8] {
        self.skip_spaces();
        let start = self.pos;
        self.skip_directive();
        let data = self.data;
        &data[start..self.pos]
    }

    /// Remainder of the current line, without its terminator.
    ///
    /// Lines longer than `limit` are rejected rather than truncated; the
    /// cursor still moves to the line end so the caller can skip it.
    pub fn copy_line(&mut self, limit: usize) -> Result<&'a [u8], LineTooLong> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == b'\n' || b == b'\r' {
                break;
            }
            self.pos += 1;
        }

        let length = self.pos - start;
        if length > limit {
            return Err(LineTooLong {
                line: self.line_number(),
                length,
                limit,
            });
        }
        let data = self.data;
        Ok(&data[start..self.pos])
    }

    /// Consume through the next `'\n'` (or to end of input).
    pub fn skip_line(&mut self) {
        while let Some(b) = self.peek() {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                return;
            }
        }
    }
}

/// Parse the leading floating point number of `text`.
///
/// Locale independent: the decimal separator is always `.`. Trailing garbage
/// is ignored and text without a numeric prefix yields `0.0`.
pub fn parse_float(text: &[u8]) -> f32 {
    let mut end = 0;
    if matches!(text.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let rest = &text[end..];
    if rest.len() >= 3 {
        let word = [
            rest[0].to_ascii_lowercase(),
            rest[1].to_ascii_lowercase(),
            rest[2].to_ascii_lowercase(),
        ];
        let negative = text.first() == Some(&b'-');
        match &word {
            b"inf" if negative => return f32::NEG_INFINITY,
            b"inf" => return f32::INFINITY,
            b"nan" => return f32::NAN,
            _ => {}
        }
    }

    let digits_start = end;
    end += count_digits(&text[end..]);
    let mut mantissa_digits = end - digits_start;

    if text.get(end) == Some(&b'.') {
        let fraction = count_digits(&text[end + 1..]);
        mantissa_digits += fraction;
        end += 1 + fraction;
    }

    if mantissa_digits == 0 {
        return 0.0;
    }

    if matches!(text.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(text.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&text[exp_end.min(text.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    std::str::from_utf8(&text[..end])
        .ok()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(0.0)
}

/// Parse the leading signed integer of `text`.
///
/// Returns the value and the number of bytes consumed. Zero bytes consumed
/// means there was no integer; `None` as the value means it overflowed `i64`.
pub fn parse_int(text: &[u8]) -> (Option<i64>, usize) {
    let sign = usize::from(matches!(text.first(), Some(b'+' | b'-')));
    let digits = count_digits(&text[sign..]);
    if digits == 0 {
        return (None, 0);
    }

    let consumed = sign + digits;
    let value = std::str::from_utf8(&text[..consumed])
        .ok()
        .and_then(|s| s.parse::<i64>().ok());
    (value, consumed)
}

fn count_digits(text: &[u8]) -> usize {
    text.iter().take_while(|b| b.is_ascii_digit()).count()
}
