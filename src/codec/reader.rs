//! Streaming token reader for listings.
//!
//! Characters are decoded one at a time from the underlying [`BufRead`]. A
//! pushback stack holds characters that were looked at but not consumed, so a
//! failed token can be handed back in full and the next read starts exactly
//! where the failed one did.

use super::{is_blank, is_eol};
use crate::error::{SnapshotError, TokenKind};
use crate::types::{Checksum, Timestamp, TIMESTAMP_WIDTH};
use std::io::{BufRead, ErrorKind};
use std::path::PathBuf;

/// Tokenizer over a listing stream
///
/// Not shareable between consumers; every read takes `&mut self`.
pub struct TokenReader<R> {
    inner: R,
    /// Unread characters, next one last.
    pushback: Vec<char>,
    origin: PathBuf,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_origin(inner, "<stream>")
    }

    /// `origin` names the stream in I/O errors.
    pub fn with_origin(inner: R, origin: impl Into<PathBuf>) -> Self {
        TokenReader {
            inner,
            pushback: Vec::new(),
            origin: origin.into(),
        }
    }

    pub fn origin(&self) -> &std::path::Path {
        &self.origin
    }

    /// Consume the next character, `None` at end of input.
    pub fn next_char(&mut self) -> Result<Option<char>, SnapshotError> {
        if let Some(c) = self.pushback.pop() {
            return Ok(Some(c));
        }
        self.decode_char()
    }

    /// Hand a consumed character back; it becomes the next one read.
    pub fn unread(&mut self, c: char) {
        self.pushback.push(c);
    }

    /// Look at the next character without consuming it.
    pub fn peek(&mut self) -> Result<Option<char>, SnapshotError> {
        let next = self.next_char()?;
        if let Some(c) = next {
            self.unread(c);
        }
        Ok(next)
    }

    /// Skip spaces and tabs.
    pub fn skip_whitespace(&mut self) -> Result<(), SnapshotError> {
        while let Some(c) = self.next_char()? {
            if !is_blank(c) {
                self.unread(c);
                break;
            }
        }
        Ok(())
    }

    /// Consume the rest of the current line, including one end-of-line character.
    pub fn skip_line(&mut self) -> Result<(), SnapshotError> {
        while let Some(c) = self.next_char()? {
            if is_eol(c) {
                break;
            }
        }
        Ok(())
    }

    /// Read hex digit pairs into bytes.
    ///
    /// Stops at the first character that cannot complete a pair. A lone
    /// trailing digit stays unread.
    pub fn read_hex(&mut self) -> Result<Checksum, SnapshotError> {
        self.skip_whitespace()?;
        let mut bytes = Vec::new();
        loop {
            let Some(hi) = self.next_char()? else {
                break;
            };
            let Some(hi_nibble) = hi.to_digit(16) else {
                self.unread(hi);
                break;
            };
            let Some(lo) = self.next_char()? else {
                self.unread(hi);
                break;
            };
            let Some(lo_nibble) = lo.to_digit(16) else {
                self.unread(lo);
                self.unread(hi);
                break;
            };
            bytes.push(((hi_nibble << 4) | lo_nibble) as u8);
        }
        self.skip_whitespace()?;
        Ok(Checksum::new(bytes))
    }

    /// Read a run of non-whitespace characters.
    pub fn read_word(&mut self) -> Result<String, SnapshotError> {
        let mut consumed = Vec::new();
        let word = self.take_word(&mut consumed)?;
        self.skip_whitespace()?;
        Ok(word)
    }

    /// Look at up to `count` words on the current line without consuming them.
    pub fn peek_words(&mut self, count: usize) -> Result<Vec<String>, SnapshotError> {
        let mut consumed = Vec::new();
        let mut words = Vec::with_capacity(count);
        for _ in 0..count {
            let word = self.take_word(&mut consumed)?;
            if word.is_empty() {
                break;
            }
            words.push(word);
        }
        self.restore(consumed);
        Ok(words)
    }

    /// Read a decimal file size.
    pub fn read_size(&mut self) -> Result<u64, SnapshotError> {
        let mut consumed = Vec::new();
        let word = self.take_word(&mut consumed)?;
        match word.parse::<u64>() {
            Ok(size) => {
                self.skip_whitespace()?;
                Ok(size)
            }
            Err(e) => {
                self.restore(consumed);
                Err(SnapshotError::malformed(
                    TokenKind::Size,
                    format!("{:?} is not a decimal size: {}", word, e),
                ))
            }
        }
    }

    /// Read a fixed-width `yyyy.MM.dd.HH.mm.ss.SSS` timestamp.
    pub fn read_date(&mut self) -> Result<Timestamp, SnapshotError> {
        let mut consumed = Vec::new();
        self.take_blanks(&mut consumed)?;
        let mut text = String::with_capacity(TIMESTAMP_WIDTH);
        for _ in 0..TIMESTAMP_WIDTH {
            match self.next_char()? {
                Some(c) => {
                    consumed.push(c);
                    text.push(c);
                }
                None => break,
            }
        }
        match Timestamp::parse_listing(&text) {
            Some(timestamp) => {
                self.skip_whitespace()?;
                Ok(timestamp)
            }
            None => {
                self.restore(consumed);
                Err(SnapshotError::malformed(
                    TokenKind::Date,
                    format!("expected yyyy.MM.dd.HH.mm.ss.SSS, found {:?}", text),
                ))
            }
        }
    }

    /// Read a quoted or bare path.
    ///
    /// A quoted path ends at the next unescaped `"`. A bare path ends at the
    /// end of the line, which is left unread. In both forms `\n` and `\r`
    /// decode to line breaks and any other escaped character to itself.
    pub fn read_path(&mut self) -> Result<String, SnapshotError> {
        self.skip_whitespace()?;
        let quoted = match self.next_char()? {
            Some('"') => true,
            Some(c) => {
                self.unread(c);
                false
            }
            None => false,
        };

        let mut path = String::new();
        let mut escaping = false;
        while let Some(c) = self.next_char()? {
            if escaping {
                path.push(match c {
                    'n' => '\n',
                    'r' => '\r',
                    other => other,
                });
                escaping = false;
                continue;
            }
            match c {
                '\\' => escaping = true,
                '"' if quoted => {
                    self.skip_whitespace()?;
                    return Ok(path);
                }
                '\n' | '\r' if !quoted => {
                    self.unread(c);
                    return Ok(path);
                }
                other => path.push(other),
            }
        }
        if escaping {
            path.push('\\');
        }
        Ok(path)
    }

    fn take_blanks(&mut self, consumed: &mut Vec<char>) -> Result<(), SnapshotError> {
        while let Some(c) = self.next_char()? {
            if !is_blank(c) {
                self.unread(c);
                break;
            }
            consumed.push(c);
        }
        Ok(())
    }

    fn take_word(&mut self, consumed: &mut Vec<char>) -> Result<String, SnapshotError> {
        self.take_blanks(consumed)?;
        let mut word = String::new();
        while let Some(c) = self.next_char()? {
            if is_blank(c) || is_eol(c) {
                self.unread(c);
                break;
            }
            consumed.push(c);
            word.push(c);
        }
        Ok(word)
    }

    /// Push back everything a failed token consumed, oldest character next.
    fn restore(&mut self, consumed: Vec<char>) {
        self.pushback.extend(consumed.into_iter().rev());
    }

    fn decode_char(&mut self) -> Result<Option<char>, SnapshotError> {
        let Some(lead) = self.read_byte()? else {
            return Ok(None);
        };
        let width = match lead {
            0x00..=0x7f => return Ok(Some(lead as char)),
            0xc2..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf4 => 4,
            _ => {
                return Err(SnapshotError::malformed(
                    TokenKind::Text,
                    format!("invalid UTF-8 lead byte 0x{:02x}", lead),
                ))
            }
        };
        let mut buf = [0u8; 4];
        buf[0] = lead;
        for slot in buf.iter_mut().take(width).skip(1) {
            *slot = self.read_byte()?.ok_or_else(|| {
                SnapshotError::malformed(TokenKind::Text, "truncated UTF-8 sequence")
            })?;
        }
        let text = std::str::from_utf8(&buf[..width])
            .map_err(|e| SnapshotError::malformed(TokenKind::Text, e.to_string()))?;
        Ok(text.chars().next())
    }

    fn read_byte(&mut self) -> Result<Option<u8>, SnapshotError> {
        loop {
            let buf = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(SnapshotError::io(self.origin.clone(), e)),
            };
            let Some(&byte) = buf.first() else {
                return Ok(None);
            };
            self.inner.consume(1);
            return Ok(Some(byte));
        }
    }
}
