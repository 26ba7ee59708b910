//! Truncating formatters for fixed-capacity buffers
//!
//! Both writers accept any amount of output and keep the longest prefix that
//! fits, cut on a UTF-8 character boundary. Once output has been cut, later
//! writes are dropped too so the result is always a prefix of the full text.

use core::fmt;
use heapless::String;

/// `fmt::Write` into a byte block
pub struct BlockWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
    truncated: bool,
}

impl<'a> BlockWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            len: 0,
            truncated: false,
        }
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Write for BlockWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }

        let room = self.buf.len() - self.len;
        let mut take = s.len();
        if take > room {
            take = room;
            while !s.is_char_boundary(take) {
                take -= 1;
            }
            self.truncated = true;
        }

        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

/// Stack scratch string of `N` bytes
pub struct Scratch<const N: usize> {
    text: String<N>,
    truncated: bool,
}

impl<const N: usize> Scratch<N> {
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            truncated: false,
        }
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }
}

impl<const N: usize> Default for Scratch<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Write for Scratch<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }
        if self.text.push_str(s).is_ok() {
            return Ok(());
        }
        for ch in s.chars() {
            if self.text.push(ch).is_err() {
                self.truncated = true;
                break;
            }
        }
        Ok(())
    }
}
