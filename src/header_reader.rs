//! Generic "read a header at this offset" plumbing: every header is read by
//! seeking to an explicit offset first, never by trusting the stream's
//! current position, which is what makes the layout walker (`crate::reader`)
//! robust to the per-header-family quirks in how far a header's declared
//! length actually reaches.

use crate::byte_order::ByteOrder;
use crate::header::Header;
use std::io::{Read, Seek, SeekFrom};

pub struct HeaderReader<'a, R: Read + Seek> {
    pub source: &'a mut R,
    pub revision: i32,
    pub order: ByteOrder,
    pub utf8: bool,
}

impl<'a, R: Read + Seek> HeaderReader<'a, R> {
    pub fn new(source: &'a mut R, revision: i32, order: ByteOrder, utf8: bool) -> Self {
        HeaderReader { source, revision, order, utf8 }
    }

    pub fn seek_to(&mut self, offset: u64) -> std::io::Result<()> {
        self.source.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    pub fn position(&mut self) -> std::io::Result<u64> {
        self.source.stream_position()
    }

    /// Reads `count` headers in sequence, each one's offset computed from
    /// the previous header's `effective_len_bytes()` -- the direct
    /// translation of `HeaderReader.multi_headers`.
    pub fn multi_headers<T: Header>(
        &mut self,
        count: usize,
        start_offset: u64,
        mut read_one: impl FnMut(&mut Self, u64) -> std::io::Result<T>,
    ) -> std::io::Result<Vec<T>> {
        let mut headers = Vec::with_capacity(count);
        let mut offset = start_offset;
        for _ in 0..count {
            self.seek_to(offset)?;
            let h = read_one(self, offset)?;
            offset += h.effective_len_bytes();
            headers.push(h);
        }
        Ok(headers)
    }

    pub fn single_header<T: Header>(
        &mut self,
        offset: u64,
        read_one: impl FnOnce(&mut Self, u64) -> std::io::Result<T>,
    ) -> std::io::Result<T> {
        self.seek_to(offset)?;
        read_one(self, offset)
    }
}
